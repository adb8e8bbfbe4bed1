//! Equipment records and the catalog entry draft.
//!
//! `Equipment` is the durable record owned by the equipment store;
//! `NewEquipment` validates catalog entries before a handler talks to a
//! port or service.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lifecycle status of a piece of equipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EquipmentStatus {
    Available,
    Borrowed,
    Maintenance,
}

impl EquipmentStatus {
    /// Stable lowercase name used on the wire and in the store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Borrowed => "borrowed",
            Self::Maintenance => "maintenance",
        }
    }
}

impl fmt::Display for EquipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown equipment status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for EquipmentStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "borrowed" => Ok(Self::Borrowed),
            "maintenance" => Ok(Self::Maintenance),
            other => Err(UnknownStatus(other.to_owned())),
        }
    }
}

/// Durable equipment record as stored and served.
///
/// ## Invariants
/// - `borrowed_by` is `Some` if and only if `status == Borrowed`. The
///   transition authority enforces this on every write.
/// - `serial_no` is unique and immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    pub id: i32,
    pub serial_no: String,
    pub name: String,
    pub category: String,
    pub status: EquipmentStatus,
    pub borrowed_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validation failures raised when constructing a [`NewEquipment`] draft.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EquipmentValidationError {
    #[error("name must be at least 2 characters")]
    NameTooShort,
    #[error("category must be at least 2 characters")]
    CategoryTooShort,
    #[error("serialNo must be at least 3 characters")]
    SerialNoTooShort,
}

impl EquipmentValidationError {
    /// Field name the failure refers to, in wire casing.
    pub fn field(&self) -> &'static str {
        match self {
            Self::NameTooShort => "name",
            Self::CategoryTooShort => "category",
            Self::SerialNoTooShort => "serialNo",
        }
    }
}

/// Validated draft for a catalog entry. New equipment always starts out
/// available with no borrower.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEquipment {
    name: String,
    category: String,
    serial_no: String,
}

impl NewEquipment {
    /// Construct a draft from raw inputs, trimming surrounding whitespace.
    pub fn try_from_parts(
        name: &str,
        category: &str,
        serial_no: &str,
    ) -> Result<Self, EquipmentValidationError> {
        let name = name.trim();
        let category = category.trim();
        let serial_no = serial_no.trim();

        if name.chars().count() < 2 {
            return Err(EquipmentValidationError::NameTooShort);
        }
        if category.chars().count() < 2 {
            return Err(EquipmentValidationError::CategoryTooShort);
        }
        if serial_no.chars().count() < 3 {
            return Err(EquipmentValidationError::SerialNoTooShort);
        }

        Ok(Self {
            name: name.to_owned(),
            category: category.to_owned(),
            serial_no: serial_no.to_owned(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn serial_no(&self) -> &str {
        &self.serial_no
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("M", "Notebook", "MB-001", EquipmentValidationError::NameTooShort)]
    #[case("MacBook", "N", "MB-001", EquipmentValidationError::CategoryTooShort)]
    #[case("MacBook", "Notebook", "MB", EquipmentValidationError::SerialNoTooShort)]
    #[case("  ", "Notebook", "MB-001", EquipmentValidationError::NameTooShort)]
    fn rejects_short_fields(
        #[case] name: &str,
        #[case] category: &str,
        #[case] serial_no: &str,
        #[case] expected: EquipmentValidationError,
    ) {
        let err = NewEquipment::try_from_parts(name, category, serial_no)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn trims_and_accepts_valid_fields() {
        let draft = NewEquipment::try_from_parts("  MacBook Pro 14\" ", "Notebook", " MB-001 ")
            .expect("valid draft");
        assert_eq!(draft.name(), "MacBook Pro 14\"");
        assert_eq!(draft.serial_no(), "MB-001");
    }

    #[rstest]
    #[case("available", EquipmentStatus::Available)]
    #[case("borrowed", EquipmentStatus::Borrowed)]
    #[case("maintenance", EquipmentStatus::Maintenance)]
    fn status_parses_stable_names(#[case] raw: &str, #[case] expected: EquipmentStatus) {
        assert_eq!(raw.parse::<EquipmentStatus>().expect("parses"), expected);
        assert_eq!(expected.as_str(), raw);
    }

    #[test]
    fn status_rejects_unknown_names() {
        let err = "retired".parse::<EquipmentStatus>().expect_err("unknown");
        assert_eq!(err, UnknownStatus("retired".to_owned()));
    }

    #[test]
    fn equipment_serializes_camel_case() {
        let record = Equipment {
            id: 1,
            serial_no: "MB-001".into(),
            name: "MacBook Pro 14\"".into(),
            category: "Notebook".into(),
            status: EquipmentStatus::Borrowed,
            borrowed_by: Some("Jane".into()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let value = serde_json::to_value(&record).expect("serializes");
        assert_eq!(value["serialNo"], "MB-001");
        assert_eq!(value["status"], "borrowed");
        assert_eq!(value["borrowedBy"], "Jane");
        assert!(value.get("serial_no").is_none());
    }
}

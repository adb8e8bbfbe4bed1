//! Users, roles, and login credentials.
//!
//! Credential verification itself lives behind the `LoginService` port; the
//! domain only validates payload shape and owns the role taxonomy.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

/// Fixed role set extracted from the bearer credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Teacher,
    Student,
}

impl Role {
    /// Stable lowercase name used in token claims.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Teacher => "teacher",
            Self::Student => "student",
        }
    }

    /// Whether this role may manage the catalog and maintenance state.
    pub fn is_staff(&self) -> bool {
        matches!(self, Self::Admin | Self::Teacher)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown role name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl std::str::FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "teacher" => Ok(Self::Teacher),
            "student" => Ok(Self::Student),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

/// User record as seen by the core: credentials stay behind the login port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub role: Role,
}

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    #[error("email must be a valid address")]
    InvalidEmail,
    #[error("password must be at least 6 characters")]
    PasswordTooShort,
}

/// Validated login credentials used by the login port.
///
/// ## Invariants
/// - `email` is trimmed and contains an `@` with a non-empty local part and
///   domain.
/// - `password` is at least 6 characters and retains caller-provided
///   whitespace to avoid surprising credential comparisons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let email = email.trim();
        let valid_shape = email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
        if !valid_shape {
            return Err(LoginValidationError::InvalidEmail);
        }

        if password.chars().count() < 6 {
            return Err(LoginValidationError::PasswordTooShort);
        }

        Ok(Self {
            email: email.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email string suitable for user lookups.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "secret1", LoginValidationError::InvalidEmail)]
    #[case("no-at-sign", "secret1", LoginValidationError::InvalidEmail)]
    #[case("@school.test", "secret1", LoginValidationError::InvalidEmail)]
    #[case("admin@school", "secret1", LoginValidationError::InvalidEmail)]
    #[case("admin@school.test", "short", LoginValidationError::PasswordTooShort)]
    fn invalid_credentials(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn valid_credentials_trim_email() {
        let creds = LoginCredentials::try_from_parts("  admin@school.test  ", "admin123")
            .expect("valid inputs should succeed");
        assert_eq!(creds.email(), "admin@school.test");
        assert_eq!(creds.password(), "admin123");
    }

    #[rstest]
    #[case(Role::Admin, true)]
    #[case(Role::Teacher, true)]
    #[case(Role::Student, false)]
    fn staff_roles(#[case] role: Role, #[case] expected: bool) {
        assert_eq!(role.is_staff(), expected);
    }

    #[test]
    fn role_round_trips_through_names() {
        for role in [Role::Admin, Role::Teacher, Role::Student] {
            let parsed: Role = role.as_str().parse().expect("parses");
            assert_eq!(parsed, role);
        }
        assert!("visitor".parse::<Role>().is_err());
    }
}

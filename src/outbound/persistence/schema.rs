//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly; Diesel uses
//! them for compile-time query validation. Regenerate with
//! `diesel print-schema` when migrations change.

diesel::table! {
    /// Equipment catalog.
    ///
    /// `serial_no` carries a unique constraint; `status` holds the lowercase
    /// wire value of the status enum.
    equipments (id) {
        id -> Int4,
        serial_no -> Varchar,
        name -> Varchar,
        category -> Varchar,
        status -> Varchar,
        borrowed_by -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// User accounts. `email` is unique; `role` holds the lowercase wire
    /// value of the role enum.
    users (id) {
        id -> Int4,
        email -> Varchar,
        name -> Varchar,
        role -> Varchar,
        password_hash -> Varchar,
        created_at -> Timestamptz,
    }
}

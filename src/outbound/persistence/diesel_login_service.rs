//! Diesel-backed credential verification.
//!
//! Looks the account up by email and checks the password against its bcrypt
//! hash. A missing account and a wrong password produce the same error so
//! the endpoint cannot be used to enumerate accounts.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use super::models::UserRow;
use super::pool::DbPool;
use super::schema::users;
use crate::domain::ports::LoginService;
use crate::domain::{Error, LoginCredentials, User};

const INVALID_CREDENTIALS: &str = "invalid email or password";

#[derive(Clone)]
pub struct DieselLoginService {
    pool: DbPool,
}

impl DieselLoginService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LoginService for DieselLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| Error::store_unavailable(err.to_string()))?;

        let row = users::table
            .filter(users::email.eq(credentials.email()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| {
                warn!(error = %err, "login lookup failed");
                Error::internal("login lookup failed")
            })?
            .ok_or_else(|| Error::unauthorized(INVALID_CREDENTIALS))?;

        let verified = bcrypt::verify(credentials.password(), &row.password_hash)
            .map_err(|_| Error::internal("stored password hash is invalid"))?;
        if !verified {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        Ok(row.into_domain()?)
    }
}

//! Driving port for credential verification.
//!
//! Token issuance stays in the HTTP adapter; this port only answers "who is
//! this" for a validated email/password pair. Production backs it with the
//! Diesel users table and bcrypt; tests and no-database operation use the
//! fixture accounts below.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Role, User};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Verify credentials and return the matching user.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error>;
}

/// Fixture accounts mirroring the example data seed, with plaintext
/// comparison instead of bcrypt so tests stay fast.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

/// (email, password, display name, role) for each fixture account.
pub const FIXTURE_ACCOUNTS: [(&str, &str, &str, Role); 3] = [
    ("admin@school.test", "admin123", "System Admin", Role::Admin),
    ("teacher@school.test", "teacher123", "Teacher Somchai", Role::Teacher),
    ("student@school.test", "student123", "Student Somying", Role::Student),
];

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        FIXTURE_ACCOUNTS
            .iter()
            .position(|(email, password, _, _)| {
                *email == credentials.email() && *password == credentials.password()
            })
            .map(|index| {
                let (email, _, name, role) = FIXTURE_ACCOUNTS[index];
                User {
                    id: index as i32 + 1,
                    email: email.to_owned(),
                    name: name.to_owned(),
                    role,
                }
            })
            .ok_or_else(|| Error::unauthorized("invalid email or password"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    fn credentials(email: &str, password: &str) -> LoginCredentials {
        LoginCredentials::try_from_parts(email, password).expect("valid shape")
    }

    #[rstest]
    #[case("admin@school.test", "admin123", Role::Admin)]
    #[case("teacher@school.test", "teacher123", Role::Teacher)]
    #[case("student@school.test", "student123", Role::Student)]
    #[tokio::test]
    async fn authenticates_fixture_accounts(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected_role: Role,
    ) {
        let user = FixtureLoginService
            .authenticate(&credentials(email, password))
            .await
            .expect("fixture account authenticates");
        assert_eq!(user.email, email);
        assert_eq!(user.role, expected_role);
    }

    #[tokio::test]
    async fn rejects_wrong_password() {
        let err = FixtureLoginService
            .authenticate(&credentials("admin@school.test", "wrong-password"))
            .await
            .expect_err("wrong password must fail");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }
}

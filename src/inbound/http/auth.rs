//! Authentication endpoint.
//!
//! ```text
//! POST /api/auth/login {"email":"admin@school.test","password":"admin123"}
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{Error, LoginCredentials, LoginValidationError, User};
use crate::inbound::http::error::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::token::TokenCodec;

/// Login request body for `POST /api/auth/login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login response: a bearer token plus the user it names.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

/// Authenticate and issue a bearer token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse),
        (status = 400, description = "Malformed credentials", body = crate::inbound::http::error::ApiError),
        (status = 401, description = "Invalid credentials", body = crate::inbound::http::error::ApiError),
        (status = 500, description = "Internal server error")
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    codec: web::Data<TokenCodec>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let user = state.login.authenticate(&credentials).await?;
    let token = codec.issue(&user)?;
    Ok(web::Json(LoginResponse { token, user }))
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::InvalidEmail => Error::invalid_request("email must be a valid address")
            .with_details(json!({ "field": "email", "code": "invalid_email" })),
        LoginValidationError::PasswordTooShort => {
            Error::invalid_request("password must be at least 6 characters")
                .with_details(json!({ "field": "password", "code": "password_too_short" }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::FixtureLoginService;
    use crate::domain::{CatalogService, Role, TransitionAuthority};
    use crate::domain::ports::{InMemoryEquipmentRepository, NullChangePublisher};
    use actix_web::{App, http::StatusCode, test as actix_test};
    use rstest::rstest;
    use serde_json::Value;
    use std::sync::Arc;

    fn test_state() -> HttpState {
        let repository = Arc::new(InMemoryEquipmentRepository::new());
        HttpState::new(
            Arc::new(FixtureLoginService),
            Arc::new(CatalogService::new(repository.clone())),
            Arc::new(TransitionAuthority::new(
                repository,
                Arc::new(NullChangePublisher),
            )),
        )
    }

    fn test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(test_state()))
            .app_data(web::Data::new(TokenCodec::new("test-secret")))
            .service(web::scope("/api").service(login))
    }

    #[actix_web::test]
    async fn login_returns_token_and_user() {
        let app = actix_test::init_service(test_app()).await;
        let request = actix_test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(&LoginRequest {
                email: "teacher@school.test".into(),
                password: "teacher123".into(),
            })
            .to_request();

        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: LoginResponse = actix_test::read_body_json(response).await;
        assert_eq!(body.user.role, Role::Teacher);

        let claims = TokenCodec::new("test-secret")
            .verify(&body.token)
            .expect("issued token verifies");
        assert_eq!(claims.email, "teacher@school.test");
    }

    #[rstest]
    #[case("not-an-email", "admin123", "email")]
    #[case("admin@school.test", "short", "password")]
    #[actix_web::test]
    async fn login_rejects_malformed_credentials(
        #[case] email: &str,
        #[case] password: &str,
        #[case] field: &str,
    ) {
        let app = actix_test::init_service(test_app()).await;
        let request = actix_test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(&LoginRequest {
                email: email.into(),
                password: password.into(),
            })
            .to_request();

        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(value["code"], "invalid_request");
        assert_eq!(value["details"]["field"], field);
    }

    #[actix_web::test]
    async fn login_rejects_wrong_password() {
        let app = actix_test::init_service(test_app()).await;
        let request = actix_test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(&LoginRequest {
                email: "admin@school.test".into(),
                password: "wrong-password".into(),
            })
            .to_request();

        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(value["code"], "unauthorized");
    }
}

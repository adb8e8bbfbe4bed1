//! Authenticated caller identity extracted from the bearer token.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use futures_util::future::{Ready, ready};

use crate::domain::{Error, Role};
use crate::inbound::http::error::ApiError;
use crate::inbound::http::token::TokenCodec;

/// The verified caller of a request. Extracting this type enforces
/// authentication; role checks stay in the domain services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i32,
    pub email: String,
    pub role: Role,
}

fn bearer_token(req: &HttpRequest) -> Result<&str, Error> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .ok_or_else(|| Error::unauthorized("missing bearer token"))
}

fn identity_from_request(req: &HttpRequest) -> Result<Identity, Error> {
    let codec = req
        .app_data::<web::Data<TokenCodec>>()
        .ok_or_else(|| Error::internal("token codec is not configured"))?;
    let claims = codec.verify(bearer_token(req)?)?;
    let role = claims
        .role
        .parse::<Role>()
        .map_err(|_| Error::unauthorized("token carries an unknown role"))?;
    Ok(Identity {
        user_id: claims.sub,
        email: claims.email,
        role,
    })
}

impl FromRequest for Identity {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(identity_from_request(req).map_err(ApiError::from))
    }
}

//! WebSocket inbound adapter bridging the change notification bus to
//! connected viewers.
//!
//! Responsibilities:
//! - validate upgrade requests (origin allow-list)
//! - spawn the per-connection session loop
//! - keep WebSocket-specific concerns at the edge of the system

use actix_web::web::{self, Payload};
use actix_web::{
    HttpRequest, HttpResponse, get,
    http::header::{HeaderValue, ORIGIN},
    rt,
};
use tracing::{error, warn};
use url::Url;

mod session;

pub mod messages;
pub mod state;

pub use state::WsState;

/// Handle WebSocket upgrade for the `/ws` endpoint.
#[get("/ws")]
pub async fn ws_entry(
    state: web::Data<WsState>,
    req: HttpRequest,
    stream: Payload,
) -> actix_web::Result<HttpResponse> {
    let mut origin_iter = req.headers().get_all(ORIGIN);
    let origin_header = origin_iter.next().ok_or_else(|| {
        error!("Missing Origin header on WebSocket upgrade");
        actix_web::error::ErrorForbidden("Origin not allowed")
    })?;
    if origin_iter.next().is_some() {
        error!("Multiple Origin headers on WebSocket upgrade");
        return Err(actix_web::error::ErrorBadRequest("Invalid Origin header"));
    }

    validate_origin(origin_header, &state.allowed_origins)?;

    let (response, session, message_stream) = actix_ws::handle(&req, stream)?;
    let bus = state.bus.clone();
    rt::spawn(session::handle_ws_session(bus, session, message_stream));
    Ok(response)
}

fn validate_origin(origin_header: &HeaderValue, allowed: &[Url]) -> actix_web::Result<()> {
    let origin_value = origin_header.to_str().map_err(|error| {
        error!(error = %error, "Failed to parse Origin header as string");
        actix_web::error::ErrorBadRequest("Invalid Origin header")
    })?;

    let origin = Url::parse(origin_value).map_err(|error| {
        error!(error = %error, "Failed to parse Origin header as URL");
        actix_web::error::ErrorBadRequest("Invalid Origin header")
    })?;

    if is_allowed_origin(&origin, allowed) {
        Ok(())
    } else {
        warn!(
            origin = origin_value,
            "Rejected WS upgrade due to disallowed Origin"
        );
        Err(actix_web::error::ErrorForbidden("Origin not allowed"))
    }
}

/// Returns true when a parsed Origin matches the configured allow-list, or
/// is localhost over HTTP with a non-zero explicit port (development).
fn is_allowed_origin(origin: &Url, allowed: &[Url]) -> bool {
    let Some(host) = origin.host_str() else {
        return false;
    };

    if origin.scheme() == "http" && host == "localhost" {
        return matches!(origin.port(), Some(port) if port != 0);
    }

    allowed.iter().any(|entry| {
        entry.scheme() == origin.scheme()
            && entry.host_str() == origin.host_str()
            && entry.port_or_known_default() == origin.port_or_known_default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::{StatusCode, header::HeaderValue};
    use rstest::rstest;

    fn header(value: &str) -> HeaderValue {
        HeaderValue::from_str(value).expect("valid header value")
    }

    fn allowed() -> Vec<Url> {
        vec![Url::parse("https://tracker.example").expect("valid url")]
    }

    #[rstest]
    #[case("http://localhost:3000")]
    #[case("https://tracker.example")]
    fn accepts_configured_origins(#[case] origin: &str) {
        let header = header(origin);
        assert!(validate_origin(&header, &allowed()).is_ok());
    }

    #[rstest]
    #[case("http://localhost")]
    #[case("https://example.com")]
    #[case("wss://tracker.example")]
    fn rejects_disallowed_origins(#[case] origin: &str) {
        let header = header(origin);
        let error = validate_origin(&header, &allowed()).expect_err("origin should be rejected");
        assert_eq!(
            error.as_response_error().status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn rejects_unparsable_origin_header() {
        let header = HeaderValue::from_static("not a url");
        let error = validate_origin(&header, &allowed()).expect_err("origin should be rejected");
        assert_eq!(
            error.as_response_error().status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[rstest]
    #[case("http://localhost:4000", true)]
    #[case("http://localhost:0", false)]
    #[case("http://localhost", false)]
    #[case("https://tracker.example", true)]
    #[case("https://tracker.example:443", true)]
    #[case("https://tracker.example.evil.com", false)]
    #[case("http://tracker.example", false)]
    fn evaluates_allow_list(#[case] origin: &str, #[case] expected: bool) {
        let parsed = Url::parse(origin).expect("url should parse");
        assert_eq!(is_allowed_origin(&parsed, &allowed()), expected);
    }
}

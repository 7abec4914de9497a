//! Shared HTTP client, headers, and error-body parsing.

use std::sync::OnceLock;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;

use super::wire::ApiErrorBody;
use crate::error::IdentityError;

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Get (or create) the shared reqwest client.
///
/// No request timeout is set: an in-flight call is only abandoned by its
/// caller.
pub fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new())
    })
}

/// Headers for an authenticated JSON call.
pub fn bearer_headers(access_token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    if let Ok(val) = HeaderValue::from_str(&format!("Bearer {access_token}")) {
        headers.insert(AUTHORIZATION, val);
    }
    headers
}

/// Map a failed response to an error.
///
/// `bearer` marks calls made with the stored credential: only those turn a
/// 401 into an authentication failure. A 401 from the token endpoint is
/// just a rejected login.
pub fn status_to_error(status: StatusCode, body: &str, fallback: &str, bearer: bool) -> IdentityError {
    let message = extract_error_message(body).unwrap_or_else(|| fallback.to_string());
    if bearer && status == StatusCode::UNAUTHORIZED {
        return IdentityError::Authentication(message);
    }
    IdentityError::api(status.as_u16(), message)
}

/// Pull a user-facing message out of an error body.
///
/// Fallback chain: `error`, then `message`, then `detail`, then the first
/// field error of a validation map.
pub fn extract_error_message(body: &str) -> Option<String> {
    let parsed: ApiErrorBody = serde_json::from_str(body).ok()?;
    parsed.message()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_headers_carry_the_access_token() {
        let headers = bearer_headers("A1");
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer A1");
        assert_eq!(headers.get(ACCEPT).unwrap(), "application/json");
    }

    #[test]
    fn error_field_wins_over_message_and_detail() {
        let body = r#"{"error":"Current password is incorrect","message":"m","detail":"d"}"#;
        assert_eq!(
            extract_error_message(body).as_deref(),
            Some("Current password is incorrect")
        );
    }

    #[test]
    fn message_then_detail_are_used_in_order() {
        assert_eq!(
            extract_error_message(r#"{"message":"m","detail":"d"}"#).as_deref(),
            Some("m")
        );
        assert_eq!(
            extract_error_message(r#"{"detail":"d"}"#).as_deref(),
            Some("d")
        );
    }

    #[test]
    fn field_errors_are_used_last() {
        let body = r#"{"email":["Enter a valid email address."]}"#;
        assert_eq!(
            extract_error_message(body).as_deref(),
            Some("email: Enter a valid email address.")
        );
    }

    #[test]
    fn non_json_bodies_yield_nothing() {
        assert!(extract_error_message("<html>502</html>").is_none());
        assert!(extract_error_message("{}").is_none());
    }

    #[test]
    fn unauthorized_maps_to_authentication_only_for_bearer_calls() {
        let profile = status_to_error(StatusCode::UNAUTHORIZED, "", "fallback", true);
        assert!(matches!(profile, IdentityError::Authentication(_)));

        let login = status_to_error(
            StatusCode::UNAUTHORIZED,
            r#"{"detail":"No active account found with the given credentials"}"#,
            "fallback",
            false,
        );
        match login {
            IdentityError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "No active account found with the given credentials");
            }
            other => panic!("expected Api, got {other:?}"),
        }
    }

    #[test]
    fn fallback_is_used_when_body_is_silent() {
        let err = status_to_error(StatusCode::INTERNAL_SERVER_ERROR, "", "Could not load", true);
        assert_eq!(err.user_message(), "Could not load");
    }
}

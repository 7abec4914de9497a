//! CLI-specific error formatting for user-facing messages.

use crate::error::IdentityError;

/// Map an [`IdentityError`] to a user-facing help string with actionable guidance.
pub fn format_error_help(err: &IdentityError) -> String {
    match err {
        IdentityError::NotLoggedIn => "Not logged in. Run: underroof login <username>".to_string(),
        IdentityError::Authentication(_) => {
            format!("{}. Run: underroof login <username>", err.user_message().trim_end_matches('.'))
        }
        IdentityError::Network(_) => format!(
            "{} Check UNDERROOF_BASE_URL or pass --base-url.",
            err.user_message()
        ),
        IdentityError::Configuration(msg) => {
            format!("Configuration error: {msg}. Check your .env or pass --base-url.")
        }
        IdentityError::Validation(_) | IdentityError::Api { .. } => err.user_message(),
        other => format!("{other}"),
    }
}

//! Error types for Under Roof client operations.

pub mod unified;

pub use unified::{ErrorCategory, RecoverySuggestion};

use thiserror::Error;

use crate::profile::validation::ValidationError;

/// Message shown when a transport failure leaves nothing better to say.
pub const NETWORK_FAILURE_MESSAGE: &str =
    "Could not reach the server. Check your connection and try again.";

/// Message shown after a 401 when the caller chooses to surface it.
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please sign in again.";

/// Message shown when an action needs a credential and none is stored.
pub const SIGN_IN_REQUIRED_MESSAGE: &str = "Please sign in to continue.";

/// Primary error type for all client operations.
#[derive(Error, Debug)]
pub enum IdentityError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("The {0} form is already being submitted")]
    Busy(&'static str),
}

impl IdentityError {
    /// Create an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation(_) => ErrorCategory::Validation,
            Self::Authentication(_) | Self::NotLoggedIn => ErrorCategory::Authentication,
            Self::Api { .. } | Self::Serialization(_) => ErrorCategory::Server,
            Self::Network(_) => ErrorCategory::Network,
            Self::Io(_) | Self::Storage(_) => ErrorCategory::Storage,
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Busy(_) => ErrorCategory::Busy,
        }
    }

    /// Whether the API rejected the stored credential (401 on a bearer call).
    /// A missing credential does not count.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }

    /// Suggest recovery actions.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self.category() {
            ErrorCategory::Validation => RecoverySuggestion::CorrectInput,
            ErrorCategory::Authentication => RecoverySuggestion::Reauthenticate,
            ErrorCategory::Configuration => RecoverySuggestion::CheckConfiguration,
            ErrorCategory::Busy => RecoverySuggestion::WaitForPending,
            ErrorCategory::Server | ErrorCategory::Network | ErrorCategory::Storage => {
                RecoverySuggestion::ShowMessage
            }
        }
    }

    /// Text suitable for a transient notice.
    ///
    /// Server and validation errors carry their own wording; transport
    /// failures collapse to a generic message.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::Api { message, .. } => message.clone(),
            Self::Authentication(_) => SESSION_EXPIRED_MESSAGE.to_string(),
            Self::NotLoggedIn => SIGN_IN_REQUIRED_MESSAGE.to_string(),
            Self::Network(_) => NETWORK_FAILURE_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<toml::de::Error> for IdentityError {
    fn from(error: toml::de::Error) -> Self {
        Self::Storage(error.to_string())
    }
}

impl From<toml::ser::Error> for IdentityError {
    fn from(error: toml::ser::Error) -> Self {
        Self::Storage(error.to_string())
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, IdentityError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_errors_route_to_reauthentication() {
        let err = IdentityError::Authentication("token_not_valid".into());
        assert_eq!(err.category(), ErrorCategory::Authentication);
        assert_eq!(err.recovery_suggestion(), RecoverySuggestion::Reauthenticate);
        assert!(err.is_auth_failure());
    }

    #[test]
    fn server_errors_keep_the_server_wording() {
        let err = IdentityError::api(400, "Current password is incorrect");
        assert_eq!(err.category(), ErrorCategory::Server);
        assert_eq!(err.user_message(), "Current password is incorrect");
        assert!(!err.is_auth_failure());
    }

    #[test]
    fn validation_errors_never_leave_the_client() {
        let err = IdentityError::from(ValidationError::PasswordMismatch);
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert_eq!(err.recovery_suggestion(), RecoverySuggestion::CorrectInput);
        assert_eq!(err.user_message(), "The passwords do not match");
    }

    #[test]
    fn missing_credential_is_not_a_rejected_one() {
        let err = IdentityError::NotLoggedIn;
        assert_eq!(err.recovery_suggestion(), RecoverySuggestion::Reauthenticate);
        assert!(!err.is_auth_failure());
        assert_eq!(err.user_message(), SIGN_IN_REQUIRED_MESSAGE);
    }

    #[test]
    fn busy_form_asks_the_caller_to_wait() {
        let err = IdentityError::Busy("login");
        assert_eq!(err.recovery_suggestion(), RecoverySuggestion::WaitForPending);
        assert!(err.to_string().contains("login"));
    }
}

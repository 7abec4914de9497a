//! Error classification and recovery routing.

use serde::{Deserialize, Serialize};

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Rejected locally before any network call.
    Validation,
    /// The remote API refused the bearer credential (HTTP 401).
    Authentication,
    /// Any other non-success response from the remote API.
    Server,
    /// Transport-level failure; the request never got a response.
    Network,
    Storage,
    Configuration,
    /// A submission for the same form is already in flight.
    Busy,
}

/// Suggested recovery action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoverySuggestion {
    /// Fix the highlighted input and submit again.
    CorrectInput,
    /// Tear the session down and reload so the user signs in again.
    Reauthenticate,
    /// Show the message and leave the session untouched.
    ShowMessage,
    CheckConfiguration,
    /// Wait for the in-flight submission to settle.
    WaitForPending,
}

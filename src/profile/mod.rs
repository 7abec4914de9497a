//! Profile records, the edit form, and the sync controller.

pub mod payload;
pub mod preview;
pub mod sync;
pub mod validation;

pub use payload::UpdatePayload;
pub use preview::PhotoPreview;
pub use sync::{stage_photo, ProfileSync, UpdateOutcome};
pub use validation::{
    PasswordChange, PasswordChangeIntent, PhotoUpload, UploadConstraint, ValidationError,
};

use std::fmt;

use bon::Builder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Fallback display name when the profile has neither first name nor username.
pub const DEFAULT_DISPLAY_NAME: &str = "User";

/// Account role as assigned by the remote API.
///
/// Role names this client does not know are kept verbatim in
/// [`Role::Other`] so an edit sends them back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString)]
#[serde(from = "String", into = "String")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    User,
    Visitor,
    #[strum(default)]
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
            Self::Visitor => "visitor",
            Self::Other(raw) => raw,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        match raw.parse() {
            Ok(role) => role,
            Err(_) => Self::Other(raw),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// The authenticated user's profile as last loaded from the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub profile_photo: Option<String>,
    pub role: Option<Role>,
    pub is_active: bool,
}

impl ProfileRecord {
    /// First name, else username, else [`DEFAULT_DISPLAY_NAME`].
    pub fn display_name(&self) -> &str {
        [self.first_name.as_str(), self.username.as_str()]
            .into_iter()
            .find(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_DISPLAY_NAME)
    }
}

/// Which fields an edit may touch and which rules gate it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum EditScope {
    /// The user editing their own profile, password change included.
    #[default]
    SelfEdit,
    /// Administrative edit: adds `role` / `is_active`, no password change.
    AdminEdit,
}

/// Editable scalar fields of a profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Builder)]
pub struct ProfileFields {
    #[builder(into, default)]
    pub first_name: String,
    #[builder(into, default)]
    pub last_name: String,
    #[builder(into, default)]
    pub email: String,
    /// Only sent in [`EditScope::AdminEdit`].
    pub role: Option<Role>,
    /// Only sent in [`EditScope::AdminEdit`].
    pub is_active: Option<bool>,
}

impl ProfileFields {
    pub fn from_record(record: &ProfileRecord) -> Self {
        Self {
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            email: record.email.clone(),
            role: record.role.clone(),
            is_active: Some(record.is_active),
        }
    }
}

/// State of the profile edit form.
#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub scope: EditScope,
    pub fields: ProfileFields,
    /// Read-only; the API does not accept username changes from this form.
    pub username: String,
    /// Server photo URL currently shown.
    pub current_photo: Option<String>,
    pub password: PasswordChangeIntent,
    pub photo: Option<PhotoUpload>,
    pub preview: Option<PhotoPreview>,
}

impl ProfileForm {
    pub fn new(scope: EditScope) -> Self {
        Self {
            scope,
            ..Self::default()
        }
    }

    /// Overwrite the displayed fields with the server's copy.
    pub fn populate(&mut self, record: &ProfileRecord) {
        self.fields = ProfileFields::from_record(record);
        self.username = record.username.clone();
        self.current_photo = record.profile_photo.clone();
    }

    pub fn clear_passwords(&mut self) {
        self.password.clear();
    }

    /// Reset the file selection and drop its local preview.
    pub fn clear_photo(&mut self) {
        self.photo = None;
        self.preview = None;
    }
}

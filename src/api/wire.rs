//! Request and response bodies of the account API.

use serde::{Deserialize, Serialize};

use crate::auth::CredentialPair;
use crate::profile::{ProfileRecord, Role};

#[derive(Debug, Serialize)]
pub(crate) struct TokenRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access: String,
    pub refresh: Option<String>,
}

impl From<TokenResponse> for CredentialPair {
    fn from(resp: TokenResponse) -> Self {
        CredentialPair::new(resp.access, resp.refresh)
    }
}

/// Profile document as served by `GET /api/profile/me/`.
///
/// `role` is nested under `profile`; older deployments put it at the top
/// level, so both are accepted.
#[derive(Debug, Deserialize)]
pub(crate) struct ProfileResponse {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub profile: Option<NestedProfile>,
    #[serde(default)]
    pub profile_photo: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NestedProfile {
    #[serde(default)]
    pub profile_img: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

fn default_active() -> bool {
    true
}

impl From<ProfileResponse> for ProfileRecord {
    fn from(resp: ProfileResponse) -> Self {
        let (nested_role, nested_img) = match resp.profile {
            Some(nested) => (nested.role, nested.profile_img),
            None => (None, None),
        };
        let role = resp
            .role
            .or(nested_role)
            .filter(|raw| !raw.trim().is_empty())
            .map(Role::from);
        ProfileRecord {
            first_name: resp.first_name.unwrap_or_default(),
            last_name: resp.last_name.unwrap_or_default(),
            username: resp.username,
            email: resp.email.unwrap_or_default(),
            profile_photo: resp
                .profile_photo
                .or(nested_img)
                .filter(|p| !p.trim().is_empty()),
            role,
            is_active: resp.is_active,
        }
    }
}

/// Response to a successful `PATCH /api/profile/me/`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// Any error body the API may return.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    error: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<serde_json::Value>,
    #[serde(default)]
    detail: Option<serde_json::Value>,
    #[serde(flatten)]
    fields: serde_json::Map<String, serde_json::Value>,
}

impl ApiErrorBody {
    pub fn message(&self) -> Option<String> {
        [&self.error, &self.message, &self.detail]
            .into_iter()
            .flatten()
            .find_map(text_of)
            .or_else(|| {
                self.fields.iter().find_map(|(field, value)| {
                    text_of(value).map(|text| format!("{field}: {text}"))
                })
            })
    }
}

/// First non-empty string in a value, looking through arrays.
fn text_of(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        serde_json::Value::Array(items) => items.iter().find_map(text_of),
        _ => None,
    }
}

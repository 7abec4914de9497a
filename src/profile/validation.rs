//! Client-side rules applied before any profile update leaves the client.

use std::fmt;
use std::path::Path;

use thiserror::Error;

use crate::error::IdentityError;

/// Minimum accepted length for a new password, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// A rule violation detected locally. Never sent upstream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Enter your current password to change it")]
    CurrentPasswordRequired,
    #[error("Enter the new password")]
    NewPasswordRequired,
    #[error("The new password must be at least {min} characters")]
    NewPasswordTooShort { min: usize },
    #[error("Confirm the new password")]
    ConfirmationRequired,
    #[error("The passwords do not match")]
    PasswordMismatch,
    #[error("Password changes are not available in an administrative edit")]
    PasswordChangeUnavailable,
    #[error("Select a valid image (JPEG, PNG, GIF or WebP); got {media_type}")]
    UnsupportedPhotoType { media_type: String },
    #[error("The image cannot be larger than {max_mib}MB")]
    PhotoTooLarge { size: u64, max_mib: u64 },
}

impl ValidationError {
    /// Whether the violation concerns the selected photo file.
    pub fn is_photo_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedPhotoType { .. } | Self::PhotoTooLarge { .. }
        )
    }
}

/// Password fields of the edit form.
///
/// An all-empty intent means "no password change".
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PasswordChangeIntent {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl fmt::Debug for PasswordChangeIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mask = |s: &str| if s.is_empty() { "" } else { "***" };
        f.debug_struct("PasswordChangeIntent")
            .field("current_password", &mask(&self.current_password))
            .field("new_password", &mask(&self.new_password))
            .field("confirm_password", &mask(&self.confirm_password))
            .finish()
    }
}

impl PasswordChangeIntent {
    pub fn new(
        current_password: impl Into<String>,
        new_password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            current_password: current_password.into(),
            new_password: new_password.into(),
            confirm_password: confirm_password.into(),
        }
    }

    /// Any of the three fields is non-empty.
    pub fn is_requested(&self) -> bool {
        !(self.current_password.is_empty()
            && self.new_password.is_empty()
            && self.confirm_password.is_empty())
    }

    /// Validate and reduce to the pair the API expects.
    ///
    /// Returns `Ok(None)` when no change was requested.
    pub fn validate(&self) -> Result<Option<PasswordChange>, ValidationError> {
        if !self.is_requested() {
            return Ok(None);
        }
        if self.current_password.is_empty() {
            return Err(ValidationError::CurrentPasswordRequired);
        }
        if self.new_password.is_empty() {
            return Err(ValidationError::NewPasswordRequired);
        }
        if self.new_password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ValidationError::NewPasswordTooShort {
                min: MIN_PASSWORD_LENGTH,
            });
        }
        if self.confirm_password.is_empty() {
            return Err(ValidationError::ConfirmationRequired);
        }
        if self.new_password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        Ok(Some(PasswordChange {
            current_password: self.current_password.clone(),
            new_password: self.new_password.clone(),
        }))
    }

    pub fn clear(&mut self) {
        self.current_password.clear();
        self.new_password.clear();
        self.confirm_password.clear();
    }
}

/// Validated password change, as sent in the update payload.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

impl fmt::Debug for PasswordChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordChange { .. }")
    }
}

/// A file selected for the profile photo.
#[derive(Clone, PartialEq, Eq)]
pub struct PhotoUpload {
    pub file_name: String,
    /// Declared media type; not sniffed from the content.
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for PhotoUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhotoUpload")
            .field("file_name", &self.file_name)
            .field("media_type", &self.media_type)
            .field("size", &self.size())
            .finish()
    }
}

impl PhotoUpload {
    pub fn new(
        file_name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Read a file from disk, declaring its media type from the extension.
    pub async fn from_path(path: &Path) -> Result<Self, IdentityError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "photo".to_string());
        Ok(Self::new(file_name, media_type_for_path(path), bytes))
    }
}

/// Media type implied by a file extension.
pub fn media_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Upload policy for a file field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadConstraint {
    pub allowed_media_types: &'static [&'static str],
    pub max_bytes: u64,
}

impl UploadConstraint {
    /// Policy for anything destined for `profile_photo`.
    pub const PROFILE_PHOTO: Self = Self {
        allowed_media_types: &["image/jpeg", "image/png", "image/gif", "image/webp"],
        max_bytes: 5 * 1024 * 1024,
    };

    pub fn check(&self, photo: &PhotoUpload) -> Result<(), ValidationError> {
        if !self
            .allowed_media_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&photo.media_type))
        {
            return Err(ValidationError::UnsupportedPhotoType {
                media_type: photo.media_type.clone(),
            });
        }
        if photo.size() > self.max_bytes {
            return Err(ValidationError::PhotoTooLarge {
                size: photo.size(),
                max_mib: self.max_bytes / (1024 * 1024),
            });
        }
        Ok(())
    }
}

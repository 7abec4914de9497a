//! Multipart body for a partial profile update.

use reqwest::multipart::{Form, Part};

use super::validation::{
    PasswordChange, PasswordChangeIntent, PhotoUpload, UploadConstraint, ValidationError,
};
use super::{EditScope, ProfileFields};
use crate::error::Result;

/// A validated profile update, ready to be sent.
///
/// Only [`UpdatePayload::build`] constructs one, so a payload never carries a
/// photo or password that failed the client-side rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePayload {
    scalars: Vec<(&'static str, String)>,
    password: Option<PasswordChange>,
    photo: Option<PhotoUpload>,
}

impl UpdatePayload {
    /// Apply the password rules, then the photo rules, and assemble the parts.
    pub fn build(
        scope: EditScope,
        fields: &ProfileFields,
        password: &PasswordChangeIntent,
        photo: Option<&PhotoUpload>,
    ) -> std::result::Result<Self, ValidationError> {
        let password = match scope {
            EditScope::SelfEdit => password.validate()?,
            EditScope::AdminEdit if password.is_requested() => {
                return Err(ValidationError::PasswordChangeUnavailable);
            }
            EditScope::AdminEdit => None,
        };

        if let Some(photo) = photo {
            UploadConstraint::PROFILE_PHOTO.check(photo)?;
        }

        let mut scalars = vec![
            ("first_name", fields.first_name.clone()),
            ("last_name", fields.last_name.clone()),
            ("email", fields.email.clone()),
        ];
        if scope == EditScope::AdminEdit {
            if let Some(role) = &fields.role {
                scalars.push(("role", role.to_string()));
            }
            if let Some(active) = fields.is_active {
                scalars.push(("is_active", active.to_string()));
            }
        }

        Ok(Self {
            scalars,
            password,
            photo: photo.cloned(),
        })
    }

    pub fn scalars(&self) -> &[(&'static str, String)] {
        &self.scalars
    }

    pub fn scalar(&self, name: &str) -> Option<&str> {
        self.scalars
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn password(&self) -> Option<&PasswordChange> {
        self.password.as_ref()
    }

    pub fn photo(&self) -> Option<&PhotoUpload> {
        self.photo.as_ref()
    }

    /// Names of every multipart part, in send order.
    pub fn part_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.scalars.iter().map(|(k, _)| *k).collect();
        if self.password.is_some() {
            names.extend(["current_password", "new_password"]);
        }
        if self.photo.is_some() {
            names.push("profile_photo");
        }
        names
    }

    pub fn into_form(self) -> Result<Form> {
        let mut form = Form::new();
        for (name, value) in self.scalars {
            form = form.text(name, value);
        }
        if let Some(change) = self.password {
            form = form
                .text("current_password", change.current_password)
                .text("new_password", change.new_password);
        }
        if let Some(photo) = self.photo {
            let part = Part::bytes(photo.bytes)
                .file_name(photo.file_name)
                .mime_str(&photo.media_type)?;
            form = form.part("profile_photo", part);
        }
        Ok(form)
    }
}

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use super::payload::UpdatePayload;
use super::preview::PhotoPreview;
use super::validation::{PhotoUpload, UploadConstraint};
use super::{ProfileForm, ProfileRecord};
use crate::api::ApiClient;
use crate::auth::{KeyValueStore, TokenStore};
use crate::config::ClientConfig;
use crate::error::{IdentityError, Result};
use crate::util::form_lock::FormLock;

/// Default confirmation when the API does not provide its own.
pub const UPDATE_SUCCESS_MESSAGE: &str = "Profile updated successfully!";

/// Disposable display cache keys in the secondary store.
pub const DISPLAY_NAME_KEY: &str = "display_name";
pub const PROFILE_PHOTO_KEY: &str = "profile_photo";

/// Result of a successful profile update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub message: String,
    /// When to re-fetch the server's authoritative copy.
    pub resync_after: Duration,
}

/// Loads and updates the authenticated user's profile.
///
/// Never tears the session down itself: a 401 comes back as
/// [`IdentityError::Authentication`] and the caller decides.
pub struct ProfileSync {
    api: ApiClient,
    store: Arc<dyn TokenStore>,
    display_cache: Option<Arc<dyn KeyValueStore>>,
    resync_delay: Duration,
    form_lock: FormLock,
}

impl ProfileSync {
    pub fn new(api: ApiClient, store: Arc<dyn TokenStore>, config: &ClientConfig) -> Self {
        Self {
            api,
            store,
            display_cache: None,
            resync_delay: config.resync_delay(),
            form_lock: FormLock::new("profile"),
        }
    }

    /// Mirror the display name and photo into a client-local store after
    /// every load.
    pub fn with_display_cache(mut self, cache: Arc<dyn KeyValueStore>) -> Self {
        self.display_cache = Some(cache);
        self
    }

    pub fn is_submitting(&self) -> bool {
        self.form_lock.is_busy()
    }

    /// Fetch the profile with the stored bearer credential.
    pub async fn load(&self) -> Result<ProfileRecord> {
        let pair = self.store.load().ok_or(IdentityError::NotLoggedIn)?;
        let record = self.api.fetch_profile(&pair.access_token).await?;
        self.remember_display(&record);
        Ok(record)
    }

    /// Wait for the configured delay, then reload the authoritative copy.
    pub async fn resync(&self) -> Result<ProfileRecord> {
        if !self.resync_delay.is_zero() {
            tokio::time::sleep(self.resync_delay).await;
        }
        self.load().await
    }

    /// Read a file from disk and stage it as the photo selection.
    pub async fn select_photo(&self, form: &mut ProfileForm, path: &Path) -> Result<()> {
        let upload = PhotoUpload::from_path(path).await?;
        stage_photo(form, upload)
    }

    /// Validate, send a multipart PATCH, and clear the password fields.
    ///
    /// Any rule violation returns before a request is made; a photo
    /// violation also resets the photo selection.
    pub async fn update(&self, form: &mut ProfileForm) -> Result<UpdateOutcome> {
        let _guard = self.form_lock.try_acquire()?;

        let payload = match UpdatePayload::build(
            form.scope,
            &form.fields,
            &form.password,
            form.photo.as_ref(),
        ) {
            Ok(payload) => payload,
            Err(err) => {
                if err.is_photo_error() {
                    form.clear_photo();
                }
                return Err(err.into());
            }
        };

        let pair = self.store.load().ok_or(IdentityError::NotLoggedIn)?;
        let response = self.api.patch_profile(&pair.access_token, payload).await?;

        form.clear_passwords();
        Ok(UpdateOutcome {
            message: response
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| UPDATE_SUCCESS_MESSAGE.to_string()),
            resync_after: self.resync_delay,
        })
    }

    fn remember_display(&self, record: &ProfileRecord) {
        let Some(cache) = &self.display_cache else {
            return;
        };
        let mut result = cache.set_item(DISPLAY_NAME_KEY, record.display_name());
        if result.is_ok() {
            result = match &record.profile_photo {
                Some(photo) => cache.set_item(PROFILE_PHOTO_KEY, photo),
                None => cache.remove_item(PROFILE_PHOTO_KEY),
            };
        }
        if let Err(err) = result {
            tracing::warn!(error = %err, "failed to refresh display cache");
        }
    }
}

/// Validate a selected photo and render its local preview.
///
/// A rejected file resets the selection, like clearing a file input.
pub fn stage_photo(form: &mut ProfileForm, upload: PhotoUpload) -> Result<()> {
    if let Err(err) = UploadConstraint::PROFILE_PHOTO.check(&upload) {
        form.clear_photo();
        return Err(err.into());
    }
    form.preview = Some(PhotoPreview::render(&upload));
    form.photo = Some(upload);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::DualTokenStore;
    use crate::profile::{EditScope, PasswordChangeIntent, ValidationError};

    fn offline_sync(store: Arc<DualTokenStore>) -> ProfileSync {
        // Port 9 (discard) is never served; any request would fail as Network.
        let config = ClientConfig::new("http://127.0.0.1:9").without_delays();
        ProfileSync::new(ApiClient::new(&config), store, &config)
    }

    #[test]
    fn stage_photo_renders_preview_for_valid_files() {
        let mut form = ProfileForm::new(EditScope::SelfEdit);
        stage_photo(
            &mut form,
            PhotoUpload::new("me.png", "image/png", vec![1, 2, 3]),
        )
        .unwrap();
        assert!(form.photo.is_some());
        assert!(form
            .preview
            .as_ref()
            .unwrap()
            .data_url
            .starts_with("data:image/png;base64,"));
    }

    #[test]
    fn stage_photo_resets_selection_on_rejection() {
        let mut form = ProfileForm::new(EditScope::SelfEdit);
        stage_photo(&mut form, PhotoUpload::new("ok.png", "image/png", vec![1])).unwrap();
        let err = stage_photo(
            &mut form,
            PhotoUpload::new("doc.pdf", "application/pdf", vec![1]),
        )
        .unwrap_err();
        assert!(matches!(err, IdentityError::Validation(_)));
        assert!(form.photo.is_none());
        assert!(form.preview.is_none());
    }

    #[tokio::test]
    async fn load_without_token_is_not_logged_in() {
        let sync = offline_sync(Arc::new(DualTokenStore::in_memory()));
        assert!(matches!(sync.load().await, Err(IdentityError::NotLoggedIn)));
    }

    #[tokio::test]
    async fn invalid_password_intent_fails_before_token_lookup() {
        let sync = offline_sync(Arc::new(DualTokenStore::in_memory()));
        let mut form = ProfileForm::new(EditScope::SelfEdit);
        form.password = PasswordChangeIntent::new("", "secret1", "secret1");
        let err = sync.update(&mut form).await.unwrap_err();
        assert!(matches!(
            err,
            IdentityError::Validation(ValidationError::CurrentPasswordRequired)
        ));
        assert!(!sync.is_submitting());
    }
}

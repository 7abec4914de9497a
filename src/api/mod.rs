//! Client for the remote account API.

pub mod http;
pub mod wire;

pub use wire::UpdateResponse;

use reqwest::StatusCode;

use self::http::{bearer_headers, shared_client, status_to_error};
use self::wire::{ProfileResponse, TokenRequest, TokenResponse};
use crate::auth::CredentialPair;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::profile::{ProfileRecord, UpdatePayload};

/// Shown when a rejected login carries no server text.
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed. Check your credentials.";
/// Shown when a profile fetch fails without server text.
pub const PROFILE_LOAD_FAILED_MESSAGE: &str =
    "Could not load the profile. Please reload the page.";
/// Shown when a profile update fails without server text.
pub const PROFILE_UPDATE_FAILED_MESSAGE: &str =
    "Could not update the profile. Check the data and try again.";

/// Thin typed wrapper over the three account endpoints.
///
/// # Example
/// ```no_run
/// use underroof::api::ApiClient;
/// use underroof::config::ClientConfig;
///
/// # async fn example() -> underroof::error::Result<()> {
/// let api = ApiClient::new(&ClientConfig::new("https://house.example.com"));
/// let pair = api.obtain_token("alice", "correct").await?;
/// let profile = api.fetch_profile(&pair.access_token).await?;
/// println!("{}", profile.display_name());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    token_url: String,
    profile_url: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: shared_client().clone(),
            token_url: config.token_url(),
            profile_url: config.profile_url(),
        }
    }

    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    pub fn with_profile_url(mut self, url: impl Into<String>) -> Self {
        self.profile_url = url.into();
        self
    }

    /// `POST /api/token/`.
    pub async fn obtain_token(&self, username: &str, password: &str) -> Result<CredentialPair> {
        tracing::debug!(url = %self.token_url, username, "requesting token pair");
        let resp = self
            .client
            .post(&self.token_url)
            .json(&TokenRequest { username, password })
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body, LOGIN_FAILED_MESSAGE, false));
        }
        let payload: TokenResponse = resp.json().await?;
        Ok(payload.into())
    }

    /// `GET /api/profile/me/` with the bearer credential.
    pub async fn fetch_profile(&self, access_token: &str) -> Result<ProfileRecord> {
        tracing::debug!(url = %self.profile_url, "fetching profile");
        let resp = self
            .client
            .get(&self.profile_url)
            .headers(bearer_headers(access_token))
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_to_error(
                status,
                &body,
                PROFILE_LOAD_FAILED_MESSAGE,
                true,
            ));
        }
        let payload: ProfileResponse = resp.json().await?;
        Ok(payload.into())
    }

    /// `PATCH /api/profile/me/` as multipart with the bearer credential.
    pub async fn patch_profile(
        &self,
        access_token: &str,
        payload: UpdatePayload,
    ) -> Result<UpdateResponse> {
        tracing::debug!(
            url = %self.profile_url,
            parts = ?payload.part_names(),
            "patching profile"
        );
        let form = payload.into_form()?;
        let resp = self
            .client
            .patch(&self.profile_url)
            .headers(bearer_headers(access_token))
            .multipart(form)
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(status_to_error(
                status,
                &body,
                PROFILE_UPDATE_FAILED_MESSAGE,
                true,
            ));
        }
        if status == StatusCode::NO_CONTENT || body.trim().is_empty() {
            return Ok(UpdateResponse::default());
        }
        Ok(serde_json::from_str(&body)?)
    }
}

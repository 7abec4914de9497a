#![allow(dead_code)]

use std::sync::Arc;

use serde_json::{json, Value};
use underroof::api::ApiClient;
use underroof::app::{AppState, Dispatcher};
use underroof::auth::{CredentialPair, DualTokenStore, SessionController, TokenStore};
use underroof::config::ClientConfig;
use underroof::navigation::RecordingNavigator;
use underroof::profile::{EditScope, ProfileSync};
use wiremock::MockServer;

pub const TOKEN_PATH: &str = "/api/token/";
pub const PROFILE_PATH: &str = "/api/profile/me/";

/// Everything a flow needs, wired against one mock server.
pub struct Harness {
    pub config: ClientConfig,
    pub store: Arc<DualTokenStore>,
    pub navigator: Arc<RecordingNavigator>,
}

impl Harness {
    pub fn new(server: &MockServer) -> Self {
        Self {
            config: ClientConfig::new(server.uri()).without_delays(),
            store: Arc::new(DualTokenStore::in_memory()),
            navigator: Arc::new(RecordingNavigator::new()),
        }
    }

    /// Same as [`Harness::new`] with `A1`/`R1` already stored.
    pub fn logged_in(server: &MockServer) -> Self {
        let harness = Self::new(server);
        harness.seed("A1", "R1");
        harness
    }

    pub fn seed(&self, access: &str, refresh: &str) {
        self.store
            .save(
                &CredentialPair::new(access, Some(refresh.to_string())),
                self.config.access_ttl(),
                self.config.refresh_ttl(),
            )
            .expect("seed token pair");
    }

    pub fn api(&self) -> ApiClient {
        ApiClient::new(&self.config)
    }

    pub fn session(&self) -> SessionController {
        SessionController::new(
            self.api(),
            self.store.clone(),
            self.navigator.clone(),
            &self.config,
        )
    }

    pub fn profiles(&self) -> ProfileSync {
        ProfileSync::new(self.api(), self.store.clone(), &self.config)
            .with_display_cache(self.store.local().clone())
    }

    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(&self.config, (*self.store).clone(), self.navigator.clone())
    }

    pub fn app_state(&self, scope: EditScope) -> AppState {
        AppState::new(scope, &self.config)
    }
}

/// A `GET /api/profile/me/` body as the server renders it.
pub fn profile_body(first_name: &str, username: &str, photo: Option<&str>) -> Value {
    json!({
        "username": username,
        "email": format!("{username}@example.com"),
        "first_name": first_name,
        "last_name": "",
        "is_active": true,
        "profile_photo": photo,
        "profile": {
            "profile_img": photo,
            "role": "user",
            "updated_at": "2026-01-01T00:00:00Z"
        }
    })
}

use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::store::TokenStore;
use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::error::{IdentityError, Result};
use crate::navigation::{Navigator, View};
use crate::profile::ProfileRecord;
use crate::util::form_lock::FormLock;

/// Confirmation shown after a successful login.
pub const LOGIN_SUCCESS_MESSAGE: &str = "Login successful! Redirecting...";

/// Externally visible session state, derived rather than stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Anonymous,
    Authenticated,
    /// The API rejected the stored credential and it was cleared. Holds
    /// until the next login, logout or session check.
    Expired,
}

/// Internal phase of the controller's state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Anonymous,
    Authenticating,
    Authenticated,
    Expired,
}

/// A navigation scheduled after a fixed delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirect {
    pub to: View,
    pub after: Duration,
}

impl Redirect {
    /// Wait out the delay, then navigate.
    pub async fn follow(self, navigator: &dyn Navigator) {
        if !self.after.is_zero() {
            tokio::time::sleep(self.after).await;
        }
        navigator.navigate(self.to);
    }
}

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub message: String,
    pub redirect: Redirect,
}

/// Result of probing whether the stored credential is still accepted.
#[derive(Debug)]
pub enum SessionProbe {
    /// No credential stored.
    Anonymous,
    Authenticated(ProfileRecord),
    /// 401: the session was torn down and a reload was issued.
    Expired,
    /// The probe failed for another reason; the credential is kept.
    Unavailable(IdentityError),
}

/// Drives login, logout and session validity probing.
///
/// The only writer of the stored credential.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use underroof::api::ApiClient;
/// use underroof::auth::{DualTokenStore, SessionController};
/// use underroof::config::ClientConfig;
/// use underroof::navigation::RecordingNavigator;
///
/// # async fn example() -> underroof::error::Result<()> {
/// let config = ClientConfig::new("https://house.example.com");
/// let session = SessionController::new(
///     ApiClient::new(&config),
///     Arc::new(DualTokenStore::in_memory()),
///     Arc::new(RecordingNavigator::new()),
///     &config,
/// );
/// let outcome = session.login("alice", "correct").await?;
/// println!("{}", outcome.message);
/// # Ok(())
/// # }
/// ```
pub struct SessionController {
    api: ApiClient,
    store: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
    access_ttl: chrono::Duration,
    refresh_ttl: chrono::Duration,
    redirect_delay: Duration,
    phase: Mutex<SessionPhase>,
    login_form: FormLock,
}

impl SessionController {
    pub fn new(
        api: ApiClient,
        store: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
        config: &ClientConfig,
    ) -> Self {
        // A stored token counts as authenticated until the API says otherwise.
        let initial = if store.load().is_some() {
            SessionPhase::Authenticated
        } else {
            SessionPhase::Anonymous
        };
        Self {
            api,
            store,
            navigator,
            access_ttl: config.access_ttl(),
            refresh_ttl: config.refresh_ttl(),
            redirect_delay: config.redirect_delay(),
            phase: Mutex::new(initial),
            login_form: FormLock::new("login"),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
            .lock()
            .map(|phase| *phase)
            .unwrap_or(SessionPhase::Anonymous)
    }

    fn set_phase(&self, next: SessionPhase) {
        if let Ok(mut phase) = self.phase.lock() {
            if *phase != next {
                tracing::info!(from = ?*phase, to = ?next, "session transition");
            }
            *phase = next;
        }
    }

    /// Derived session state.
    pub fn state(&self) -> SessionState {
        match self.phase() {
            SessionPhase::Expired => SessionState::Expired,
            _ if self.store.load().is_some() => SessionState::Authenticated,
            _ => SessionState::Anonymous,
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.login_form.is_busy()
    }

    /// Exchange credentials for a token pair and persist it.
    ///
    /// On failure the store is left untouched and the error carries the
    /// server's `detail` text, or a generic message.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome> {
        let _guard = self.login_form.try_acquire()?;
        let previous = self.phase();
        self.set_phase(SessionPhase::Authenticating);

        let pair = match self.api.obtain_token(username, password).await {
            Ok(pair) => pair,
            Err(err) => {
                tracing::warn!(username, error = %err, "login rejected");
                self.set_phase(previous);
                return Err(err);
            }
        };

        if let Err(err) = self.store.save(&pair, self.access_ttl, self.refresh_ttl) {
            self.set_phase(previous);
            return Err(err);
        }
        tracing::info!(username, token = %pair.fingerprint(), "logged in");
        self.set_phase(SessionPhase::Authenticated);

        Ok(LoginOutcome {
            message: LOGIN_SUCCESS_MESSAGE.to_string(),
            redirect: Redirect {
                to: View::Home,
                after: self.redirect_delay,
            },
        })
    }

    /// Drop the credential and go to the login view. No network call.
    pub fn logout(&self) {
        self.store.clear();
        self.set_phase(SessionPhase::Anonymous);
        self.navigator.navigate(View::Login);
    }

    /// Forced teardown after the API rejected the credential: clear, then
    /// exactly one full reload. The phase stays `Expired` afterwards.
    pub fn handle_auth_failure(&self) {
        self.set_phase(SessionPhase::Expired);
        self.store.clear();
        self.navigator.reload();
    }

    /// Confirm the stored credential with an authenticated profile fetch.
    pub async fn probe_session(&self) -> SessionProbe {
        let Some(pair) = self.store.load() else {
            self.set_phase(SessionPhase::Anonymous);
            return SessionProbe::Anonymous;
        };
        match self.api.fetch_profile(&pair.access_token).await {
            Ok(record) => {
                self.set_phase(SessionPhase::Authenticated);
                SessionProbe::Authenticated(record)
            }
            Err(err) if err.is_auth_failure() => {
                tracing::info!(token = %pair.fingerprint(), "stored credential rejected");
                self.handle_auth_failure();
                SessionProbe::Expired
            }
            Err(err) => {
                tracing::warn!(error = %err, "session probe failed, keeping credential");
                SessionProbe::Unavailable(err)
            }
        }
    }

    /// When the login view opens with a credential already stored, skip it.
    pub fn redirect_if_authenticated(&self) -> bool {
        if self.store.load().is_none() {
            return false;
        }
        self.navigator.navigate(View::Home);
        true
    }
}

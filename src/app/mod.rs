//! Explicit application state and the single dispatch point for actions.

pub mod notice;

pub use notice::{Notice, NoticeBoard, NoticeKind};

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;

use crate::api::ApiClient;
use crate::auth::{DualTokenStore, SessionController, SessionProbe, SessionState, TokenStore};
use crate::config::ClientConfig;
use crate::error::{IdentityError, Result};
use crate::navigation::Navigator;
use crate::presenter::{present_identity, render_identity, IdentityView};
use crate::profile::{EditScope, ProfileForm, ProfileRecord, ProfileSync};

/// Everything the UI renders from.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub session: SessionState,
    pub identity: IdentityView,
    pub profile: Option<ProfileRecord>,
    pub profile_form: ProfileForm,
    pub notices: NoticeBoard,
}

impl AppState {
    pub fn new(scope: EditScope, config: &ClientConfig) -> Self {
        Self {
            profile_form: ProfileForm::new(scope),
            notices: NoticeBoard::new(config.notice_ttl()),
            ..Self::default()
        }
    }

    /// What a full reload leaves behind: nothing but the form's scope.
    pub fn reset(&mut self) {
        let scope = self.profile_form.scope;
        self.session = SessionState::Anonymous;
        self.identity = IdentityView::anonymous();
        self.profile = None;
        self.profile_form = ProfileForm::new(scope);
        self.notices.clear();
    }

    fn apply_profile(&mut self, record: ProfileRecord) {
        self.profile_form.populate(&record);
        self.identity = render_identity(true, Some(&Ok(record.clone())));
        self.profile = Some(record);
        self.session = SessionState::Authenticated;
    }
}

/// A user intent produced by the UI.
#[derive(Clone, PartialEq, Eq)]
pub enum Action {
    Login { username: String, password: String },
    Logout,
    /// The login view was opened. Skipped straight to home when a
    /// credential is already stored.
    OpenLogin,
    /// Page load: decide between anonymous and logged-in chrome.
    ProbeSession,
    /// Populate the edit form from the server.
    LoadProfile,
    SelectPhoto(PathBuf),
    /// Submit the edit form as it currently stands in [`AppState`].
    UpdateProfile,
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login { username, .. } => f
                .debug_struct("Login")
                .field("username", username)
                .finish_non_exhaustive(),
            Self::Logout => f.write_str("Logout"),
            Self::OpenLogin => f.write_str("OpenLogin"),
            Self::ProbeSession => f.write_str("ProbeSession"),
            Self::LoadProfile => f.write_str("LoadProfile"),
            Self::SelectPhoto(path) => f.debug_tuple("SelectPhoto").field(path).finish(),
            Self::UpdateProfile => f.write_str("UpdateProfile"),
        }
    }
}

/// Routes actions to the controllers and folds their results into state.
///
/// Failures end as an error notice, except authentication failures, which
/// end in a session teardown and full reload instead.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use underroof::app::{Action, AppState, Dispatcher};
/// use underroof::config::ClientConfig;
/// use underroof::navigation::RecordingNavigator;
/// use underroof::profile::EditScope;
///
/// # async fn example() -> underroof::error::Result<()> {
/// let config = ClientConfig::from_env();
/// let dispatcher = Dispatcher::from_config(config.clone(), Arc::new(RecordingNavigator::new()))?;
/// let mut state = AppState::new(EditScope::SelfEdit, &config);
/// dispatcher.dispatch(&mut state, Action::ProbeSession).await?;
/// # Ok(())
/// # }
/// ```
pub struct Dispatcher {
    store: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
    session: SessionController,
    profiles: ProfileSync,
}

impl Dispatcher {
    pub fn new(config: &ClientConfig, store: DualTokenStore, navigator: Arc<dyn Navigator>) -> Self {
        let api = ApiClient::new(config);
        let display_cache = store.local().clone();
        let store: Arc<dyn TokenStore> = Arc::new(store);
        let session = SessionController::new(api.clone(), store.clone(), navigator.clone(), config);
        let profiles = ProfileSync::new(api, store.clone(), config).with_display_cache(display_cache);
        Self {
            store,
            navigator,
            session,
            profiles,
        }
    }

    /// File-backed stores under the configured state directory.
    pub fn from_config(config: ClientConfig, navigator: Arc<dyn Navigator>) -> Result<Self> {
        config.validate()?;
        let store = DualTokenStore::in_dir(config.state_dir());
        Ok(Self::new(&config, store, navigator))
    }

    pub fn session(&self) -> &SessionController {
        &self.session
    }

    pub fn profiles(&self) -> &ProfileSync {
        &self.profiles
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    /// Handle one action.
    ///
    /// The returned error has already been turned into a notice (or a
    /// teardown); it is handed back so non-UI callers can react to it.
    pub async fn dispatch(&self, state: &mut AppState, action: Action) -> Result<()> {
        state.notices.prune(Utc::now());
        tracing::debug!(?action, "dispatch");
        let result = match action {
            Action::Login { username, password } => self.login(state, &username, &password).await,
            Action::Logout => {
                self.session.logout();
                state.reset();
                Ok(())
            }
            Action::OpenLogin => {
                state.session = if self.session.redirect_if_authenticated() {
                    SessionState::Authenticated
                } else {
                    self.session.state()
                };
                Ok(())
            }
            Action::ProbeSession => {
                self.probe(state).await;
                Ok(())
            }
            Action::LoadProfile => self.load_profile(state).await,
            Action::SelectPhoto(path) => {
                self.profiles
                    .select_photo(&mut state.profile_form, &path)
                    .await
            }
            Action::UpdateProfile => self.update_profile(state).await,
        };
        if let Err(err) = &result {
            self.report(state, err);
        }
        result
    }

    async fn login(&self, state: &mut AppState, username: &str, password: &str) -> Result<()> {
        let outcome = self.session.login(username, password).await?;
        state.session = SessionState::Authenticated;
        state.notices.success(outcome.message);
        outcome.redirect.follow(self.navigator.as_ref()).await;
        Ok(())
    }

    async fn probe(&self, state: &mut AppState) {
        let (identity, outcome) =
            present_identity(self.store.as_ref(), &self.profiles, &self.session).await;
        match outcome {
            SessionProbe::Authenticated(record) => state.apply_profile(record),
            SessionProbe::Expired => self.after_teardown(state),
            SessionProbe::Anonymous | SessionProbe::Unavailable(_) => {
                state.identity = identity;
                state.profile = None;
                state.session = self.session.state();
            }
        }
    }

    async fn load_profile(&self, state: &mut AppState) -> Result<()> {
        let record = self.profiles.load().await?;
        state.apply_profile(record);
        Ok(())
    }

    async fn update_profile(&self, state: &mut AppState) -> Result<()> {
        let outcome = self.profiles.update(&mut state.profile_form).await?;
        state.notices.success(outcome.message);
        let record = self.profiles.resync().await?;
        state.apply_profile(record);
        Ok(())
    }

    fn report(&self, state: &mut AppState, err: &IdentityError) {
        if err.is_auth_failure() {
            self.session.handle_auth_failure();
            self.after_teardown(state);
            return;
        }
        if matches!(err, IdentityError::NotLoggedIn) {
            state.identity = IdentityView::anonymous();
            state.profile = None;
            state.session = self.session.state();
        }
        state.notices.error(err.user_message());
    }

    /// The reload wipes every piece of UI state.
    fn after_teardown(&self, state: &mut AppState) {
        state.reset();
        state.session = self.session.state();
    }
}

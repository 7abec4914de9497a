//! Identity chrome: logged-out login link or logged-in name and avatar.

use crate::app::Action;
use crate::auth::{SessionController, SessionProbe, TokenStore};
use crate::error::Result;
use crate::navigation::View;
use crate::profile::{ProfileRecord, ProfileSync};

/// Placeholder avatar for profiles without a photo.
pub const DEFAULT_AVATAR: &str = "/static/img/default-avatar.svg";

/// What the identity area of the page shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityView {
    Anonymous {
        login_href: &'static str,
    },
    Authenticated {
        display_name: String,
        avatar_url: String,
        profile_href: &'static str,
        logout: Action,
    },
}

impl Default for IdentityView {
    fn default() -> Self {
        Self::anonymous()
    }
}

impl IdentityView {
    pub fn anonymous() -> Self {
        Self::Anonymous {
            login_href: View::Login.path(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }
}

/// Pure render from the token presence and the profile fetch outcome.
///
/// `outcome` is `None` when no fetch was attempted.
pub fn render_identity(
    token_present: bool,
    outcome: Option<&Result<ProfileRecord>>,
) -> IdentityView {
    match (token_present, outcome) {
        (true, Some(Ok(record))) => IdentityView::Authenticated {
            display_name: record.display_name().to_string(),
            avatar_url: avatar_url(record.profile_photo.as_deref()),
            profile_href: View::Profile.path(),
            logout: Action::Logout,
        },
        _ => IdentityView::anonymous(),
    }
}

/// Gather the inputs and render.
///
/// A 401 is handed to the session controller for teardown and reload
/// before the anonymous chrome is returned; the returned [`SessionProbe`]
/// tells the caller which of these happened.
pub async fn present_identity(
    store: &dyn TokenStore,
    profiles: &ProfileSync,
    session: &SessionController,
) -> (IdentityView, SessionProbe) {
    if store.load().is_none() {
        return (render_identity(false, None), SessionProbe::Anonymous);
    }
    let outcome = profiles.load().await;
    let view = render_identity(true, Some(&outcome));
    let session_outcome = match outcome {
        Ok(record) => SessionProbe::Authenticated(record),
        Err(err) if err.is_auth_failure() => {
            session.handle_auth_failure();
            SessionProbe::Expired
        }
        Err(err) => {
            tracing::warn!(error = %err, "profile unavailable, showing login link");
            SessionProbe::Unavailable(err)
        }
    };
    (view, session_outcome)
}

/// Resolve the avatar source for a stored photo reference.
pub fn avatar_url(photo: Option<&str>) -> String {
    match photo.map(str::trim).filter(|p| !p.is_empty()) {
        None => DEFAULT_AVATAR.to_string(),
        Some(p) if p.starts_with("http") || p.starts_with('/') => p.to_string(),
        Some(p) => format!("/media/{p}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IdentityError;
    use crate::profile::Role;

    fn record(photo: Option<&str>) -> ProfileRecord {
        ProfileRecord {
            first_name: "Alice".to_string(),
            last_name: String::new(),
            username: "alice".to_string(),
            email: String::new(),
            profile_photo: photo.map(String::from),
            role: Some(Role::User),
            is_active: true,
        }
    }

    #[test]
    fn avatar_resolution_rules() {
        assert_eq!(avatar_url(None), DEFAULT_AVATAR);
        assert_eq!(avatar_url(Some("  ")), DEFAULT_AVATAR);
        assert_eq!(
            avatar_url(Some("https://cdn.example.com/a.png")),
            "https://cdn.example.com/a.png"
        );
        assert_eq!(avatar_url(Some("/media/a.png")), "/media/a.png");
        assert_eq!(
            avatar_url(Some("profile_photos/a.png")),
            "/media/profile_photos/a.png"
        );
    }

    #[test]
    fn no_token_renders_login_link() {
        assert_eq!(render_identity(false, None), IdentityView::anonymous());
    }

    #[test]
    fn failed_fetch_renders_login_link() {
        let failed: Result<ProfileRecord> = Err(IdentityError::api(500, "boom"));
        assert_eq!(
            render_identity(true, Some(&failed)),
            IdentityView::Anonymous { login_href: "/login" }
        );
    }

    #[test]
    fn loaded_profile_renders_name_avatar_and_logout() {
        let ok: Result<ProfileRecord> = Ok(record(None));
        match render_identity(true, Some(&ok)) {
            IdentityView::Authenticated {
                display_name,
                avatar_url,
                profile_href,
                logout,
            } => {
                assert_eq!(display_name, "Alice");
                assert_eq!(avatar_url, DEFAULT_AVATAR);
                assert_eq!(profile_href, "/profile");
                assert_eq!(logout, Action::Logout);
            }
            other => panic!("expected Authenticated, got {other:?}"),
        }
    }
}

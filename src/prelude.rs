//! Convenience re-exports for common use.

pub use crate::app::{Action, AppState, Dispatcher};
pub use crate::auth::{CredentialPair, DualTokenStore, SessionController, SessionState, TokenStore};
pub use crate::config::ClientConfig;
pub use crate::error::{IdentityError, Result};
pub use crate::navigation::{Navigator, View};
pub use crate::presenter::IdentityView;
pub use crate::profile::{EditScope, ProfileForm, ProfileRecord, ProfileSync, Role};

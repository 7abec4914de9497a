//! Credential storage and the session lifecycle.

pub mod cookie;
pub mod local;
mod persist;
pub mod session;
pub mod store;
pub mod token;

pub use cookie::{Cookie, CookieJar, FileCookieJar, MemoryCookieJar, SameSite};
pub use local::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use session::{
    LoginOutcome, Redirect, SessionController, SessionPhase, SessionProbe, SessionState,
    LOGIN_SUCCESS_MESSAGE,
};
pub use store::{DualTokenStore, TokenStore, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
pub use token::CredentialPair;

use std::path::Path;
use std::sync::Arc;

use super::cookie::{Cookie, CookieJar, FileCookieJar, MemoryCookieJar};
use super::local::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
use super::token::CredentialPair;
use crate::error::Result;

/// Cookie and local key holding the access token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Cookie and local key holding the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Storage abstraction for the session credential.
///
/// A stored pair only means "a token exists". Whether the API still accepts
/// it is learned from the first authenticated call.
pub trait TokenStore: Send + Sync {
    fn save(
        &self,
        pair: &CredentialPair,
        access_ttl: chrono::Duration,
        refresh_ttl: chrono::Duration,
    ) -> Result<()>;
    fn load(&self) -> Option<CredentialPair>;
    /// Remove the credential everywhere. Never fails.
    fn clear(&self);
}

/// Token store writing every credential to two redundant locations.
///
/// The cookie jar is primary and carries the TTL; the key/value store is a
/// non-expiring backup consulted when the cookie is gone.
///
/// # Example
/// ```
/// use underroof::auth::{CredentialPair, DualTokenStore, TokenStore};
///
/// let store = DualTokenStore::in_memory();
/// let pair = CredentialPair::new("A1", Some("R1".to_string()));
/// store.save(&pair, chrono::Duration::days(1), chrono::Duration::days(7))?;
/// assert_eq!(store.load(), Some(pair));
/// store.clear();
/// assert!(store.load().is_none());
/// # Ok::<(), underroof::error::IdentityError>(())
/// ```
#[derive(Clone)]
pub struct DualTokenStore {
    cookies: Arc<dyn CookieJar>,
    local: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for DualTokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DualTokenStore")
            .field("cookies", &"..")
            .field("local", &"..")
            .finish()
    }
}

impl DualTokenStore {
    pub fn new(cookies: Arc<dyn CookieJar>, local: Arc<dyn KeyValueStore>) -> Self {
        Self { cookies, local }
    }

    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryCookieJar::new()),
            Arc::new(MemoryKeyValueStore::new()),
        )
    }

    /// File-backed store under `state_dir` (`cookies.toml`, `local_storage.toml`).
    pub fn in_dir(state_dir: &Path) -> Self {
        Self::new(
            Arc::new(FileCookieJar::new(state_dir.join("cookies.toml"))),
            Arc::new(FileKeyValueStore::new(state_dir.join("local_storage.toml"))),
        )
    }

    pub fn cookies(&self) -> &Arc<dyn CookieJar> {
        &self.cookies
    }

    /// The secondary store, shared with the profile display cache.
    pub fn local(&self) -> &Arc<dyn KeyValueStore> {
        &self.local
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.cookies.get(key) {
            Ok(Some(cookie)) if !cookie.value.is_empty() => return Some(cookie.value),
            Ok(_) => {}
            Err(err) => tracing::warn!(key, error = %err, "cookie read failed, trying local store"),
        }
        match self.local.get_item(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(err) => {
                tracing::warn!(key, error = %err, "local store read failed");
                None
            }
        }
    }
}

impl TokenStore for DualTokenStore {
    fn save(
        &self,
        pair: &CredentialPair,
        access_ttl: chrono::Duration,
        refresh_ttl: chrono::Duration,
    ) -> Result<()> {
        self.cookies.set(Cookie::site_wide(
            ACCESS_TOKEN_KEY,
            pair.access_token.clone(),
            access_ttl,
        ))?;
        if let Some(refresh) = &pair.refresh_token {
            self.cookies
                .set(Cookie::site_wide(REFRESH_TOKEN_KEY, refresh.clone(), refresh_ttl))?;
        }

        self.local.set_item(ACCESS_TOKEN_KEY, &pair.access_token)?;
        match &pair.refresh_token {
            Some(refresh) => self.local.set_item(REFRESH_TOKEN_KEY, refresh)?,
            None => self.local.remove_item(REFRESH_TOKEN_KEY)?,
        }
        tracing::debug!(token = %pair.fingerprint(), "credential saved");
        Ok(())
    }

    fn load(&self) -> Option<CredentialPair> {
        let access_token = self.read(ACCESS_TOKEN_KEY)?;
        Some(CredentialPair {
            access_token,
            refresh_token: self.read(REFRESH_TOKEN_KEY),
        })
    }

    fn clear(&self) {
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY] {
            if let Err(err) = self.cookies.remove(key) {
                tracing::warn!(key, error = %err, "failed to remove cookie");
            }
            if let Err(err) = self.local.remove_item(key) {
                tracing::warn!(key, error = %err, "failed to remove local item");
            }
        }
        tracing::debug!("credential cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn pair() -> CredentialPair {
        CredentialPair::new("A1", Some("R1".to_string()))
    }

    fn save(store: &DualTokenStore) {
        store
            .save(&pair(), chrono::Duration::days(1), chrono::Duration::days(7))
            .unwrap();
    }

    #[test]
    fn save_writes_both_locations() {
        let store = DualTokenStore::in_memory();
        save(&store);

        let access = store.cookies().get(ACCESS_TOKEN_KEY).unwrap().unwrap();
        assert_eq!(access.value, "A1");
        let refresh = store.cookies().get(REFRESH_TOKEN_KEY).unwrap().unwrap();
        assert!(refresh.expires_at > access.expires_at);
        assert_eq!(
            store.local().get_item(ACCESS_TOKEN_KEY).unwrap().as_deref(),
            Some("A1")
        );
        assert_eq!(
            store.local().get_item(REFRESH_TOKEN_KEY).unwrap().as_deref(),
            Some("R1")
        );
    }

    #[test]
    fn load_prefers_the_cookie() {
        let store = DualTokenStore::in_memory();
        save(&store);
        store.local().set_item(ACCESS_TOKEN_KEY, "stale").unwrap();
        assert_eq!(store.load().unwrap().access_token, "A1");
    }

    #[test]
    fn load_falls_back_to_local_store_when_cookie_expired() {
        let store = DualTokenStore::in_memory();
        store
            .save(
                &pair(),
                chrono::Duration::seconds(-1),
                chrono::Duration::days(7),
            )
            .unwrap();
        assert!(store.cookies().get(ACCESS_TOKEN_KEY).unwrap().is_none());
        assert_eq!(store.load(), Some(pair()));
    }

    #[test]
    fn empty_cookie_value_reads_as_absent() {
        let store = DualTokenStore::in_memory();
        store
            .cookies()
            .set(Cookie::site_wide(ACCESS_TOKEN_KEY, "", chrono::Duration::days(1)))
            .unwrap();
        assert!(store.load().is_none());

        store.local().set_item(ACCESS_TOKEN_KEY, "A1").unwrap();
        assert_eq!(store.load().unwrap().access_token, "A1");
    }

    #[test]
    fn clear_removes_both_locations() {
        let store = DualTokenStore::in_memory();
        save(&store);
        store.clear();
        assert!(store.load().is_none());
        assert!(store.cookies().get(ACCESS_TOKEN_KEY).unwrap().is_none());
        assert!(store.local().get_item(REFRESH_TOKEN_KEY).unwrap().is_none());
    }

    #[test]
    fn clear_on_empty_store_is_a_noop() {
        let dir = TempDir::new().unwrap();
        let store = DualTokenStore::in_dir(dir.path());
        store.clear();
        assert!(store.load().is_none());
    }

    #[test]
    fn load_is_some_iff_last_operation_was_save() {
        let store = DualTokenStore::in_memory();
        let ops = [true, true, false, true, false, false, true];
        for save_op in ops {
            if save_op {
                save(&store);
            } else {
                store.clear();
            }
            assert_eq!(store.load().is_some(), save_op);
        }
    }
}

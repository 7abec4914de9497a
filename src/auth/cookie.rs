//! Primary, server-visible credential location: an expiring cookie jar.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::persist::{read_state, write_state};
use crate::error::{IdentityError, Result};

const COOKIE_FILE_VERSION: u32 = 1;

/// `SameSite` cookie attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

/// A single cookie with an absolute expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub expires_at: DateTime<Utc>,
    pub path: String,
    pub same_site: SameSite,
}

impl Cookie {
    /// Site-wide `SameSite=Lax` cookie living for `ttl` from now.
    pub fn site_wide(name: impl Into<String>, value: impl Into<String>, ttl: chrono::Duration) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            expires_at: Utc::now() + ttl,
            path: "/".to_string(),
            same_site: SameSite::Lax,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// `Set-Cookie` style rendering.
    pub fn header_value(&self) -> String {
        format!(
            "{}={}; expires={}; path={}; SameSite={}",
            self.name,
            self.value,
            self.expires_at.format("%a, %d %b %Y %H:%M:%S GMT"),
            self.path,
            self.same_site
        )
    }
}

/// Storage abstraction for cookies.
///
/// `get` only ever returns live cookies; an expired cookie reads as absent.
pub trait CookieJar: Send + Sync {
    fn get(&self, name: &str) -> Result<Option<Cookie>>;
    fn set(&self, cookie: Cookie) -> Result<()>;
    fn remove(&self, name: &str) -> Result<()>;
}

/// Process-local cookie jar.
#[derive(Debug, Default)]
pub struct MemoryCookieJar {
    cookies: Mutex<BTreeMap<String, Cookie>>,
}

impl MemoryCookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, Cookie>>> {
        self.cookies
            .lock()
            .map_err(|_| IdentityError::Storage("cookie jar lock poisoned".to_string()))
    }
}

impl CookieJar for MemoryCookieJar {
    fn get(&self, name: &str) -> Result<Option<Cookie>> {
        let cookies = self.lock()?;
        Ok(live(cookies.get(name)))
    }

    fn set(&self, cookie: Cookie) -> Result<()> {
        self.lock()?.insert(cookie.name.clone(), cookie);
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<()> {
        self.lock()?.remove(name);
        Ok(())
    }
}

/// Cookie jar persisted as a TOML file.
///
/// # Example
/// ```no_run
/// use underroof::auth::{Cookie, CookieJar, FileCookieJar};
///
/// let jar = FileCookieJar::new("/tmp/underroof/cookies.toml");
/// jar.set(Cookie::site_wide("access_token", "A1", chrono::Duration::days(1)))?;
/// # Ok::<(), underroof::error::IdentityError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileCookieJar {
    path: PathBuf,
}

impl FileCookieJar {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn read(&self) -> Result<CookieFile> {
        let file: CookieFile = read_state(&self.path)?;
        if file.version != 0 && file.version != COOKIE_FILE_VERSION {
            return Err(IdentityError::Storage(format!(
                "unsupported cookie file version {} at {}",
                file.version,
                self.path.display()
            )));
        }
        Ok(file)
    }

    fn write(&self, mut file: CookieFile) -> Result<()> {
        file.version = COOKIE_FILE_VERSION;
        write_state(&self.path, &file)
    }
}

impl CookieJar for FileCookieJar {
    fn get(&self, name: &str) -> Result<Option<Cookie>> {
        let file = self.read()?;
        Ok(live(file.cookies.get(name)))
    }

    fn set(&self, cookie: Cookie) -> Result<()> {
        let mut file = self.read()?;
        let now = Utc::now();
        file.cookies.retain(|_, c| !c.is_expired_at(now));
        file.cookies.insert(cookie.name.clone(), cookie);
        self.write(file)
    }

    fn remove(&self, name: &str) -> Result<()> {
        let mut file = self.read()?;
        if file.cookies.remove(name).is_none() {
            return Ok(());
        }
        self.write(file)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CookieFile {
    #[serde(default)]
    version: u32,
    #[serde(default)]
    cookies: BTreeMap<String, Cookie>,
}

fn live(cookie: Option<&Cookie>) -> Option<Cookie> {
    cookie.filter(|c| !c.is_expired_at(Utc::now())).cloned()
}

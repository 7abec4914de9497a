use std::sync::Arc;

use pretty_assertions::assert_eq;
use underroof::auth::{
    CookieJar, CredentialPair, DualTokenStore, FileCookieJar, KeyValueStore, MemoryKeyValueStore,
    TokenStore, ACCESS_TOKEN_KEY,
};

fn pair() -> CredentialPair {
    CredentialPair::new("A1", Some("R1".to_string()))
}

#[test]
fn file_backed_store_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    DualTokenStore::in_dir(dir.path())
        .save(&pair(), chrono::Duration::days(1), chrono::Duration::days(7))
        .unwrap();

    let reopened = DualTokenStore::in_dir(dir.path());
    assert_eq!(reopened.load(), Some(pair()));
    assert!(dir.path().join("cookies.toml").exists());
    assert!(dir.path().join("local_storage.toml").exists());

    reopened.clear();
    assert!(DualTokenStore::in_dir(dir.path()).load().is_none());
}

#[test]
fn expired_cookie_falls_back_to_local_copy() {
    let dir = tempfile::tempdir().unwrap();
    let store = DualTokenStore::in_dir(dir.path());
    store
        .save(&pair(), chrono::Duration::seconds(-1), chrono::Duration::seconds(-1))
        .unwrap();

    assert!(store.cookies().get(ACCESS_TOKEN_KEY).unwrap().is_none());
    assert_eq!(store.load(), Some(pair()));
}

#[test]
fn cookie_copy_wins_when_locations_disagree() {
    let dir = tempfile::tempdir().unwrap();
    let local = Arc::new(MemoryKeyValueStore::new());
    local.set_item(ACCESS_TOKEN_KEY, "stale").unwrap();
    let cookies = Arc::new(FileCookieJar::new(dir.path().join("cookies.toml")));
    let store = DualTokenStore::new(cookies, local);

    store
        .cookies()
        .set(underroof::auth::Cookie::site_wide(
            ACCESS_TOKEN_KEY,
            "fresh",
            chrono::Duration::days(1),
        ))
        .unwrap();
    assert_eq!(store.load().unwrap().access_token, "fresh");
}

#[test]
fn missing_refresh_token_is_not_invented() {
    let store = DualTokenStore::in_memory();
    store
        .save(
            &CredentialPair::new("A2", None),
            chrono::Duration::days(1),
            chrono::Duration::days(7),
        )
        .unwrap();
    assert_eq!(store.load(), Some(CredentialPair::new("A2", None)));
}

#[test]
fn corrupt_state_file_reads_as_logged_out() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("cookies.toml"), "not = [valid").unwrap();
    let store = DualTokenStore::in_dir(dir.path());
    assert!(store.load().is_none());
}

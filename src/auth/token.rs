use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Access/refresh credential pair issued by the token endpoint.
///
/// Held by a [`TokenStore`](super::TokenStore); consumers only ever receive
/// clones.
///
/// # Example
/// ```
/// use underroof::auth::CredentialPair;
///
/// let pair = CredentialPair::new("A1", Some("R1".to_string()));
/// assert_eq!(pair.access_token, "A1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPair {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

impl CredentialPair {
    pub fn new(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token,
        }
    }

    /// Short, non-reversible tag for log lines.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.access_token.as_bytes());
        digest.iter().take(4).map(|b| format!("{b:02x}")).collect()
    }
}

//! Keyserver configuration.

use serde::{Deserialize, Serialize};

/// Where and how long to look up keys.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyserverConfig {
    /// Scheme and host of the keyserver (e.g., "https://pgp.mit.edu").
    pub host: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for KeyserverConfig {
    fn default() -> Self {
        Self {
            host: "https://pgp.mit.edu".to_string(),
            timeout_secs: 30,
        }
    }
}

impl KeyserverConfig {
    /// The host without any trailing slash.
    pub fn base_url(&self) -> &str {
        self.host.trim_end_matches('/')
    }
}

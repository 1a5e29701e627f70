//! Keyserver error types.

use gpgbuddy_armor::ArmorError;
use gpgbuddy_crypto::CryptoError;
use thiserror::Error;

/// Result type for keyserver lookups.
pub type KeyserverResult<T> = Result<T, KeyserverError>;

/// Errors that can occur while looking up a key.
#[derive(Debug, Error)]
pub enum KeyserverError {
    /// The request never got a response (connect failure, timeout, ...).
    #[error("keyserver transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("keyserver answered with status {0}")]
    Status(u16),

    #[error("no key found for {0}")]
    NotFound(String),

    /// The search result linked somewhere other than the key endpoint.
    #[error("invalid key URL: {0}")]
    InvalidKeyUrl(String),

    #[error("key page holds no key text")]
    NoKeyText,

    #[error("scrape error: {0}")]
    Scrape(String),

    #[error("armor error: {0}")]
    Armor(#[from] ArmorError),

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),
}

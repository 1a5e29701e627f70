//! Mail processing error types.

use gpgbuddy_armor::ArmorError;
use gpgbuddy_crypto::CryptoError;
use gpgbuddy_keyserver::KeyserverError;
use thiserror::Error;

/// Result type for mail operations.
pub type MailResult<T> = Result<T, MailError>;

/// Errors that can occur while processing an inbound message.
#[derive(Debug, Error)]
pub enum MailError {
    /// Every key strategy failed for this message.
    #[error("no public key found")]
    NoKeyFound,

    #[error("malformed message: {0}")]
    MalformedMessage(String),

    #[error("missing header: {0}")]
    MissingHeader(String),

    #[error("armor error: {0}")]
    Armor(#[from] ArmorError),

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("keyserver error: {0}")]
    Keyserver(#[from] KeyserverError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

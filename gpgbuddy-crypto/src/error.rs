//! Crypto error types.

use gpgbuddy_armor::ArmorError;
use thiserror::Error;

/// Result type for key and message operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur while reading keys or processing messages.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Key data held no parsable public key.
    #[error("no public key found in key data")]
    NoPublicKey,

    /// The key carries no identity with the expected email address.
    #[error("identity mismatch: key has no identity for {email}")]
    IdentityMismatch { email: String },

    #[error("private key material is missing")]
    MissingPrivateKeyMaterial,

    #[error("public key material is missing")]
    MissingPublicKeyMaterial,

    /// The private key could not be unlocked with the configured passphrase.
    #[error("cannot unlock private key: {0}")]
    CannotUnlock(String),

    #[error("decryption failed: {0}")]
    DecryptFailed(String),

    #[error("encryption failed: {0}")]
    EncryptFailed(String),

    #[error("armor error: {0}")]
    Armor(#[from] ArmorError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

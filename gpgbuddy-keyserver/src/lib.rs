//! Public key lookups for GPG Buddy.
//!
//! [`KeyDirectory`] is what the mail engine needs from a key directory: an
//! email address in, a public key with a matching identity out.
//! [`KeyserverClient`] implements it against an SKS keyserver's HTML pages.

mod client;
mod config;
mod error;
pub mod scrape;

pub use client::KeyserverClient;
pub use config::KeyserverConfig;
pub use error::{KeyserverError, KeyserverResult};

use gpgbuddy_crypto::SignedPublicKey;

/// A source of public keys indexed by email address.
pub trait KeyDirectory: Send + Sync {
    /// Returns a key carrying an identity whose address equals `email`.
    fn lookup(&self, email: &str) -> KeyserverResult<SignedPublicKey>;
}

impl<D: KeyDirectory + ?Sized> KeyDirectory for std::sync::Arc<D> {
    fn lookup(&self, email: &str) -> KeyserverResult<SignedPublicKey> {
        (**self).lookup(email)
    }
}

impl<D: KeyDirectory + ?Sized> KeyDirectory for Box<D> {
    fn lookup(&self, email: &str) -> KeyserverResult<SignedPublicKey> {
        (**self).lookup(email)
    }
}

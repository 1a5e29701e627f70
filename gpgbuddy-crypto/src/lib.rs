//! OpenPGP key handling and message encryption for GPG Buddy.
//!
//! Built on rPGP. The engine never stores keys: each call borrows the held
//! private key and one counterparty public key, pairs them in a
//! [`TrustContext`] and drops the pairing when the call returns.
//!
//! - [`CryptoEngine::decrypt`] opens a binary message addressed to the held
//!   key and reports whether the counterparty signed it
//! - [`CryptoEngine::encrypt`] writes an armored message for the counterparty,
//!   signed by the held key
//! - [`keys`] reads key rings and matches identities against email addresses

mod context;
pub mod engine;
mod error;
pub mod keys;
mod passphrase;

pub use context::TrustContext;
pub use engine::{CryptoEngine, DecryptedBody, SignatureStatus};
pub use error::{CryptoError, CryptoResult};
pub use keys::{
    email_of, ensure_identity, has_identity, identities, read_public_key, read_public_key_armored,
    read_secret_key_armored, Identity,
};
pub use passphrase::Passphrase;

pub use pgp::composed::{SignedPublicKey, SignedSecretKey};

//! Per-call pairing of the held private key with a counterparty key.

use crate::engine::SignatureStatus;
use pgp::composed::{Message, SignedPublicKey, SignedSecretKey};

/// Exactly one private key and one public key, borrowed for one operation.
///
/// Nothing here outlives the call that built it, and neither key is
/// modified. The private key decrypts and signs, the public key verifies and
/// is the sole encryption recipient.
#[derive(Clone, Copy, Debug)]
pub struct TrustContext<'k> {
    secret_key: &'k SignedSecretKey,
    public_key: &'k SignedPublicKey,
}

impl<'k> TrustContext<'k> {
    pub fn new(secret_key: &'k SignedSecretKey, public_key: &'k SignedPublicKey) -> Self {
        Self {
            secret_key,
            public_key,
        }
    }

    pub fn secret_key(&self) -> &'k SignedSecretKey {
        self.secret_key
    }

    pub fn public_key(&self) -> &'k SignedPublicKey {
        self.public_key
    }

    /// Checks the signature of a fully read message against the public key,
    /// trying the primary key first and then each subkey.
    pub(crate) fn verify(&self, message: &Message<'_>) -> SignatureStatus {
        if message.verify(&self.public_key.primary_key).is_ok() {
            return SignatureStatus::Verified;
        }
        let by_subkey = self
            .public_key
            .public_subkeys
            .iter()
            .any(|subkey| message.verify(&subkey.key).is_ok());
        if by_subkey {
            SignatureStatus::Verified
        } else {
            SignatureStatus::Unverified
        }
    }
}

//! Credential used to unlock private keys.

use pgp::types::Password;
use std::fmt;
use zeroize::ZeroizeOnDrop;

/// Passphrase for unlocking private keys, cleared from memory on drop.
///
/// The default is the empty passphrase, which unlocks unprotected keys.
#[derive(Clone, Default, ZeroizeOnDrop)]
pub struct Passphrase {
    secret: String,
}

impl Passphrase {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.secret.is_empty()
    }

    /// Converts to the password type rPGP expects.
    pub(crate) fn to_pgp_password(&self) -> Password {
        Password::from(self.secret.as_str())
    }
}

impl fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Passphrase")
            .field("empty", &self.secret.is_empty())
            .finish()
    }
}

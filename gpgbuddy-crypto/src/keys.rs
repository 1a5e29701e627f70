//! Reading keys and matching their identities.

use crate::error::{CryptoError, CryptoResult};
use gpgbuddy_armor::{find_block_of_type, ArmorError, PRIVATE_KEY_BLOCK, PUBLIC_KEY_BLOCK};
use pgp::composed::{Deserializable, SignedPublicKey, SignedPublicSubKey, SignedSecretKey};
use pgp::packet::SubpacketData;
use std::io::Cursor;
use tracing::debug;

/// One user id of a key, with the email address parsed out of it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    /// The user id text, e.g. `Jeff Sisson (GPG Key) <jeff@bigboy.us>`.
    pub user_id: String,
    /// The addr-spec, empty when the user id carries none.
    pub email: String,
}

impl Identity {
    fn from_user_id(user_id: String) -> Self {
        let email = email_of(&user_id).unwrap_or_default().to_string();
        Self { user_id, email }
    }
}

/// Parses the first public key of a binary key ring.
pub fn read_public_key(bytes: &[u8]) -> CryptoResult<SignedPublicKey> {
    let mut keys = SignedPublicKey::from_bytes_many(bytes).map_err(|e| {
        debug!(error = %e, "unparsable public key ring");
        CryptoError::NoPublicKey
    })?;

    match keys.next() {
        Some(Ok(key)) => Ok(key),
        Some(Err(e)) => {
            debug!(error = %e, "unparsable public key");
            Err(CryptoError::NoPublicKey)
        }
        None => Err(CryptoError::NoPublicKey),
    }
}

/// Locates a `PGP PUBLIC KEY BLOCK` in `text` and parses its first key.
pub fn read_public_key_armored(text: &str) -> CryptoResult<SignedPublicKey> {
    let block = find_block_of_type(&mut Cursor::new(text.as_bytes()), PUBLIC_KEY_BLOCK)?;
    read_public_key(&block.body)
}

/// Locates a `PGP PRIVATE KEY BLOCK` in `text` and parses its first key.
///
/// Used to load the stored private key. Text without such a block, or with a
/// block that holds no parsable key, is reported as missing key material.
pub fn read_secret_key_armored(text: &str) -> CryptoResult<SignedSecretKey> {
    let block = match find_block_of_type(&mut Cursor::new(text.as_bytes()), PRIVATE_KEY_BLOCK) {
        Ok(block) => block,
        Err(ArmorError::NoArmoredData) => return Err(CryptoError::MissingPrivateKeyMaterial),
        Err(e) => return Err(e.into()),
    };

    SignedSecretKey::from_bytes(&block.body[..]).map_err(|e| {
        debug!(error = %e, "unparsable private key");
        CryptoError::MissingPrivateKeyMaterial
    })
}

/// Lists the identities of a public key in the order they were bound.
pub fn identities(key: &SignedPublicKey) -> Vec<Identity> {
    key.details
        .users
        .iter()
        .map(|user| Identity::from_user_id(String::from_utf8_lossy(user.id.id()).into_owned()))
        .collect()
}

/// Whether any identity of `key` has exactly the address `email`.
///
/// The comparison is case-sensitive and does no normalization.
pub fn has_identity(key: &SignedPublicKey, email: &str) -> bool {
    identities(key).iter().any(|identity| identity.email == email)
}

/// Fails with [`CryptoError::IdentityMismatch`] unless `key` has an identity
/// for `email`.
pub fn ensure_identity(key: &SignedPublicKey, email: &str) -> CryptoResult<()> {
    if has_identity(key, email) {
        Ok(())
    } else {
        Err(CryptoError::IdentityMismatch {
            email: email.to_string(),
        })
    }
}

/// First subkey whose binding signature allows encryption.
pub(crate) fn encryption_subkey(key: &SignedPublicKey) -> Option<&SignedPublicSubKey> {
    key.public_subkeys.iter().find(|subkey| {
        subkey.signatures.iter().any(|sig| {
            sig.config().is_some_and(|config| {
                config.hashed_subpackets.iter().any(|subpacket| {
                    matches!(
                        &subpacket.data,
                        SubpacketData::KeyFlags(flags)
                            if flags.encrypt_comms() || flags.encrypt_storage()
                    )
                })
            })
        })
    })
}

/// Extracts the addr-spec from a user id or mailbox string.
///
/// `Name <addr>` yields `addr`; a bare address yields itself, with any
/// `(comment)` around it dropped; anything else yields `None`.
pub fn email_of(mailbox: &str) -> Option<&str> {
    let mailbox = mailbox.trim();
    if let Some(open) = mailbox.rfind('<') {
        let rest = &mailbox[open + 1..];
        let close = rest.find('>')?;
        let addr = rest[..close].trim();
        return (!addr.is_empty()).then_some(addr);
    }
    let bare = outside_comments(mailbox)?;
    bare.contains('@').then_some(bare)
}

/// The single run of text left once `(comments)` and whitespace are set
/// aside. `None` for unbalanced parentheses, no text, or several runs.
fn outside_comments(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut span: Option<(usize, usize)> = None;
    let mut in_span = false;

    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.checked_sub(1)?,
            _ if depth == 0 && !c.is_whitespace() => {
                let end = i + c.len_utf8();
                span = match span {
                    None => Some((i, end)),
                    Some((start, _)) if in_span => Some((start, end)),
                    Some(_) => return None,
                };
                in_span = true;
                continue;
            }
            _ => {}
        }
        in_span = false;
    }

    if depth != 0 {
        return None;
    }
    span.map(|(start, end)| &text[start..end])
}

//! Decrypting and encrypting OpenPGP messages with a held key pair.

use crate::context::TrustContext;
use crate::error::{CryptoError, CryptoResult};
use crate::keys::encryption_subkey;
use crate::passphrase::Passphrase;
use pgp::composed::{Message, MessageBuilder, SignedPublicKey, SignedSecretKey};
use pgp::crypto::hash::HashAlgorithm;
use pgp::crypto::sym::SymmetricKeyAlgorithm;
use pgp::packet::{SignatureConfig, SignatureType, Subpacket, SubpacketData};
use pgp::types::KeyDetails;
use rand::thread_rng;
use std::io::{self, Cursor, Read, Write};
use std::time::SystemTime;
use tracing::debug;

/// Whether a decrypted message carried a signature that validates against
/// the counterparty key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignatureStatus {
    Verified,
    /// Unsigned, signed by another key, or the signature did not validate.
    Unverified,
}

impl SignatureStatus {
    pub fn is_verified(self) -> bool {
        matches!(self, Self::Verified)
    }
}

/// Readable plaintext of a decrypted message.
#[derive(Debug)]
pub struct DecryptedBody {
    plaintext: Cursor<Vec<u8>>,
    signature: SignatureStatus,
}

impl DecryptedBody {
    pub fn signature(&self) -> SignatureStatus {
        self.signature
    }

    /// Returns the unread remainder of the plaintext.
    pub fn into_bytes(self) -> Vec<u8> {
        let position = self.plaintext.position() as usize;
        let mut bytes = self.plaintext.into_inner();
        bytes.drain(..position.min(bytes.len()));
        bytes
    }
}

impl Read for DecryptedBody {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.plaintext.read(buf)
    }
}

/// Performs decrypt and encrypt operations for one held private key and one
/// counterparty public key at a time.
///
/// The engine keeps no state between calls. The passphrase is the only
/// credential it ever uses to unlock private keys; there is no interactive
/// prompt.
#[derive(Clone, Debug, Default)]
pub struct CryptoEngine {
    passphrase: Passphrase,
}

impl CryptoEngine {
    /// Creates an engine that unlocks private keys with the empty passphrase.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_passphrase(passphrase: Passphrase) -> Self {
        Self { passphrase }
    }

    /// Decrypts the binary OpenPGP message read from `ciphertext`.
    ///
    /// Key presence is checked first (private, then public), then the private
    /// key is unlocked. Compressed payloads are inflated. A missing or
    /// invalid signature does not fail decryption; it is reported through
    /// [`DecryptedBody::signature`].
    pub fn decrypt<R: Read>(
        &self,
        private_key: Option<&SignedSecretKey>,
        public_key: Option<&SignedPublicKey>,
        mut ciphertext: R,
    ) -> CryptoResult<DecryptedBody> {
        let context = self.context(private_key, public_key)?;

        let mut bytes = Vec::new();
        ciphertext.read_to_end(&mut bytes)?;

        let message = Message::from_bytes(&bytes[..]).map_err(decrypt_failed)?;
        let message = message
            .decrypt(&self.passphrase.to_pgp_password(), context.secret_key())
            .map_err(decrypt_failed)?;
        let mut message = if message.is_compressed() {
            message.decompress().map_err(decrypt_failed)?
        } else {
            message
        };

        // Integrity failures surface while the payload is read.
        let plaintext = message
            .as_data_vec()
            .map_err(|e| CryptoError::DecryptFailed(e.to_string()))?;
        let signature = context.verify(&message);
        debug!(
            bytes = plaintext.len(),
            verified = signature.is_verified(),
            "decrypted message"
        );

        Ok(DecryptedBody {
            plaintext: Cursor::new(plaintext),
            signature,
        })
    }

    /// Encrypts `plaintext` to `public_key`, signed by `private_key`, and
    /// writes it to `writer` as one armored `PGP MESSAGE` block.
    ///
    /// Anything already in `writer` is kept ahead of the block.
    pub fn encrypt<W: Write>(
        &self,
        private_key: Option<&SignedSecretKey>,
        public_key: Option<&SignedPublicKey>,
        mut writer: W,
        plaintext: &[u8],
    ) -> CryptoResult<W> {
        let context = self.context(private_key, public_key)?;
        let mut rng = thread_rng();

        let mut builder = MessageBuilder::from_bytes("", plaintext.to_vec())
            .seipd_v1(&mut rng, SymmetricKeyAlgorithm::AES128);
        let recipient = match encryption_subkey(context.public_key()) {
            Some(subkey) => builder.encrypt_to_key(&mut rng, &subkey.key),
            None => builder.encrypt_to_key(&mut rng, &context.public_key().primary_key),
        };
        recipient.map_err(encrypt_failed)?;
        builder.sign(
            &context.secret_key().primary_key,
            self.passphrase.to_pgp_password(),
            HashAlgorithm::Sha256,
        );

        builder
            .to_armored_writer(&mut rng, Default::default(), &mut writer)
            .map_err(encrypt_failed)?;

        debug!(bytes = plaintext.len(), "encrypted message");
        Ok(writer)
    }

    /// Checks both keys are present and the private key unlocks, then pairs
    /// them for one operation.
    fn context<'k>(
        &self,
        private_key: Option<&'k SignedSecretKey>,
        public_key: Option<&'k SignedPublicKey>,
    ) -> CryptoResult<TrustContext<'k>> {
        let secret_key = private_key.ok_or(CryptoError::MissingPrivateKeyMaterial)?;
        let public_key = public_key.ok_or(CryptoError::MissingPublicKeyMaterial)?;
        self.unlock(secret_key)?;
        Ok(TrustContext::new(secret_key, public_key))
    }

    /// Proves the passphrase unlocks `key` by making a throwaway signature.
    fn unlock(&self, key: &SignedSecretKey) -> CryptoResult<()> {
        let mut config =
            SignatureConfig::from_key(thread_rng(), &key.primary_key, SignatureType::Binary)
                .map_err(cannot_unlock)?;
        config.hashed_subpackets = vec![
            Subpacket::regular(SubpacketData::IssuerFingerprint(key.fingerprint()))
                .map_err(cannot_unlock)?,
            Subpacket::critical(SubpacketData::SignatureCreationTime(SystemTime::now().into()))
                .map_err(cannot_unlock)?,
        ];
        config.unhashed_subpackets =
            vec![Subpacket::regular(SubpacketData::Issuer(key.key_id())).map_err(cannot_unlock)?];

        config
            .sign(&key.primary_key, &self.passphrase.to_pgp_password(), &b""[..])
            .map_err(cannot_unlock)?;
        Ok(())
    }
}

fn cannot_unlock(e: pgp::errors::Error) -> CryptoError {
    CryptoError::CannotUnlock(e.to_string())
}

fn decrypt_failed(e: pgp::errors::Error) -> CryptoError {
    CryptoError::DecryptFailed(e.to_string())
}

fn encrypt_failed(e: pgp::errors::Error) -> CryptoError {
    CryptoError::EncryptFailed(e.to_string())
}

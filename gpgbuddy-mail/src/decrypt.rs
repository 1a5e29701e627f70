//! Decrypting an inbound message end to end.

use crate::config::EngineConfig;
use crate::error::MailResult;
use crate::message::MailMessage;
use crate::resolver::KeyResolver;
use gpgbuddy_armor::{find_block_of_type_bounded, DEFAULT_SCAN_LIMIT, MESSAGE};
use gpgbuddy_crypto::{CryptoEngine, SignatureStatus, SignedPublicKey, SignedSecretKey};
use gpgbuddy_keyserver::{KeyDirectory, KeyserverClient};
use std::io::Read;
use std::sync::Arc;
use tracing::warn;

/// Plaintext of a decrypted message plus the key it was resolved against.
#[derive(Debug)]
pub struct DecryptedEmail {
    pub plaintext: String,
    /// The sender's key, for encrypting a reply.
    pub counterparty_key: SignedPublicKey,
    pub signature: SignatureStatus,
}

/// Resolves the sender's key, finds the encrypted block and decrypts it.
pub struct MailDecryptor {
    resolver: KeyResolver,
    engine: CryptoEngine,
    scan_limit: usize,
}

impl MailDecryptor {
    pub fn new(resolver: KeyResolver, engine: CryptoEngine) -> Self {
        Self {
            resolver,
            engine,
            scan_limit: DEFAULT_SCAN_LIMIT,
        }
    }

    /// Builds the strategy list from `config`, using `directory` for lookups.
    pub fn from_config(
        config: &EngineConfig,
        directory: Arc<dyn KeyDirectory>,
        engine: CryptoEngine,
    ) -> Self {
        Self {
            resolver: KeyResolver::new(config.build_strategies(directory)),
            engine,
            scan_limit: config.max_armor_blocks,
        }
    }

    /// [`MailDecryptor::from_config`] with the configured keyserver as the
    /// key directory.
    pub fn with_keyserver(config: &EngineConfig, engine: CryptoEngine) -> MailResult<Self> {
        let client = KeyserverClient::new(config.keyserver.clone())?;
        Ok(Self::from_config(config, Arc::new(client), engine))
    }

    pub fn with_scan_limit(mut self, scan_limit: usize) -> Self {
        self.scan_limit = scan_limit;
        self
    }

    pub fn resolver(&self) -> &KeyResolver {
        &self.resolver
    }

    pub fn engine(&self) -> &CryptoEngine {
        &self.engine
    }

    /// Decrypts the first `PGP MESSAGE` block of `message` with `private_key`.
    ///
    /// Fails without partial output at the first step that fails: key
    /// resolution, locating the block, then decryption. A message that
    /// decrypts but is not signed by the resolved key still succeeds; see
    /// [`DecryptedEmail::signature`].
    pub fn decrypt_email(
        &self,
        message: &mut MailMessage,
        private_key: Option<&SignedSecretKey>,
    ) -> MailResult<DecryptedEmail> {
        let counterparty_key = self.resolver.resolve(message)?;

        let block = find_block_of_type_bounded(message.body_mut(), MESSAGE, self.scan_limit)?;

        let mut body = self
            .engine
            .decrypt(private_key, Some(&counterparty_key), &block.body[..])?;
        let signature = body.signature();
        if !signature.is_verified() {
            warn!("decrypted mail is not signed by the resolved sender key");
        }

        let mut bytes = Vec::new();
        body.read_to_end(&mut bytes)?;

        Ok(DecryptedEmail {
            plaintext: String::from_utf8_lossy(&bytes).into_owned(),
            counterparty_key,
            signature,
        })
    }
}

//! Ways of discovering the sender's public key from an inbound message.

use crate::error::MailResult;
use crate::message::MailMessage;
use gpgbuddy_armor::{find_block_of_type_bounded, DEFAULT_SCAN_LIMIT, PUBLIC_KEY_BLOCK};
use gpgbuddy_crypto::{ensure_identity, read_public_key, SignedPublicKey};
use gpgbuddy_keyserver::KeyDirectory;
use std::sync::Arc;
use tracing::debug;

/// One way of finding the counterparty's public key.
///
/// A strategy may consume the message body; the resolver rewinds it before
/// every attempt.
pub trait KeyStrategy: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &str;

    fn find_key(&self, message: &mut MailMessage) -> MailResult<SignedPublicKey>;
}

impl<F> KeyStrategy for F
where
    F: Fn(&mut MailMessage) -> MailResult<SignedPublicKey> + Send + Sync,
{
    fn name(&self) -> &str {
        "custom"
    }

    fn find_key(&self, message: &mut MailMessage) -> MailResult<SignedPublicKey> {
        self(message)
    }
}

/// Looks for a public key block pasted into the message body.
#[derive(Clone, Debug)]
pub struct EmbeddedKeyStrategy {
    require_identity: bool,
    scan_limit: usize,
}

impl EmbeddedKeyStrategy {
    /// Accepts the embedded key only if it has an identity for the sender.
    pub fn new() -> Self {
        Self {
            require_identity: true,
            scan_limit: DEFAULT_SCAN_LIMIT,
        }
    }

    /// Accepts the first embedded key whatever identities it carries.
    pub fn permissive() -> Self {
        Self {
            require_identity: false,
            ..Self::new()
        }
    }

    pub fn with_scan_limit(mut self, scan_limit: usize) -> Self {
        self.scan_limit = scan_limit;
        self
    }

    pub fn requires_identity(&self) -> bool {
        self.require_identity
    }
}

impl Default for EmbeddedKeyStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyStrategy for EmbeddedKeyStrategy {
    fn name(&self) -> &str {
        "embedded_key"
    }

    fn find_key(&self, message: &mut MailMessage) -> MailResult<SignedPublicKey> {
        let block =
            find_block_of_type_bounded(message.body_mut(), PUBLIC_KEY_BLOCK, self.scan_limit)?;
        let key = read_public_key(&block.body)?;

        if self.require_identity {
            let sender = message.from_address()?;
            ensure_identity(&key, &sender)?;
        }
        Ok(key)
    }
}

/// Asks a key directory for a key matching the sender's address.
#[derive(Clone)]
pub struct DirectoryStrategy {
    directory: Arc<dyn KeyDirectory>,
}

impl DirectoryStrategy {
    pub fn new(directory: Arc<dyn KeyDirectory>) -> Self {
        Self { directory }
    }
}

impl KeyStrategy for DirectoryStrategy {
    fn name(&self) -> &str {
        "directory"
    }

    fn find_key(&self, message: &mut MailMessage) -> MailResult<SignedPublicKey> {
        let sender = message.from_address()?;
        debug!(%sender, "looking up sender in key directory");

        let key = self.directory.lookup(&sender)?;
        ensure_identity(&key, &sender)?;
        Ok(key)
    }
}

//! Ordered fallback over key strategies.

use crate::error::{MailError, MailResult};
use crate::message::MailMessage;
use crate::strategy::{DirectoryStrategy, EmbeddedKeyStrategy, KeyStrategy};
use gpgbuddy_crypto::SignedPublicKey;
use gpgbuddy_keyserver::KeyDirectory;
use std::io::Cursor;
use std::sync::Arc;
use tracing::{debug, info};

/// Tries each strategy in order until one yields a key.
///
/// The strategy list is fixed at construction.
pub struct KeyResolver {
    strategies: Vec<Box<dyn KeyStrategy>>,
}

impl KeyResolver {
    pub fn new(strategies: Vec<Box<dyn KeyStrategy>>) -> Self {
        Self { strategies }
    }

    /// Embedded key first, then `directory`.
    pub fn with_defaults(directory: Arc<dyn KeyDirectory>) -> Self {
        Self::new(vec![
            Box::new(EmbeddedKeyStrategy::new()),
            Box::new(DirectoryStrategy::new(directory)),
        ])
    }

    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Returns the first key any strategy finds.
    ///
    /// Every strategy sees the full body, and the body is left rewound to its
    /// start when this returns, whether or not a key was found. Strategy
    /// errors are logged and skipped; if none succeeds the result is
    /// [`MailError::NoKeyFound`].
    pub fn resolve(&self, message: &mut MailMessage) -> MailResult<SignedPublicKey> {
        let snapshot: Arc<[u8]> = message.read_body()?.into();

        let mut found = None;
        for strategy in &self.strategies {
            message.set_body(Cursor::new(Arc::clone(&snapshot)));
            match strategy.find_key(message) {
                Ok(key) => {
                    info!(strategy = strategy.name(), "resolved counterparty key");
                    found = Some(key);
                    break;
                }
                Err(e) => debug!(strategy = strategy.name(), error = %e, "key strategy failed"),
            }
        }

        message.set_body(Cursor::new(snapshot));
        found.ok_or(MailError::NoKeyFound)
    }
}

//! Engine configuration.

use crate::strategy::{DirectoryStrategy, EmbeddedKeyStrategy, KeyStrategy};
use gpgbuddy_armor::DEFAULT_SCAN_LIMIT;
use gpgbuddy_keyserver::{KeyDirectory, KeyserverConfig};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Built-in key discovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// A public key block in the message body.
    EmbeddedKey,
    /// A key directory lookup by sender address.
    Directory,
}

/// Configuration for the mail engine. Fields missing from serialized input
/// take their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Strategies to try, in order.
    pub strategies: Vec<StrategyKind>,

    /// Whether an embedded key must carry an identity for the sender.
    pub require_embedded_identity: bool,

    /// Non-matching armored blocks to skip before giving up on a scan.
    pub max_armor_blocks: usize,

    /// `From` of drafted replies.
    pub reply_sender: String,

    pub keyserver: KeyserverConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strategies: vec![StrategyKind::EmbeddedKey, StrategyKind::Directory],
            require_embedded_identity: true,
            max_armor_blocks: DEFAULT_SCAN_LIMIT,
            reply_sender: "GPG Buddy <test@gpgbuddy.appspotmail.com>".to_string(),
            keyserver: KeyserverConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Instantiates the configured strategies in order.
    pub fn build_strategies(&self, directory: Arc<dyn KeyDirectory>) -> Vec<Box<dyn KeyStrategy>> {
        self.strategies
            .iter()
            .map(|kind| -> Box<dyn KeyStrategy> {
                match kind {
                    StrategyKind::EmbeddedKey => {
                        let strategy = if self.require_embedded_identity {
                            EmbeddedKeyStrategy::new()
                        } else {
                            EmbeddedKeyStrategy::permissive()
                        };
                        Box::new(strategy.with_scan_limit(self.max_armor_blocks))
                    }
                    StrategyKind::Directory => {
                        Box::new(DirectoryStrategy::new(Arc::clone(&directory)))
                    }
                }
            })
            .collect()
    }
}

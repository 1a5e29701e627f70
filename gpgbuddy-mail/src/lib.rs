//! Inbound mail processing for GPG Buddy.
//!
//! Given a raw message whose body contains an armored `PGP MESSAGE`, the
//! engine works out the sender's public key, decrypts the message with the
//! held private key and can draft an encrypted reply.
//!
//! # Key discovery
//!
//! The sender's key is found by trying [`KeyStrategy`] implementations in a
//! fixed order until one succeeds:
//!
//! 1. [`EmbeddedKeyStrategy`]: a `PGP PUBLIC KEY BLOCK` pasted into the body
//! 2. [`DirectoryStrategy`]: a key directory lookup by the `From` address
//!
//! Each strategy reads the body from the start; the resolver rewinds it
//! between attempts.

pub mod config;
pub mod decrypt;
mod error;
pub mod message;
pub mod reply;
pub mod resolver;
pub mod strategy;

pub use config::{EngineConfig, StrategyKind};
pub use decrypt::{DecryptedEmail, MailDecryptor};
pub use error::{MailError, MailResult};
pub use message::MailMessage;
pub use reply::{ReplyDraft, Responder};
pub use resolver::KeyResolver;
pub use strategy::{DirectoryStrategy, EmbeddedKeyStrategy, KeyStrategy};

/// Installs a stderr `tracing` subscriber filtered by `RUST_LOG` (default
/// `info`). Does nothing if a subscriber is already installed.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

//! Composing the encrypted reply to a successfully decrypted message.

use crate::config::EngineConfig;
use crate::decrypt::MailDecryptor;
use crate::error::MailResult;
use crate::message::MailMessage;
use gpgbuddy_crypto::SignedSecretKey;
use tracing::info;

pub const REPLY_SUBJECT: &str = "SUCCESS! Now, an encrypted email for you...";

/// Plain text placed before the armored reply.
pub const REPLY_PREAMBLE: &str =
    "I was able to read your encrypted email; what follows is an encrypted message just for you:\n";

/// First line of the encrypted reply; the sender's plaintext is quoted after it.
pub const REPLY_GREETING: &str = "Congratulations on successfully setting up PGP/GPG 🕶\n";

/// An outbound message ready for a mail transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplyDraft {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub body: String,
}

/// Answers each decryptable message with an encrypted confirmation.
pub struct Responder {
    decryptor: MailDecryptor,
    sender: String,
}

impl Responder {
    pub fn new(decryptor: MailDecryptor, sender: impl Into<String>) -> Self {
        Self {
            decryptor,
            sender: sender.into(),
        }
    }

    /// Uses the configured reply sender.
    pub fn from_config(config: &EngineConfig, decryptor: MailDecryptor) -> Self {
        Self::new(decryptor, config.reply_sender.clone())
    }

    pub fn decryptor(&self) -> &MailDecryptor {
        &self.decryptor
    }

    /// Decrypts `raw` and drafts a reply, encrypted to the sender and signed
    /// with `private_key`, that quotes the decrypted text back.
    pub fn respond(
        &self,
        raw: &[u8],
        private_key: Option<&SignedSecretKey>,
    ) -> MailResult<ReplyDraft> {
        let mut message = MailMessage::parse(raw)?;
        let decrypted = self.decryptor.decrypt_email(&mut message, private_key)?;

        let to = message.from_address()?;
        info!(from = %to, "received mail");

        let text = format!("{REPLY_GREETING}> {}", decrypted.plaintext);
        let body = self.decryptor.engine().encrypt(
            private_key,
            Some(&decrypted.counterparty_key),
            REPLY_PREAMBLE.as_bytes().to_vec(),
            text.as_bytes(),
        )?;

        Ok(ReplyDraft {
            to,
            from: self.sender.clone(),
            subject: REPLY_SUBJECT.to_string(),
            body: String::from_utf8_lossy(&body).into_owned(),
        })
    }
}

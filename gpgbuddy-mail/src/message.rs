//! Minimal RFC 5322 message model: ordered headers and a rewindable body.

use crate::error::{MailError, MailResult};
use gpgbuddy_crypto::email_of;
use std::fmt;
use std::io::{BufRead, Cursor, Read};

/// A parsed inbound message.
///
/// The body is a byte stream that strategies consume as they scan it. Code
/// that needs to read it more than once takes a snapshot with
/// [`MailMessage::read_body`] and hands back a fresh reader with
/// [`MailMessage::set_body`].
pub struct MailMessage {
    headers: Vec<(String, String)>,
    body: Box<dyn BufRead + Send>,
}

impl MailMessage {
    /// Splits `raw` into headers and body at the first empty line.
    ///
    /// Folded header lines are joined onto the header they continue. Both LF
    /// and CRLF line endings are accepted.
    pub fn parse(raw: &[u8]) -> MailResult<Self> {
        let mut headers: Vec<(String, String)> = Vec::new();
        let mut rest = raw;

        loop {
            let Some(newline) = rest.iter().position(|&b| b == b'\n') else {
                return Err(MailError::MalformedMessage(
                    "no blank line between headers and body".to_string(),
                ));
            };
            let raw_line = String::from_utf8_lossy(&rest[..newline]);
            let line = raw_line.trim_end_matches('\r');
            rest = &rest[newline + 1..];

            if line.is_empty() {
                break;
            }

            if line.starts_with([' ', '\t']) {
                let Some((_, value)) = headers.last_mut() else {
                    return Err(MailError::MalformedMessage(
                        "continuation line before any header".to_string(),
                    ));
                };
                value.push(' ');
                value.push_str(line.trim());
                continue;
            }

            let Some((name, value)) = line.split_once(':') else {
                return Err(MailError::MalformedMessage(format!(
                    "header line without colon: {line}"
                )));
            };
            let name = name.trim_end();
            if name.is_empty() || name.contains(char::is_whitespace) {
                return Err(MailError::MalformedMessage(format!(
                    "invalid header name: {name:?}"
                )));
            }
            headers.push((name.to_string(), value.trim().to_string()));
        }

        Ok(Self {
            headers,
            body: Box::new(Cursor::new(rest.to_vec())),
        })
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Returns the first header named `name`, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The sender's addr-spec, e.g. `jeff@bigboy.us` for
    /// `From: Jeff <jeff@bigboy.us>`.
    pub fn from_address(&self) -> MailResult<String> {
        let from = self
            .header("From")
            .ok_or_else(|| MailError::MissingHeader("From".to_string()))?;
        email_of(from)
            .map(str::to_string)
            .ok_or_else(|| MailError::MalformedMessage(format!("no address in From: {from}")))
    }

    pub fn body_mut(&mut self) -> &mut (dyn BufRead + Send) {
        self.body.as_mut()
    }

    /// Replaces the body with `reader`.
    pub fn set_body(&mut self, reader: impl BufRead + Send + 'static) {
        self.body = Box::new(reader);
    }

    /// Reads whatever is left of the body.
    pub fn read_body(&mut self) -> MailResult<Vec<u8>> {
        let mut bytes = Vec::new();
        self.body.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

impl fmt::Debug for MailMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailMessage")
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

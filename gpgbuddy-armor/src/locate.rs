//! Forward-only scanning for armored blocks.
//!
//! Every call consumes the reader up to and including the block it returns.
//! A block that is skipped is gone: asking for two different block types on
//! the same reader only works if they appear in the order asked, so callers
//! that need several passes must keep the original bytes and hand each pass
//! a fresh reader.

use crate::error::{ArmorError, ArmorResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::io::BufRead;
use tracing::debug;

/// Armor type of an OpenPGP public key (or key ring).
pub const PUBLIC_KEY_BLOCK: &str = "PGP PUBLIC KEY BLOCK";

/// Armor type of a private key (or key ring).
pub const PRIVATE_KEY_BLOCK: &str = "PGP PRIVATE KEY BLOCK";

/// Armor type of an encrypted and/or signed message.
pub const MESSAGE: &str = "PGP MESSAGE";

/// Non-matching blocks [`find_block_of_type`] may skip.
pub const DEFAULT_SCAN_LIMIT: usize = 64;

const BEGIN_PREFIX: &str = "-----BEGIN ";
const END_PREFIX: &str = "-----END ";
const DASHES: &str = "-----";

/// One decoded armor section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArmoredBlock {
    /// The label between `BEGIN` and the closing dashes, e.g. `PGP MESSAGE`.
    pub block_type: String,
    /// Armor headers (`Version`, `Comment`, ...) in order of appearance.
    pub headers: Vec<(String, String)>,
    /// The base64-decoded payload.
    pub body: Vec<u8>,
}

impl ArmoredBlock {
    /// Returns the first header value with the given key, ignoring case.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// Decodes the next armored block from `reader`, whatever its type.
///
/// Fails with [`ArmorError::NoArmoredData`] when the stream ends before a
/// `-----BEGIN ...-----` line, and with [`ArmorError::MalformedArmor`] when a
/// block starts but cannot be decoded.
pub fn find_block<R: BufRead + ?Sized>(reader: &mut R) -> ArmorResult<ArmoredBlock> {
    let block_type = loop {
        let Some(line) = next_line(reader)? else {
            return Err(ArmorError::NoArmoredData);
        };
        if let Some(block_type) = delimiter(&line, BEGIN_PREFIX) {
            break block_type.to_string();
        }
    };

    decode_section(reader, block_type)
}

/// Decodes blocks until one of type `wanted` turns up, discarding the rest.
///
/// Skips at most [`DEFAULT_SCAN_LIMIT`] non-matching blocks.
pub fn find_block_of_type<R: BufRead + ?Sized>(
    reader: &mut R,
    wanted: &str,
) -> ArmorResult<ArmoredBlock> {
    find_block_of_type_bounded(reader, wanted, DEFAULT_SCAN_LIMIT)
}

/// [`find_block_of_type`] with an explicit bound on skipped blocks.
///
/// Up to `limit` non-matching blocks are skipped. The scan fails with
/// [`ArmorError::ScanLimitExceeded`] only when another non-matching block
/// follows them; a stream that simply ends is [`ArmorError::NoArmoredData`].
pub fn find_block_of_type_bounded<R: BufRead + ?Sized>(
    reader: &mut R,
    wanted: &str,
    limit: usize,
) -> ArmorResult<ArmoredBlock> {
    let mut skipped = 0;
    loop {
        let block = find_block(reader)?;
        if block.block_type == wanted {
            return Ok(block);
        }
        if skipped == limit {
            return Err(ArmorError::ScanLimitExceeded(limit));
        }

        skipped += 1;
        debug!(found = %block.block_type, wanted, skipped, "skipping armored block");
    }
}

/// Reads the headers, payload and footer of a block whose BEGIN line has
/// already been consumed.
fn decode_section<R: BufRead + ?Sized>(
    reader: &mut R,
    block_type: String,
) -> ArmorResult<ArmoredBlock> {
    let mut headers = Vec::new();
    let mut encoded = String::new();
    let mut checksum: Option<String> = None;
    let mut in_headers = true;

    loop {
        let Some(line) = next_line(reader)? else {
            return Err(malformed(format!(
                "stream ended inside {block_type} block"
            )));
        };
        let line = line.trim();

        if let Some(end_type) = delimiter(line, END_PREFIX) {
            if end_type != block_type {
                return Err(malformed(format!(
                    "{block_type} block closed by END {end_type}"
                )));
            }
            break;
        }

        if in_headers {
            if line.is_empty() {
                in_headers = false;
                continue;
            }
            if let Some((key, value)) = header(line) {
                headers.push((key.to_string(), value.to_string()));
                continue;
            }
            // No blank separator: the payload starts right away.
            in_headers = false;
        }

        if line.is_empty() {
            continue;
        }
        if checksum.is_some() {
            return Err(malformed(format!(
                "data after checksum in {block_type} block"
            )));
        }
        if let Some(crc) = line.strip_prefix('=') {
            checksum = Some(crc.to_string());
            continue;
        }
        encoded.push_str(line);
    }

    let body = STANDARD
        .decode(encoded.as_bytes())
        .map_err(|e| malformed(format!("invalid base64 in {block_type} block: {e}")))?;

    if let Some(crc) = checksum {
        verify_checksum(&body, &crc, &block_type)?;
    }

    Ok(ArmoredBlock {
        block_type,
        headers,
        body,
    })
}

fn verify_checksum(body: &[u8], footer: &str, block_type: &str) -> ArmorResult<()> {
    let expected = STANDARD
        .decode(footer.as_bytes())
        .ok()
        .filter(|bytes| bytes.len() == 3)
        .ok_or_else(|| malformed(format!("invalid checksum line in {block_type} block")))?;

    let crc = crc24::hash_raw(body).to_be_bytes();
    if crc[1..] != expected[..] {
        return Err(malformed(format!("checksum mismatch in {block_type} block")));
    }
    Ok(())
}

/// Returns the type label of a `-----BEGIN X-----` / `-----END X-----` line.
fn delimiter<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    line.trim()
        .strip_prefix(prefix)?
        .strip_suffix(DASHES)
        .filter(|label| !label.is_empty())
}

/// Parses an armor header line (`Key: value`).
fn header(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(':')?;
    if key.is_empty()
        || !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return None;
    }
    Some((key, value.trim()))
}

/// Reads one line, tolerating non-UTF-8 noise around the armor.
fn next_line<R: BufRead + ?Sized>(reader: &mut R) -> ArmorResult<Option<String>> {
    let mut buf = Vec::new();
    if reader.read_until(b'\n', &mut buf)? == 0 {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&buf).trim_end().to_string()))
}

fn malformed(reason: String) -> ArmorError {
    ArmorError::MalformedArmor(reason)
}

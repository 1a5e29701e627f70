//! Armored input for the locator tests.
#![allow(dead_code)]

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// Armors `payload` as one `block_type` block: 64-column body plus checksum.
pub fn armored(block_type: &str, payload: &[u8]) -> String {
    let mut out = format!("-----BEGIN {block_type}-----\n\n");
    let encoded = STANDARD.encode(payload);
    for line in encoded.as_bytes().chunks(64) {
        out.push_str(std::str::from_utf8(line).unwrap());
        out.push('\n');
    }
    let crc = crc24::hash_raw(payload).to_be_bytes();
    out.push_str(&format!("={}\n", STANDARD.encode(&crc[1..])));
    out.push_str(&format!("-----END {block_type}-----\n"));
    out
}

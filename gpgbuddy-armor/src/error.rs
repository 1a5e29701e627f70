//! Armor error types.

use thiserror::Error;

/// Result type for armor operations.
pub type ArmorResult<T> = Result<T, ArmorError>;

/// Errors that can occur while scanning or decoding armored data.
#[derive(Debug, Error)]
pub enum ArmorError {
    /// The stream ended before any armored block started.
    #[error("no armored data found")]
    NoArmoredData,

    /// A block started but could not be decoded.
    #[error("malformed armor: {0}")]
    MalformedArmor(String),

    /// More non-matching blocks followed than the scan may skip.
    #[error("gave up after skipping {0} armored blocks")]
    ScanLimitExceeded(usize),

    /// Reading the underlying stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

//! ASCII-armor handling for GPG Buddy.
//!
//! Inbound mail carries OpenPGP data as armored sections embedded in
//! free-form text:
//!
//! ```text
//! Hi, here's my key and a message.
//!
//! -----BEGIN PGP MESSAGE-----
//!
//! hF4D68xna/vVwy0SAQdApjKn...
//! =/64i
//! -----END PGP MESSAGE-----
//! ```
//!
//! [`find_block`] decodes the next armored section from a buffered reader,
//! [`find_block_of_type`] the next section of a requested type. Outbound
//! armor is written by rPGP in the crypto crate.

mod error;
pub mod locate;

pub use error::{ArmorError, ArmorResult};
pub use locate::{
    find_block, find_block_of_type, find_block_of_type_bounded, ArmoredBlock, DEFAULT_SCAN_LIMIT,
    MESSAGE, PRIVATE_KEY_BLOCK, PUBLIC_KEY_BLOCK,
};

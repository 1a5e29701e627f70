//! Shared fixtures for the mail engine tests.
#![allow(dead_code)]

use gpgbuddy_crypto::{
    read_public_key_armored, read_secret_key_armored, SignedPublicKey, SignedSecretKey,
};
use gpgbuddy_keyserver::{KeyDirectory, KeyserverError, KeyserverResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const ALICE_PUB: &str = include_str!("../fixtures/alice.pub.asc");
pub const ALICE_SEC: &str = include_str!("../fixtures/alice.sec.asc");
pub const BOB_PUB: &str = include_str!("../fixtures/bob.pub.asc");
pub const BOB_SEC: &str = include_str!("../fixtures/bob.sec.asc");
pub const LARRY_SEC: &str = include_str!("../fixtures/larry.sec.asc");
pub const JEFF_PUB: &str = include_str!("../fixtures/jeff.pub.asc");

/// Signed by bob, encrypted to alice: "Testing, testing, 123".
pub const BOB_TO_ALICE: &str = include_str!("../fixtures/bob_to_alice.asc");
/// Unsigned, encrypted to alice: "nobody signed this".
pub const UNSIGNED_TO_ALICE: &str = include_str!("../fixtures/unsigned_to_alice.asc");

pub const BOB: &str = "bob@example.com";
pub const JEFF: &str = "jeff@bigboy.us";

/// A message from `from` with `body`, in the shape mail transports hand over.
pub fn email(from: &str, body: &str) -> Vec<u8> {
    format!(
        "Date: Mon, 23 Jun 2015 11:40:36 -0400\n\
         From: Gopher <{from}>\n\
         To: Another Gopher <to@example.com>\n\
         Subject: Gophers at Gophercon\n\
         \n\
         {body}\n"
    )
    .into_bytes()
}

/// Joins body parts with the kind of prose people put around pasted blocks.
pub fn body(parts: &[&str]) -> String {
    parts.join("\n\nAnd here's the next bit:\n\n")
}

pub fn alice_secret() -> SignedSecretKey {
    read_secret_key_armored(ALICE_SEC).unwrap()
}

pub fn alice_public() -> SignedPublicKey {
    read_public_key_armored(ALICE_PUB).unwrap()
}

pub fn bob_secret() -> SignedSecretKey {
    read_secret_key_armored(BOB_SEC).unwrap()
}

pub fn bob_public() -> SignedPublicKey {
    read_public_key_armored(BOB_PUB).unwrap()
}

pub fn larry_secret() -> SignedSecretKey {
    read_secret_key_armored(LARRY_SEC).unwrap()
}

pub fn jeff_public() -> SignedPublicKey {
    read_public_key_armored(JEFF_PUB).unwrap()
}

/// In-memory key directory that counts lookups.
#[derive(Default)]
pub struct StaticDirectory {
    keys: HashMap<String, SignedPublicKey>,
    lookups: AtomicUsize,
}

impl StaticDirectory {
    pub fn with(mut self, email: &str, key: SignedPublicKey) -> Self {
        self.keys.insert(email.to_string(), key);
        self
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl KeyDirectory for StaticDirectory {
    fn lookup(&self, email: &str) -> KeyserverResult<SignedPublicKey> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.keys
            .get(email)
            .cloned()
            .ok_or_else(|| KeyserverError::NotFound(email.to_string()))
    }
}

pub fn empty_directory() -> Arc<StaticDirectory> {
    Arc::new(StaticDirectory::default())
}

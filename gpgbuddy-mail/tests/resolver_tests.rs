mod support;

use gpgbuddy_armor::ArmorError;
use gpgbuddy_crypto::{has_identity, CryptoError, SignedPublicKey};
use gpgbuddy_keyserver::{KeyDirectory, KeyserverError};
use gpgbuddy_mail::{
    DirectoryStrategy, EmbeddedKeyStrategy, KeyResolver, KeyStrategy, MailError, MailMessage,
    MailResult,
};
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use support::*;

fn parse(raw: &[u8]) -> MailMessage {
    MailMessage::parse(raw).unwrap()
}

fn failing(message: &mut MailMessage) -> MailResult<SignedPublicKey> {
    // Drain the body to prove the next strategy still sees all of it.
    let mut sink = Vec::new();
    message.body_mut().read_to_end(&mut sink)?;
    Err(MailError::NoKeyFound)
}

// --- embedded key strategy ---

#[test]
fn embedded_key_with_sender_identity_is_found() {
    let mut message = parse(&email(JEFF, JEFF_PUB));
    let key = EmbeddedKeyStrategy::new().find_key(&mut message).unwrap();
    assert!(has_identity(&key, JEFF));
}

#[test]
fn body_without_key_finds_nothing() {
    let mut message = parse(&email(JEFF, ""));
    let err = EmbeddedKeyStrategy::new().find_key(&mut message).unwrap_err();
    assert!(matches!(err, MailError::Armor(ArmorError::NoArmoredData)));
}

#[test]
fn embedded_key_for_someone_else_is_rejected() {
    let mut message = parse(&email("jeff1@bigboy.us", JEFF_PUB));
    match EmbeddedKeyStrategy::new().find_key(&mut message).unwrap_err() {
        MailError::Crypto(CryptoError::IdentityMismatch { email }) => {
            assert_eq!(email, "jeff1@bigboy.us")
        }
        other => panic!("expected IdentityMismatch, got: {other:?}"),
    }
}

#[test]
fn permissive_embedded_strategy_returns_any_key() {
    let mut message = parse(&email("jeff1@bigboy.us", JEFF_PUB));
    let strategy = EmbeddedKeyStrategy::permissive();
    assert!(!strategy.requires_identity());

    let key = strategy.find_key(&mut message).unwrap();
    assert!(has_identity(&key, JEFF));
    assert!(!has_identity(&key, "jeff1@bigboy.us"));
}

#[test]
fn embedded_key_after_other_blocks_is_found() {
    let mut message = parse(&email(BOB, &body(&[BOB_TO_ALICE, BOB_PUB])));
    let key = EmbeddedKeyStrategy::new().find_key(&mut message).unwrap();
    assert!(has_identity(&key, BOB));
}

#[test]
fn embedded_scan_limit_is_honored() {
    let raw = email(BOB, &body(&[BOB_TO_ALICE, UNSIGNED_TO_ALICE, BOB_PUB]));

    let err = EmbeddedKeyStrategy::new()
        .with_scan_limit(1)
        .find_key(&mut parse(&raw))
        .unwrap_err();
    assert!(matches!(err, MailError::Armor(ArmorError::ScanLimitExceeded(1))));

    let key = EmbeddedKeyStrategy::new()
        .with_scan_limit(2)
        .find_key(&mut parse(&raw))
        .unwrap();
    assert!(has_identity(&key, BOB));
}

// --- directory strategy ---

#[test]
fn directory_is_asked_for_the_sender_address() {
    let directory = Arc::new(StaticDirectory::default().with(JEFF, jeff_public()));
    let strategy = DirectoryStrategy::new(directory.clone());

    let mut message = parse(&email(JEFF, "no key here"));
    let key = strategy.find_key(&mut message).unwrap();
    assert!(has_identity(&key, JEFF));
    assert_eq!(directory.lookups(), 1);
}

#[test]
fn directory_miss_is_a_keyserver_error() {
    let strategy = DirectoryStrategy::new(empty_directory());
    let mut message = parse(&email(JEFF, ""));
    assert!(matches!(
        strategy.find_key(&mut message).unwrap_err(),
        MailError::Keyserver(KeyserverError::NotFound(_))
    ));
}

#[test]
fn directory_key_must_match_sender() {
    // A directory that answers with the wrong key.
    let directory = Arc::new(StaticDirectory::default().with(BOB, jeff_public()));
    let strategy = DirectoryStrategy::new(directory);

    let mut message = parse(&email(BOB, ""));
    assert!(matches!(
        strategy.find_key(&mut message).unwrap_err(),
        MailError::Crypto(CryptoError::IdentityMismatch { .. })
    ));
}

// --- resolver ---

#[test]
fn falls_through_to_the_next_strategy() {
    let resolver = KeyResolver::new(vec![
        Box::new(failing),
        Box::new(EmbeddedKeyStrategy::new()),
    ]);
    let raw = email(JEFF, JEFF_PUB);
    let mut message = parse(&raw);

    let key = resolver.resolve(&mut message).unwrap();
    assert!(has_identity(&key, JEFF));
}

#[test]
fn body_is_intact_after_resolving() {
    let resolver = KeyResolver::new(vec![
        Box::new(failing),
        Box::new(EmbeddedKeyStrategy::new()),
    ]);
    let mut message = parse(&email(JEFF, JEFF_PUB));
    let original = parse(&email(JEFF, JEFF_PUB)).read_body().unwrap();

    resolver.resolve(&mut message).unwrap();
    assert_eq!(message.read_body().unwrap(), original);
}

#[test]
fn body_is_intact_after_total_failure() {
    let resolver = KeyResolver::new(vec![Box::new(failing), Box::new(failing)]);
    let mut message = parse(&email(JEFF, "nothing useful"));

    let err = resolver.resolve(&mut message).unwrap_err();
    assert!(matches!(err, MailError::NoKeyFound));
    assert_eq!(message.read_body().unwrap(), b"nothing useful\n");
}

#[test]
fn first_success_stops_the_chain() {
    let later_calls = Arc::new(AtomicUsize::new(0));
    let counter = later_calls.clone();
    let resolver = KeyResolver::new(vec![
        Box::new(EmbeddedKeyStrategy::new()),
        Box::new(move |_: &mut MailMessage| -> MailResult<SignedPublicKey> {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(MailError::NoKeyFound)
        }),
    ]);

    resolver.resolve(&mut parse(&email(JEFF, JEFF_PUB))).unwrap();
    assert_eq!(later_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn empty_strategy_list_finds_nothing() {
    let resolver = KeyResolver::new(Vec::new());
    let mut message = parse(&email(JEFF, JEFF_PUB));
    assert!(matches!(
        resolver.resolve(&mut message).unwrap_err(),
        MailError::NoKeyFound
    ));
    assert!(!message.read_body().unwrap().is_empty());
}

#[test]
fn defaults_try_embedded_then_directory() {
    let directory = Arc::new(StaticDirectory::default().with(JEFF, jeff_public()));
    let resolver = KeyResolver::with_defaults(directory.clone());
    assert_eq!(resolver.strategy_names(), vec!["embedded_key", "directory"]);

    // Embedded key present: the directory is never consulted.
    resolver.resolve(&mut parse(&email(JEFF, JEFF_PUB))).unwrap();
    assert_eq!(directory.lookups(), 0);

    // No embedded key: the directory answers.
    let key = resolver.resolve(&mut parse(&email(JEFF, "hi"))).unwrap();
    assert!(has_identity(&key, JEFF));
    assert_eq!(directory.lookups(), 1);
}

#[test]
fn mismatched_embedded_key_falls_through_to_directory() {
    let directory = Arc::new(StaticDirectory::default().with(BOB, bob_public()));
    let resolver = KeyResolver::with_defaults(directory.clone());

    // Bob pasted jeff's key; the directory has bob's real one.
    let key = resolver.resolve(&mut parse(&email(BOB, JEFF_PUB))).unwrap();
    assert!(has_identity(&key, BOB));
    assert_eq!(directory.lookups(), 1);
}

#[test]
fn all_strategies_failing_is_no_key_found() {
    let resolver = KeyResolver::with_defaults(empty_directory());
    let err = resolver
        .resolve(&mut parse(&email("jeff1@bigboy.us", JEFF_PUB)))
        .unwrap_err();
    assert!(matches!(err, MailError::NoKeyFound));
}

#[test]
fn closures_report_a_generic_name() {
    let resolver = KeyResolver::new(vec![Box::new(failing)]);
    assert_eq!(resolver.strategy_names(), vec!["custom"]);
}

#[test]
fn directory_trait_object_is_shareable() {
    let directory: Arc<dyn KeyDirectory> = empty_directory();
    let a = DirectoryStrategy::new(directory.clone());
    let b = DirectoryStrategy::new(directory);
    assert_eq!(a.name(), b.name());
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn body_is_unchanged_by_resolution(
            before in proptest::collection::vec(any::<u8>(), 0..256),
            after in proptest::collection::vec(any::<u8>(), 0..256),
            paste_key in any::<bool>(),
        ) {
            let mut body = before;
            if paste_key {
                body.extend_from_slice(b"\n");
                body.extend_from_slice(BOB_PUB.as_bytes());
            }
            body.extend_from_slice(&after);

            let mut raw = format!("From: Gopher <{BOB}>\n\n").into_bytes();
            raw.extend_from_slice(&body);
            let mut message = parse(&raw);

            let _ = KeyResolver::with_defaults(empty_directory()).resolve(&mut message);
            prop_assert_eq!(message.read_body().unwrap(), body);
        }
    }
}

//! Tests for the plugin lifecycle

use super::*;
use crate::config::BridgeConfig;
use crate::error::PlatformError;
use crate::platform::{MemoryStore, MockPlatformStore, PlatformStore};
use crate::registry::MemoryRegistry;
use crate::secure_string::SecureString;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn alice() -> AccountIdentity {
    AccountIdentity::new("aim", "alice@example.com")
}

fn bob() -> AccountIdentity {
    AccountIdentity::new("prpl-jabber", "bob@jabber.org")
}

fn memory_lifecycle(
    config: BridgeConfig,
    registry: MemoryRegistry,
) -> (Arc<MemoryStore>, Lifecycle<MemoryRegistry>) {
    let store = Arc::new(MemoryStore::new());
    let bridge = CredentialBridge::new(store.clone(), config);
    (store, Lifecycle::new(bridge, registry))
}

#[test]
fn test_load_migrates_remembered_plaintext() {
    let registry = MemoryRegistry::new().with_account(alice(), Some("p@ss/word"), true);
    let (_, mut lifecycle) = memory_lifecycle(BridgeConfig::default(), registry);

    let report = lifecycle.load();

    assert_eq!(report.migrated, vec![alice()]);
    assert!(report.rehydrated.is_empty());
    assert!(report.is_clean());
    assert!(!lifecycle.registry().remember_secret(&alice()));
    assert_eq!(
        lifecycle.bridge().retrieve(&alice()).unwrap().unwrap().expose(),
        "p@ss/word"
    );
}

#[test]
fn test_load_rehydrates_stored_secret() {
    let registry = MemoryRegistry::new().with_account(bob(), None, true);
    let (_, mut lifecycle) = memory_lifecycle(BridgeConfig::default(), registry);
    lifecycle
        .bridge()
        .store(&bob(), Some(&SecureString::new("hunter2")))
        .unwrap();

    let report = lifecycle.load();

    assert_eq!(report.rehydrated, vec![bob()]);
    assert!(report.migrated.is_empty());
    assert!(!lifecycle.registry().remember_secret(&bob()));
    assert_eq!(lifecycle.registry().secret(&bob()).unwrap().expose(), "hunter2");
}

#[test]
fn test_load_reports_missing() {
    let registry = MemoryRegistry::new()
        .with_account(alice(), None, false)
        .with_account(bob(), Some("unsaved"), false);
    let (store, mut lifecycle) = memory_lifecycle(BridgeConfig::default(), registry);

    let report = lifecycle.load();

    assert_eq!(report.missing.len(), 2);
    assert!(store.is_empty());
}

#[test]
fn test_load_rehydrates_repaired_secret() {
    let registry = MemoryRegistry::new().with_account(alice(), None, false);
    let (store, mut lifecycle) = memory_lifecycle(BridgeConfig::default(), registry);
    let payload: Vec<u8> = "p@ss/wordlibpurple/aim/alice@example.com"
        .encode_utf16()
        .flat_map(u16::to_le_bytes)
        .collect();
    store.insert_raw(&alice().store_key(), payload).unwrap();

    let report = lifecycle.load();

    assert_eq!(report.rehydrated, vec![alice()]);
    assert_eq!(lifecycle.registry().secret(&alice()).unwrap().expose(), "p@ss/word");
}

#[test]
fn test_load_read_failure_leaves_plaintext() {
    let mut mock = MockPlatformStore::new();
    mock.expect_read()
        .returning(|_| Err(PlatformError::Unavailable("store locked".to_string())));
    mock.expect_write().never();
    let bridge = CredentialBridge::new(Arc::new(mock), BridgeConfig::default());
    let registry = MemoryRegistry::new().with_account(alice(), Some("pw"), true);
    let mut lifecycle = Lifecycle::new(bridge, registry);

    let report = lifecycle.load();

    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].account, alice());
    assert!(report.failed[0].error.contains("store locked"));
    assert!(lifecycle.registry().remember_secret(&alice()));
    assert_eq!(lifecycle.registry().secret(&alice()).unwrap().expose(), "pw");
}

#[test]
fn test_load_write_failure_keeps_remember_flag() {
    let mut mock = MockPlatformStore::new();
    mock.expect_read().returning(|_| Ok(None));
    mock.expect_write()
        .times(1)
        .returning(|_| Err(PlatformError::Backend("denied".to_string())));
    let bridge = CredentialBridge::new(
        Arc::new(mock),
        BridgeConfig::default().with_clear_secret_after_store(true),
    );
    let registry = MemoryRegistry::new().with_account(alice(), Some("pw"), true);
    let mut lifecycle = Lifecycle::new(bridge, registry);

    let report = lifecycle.load();

    assert!(!report.is_clean());
    assert!(lifecycle.registry().remember_secret(&alice()));
    assert_eq!(lifecycle.registry().secret(&alice()).unwrap().expose(), "pw");
}

#[test]
fn test_load_migration_with_memory_clearing() {
    let config = BridgeConfig::default().with_clear_secret_after_store(true);
    let registry = MemoryRegistry::new().with_account(alice(), Some("pw"), true);
    let (store, mut lifecycle) = memory_lifecycle(config, registry);

    let report = lifecycle.load();

    assert_eq!(report.migrated, vec![alice()]);
    assert!(lifecycle.registry().secret(&alice()).is_none());
    assert!(store.read(&alice().store_key()).unwrap().is_some());
}

#[test]
fn test_load_migration_republishes_kept_secret() {
    let changes = Arc::new(AtomicUsize::new(0));
    let mut registry = MemoryRegistry::new().with_account(alice(), Some("pw"), true);
    let counter = Arc::clone(&changes);
    registry.observe(Box::new(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    }));
    let (_, mut lifecycle) = memory_lifecycle(BridgeConfig::default(), registry);

    let report = lifecycle.load();

    assert_eq!(report.migrated, vec![alice()]);
    assert_eq!(changes.load(Ordering::SeqCst), 2);
    assert_eq!(lifecycle.registry().secret(&alice()).unwrap().expose(), "pw");
    assert!(!lifecycle.registry().remember_secret(&alice()));
}

#[test]
fn test_publish_notifies_observers_for_unchanged_value() {
    let changes = Arc::new(AtomicUsize::new(0));
    let mut registry = MemoryRegistry::new().with_account(alice(), Some("same"), false);
    let counter = Arc::clone(&changes);
    registry.observe(Box::new(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    }));

    let (_, mut lifecycle) = memory_lifecycle(BridgeConfig::default(), registry);
    lifecycle
        .bridge()
        .store(&alice(), Some(&SecureString::new("same")))
        .unwrap();

    let outcome = lifecycle
        .handle(&AccountEvent::Connecting(alice()))
        .unwrap();
    assert_eq!(outcome, EventOutcome::AlreadyPresent);
    assert_eq!(changes.load(Ordering::SeqCst), 0);

    lifecycle.load();
    assert_eq!(changes.load(Ordering::SeqCst), 2);
    assert_eq!(lifecycle.registry().secret(&alice()).unwrap().expose(), "same");
}

#[test]
fn test_connecting_rehydrates_missing_secret() {
    let registry = MemoryRegistry::new().with_account(alice(), None, false);
    let (_, mut lifecycle) = memory_lifecycle(BridgeConfig::default(), registry);

    assert_eq!(
        lifecycle.on_connecting(&alice()).unwrap(),
        EventOutcome::NotFound
    );

    lifecycle
        .bridge()
        .store(&alice(), Some(&SecureString::new("pw")))
        .unwrap();
    assert_eq!(
        lifecycle.on_connecting(&alice()).unwrap(),
        EventOutcome::Rehydrated
    );
    assert_eq!(lifecycle.registry().secret(&alice()).unwrap().expose(), "pw");
}

#[test]
fn test_connecting_read_failure_is_error() {
    let mut mock = MockPlatformStore::new();
    mock.expect_read()
        .returning(|_| Err(PlatformError::Backend("boom".to_string())));
    let bridge = CredentialBridge::new(Arc::new(mock), BridgeConfig::default());
    let registry = MemoryRegistry::new().with_account(alice(), None, false);
    let mut lifecycle = Lifecycle::new(bridge, registry);

    let err = lifecycle.on_connecting(&alice()).unwrap_err();
    assert!(matches!(err, LifecycleError::Retrieve(_)));
    assert!(lifecycle.registry().secret(&alice()).is_none());
}

#[test]
fn test_signed_on_stores_and_clears() {
    let config = BridgeConfig::default().with_clear_secret_after_store(true);
    let registry = MemoryRegistry::new().with_account(bob(), Some("fresh"), false);
    let (_, mut lifecycle) = memory_lifecycle(config, registry);

    let outcome = lifecycle.handle(&AccountEvent::SignedOn(bob())).unwrap();

    assert_eq!(outcome, EventOutcome::Stored(StoreOutcome::Stored));
    assert!(lifecycle.registry().secret(&bob()).is_none());
    assert_eq!(
        lifecycle.bridge().retrieve(&bob()).unwrap().unwrap().expose(),
        "fresh"
    );
}

#[test]
fn test_signed_on_without_secret_skips() {
    let registry = MemoryRegistry::new().with_account(bob(), None, false);
    let (store, mut lifecycle) = memory_lifecycle(BridgeConfig::default(), registry);

    let outcome = lifecycle.on_signed_on(&bob()).unwrap();

    assert_eq!(outcome, EventOutcome::Stored(StoreOutcome::Skipped));
    assert!(store.is_empty());
}

#[test]
fn test_event_signals() {
    assert_eq!(AccountEvent::SignedOn(alice()).signal(), "account-signed-on");
    assert_eq!(AccountEvent::Connecting(alice()).signal(), "account-connecting");
    assert_eq!(AccountEvent::Connecting(bob()).account(), &bob());
}

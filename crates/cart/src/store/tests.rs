use std::cell::RefCell;
use std::rc::Rc;

use rust_decimal::Decimal;
use shopfront_core::{CurrencyCode, LineKey, NewLineItem, ProductId};

use super::*;
use crate::error::StorageError;
use crate::storage::MemoryStorage;

const T0: i64 = 1_700_000_000_000;

fn new_store() -> (CartStore<MemoryStorage, ManualClock>, MemoryStorage, ManualClock) {
    let storage = MemoryStorage::new();
    let clock = ManualClock::new(T0);
    let store = CartStore::with_clock(storage.clone(), DEFAULT_STORAGE_KEY, clock.clone());
    (store, storage, clock)
}

fn reopen(storage: &MemoryStorage) -> CartStore<MemoryStorage, ManualClock> {
    CartStore::with_clock(storage.clone(), DEFAULT_STORAGE_KEY, ManualClock::new(T0))
}

fn tee(size: &str) -> NewLineItem {
    NewLineItem::new(1, "Tee", Decimal::from(10))
        .with_size(size)
        .with_sku("TEE-001")
}

/// Storage whose every call fails.
struct BrokenStorage;

impl CartStorage for BrokenStorage {
    fn load(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Poisoned)
    }

    fn save(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Poisoned)
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Poisoned)
    }
}

// =============================================================================
// add_item
// =============================================================================

#[test]
fn test_add_merges_same_identity() {
    let (mut store, _, _) = new_store();

    store.add_item(tee("M"));
    store.add_item(tee("M").with_quantity(2));

    assert_eq!(store.len(), 1);
    let line = store.items().next().unwrap();
    assert_eq!(line.id, ProductId::Int(1));
    assert_eq!(line.size.as_deref(), Some("M"));
    assert_eq!(line.quantity, 3);
}

#[test]
fn test_add_distinct_sizes_are_distinct_lines() {
    let (mut store, _, _) = new_store();

    store.add_item(tee("M"));
    store.add_item(tee("L"));

    assert_eq!(store.len(), 2);
    assert_eq!(store.item_quantity(&LineKey::new(1, Some("M"), None)), 1);
    assert_eq!(store.item_quantity(&LineKey::new(1, Some("L"), None)), 1);
}

#[test]
fn test_absent_variant_differs_from_empty_string() {
    let (mut store, _, _) = new_store();

    store.add_item(NewLineItem::new(1, "Tee", Decimal::from(10)));
    store.add_item(tee(""));

    assert_eq!(store.len(), 2);
    assert!(store.is_in_cart(&LineKey::new(1, None, None)));
    assert!(store.is_in_cart(&LineKey::new(1, Some(""), None)));
}

#[test]
fn test_merge_only_moves_quantity_and_timestamp() {
    let (mut store, _, clock) = new_store();

    store.add_item(tee("M"));
    clock.advance(5_000);
    store.add_item(
        NewLineItem::new(1, "Renamed", Decimal::from(99))
            .with_size("M")
            .with_sku("OTHER")
            .with_image("https://cdn.example/tee.png"),
    );

    let line = store.items().next().unwrap();
    assert_eq!(line.name, "Tee");
    assert_eq!(line.price, Decimal::from(10));
    assert_eq!(line.sku, "TEE-001");
    assert_eq!(line.image, None);
    assert_eq!(line.quantity, 2);
    assert_eq!(line.added_at, T0 + 5_000);
}

#[test]
fn test_zero_quantity_input_adds_one() {
    let (mut store, _, _) = new_store();

    store.add_item(tee("M").with_quantity(0));

    assert_eq!(store.total_items(), 1);
}

#[test]
fn test_merge_keeps_display_order() {
    let (mut store, _, _) = new_store();

    store.add_item(tee("S"));
    store.add_item(tee("M"));
    store.add_item(tee("L"));
    store.add_item(tee("S"));

    let sizes: Vec<_> = store.items().map(|l| l.size.clone().unwrap()).collect();
    assert_eq!(sizes, vec!["S", "M", "L"]);
}

#[test]
fn test_string_and_int_ids_are_distinct() {
    let (mut store, _, _) = new_store();

    store.add_item(NewLineItem::new(1, "Tee", Decimal::from(10)));
    store.add_item(NewLineItem::new("1", "Tee", Decimal::from(10)));

    assert_eq!(store.len(), 2);
}

// =============================================================================
// Totals and lookups
// =============================================================================

#[test]
fn test_totals() {
    let (mut store, _, _) = new_store();

    store.add_item(NewLineItem::new(1, "A", Decimal::from(10)).with_quantity(2));
    store.add_item(NewLineItem::new(2, "B", Decimal::from(5)).with_quantity(3));

    assert_eq!(store.total_items(), 5);
    assert_eq!(store.total_price(), Decimal::from(35));
}

#[test]
fn test_totals_empty() {
    let (store, _, _) = new_store();

    assert_eq!(store.total_items(), 0);
    assert_eq!(store.total_price(), Decimal::ZERO);
    assert!(store.is_empty());
}

#[test]
fn test_total_price_is_exact() {
    let (mut store, _, _) = new_store();

    store.add_item(NewLineItem::new(1, "A", Decimal::new(1, 1)));
    store.add_item(NewLineItem::new(2, "B", Decimal::new(2, 1)));

    assert_eq!(store.total_price(), Decimal::new(3, 1));
}

#[test]
fn test_total_price_saturates_on_overflowing_line() {
    let (mut store, _, _) = new_store();

    store.add_item(NewLineItem::new(1, "Big", Decimal::MAX).with_quantity(2));

    assert_eq!(store.total_price(), Decimal::MAX);
    assert_eq!(store.total_items(), 2);
}

#[test]
fn test_total_price_saturates_across_lines() {
    let (mut store, _, _) = new_store();

    store.add_item(NewLineItem::new(1, "Big", Decimal::MAX));
    store.add_item(NewLineItem::new(2, "Bigger", Decimal::MAX));

    assert_eq!(store.total_price(), Decimal::MAX);
}

#[test]
fn test_item_quantity_missing_is_zero() {
    let (store, _, _) = new_store();

    assert_eq!(store.item_quantity(&LineKey::new(9, Some("M"), None)), 0);
    assert!(!store.is_in_cart(&LineKey::new(9, Some("M"), None)));
}

// =============================================================================
// remove_item / update_quantity / clear_cart
// =============================================================================

#[test]
fn test_remove_purges_recently_added() {
    let (mut store, _, _) = new_store();
    let key = LineKey::new(1, Some("M"), None);

    store.add_item(tee("M"));
    assert!(store.recently_added(3).iter().any(|l| l.matches(&key)));

    store.remove_item(&key);

    assert!(!store.is_in_cart(&key));
    assert!(store.recently_added(3).is_empty());
}

#[test]
fn test_remove_missing_is_noop() {
    let (mut store, _, _) = new_store();

    store.add_item(tee("M"));
    store.remove_item(&LineKey::new(1, Some("L"), None));

    assert_eq!(store.len(), 1);
    assert_eq!(store.recently_added(3).len(), 1);
}

#[test]
fn test_remove_keeps_order_of_others() {
    let (mut store, _, _) = new_store();

    store.add_item(tee("S"));
    store.add_item(tee("M"));
    store.add_item(tee("L"));
    store.remove_item(&LineKey::new(1, Some("M"), None));

    let sizes: Vec<_> = store.items().map(|l| l.size.clone().unwrap()).collect();
    assert_eq!(sizes, vec!["S", "L"]);
}

#[test]
fn test_update_quantity_sets_value_without_touching_timestamp() {
    let (mut store, _, clock) = new_store();
    let key = LineKey::new(1, Some("M"), None);

    store.add_item(tee("M"));
    clock.advance(1_000);
    store.update_quantity(&key, 7);

    assert_eq!(store.item_quantity(&key), 7);
    assert_eq!(store.items().next().unwrap().added_at, T0);
}

#[test]
fn test_update_quantity_miss_is_noop() {
    let (mut store, _, _) = new_store();

    store.add_item(tee("M"));
    let before = store.snapshot();
    store.update_quantity(&LineKey::new(1, Some("XL"), None), 4);

    assert_eq!(store.snapshot(), before);
}

#[test]
fn test_update_quantity_accepts_zero() {
    let (mut store, _, _) = new_store();
    let key = LineKey::new(1, Some("M"), None);

    store.add_item(tee("M"));
    store.update_quantity(&key, 0);

    assert!(store.is_in_cart(&key));
    assert_eq!(store.item_quantity(&key), 0);
    assert_eq!(store.total_items(), 0);
}

#[test]
fn test_clear_is_idempotent() {
    let (mut store, storage, _) = new_store();

    store.clear_cart();
    store.clear_cart();
    assert!(store.is_empty());

    store.add_item(tee("M"));
    store.clear_cart();
    store.clear_cart();

    assert!(store.is_empty());
    assert!(store.recently_added(3).is_empty());
    assert_eq!(reopen(&storage).snapshot(), CartSnapshot::default());
}

// =============================================================================
// Recently added
// =============================================================================

#[test]
fn test_recently_added_bound() {
    let (mut store, _, clock) = new_store();

    for id in 1..=4 {
        store.add_item(NewLineItem::new(id, format!("Item {id}"), Decimal::ONE));
        clock.advance(1);
    }

    let ids: Vec<_> = store
        .recently_added(10)
        .iter()
        .map(|l| l.id.clone())
        .collect();
    assert_eq!(ids, vec![ProductId::Int(4), ProductId::Int(3), ProductId::Int(2)]);
}

#[test]
fn test_recently_added_count() {
    let (mut store, _, _) = new_store();

    store.add_item(tee("S"));
    store.add_item(tee("M"));

    assert_eq!(store.recently_added(1).len(), 1);
    assert_eq!(store.recently_added(1)[0].size.as_deref(), Some("M"));
    assert!(store.recently_added(0).is_empty());
}

#[test]
fn test_recently_added_holds_merged_quantity() {
    let (mut store, _, _) = new_store();

    store.add_item(tee("M"));
    store.add_item(tee("S"));
    store.add_item(tee("M").with_quantity(4));

    let recent = store.recently_added(3);
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].size.as_deref(), Some("M"));
    assert_eq!(recent[0].quantity, 5);
}

// =============================================================================
// Persistence
// =============================================================================

#[test]
fn test_round_trip_through_restart() {
    let (mut store, storage, clock) = new_store();

    store.add_item(tee("M").with_image("https://cdn.example/tee.png"));
    clock.advance(10);
    store.add_item(
        NewLineItem::new("hat-7", "Hat", Decimal::new(1250, 2))
            .with_color("")
            .with_quantity(2),
    );
    clock.advance(10);
    store.add_item(tee("M"));
    store.update_quantity(&LineKey::new("hat-7", None, Some("")), 5);

    let before = store.snapshot();
    drop(store);

    let reloaded = reopen(&storage);
    assert!(reloaded.has_hydrated());
    assert_eq!(reloaded.snapshot(), before);
    assert_eq!(
        reloaded.items().nth(1).unwrap().color.as_deref(),
        Some("")
    );
    assert_eq!(reloaded.items().nth(1).unwrap().size, None);
}

#[test]
fn test_missing_snapshot_starts_empty() {
    let storage = MemoryStorage::new();
    let store = reopen(&storage);

    assert!(store.has_hydrated());
    assert!(store.is_empty());
    assert!(storage.is_empty());
}

#[test]
fn test_corrupt_snapshot_starts_empty() {
    let storage = MemoryStorage::new();
    storage.save(DEFAULT_STORAGE_KEY, "{not json").unwrap();

    let mut store = reopen(&storage);
    assert!(store.is_empty());

    store.add_item(tee("M"));
    assert_eq!(reopen(&storage).len(), 1);
}

#[test]
fn test_other_version_starts_empty() {
    let storage = MemoryStorage::new();
    storage
        .save(
            DEFAULT_STORAGE_KEY,
            r#"{"state":{"items":[{"id":1,"name":"Tee","price":"10","quantity":1,"addedAt":0}],"recentlyAdded":[]},"version":3}"#,
        )
        .unwrap();

    assert!(reopen(&storage).is_empty());
}

#[test]
fn test_duplicate_persisted_lines_keep_first() {
    let storage = MemoryStorage::new();
    storage
        .save(
            DEFAULT_STORAGE_KEY,
            r#"{"state":{"items":[
                {"id":1,"name":"Tee","price":"10","quantity":2,"addedAt":0},
                {"id":1,"name":"Tee","price":"10","quantity":9,"addedAt":1}
            ],"recentlyAdded":[]},"version":0}"#,
        )
        .unwrap();

    let store = reopen(&storage);
    assert_eq!(store.len(), 1);
    assert_eq!(store.item_quantity(&LineKey::new(1, None, None)), 2);
}

#[test]
fn test_separate_keys_are_separate_carts() {
    let storage = MemoryStorage::new();
    let mut guest = CartStore::with_clock(storage.clone(), "guest", ManualClock::new(T0));
    guest.add_item(tee("M"));

    let other = CartStore::with_clock(storage.clone(), "other", ManualClock::new(T0));
    assert!(other.is_empty());
    assert_eq!(storage.len(), 1);
}

#[test]
fn test_storage_failure_degrades_to_memory() {
    let mut store = CartStore::with_clock(BrokenStorage, DEFAULT_STORAGE_KEY, ManualClock::new(T0));
    assert!(store.has_hydrated());

    store.add_item(tee("M"));
    store.update_quantity(&LineKey::new(1, Some("M"), None), 3);

    assert_eq!(store.total_items(), 3);
}

// =============================================================================
// Subscriptions
// =============================================================================

#[test]
fn test_subscribers_see_every_mutation() {
    let (mut store, _, _) = new_store();
    let seen: Rc<RefCell<Vec<u64>>> = Rc::default();

    let sink = Rc::clone(&seen);
    store.subscribe(move |snapshot| {
        let total = snapshot.items.iter().map(|l| u64::from(l.quantity)).sum();
        sink.borrow_mut().push(total);
    });

    store.add_item(tee("M"));
    store.add_item(tee("M"));
    store.update_quantity(&LineKey::new(1, Some("XL"), None), 9);
    store.remove_item(&LineKey::new(1, Some("M"), None));
    store.clear_cart();

    assert_eq!(*seen.borrow(), vec![1, 2, 2, 0, 0]);
}

#[test]
fn test_unsubscribe() {
    let (mut store, _, _) = new_store();
    let calls = Rc::new(RefCell::new(0_u32));

    let sink = Rc::clone(&calls);
    let id = store.subscribe(move |_| *sink.borrow_mut() += 1);

    store.add_item(tee("M"));
    assert!(store.unsubscribe(id));
    assert!(!store.unsubscribe(id));
    store.add_item(tee("M"));

    assert_eq!(*calls.borrow(), 1);
}

#[test]
fn test_subscriber_sees_persisted_state() {
    let (mut store, storage, _) = new_store();
    let persisted = Rc::new(RefCell::new(None));

    let sink = Rc::clone(&persisted);
    let reader = storage.clone();
    store.subscribe(move |_| {
        *sink.borrow_mut() = reader.load(DEFAULT_STORAGE_KEY).unwrap();
    });
    store.add_item(tee("M"));

    let raw = persisted.borrow().clone().unwrap();
    assert_eq!(CartSnapshot::decode(&raw).unwrap(), store.snapshot());
}

// =============================================================================
// Checkout
// =============================================================================

#[test]
fn test_checkout_draft_follows_display_order() {
    let (mut store, _, _) = new_store();

    store.add_item(tee("S"));
    store.add_item(tee("L").with_quantity(2));

    let draft = store.checkout_draft(CurrencyCode::USD).unwrap();
    assert_eq!(draft.item_count, 3);
    assert_eq!(draft.lines[0].size.as_deref(), Some("S"));
    assert_eq!(draft.subtotal.amount, Decimal::from(30));
}

//! Integration tests for the time-slot repository against a real
//! (temporary) SQLite database.

use std::collections::BTreeMap;

use sqlx::SqlitePool;

use flashlink_core::product::Product;
use flashlink_core::record::{MappingEdit, TimeSlotRecord};
use flashlink_db::repositories::TimeSlotRepo;

fn record_with_mapping(original: &str, conversion: &str) -> TimeSlotRecord {
    let mut record = TimeSlotRecord::default();
    record.apply(MappingEdit::ConversionLink {
        original_link: original.to_string(),
        value: Some(conversion.to_string()),
    });
    record
}

// ---------------------------------------------------------------------------
// Test: get returns None for an unknown slot
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn get_unknown_slot_returns_none(pool: SqlitePool) {
    let loaded = TimeSlotRepo::get(&pool, "09:00").await.unwrap();
    assert!(loaded.is_none());
}

// ---------------------------------------------------------------------------
// Test: upsert inserts then fully replaces by key
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn upsert_is_replace_by_key_not_merge(pool: SqlitePool) {
    let first = record_with_mapping("L1", "X");
    TimeSlotRepo::upsert(&pool, "09:00", &first).await.unwrap();

    let second = record_with_mapping("L1", "Y");
    TimeSlotRepo::upsert(&pool, "09:00", &second).await.unwrap();

    let loaded = TimeSlotRepo::get(&pool, "09:00").await.unwrap().unwrap();
    assert_eq!(loaded.link_mapping.len(), 1);
    assert_eq!(loaded.conversion_link("L1"), Some("Y"));
}

#[sqlx::test(migrations = "./migrations")]
async fn upsert_replaces_all_four_mappings(pool: SqlitePool) {
    let mut first = record_with_mapping("L1", "X");
    first.merge_catalog(&[Product::new("P1", "L1")]);
    TimeSlotRepo::upsert(&pool, "09:00", &first).await.unwrap();

    // Saving an empty record wipes everything previously stored.
    TimeSlotRepo::upsert(&pool, "09:00", &TimeSlotRecord::default())
        .await
        .unwrap();

    let loaded = TimeSlotRepo::get(&pool, "09:00").await.unwrap().unwrap();
    assert!(loaded.is_empty());
}

// ---------------------------------------------------------------------------
// Test: round trip preserves every mapping
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn record_round_trips_through_storage(pool: SqlitePool) {
    use flashlink_core::record::{FailureReason, SubIdSlot};

    let mut record = record_with_mapping("https://shopee.vn/product/1/2", "https://s.vn/x");
    record.apply(MappingEdit::SubId {
        original_link: "https://shopee.vn/product/1/2".to_string(),
        slot: SubIdSlot::Sub2,
        value: "tag".to_string(),
    });
    record.apply(MappingEdit::Reason {
        original_link: "https://shopee.vn/product/1/2".to_string(),
        value: Some(FailureReason::OutOfStock),
    });
    record.merge_catalog(&[Product::new("P", "https://shopee.vn/product/1/2")]);

    TimeSlotRepo::upsert(&pool, "12:00", &record).await.unwrap();
    let loaded = TimeSlotRepo::get(&pool, "12:00").await.unwrap().unwrap();

    assert_eq!(loaded, record);
}

// ---------------------------------------------------------------------------
// Test: delete is idempotent
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn delete_absent_key_is_noop_success(pool: SqlitePool) {
    TimeSlotRepo::delete(&pool, "18:00").await.unwrap();

    let record = record_with_mapping("L1", "X");
    TimeSlotRepo::upsert(&pool, "18:00", &record).await.unwrap();
    TimeSlotRepo::delete(&pool, "18:00").await.unwrap();
    TimeSlotRepo::delete(&pool, "18:00").await.unwrap();

    assert!(TimeSlotRepo::get(&pool, "18:00").await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Test: list_slots and delete_all
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn list_slots_then_delete_all(pool: SqlitePool) {
    for slot in ["09:00", "12:00", "18:00"] {
        TimeSlotRepo::upsert(&pool, slot, &TimeSlotRecord::default())
            .await
            .unwrap();
    }

    let mut slots = TimeSlotRepo::list_slots(&pool).await.unwrap();
    slots.sort();
    assert_eq!(slots, vec!["09:00", "12:00", "18:00"]);

    TimeSlotRepo::delete_all(&pool).await.unwrap();
    assert!(TimeSlotRepo::list_slots(&pool).await.unwrap().is_empty());
    assert!(TimeSlotRepo::list_all(&pool).await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Test: batch save reports per-key outcome
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn upsert_many_saves_every_key(pool: SqlitePool) {
    let mut batch = BTreeMap::new();
    batch.insert("09:00".to_string(), record_with_mapping("L1", "X"));
    batch.insert("12:00".to_string(), record_with_mapping("L2", "Y"));

    let errors = TimeSlotRepo::upsert_many(&pool, &batch).await;
    assert!(errors.is_empty());

    let all = TimeSlotRepo::list_all(&pool).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all["12:00"].conversion_link("L2"), Some("Y"));
}

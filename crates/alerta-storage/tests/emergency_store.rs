// Storage-level tests against a live Postgres
// Run with: DATABASE_URL=postgres://... cargo test -p alerta-storage -- --ignored
//
// Each test works in its own room id and cleans that room up front, so the
// tests can share a database and be re-run safely.

use alerta_storage::{CreateEmergency, Database, UpdateEmergency};
use chrono::{DateTime, Duration, TimeZone, Utc};

async fn test_db() -> Database {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required for storage tests");
    let db = Database::from_url(&url).await.expect("Failed to connect");
    db.migrate().await.expect("Failed to migrate");
    db
}

async fn clear_room(db: &Database, room_id: i32) {
    sqlx::query("DELETE FROM emergencies WHERE room_id = $1")
        .bind(room_id)
        .execute(db.pool())
        .await
        .expect("Failed to clear room");
}

async fn create_at(db: &Database, room_id: i32, occurred_at: Option<DateTime<Utc>>) -> i32 {
    let row = db
        .create_emergency(CreateEmergency {
            room_id,
            occurred_at,
        })
        .await
        .expect("Failed to create emergency");
    row.id
}

#[tokio::test]
#[ignore]
async fn test_insert_assigns_distinct_ids() {
    let db = test_db().await;
    let room = 910_001;
    clear_room(&db, room).await;

    let now = Utc::now();
    let first = db
        .create_emergency(CreateEmergency {
            room_id: room,
            occurred_at: Some(now),
        })
        .await
        .unwrap();
    let second = db
        .create_emergency(CreateEmergency {
            room_id: room,
            occurred_at: Some(now),
        })
        .await
        .unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(first.room_id, room);

    let fetched = db.get_emergency(first.id).await.unwrap().unwrap();
    assert_eq!(fetched.id, first.id);
    assert_eq!(fetched.room_id, room);
    assert!(fetched.occurred_at.is_some());

    clear_room(&db, room).await;
}

#[tokio::test]
#[ignore]
async fn test_room_listing_is_descending() {
    let db = test_db().await;
    let room = 910_002;
    let other_room = 910_102;
    clear_room(&db, room).await;
    clear_room(&db, other_room).await;

    let base = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
    let oldest = create_at(&db, room, Some(base - Duration::hours(2))).await;
    let newest = create_at(&db, room, Some(base)).await;
    let middle = create_at(&db, room, Some(base - Duration::hours(1))).await;
    create_at(&db, other_room, Some(base)).await;

    let rows = db.list_emergencies_by_room(room).await.unwrap();
    assert_eq!(rows.len(), 3, "only rows for the requested room");
    assert_eq!(
        rows.iter().map(|r| r.id).collect::<Vec<_>>(),
        vec![newest, middle, oldest],
        "ordered by occurred_at descending"
    );

    clear_room(&db, room).await;
    clear_room(&db, other_room).await;
}

#[tokio::test]
#[ignore]
async fn test_between_bounds_are_inclusive() {
    let db = test_db().await;
    let room = 910_003;
    clear_room(&db, room).await;

    let start = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2026, 2, 2, 0, 0, 0).unwrap();
    let at_start = create_at(&db, room, Some(start)).await;
    let in_between = create_at(&db, room, Some(start + Duration::hours(6))).await;
    let at_end = create_at(&db, room, Some(end)).await;
    let before = create_at(&db, room, Some(start - Duration::seconds(1))).await;
    let after = create_at(&db, room, Some(end + Duration::seconds(1))).await;

    let rows = db.list_emergencies_between(start, end).await.unwrap();
    let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
    assert!(ids.contains(&at_start), "start bound is inclusive");
    assert!(ids.contains(&at_end), "end bound is inclusive");
    assert!(ids.contains(&in_between));
    assert!(!ids.contains(&before));
    assert!(!ids.contains(&after));

    // Inverted range yields an empty result, not an error.
    let inverted = db.list_emergencies_between(end, start).await.unwrap();
    assert!(inverted.is_empty());

    clear_room(&db, room).await;
}

#[tokio::test]
#[ignore]
async fn test_since_cutoff_is_inclusive() {
    let db = test_db().await;
    let room = 910_004;
    clear_room(&db, room).await;

    let cutoff = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    let at_cutoff = create_at(&db, room, Some(cutoff)).await;
    let newer = create_at(&db, room, Some(cutoff + Duration::minutes(5))).await;
    let older = create_at(&db, room, Some(cutoff - Duration::seconds(1))).await;

    let rows = db.list_emergencies_since(cutoff).await.unwrap();
    let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
    assert!(ids.contains(&at_cutoff), "an event exactly at the cutoff is included");
    assert!(ids.contains(&newer));
    assert!(!ids.contains(&older));

    // Descending order among this test's rows.
    let newer_pos = ids.iter().position(|id| *id == newer).unwrap();
    let cutoff_pos = ids.iter().position(|id| *id == at_cutoff).unwrap();
    assert!(newer_pos < cutoff_pos);

    clear_room(&db, room).await;
}

#[tokio::test]
#[ignore]
async fn test_update_overwrites_and_can_null_timestamp() {
    let db = test_db().await;
    let room = 910_005;
    let moved_room = 910_105;
    clear_room(&db, room).await;
    clear_room(&db, moved_room).await;

    let id = create_at(&db, room, Some(Utc::now())).await;

    // An update without a timestamp nulls the column rather than keeping
    // or re-defaulting the old value.
    let updated = db
        .update_emergency(
            id,
            UpdateEmergency {
                room_id: moved_room,
                occurred_at: None,
            },
        )
        .await
        .unwrap()
        .expect("row exists");
    assert_eq!(updated.room_id, moved_room);
    assert!(updated.occurred_at.is_none());

    let fetched = db.get_emergency(id).await.unwrap().unwrap();
    assert!(fetched.occurred_at.is_none());

    db.delete_emergency(id).await.unwrap();
    let missing = db
        .update_emergency(
            id,
            UpdateEmergency {
                room_id: room,
                occurred_at: None,
            },
        )
        .await
        .unwrap();
    assert!(missing.is_none());

    clear_room(&db, room).await;
    clear_room(&db, moved_room).await;
}

#[tokio::test]
#[ignore]
async fn test_count_tracks_creates_and_deletes() {
    let db = test_db().await;
    let room = 910_006;
    clear_room(&db, room).await;

    assert_eq!(db.count_emergencies_by_room(room).await.unwrap(), 0);

    let now = Utc::now();
    let first = create_at(&db, room, Some(now)).await;
    create_at(&db, room, Some(now)).await;
    create_at(&db, room, Some(now)).await;
    assert_eq!(db.count_emergencies_by_room(room).await.unwrap(), 3);

    db.delete_emergency(first).await.unwrap();
    assert_eq!(db.count_emergencies_by_room(room).await.unwrap(), 2);

    clear_room(&db, room).await;
}

#[tokio::test]
#[ignore]
async fn test_exists_and_delete() {
    let db = test_db().await;
    let room = 910_007;
    clear_room(&db, room).await;

    let id = create_at(&db, room, Some(Utc::now())).await;
    assert!(db.emergency_exists(id).await.unwrap());

    db.delete_emergency(id).await.unwrap();
    assert!(!db.emergency_exists(id).await.unwrap());
    assert!(db.get_emergency(id).await.unwrap().is_none());

    // Deleting an id that is already gone is not a storage error.
    db.delete_emergency(id).await.unwrap();

    clear_room(&db, room).await;
}

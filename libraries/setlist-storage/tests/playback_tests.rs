//! Integration tests for playback session records


use setlist_core::storage::StorageContext;
use setlist_core::types::*;
use setlist_core::SetlistError;
use test_helpers::*;

#[tokio::test]
async fn test_create_playback_applies_defaults() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let track = create_test_track(pool, "Clair de Lune", Some("Debussy")).await;

    let record = setlist_storage::playback::create(pool, CreatePlayback::for_track(&track.id))
        .await
        .expect("Failed to create playback record");

    assert_eq!(record.track_id, track.id);
    assert_eq!(record.position, 0);
    assert!(record.is_playing);
    assert_eq!(record.owner_id, None);

    let stored = setlist_storage::playback::get_by_id(pool, &record.id)
        .await
        .unwrap()
        .expect("Record not found");
    assert_eq!(stored, record);
}

#[tokio::test]
async fn test_create_playback_for_missing_track_is_rejected() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let result =
        setlist_storage::playback::create(pool, CreatePlayback::for_track(&TrackId::generate()))
            .await;

    assert!(matches!(result, Err(SetlistError::InvalidInput(_))));
    assert_eq!(count_rows(pool, "playback_records").await, 0);
}

#[tokio::test]
async fn test_create_playback_rejects_negative_position() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let track = create_test_track(pool, "Rewind", None).await;
    let mut request = CreatePlayback::for_track(&track.id);
    request.position = Some(-5);

    let result = setlist_storage::playback::create(pool, request).await;

    assert!(matches!(result, Err(SetlistError::InvalidInput(_))));
}

#[tokio::test]
async fn test_latest_playback_is_most_recent_record() {
    let test_db = TestDb::new().await;
    let storage = test_db.context();
    let pool = test_db.pool();

    let first = create_test_track(pool, "T1", None).await;
    let second = create_test_track(pool, "T2", None).await;

    assert!(storage.get_latest_playback().await.unwrap().is_empty());

    storage
        .create_playback(CreatePlayback::for_track(&first.id))
        .await
        .unwrap();
    storage
        .create_playback(CreatePlayback::for_track(&second.id))
        .await
        .unwrap();

    let latest = storage.get_latest_playback().await.unwrap();
    assert_eq!(latest.len(), 1);
    assert_eq!(latest[0].record.track_id, second.id);
    assert_eq!(latest[0].track.as_ref().map(|t| t.title.as_str()), Some("T2"));
}

#[tokio::test]
async fn test_updating_a_record_makes_it_latest() {
    let test_db = TestDb::new().await;
    let storage = test_db.context();
    let pool = test_db.pool();

    let first = create_test_track(pool, "Earlier", None).await;
    let second = create_test_track(pool, "Later", None).await;

    let earlier = storage
        .create_playback(CreatePlayback::for_track(&first.id))
        .await
        .unwrap();
    storage
        .create_playback(CreatePlayback::for_track(&second.id))
        .await
        .unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let updated = storage
        .update_playback(
            &earlier.id,
            UpdatePlayback {
                position: Some(42),
                is_playing: Some(false),
                ..Default::default()
            },
        )
        .await
        .expect("Failed to update playback");

    assert_eq!(updated.position, 42);
    assert!(!updated.is_playing);
    assert_eq!(updated.started_at, earlier.started_at);

    let latest = storage.get_latest_playback().await.unwrap();
    assert_eq!(latest[0].record, updated);
}

#[tokio::test]
async fn test_update_playback_validation() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let track = create_test_track(pool, "Validate", None).await;
    let record = setlist_storage::playback::create(pool, CreatePlayback::for_track(&track.id))
        .await
        .unwrap();

    let empty = setlist_storage::playback::update(pool, &record.id, UpdatePlayback::default()).await;
    assert!(matches!(empty, Err(SetlistError::InvalidInput(_))));

    let negative = setlist_storage::playback::update(
        pool,
        &record.id,
        UpdatePlayback {
            position: Some(-1),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(negative, Err(SetlistError::InvalidInput(_))));

    let missing = setlist_storage::playback::update(
        pool,
        &PlaybackId::generate(),
        UpdatePlayback {
            position: Some(1),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(missing, Err(SetlistError::NotFound { .. })));
}

#[tokio::test]
async fn test_delete_playback() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let track = create_test_track(pool, "Stop", None).await;
    let record = setlist_storage::playback::create(pool, CreatePlayback::for_track(&track.id))
        .await
        .unwrap();

    setlist_storage::playback::delete(pool, &record.id)
        .await
        .expect("Failed to delete playback record");

    assert!(setlist_storage::playback::get_by_id(pool, &record.id)
        .await
        .unwrap()
        .is_none());

    let again = setlist_storage::playback::delete(pool, &record.id).await;
    assert!(matches!(again, Err(SetlistError::NotFound { .. })));
}

#[tokio::test]
async fn test_latest_playback_survives_track_deletion() {
    let test_db = TestDb::new().await;
    let storage = test_db.context();
    let pool = test_db.pool();

    let track = create_test_track(pool, "Gone", None).await;
    let record = storage
        .create_playback(CreatePlayback::for_track(&track.id))
        .await
        .unwrap();

    storage.delete_track(&track.id).await.unwrap();

    let latest = storage.get_latest_playback().await.unwrap();
    assert_eq!(latest.len(), 1);
    assert_eq!(latest[0].record.id, record.id);
    assert!(latest[0].track.is_none());
}

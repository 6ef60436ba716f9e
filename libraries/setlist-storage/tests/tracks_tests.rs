//! Integration tests for the tracks vertical slice
//!
//! Covers:
//! - Create/read round trips including free-form metadata
//! - Partial updates and validation
//! - Deleting a track removes it from every playlist that references it


use setlist_core::types::*;
use setlist_core::SetlistError;
use test_helpers::*;

#[tokio::test]
async fn test_create_and_get_track() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let mut metadata = TrackMetadata::new();
    metadata.insert("genre".to_string(), serde_json::json!("Rock"));
    metadata.insert("year".to_string(), serde_json::json!(1975));

    let track = setlist_storage::tracks::create(
        pool,
        CreateTrack {
            title: "Bohemian Rhapsody".to_string(),
            artist: Some("Queen".to_string()),
            album: Some("A Night at the Opera".to_string()),
            duration: Some(354),
            metadata: Some(metadata.clone()),
        },
    )
    .await
    .expect("Failed to create track");

    let retrieved = setlist_storage::tracks::get_by_id(pool, &track.id)
        .await
        .expect("Failed to get track")
        .expect("Track not found");

    assert_eq!(retrieved, track);
    assert_eq!(retrieved.metadata, Some(metadata));
    assert_eq!(retrieved.duration, Some(354));
}

#[tokio::test]
async fn test_get_missing_track_returns_none() {
    let test_db = TestDb::new().await;

    let result = setlist_storage::tracks::get_by_id(test_db.pool(), &TrackId::generate())
        .await
        .expect("Query failed");

    assert!(result.is_none());
}

#[tokio::test]
async fn test_get_all_tracks_in_creation_order() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let first = create_test_track(pool, "First", None).await;
    let second = create_test_track(pool, "Second", None).await;
    let third = create_test_track(pool, "Third", None).await;

    let tracks = setlist_storage::tracks::get_all(pool).await.unwrap();
    let ids: Vec<TrackId> = tracks.into_iter().map(|t| t.id).collect();

    assert_eq!(ids, vec![first.id, second.id, third.id]);
}

#[tokio::test]
async fn test_create_track_rejects_blank_title() {
    let test_db = TestDb::new().await;

    let result = setlist_storage::tracks::create(test_db.pool(), CreateTrack::titled("   ")).await;

    assert!(matches!(result, Err(SetlistError::InvalidInput(_))));
    assert_eq!(count_rows(test_db.pool(), "tracks").await, 0);
}

#[tokio::test]
async fn test_update_track_changes_only_supplied_fields() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let track = create_test_track(pool, "Imagine", Some("John Lennon")).await;

    let updated = setlist_storage::tracks::update(
        pool,
        &track.id,
        UpdateTrack {
            album: Some("Imagine".to_string()),
            duration: Some(183),
            ..Default::default()
        },
    )
    .await
    .expect("Failed to update track");

    assert_eq!(updated.title, "Imagine");
    assert_eq!(updated.artist.as_deref(), Some("John Lennon"));
    assert_eq!(updated.album.as_deref(), Some("Imagine"));
    assert_eq!(updated.duration, Some(183));
    assert!(updated.updated_at >= track.updated_at);

    let stored = setlist_storage::tracks::get_by_id(pool, &track.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored, updated);
}

#[tokio::test]
async fn test_update_missing_track_is_not_found() {
    let test_db = TestDb::new().await;

    let result = setlist_storage::tracks::update(
        test_db.pool(),
        &TrackId::generate(),
        UpdateTrack {
            title: Some("Nothing".to_string()),
            ..Default::default()
        },
    )
    .await;

    assert!(matches!(result, Err(SetlistError::NotFound { .. })));
}

#[tokio::test]
async fn test_delete_missing_track_is_not_found() {
    let test_db = TestDb::new().await;

    let result = setlist_storage::tracks::delete(test_db.pool(), &TrackId::generate()).await;

    assert!(matches!(result, Err(SetlistError::NotFound { .. })));
}

#[tokio::test]
async fn test_delete_track_removes_it_from_playlists() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let keep = create_test_track(pool, "Keep", None).await;
    let doomed = create_test_track(pool, "Doomed", None).await;
    let last = create_test_track(pool, "Last", None).await;

    let road_trip = create_test_playlist(pool, "Road Trip").await;
    let workout = create_test_playlist(pool, "Workout").await;
    let untouched = create_test_playlist(pool, "Untouched").await;

    link_track(pool, &road_trip.id, &keep.id).await;
    link_track(pool, &road_trip.id, &doomed.id).await;
    link_track(pool, &road_trip.id, &last.id).await;
    link_track(pool, &workout.id, &doomed.id).await;
    link_track(pool, &untouched.id, &keep.id).await;

    setlist_storage::tracks::delete(pool, &doomed.id)
        .await
        .expect("Failed to delete track");

    assert!(setlist_storage::tracks::get_by_id(pool, &doomed.id)
        .await
        .unwrap()
        .is_none());

    // Remaining entries are renumbered without a gap
    let road_trip = setlist_storage::playlists::get_by_id(pool, &road_trip.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!road_trip.entries.contains(&doomed.id));
    assert_eq!(road_trip.entries.get(&keep.id).unwrap().order, 1);
    assert_eq!(road_trip.entries.get(&last.id).unwrap().order, 2);

    let workout = setlist_storage::playlists::get_by_id(pool, &workout.id)
        .await
        .unwrap()
        .unwrap();
    assert!(workout.entries.is_empty());

    let untouched_after = setlist_storage::playlists::get_by_id(pool, &untouched.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(untouched_after.entries.len(), 1);
    assert_eq!(untouched_after.revision, 1);
}

//! Playlist domain types
//!
//! A playlist document embeds its entries. In memory the entries are keyed by
//! track id, so a playlist can never hold two entries for the same track, and
//! every mutation leaves the entry orders contiguous from 1.

use crate::error::{Result, SetlistError};
use crate::types::{now, CreateTrack, OwnerId, PlaylistId, Track, TrackId, TrackMetadata};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A track's membership in a playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistEntry {
    /// Referenced track
    pub track_id: TrackId,

    /// 1-based position in the playlist
    pub order: u32,

    /// When the track was added to the playlist
    pub added_at: DateTime<Utc>,
}

/// Entries of a playlist, keyed by track id
///
/// Serialized as an array ordered by position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<PlaylistEntry>", into = "Vec<PlaylistEntry>")]
pub struct PlaylistEntries {
    by_track: BTreeMap<TrackId, PlaylistEntry>,
}

impl PlaylistEntries {
    /// Number of entries
    pub fn len(&self) -> usize {
        self.by_track.len()
    }

    /// Whether the playlist has no entries
    pub fn is_empty(&self) -> bool {
        self.by_track.is_empty()
    }

    /// Whether the track has an entry
    pub fn contains(&self, track_id: &TrackId) -> bool {
        self.by_track.contains_key(track_id)
    }

    /// Entry for the track, if any
    pub fn get(&self, track_id: &TrackId) -> Option<&PlaylistEntry> {
        self.by_track.get(track_id)
    }

    /// Entries in playlist order
    pub fn ordered(&self) -> Vec<&PlaylistEntry> {
        let mut entries: Vec<&PlaylistEntry> = self.by_track.values().collect();
        entries.sort_by(|a, b| {
            a.order
                .cmp(&b.order)
                .then(a.added_at.cmp(&b.added_at))
                .then(a.track_id.cmp(&b.track_id))
        });
        entries
    }

    /// Track ids in playlist order
    pub fn track_ids(&self) -> Vec<TrackId> {
        self.ordered()
            .into_iter()
            .map(|entry| entry.track_id.clone())
            .collect()
    }

    /// Append an entry at the end
    ///
    /// Returns `None` if the track already has an entry.
    fn append(&mut self, track_id: TrackId, added_at: DateTime<Utc>) -> Option<PlaylistEntry> {
        if self.contains(&track_id) {
            return None;
        }
        let entry = PlaylistEntry {
            track_id: track_id.clone(),
            order: self.next_order(),
            added_at,
        };
        self.by_track.insert(track_id, entry.clone());
        Some(entry)
    }

    /// Move an entry to `order` (1-based, already bounds-checked) and shift
    /// the others around it
    fn move_to(&mut self, track_id: &TrackId, order: u32) {
        let mut ids = self.track_ids();
        let Some(current) = ids.iter().position(|id| id == track_id) else {
            return;
        };
        let moved = ids.remove(current);
        let target = (order as usize).saturating_sub(1).min(ids.len());
        ids.insert(target, moved);
        self.assign_orders(&ids);
    }

    /// Remove an entry and close the gap it leaves
    fn remove(&mut self, track_id: &TrackId) -> Option<PlaylistEntry> {
        let removed = self.by_track.remove(track_id)?;
        self.renumber();
        Some(removed)
    }

    /// Reassign orders 1..=n keeping the current relative order
    pub fn renumber(&mut self) {
        let ids = self.track_ids();
        self.assign_orders(&ids);
    }

    fn assign_orders(&mut self, ids: &[TrackId]) {
        for (index, id) in ids.iter().enumerate() {
            if let Some(entry) = self.by_track.get_mut(id) {
                entry.order = index as u32 + 1;
            }
        }
    }

    fn next_order(&self) -> u32 {
        self.len() as u32 + 1
    }
}

impl From<Vec<PlaylistEntry>> for PlaylistEntries {
    fn from(entries: Vec<PlaylistEntry>) -> Self {
        let mut by_track = BTreeMap::new();
        for entry in entries {
            // First occurrence wins if a stored document carries duplicates
            by_track.entry(entry.track_id.clone()).or_insert(entry);
        }
        let mut entries = Self { by_track };
        entries.renumber();
        entries
    }
}

impl From<PlaylistEntries> for Vec<PlaylistEntry> {
    fn from(entries: PlaylistEntries) -> Self {
        entries.ordered().into_iter().cloned().collect()
    }
}

/// Playlist document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    /// Unique playlist identifier
    pub id: PlaylistId,

    /// Playlist name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Owner reference
    pub owner_id: Option<OwnerId>,

    /// Track entries
    #[serde(rename = "tracks")]
    pub entries: PlaylistEntries,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,

    /// Write counter used for revision-checked saves
    #[serde(default)]
    pub revision: i64,
}

impl Playlist {
    /// Build a new, empty playlist
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the name is blank.
    pub fn create(data: CreatePlaylist) -> Result<Self> {
        validate_name(&data.name)?;
        let created_at = now();
        Ok(Self {
            id: PlaylistId::generate(),
            name: data.name.trim().to_string(),
            description: data.description,
            owner_id: data.owner_id,
            entries: PlaylistEntries::default(),
            created_at,
            updated_at: created_at,
            revision: 0,
        })
    }

    /// Apply a partial update of the top-level fields
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if a supplied name is blank.
    pub fn apply(&mut self, update: UpdatePlaylist) -> Result<()> {
        if let Some(name) = &update.name {
            validate_name(name)?;
        }

        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(owner_id) = update.owner_id {
            self.owner_id = Some(owner_id);
        }
        self.touch();

        Ok(())
    }

    /// Append a track at the end of the playlist
    ///
    /// # Errors
    ///
    /// Returns `Duplicate` if the track is already in the playlist.
    pub fn add_track(&mut self, track_id: TrackId) -> Result<PlaylistEntry> {
        let added_at = now();
        let entry = self.entries.append(track_id, added_at).ok_or_else(|| {
            SetlistError::duplicate("Track already exists in this playlist")
        })?;
        self.updated_at = added_at;
        Ok(entry)
    }

    /// Change an entry's position and/or added timestamp
    ///
    /// # Errors
    ///
    /// Returns `TrackNotInPlaylist` if the track has no entry, and
    /// `InvalidInput` if nothing is supplied or the order is out of range.
    pub fn update_entry(
        &mut self,
        track_id: &TrackId,
        update: UpdatePlaylistEntry,
    ) -> Result<PlaylistEntry> {
        if !self.entries.contains(track_id) {
            return Err(self.missing_entry(track_id));
        }

        let order = update.validated_order(self.entries.len())?;

        if let Some(order) = order {
            self.entries.move_to(track_id, order);
        }
        if let Some(added_at) = update.added_at {
            if let Some(entry) = self.entries.by_track.get_mut(track_id) {
                entry.added_at = added_at;
            }
        }
        self.touch();

        self.entries
            .get(track_id)
            .cloned()
            .ok_or_else(|| self.missing_entry(track_id))
    }

    /// Remove a track's entry and renumber the rest
    ///
    /// # Errors
    ///
    /// Returns `TrackNotInPlaylist` if the track has no entry.
    pub fn remove_track(&mut self, track_id: &TrackId) -> Result<PlaylistEntry> {
        let removed = self
            .entries
            .remove(track_id)
            .ok_or_else(|| self.missing_entry(track_id))?;
        self.touch();
        Ok(removed)
    }

    /// Bump the modification timestamp
    pub fn touch(&mut self) {
        self.updated_at = now();
    }

    /// Resolve entries against loaded tracks
    ///
    /// Entries whose track can't be found are skipped.
    pub fn resolve(&self, tracks: &HashMap<TrackId, Track>) -> PlaylistView {
        PlaylistView {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            owner_id: self.owner_id.clone(),
            tracks: resolve_entries(&self.entries, tracks),
            created_at: self.created_at,
            updated_at: self.updated_at,
            revision: self.revision,
        }
    }

    fn missing_entry(&self, track_id: &TrackId) -> SetlistError {
        SetlistError::TrackNotInPlaylist {
            playlist_id: self.id.clone(),
            track_id: track_id.clone(),
        }
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(SetlistError::invalid_input("Playlist name is required"));
    }
    Ok(())
}

/// Resolve entries in order, skipping unresolved references
pub fn resolve_entries(
    entries: &PlaylistEntries,
    tracks: &HashMap<TrackId, Track>,
) -> Vec<PlaylistTrackView> {
    entries
        .ordered()
        .into_iter()
        .filter_map(|entry| {
            tracks.get(&entry.track_id).map(|track| PlaylistTrackView {
                track: track.clone(),
                order: entry.order,
                added_at: entry.added_at,
            })
        })
        .collect()
}

/// Data for creating a playlist
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlaylist {
    /// Playlist name
    #[serde(default)]
    pub name: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Owner reference
    #[serde(default)]
    pub owner_id: Option<OwnerId>,
}

/// Partial update of a playlist's top-level fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlaylist {
    /// Playlist name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Owner reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<OwnerId>,
}

/// Mutable fields of a playlist entry
///
/// The track reference itself is deliberately not part of this type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlaylistEntry {
    /// 1-based position in the playlist
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    /// When the track was added to the playlist
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<DateTime<Utc>>,
}

impl UpdatePlaylistEntry {
    fn validated_order(&self, len: usize) -> Result<Option<u32>> {
        if self.order.is_none() && self.added_at.is_none() {
            return Err(SetlistError::invalid_input(
                "Nothing to update: supply order and/or addedAt",
            ));
        }
        match self.order {
            None => Ok(None),
            Some(order) if order >= 1 && order <= len as i64 => Ok(Some(order as u32)),
            Some(order) => Err(SetlistError::invalid_input(format!(
                "Order {} is out of range 1..={}",
                order, len
            ))),
        }
    }
}

/// Request body for adding a track to a playlist
///
/// Either `track_id` (link an existing track) or the new-track fields
/// (create and link) must be given, not both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPlaylistTrack {
    /// Existing track to link
    #[serde(default, alias = "track_id")]
    pub track_id: Option<String>,
    /// Track title
    #[serde(default)]
    pub title: Option<String>,
    /// Performing artist
    #[serde(default)]
    pub artist: Option<String>,
    /// Album the track appears on
    #[serde(default)]
    pub album: Option<String>,
    /// Duration in seconds
    #[serde(default)]
    pub duration: Option<i64>,
    /// Free-form metadata
    #[serde(default)]
    pub metadata: Option<TrackMetadata>,
}

/// Where the track for a playlist entry comes from
#[derive(Debug, Clone, PartialEq)]
pub enum TrackSource {
    /// Link a track that already exists
    Existing(TrackId),
    /// Create a new track, then link it
    New(CreateTrack),
}

impl AddPlaylistTrack {
    /// Link an existing track by id
    pub fn existing(track_id: &TrackId) -> Self {
        Self {
            track_id: Some(track_id.to_string()),
            ..Default::default()
        }
    }

    /// Create and link a new track
    pub fn new_track(track: CreateTrack) -> Self {
        Self {
            track_id: None,
            title: Some(track.title),
            artist: track.artist,
            album: track.album,
            duration: track.duration,
            metadata: track.metadata,
        }
    }

    fn has_track_details(&self) -> bool {
        self.title.is_some()
            || self.artist.is_some()
            || self.album.is_some()
            || self.duration.is_some()
            || self.metadata.is_some()
    }

    /// Decide which input shape the request uses
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for ambiguous or empty requests, a malformed
    /// track id, or invalid new-track fields.
    pub fn into_source(self) -> Result<TrackSource> {
        let has_details = self.has_track_details();
        match self.track_id {
            Some(_) if has_details => Err(SetlistError::invalid_input(
                "Provide either trackId or new track details, not both",
            )),
            Some(raw) => TrackId::parse(&raw).map(TrackSource::Existing),
            None if has_details => {
                let data = CreateTrack {
                    title: self.title.unwrap_or_default(),
                    artist: self.artist,
                    album: self.album,
                    duration: self.duration,
                    metadata: self.metadata,
                };
                data.validate()?;
                Ok(TrackSource::New(data))
            }
            None => Err(SetlistError::invalid_input(
                "Either trackId or new track details (title) are required",
            )),
        }
    }
}

/// A playlist entry with its track populated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistTrackView {
    /// The referenced track
    pub track: Track,
    /// 1-based position in the playlist
    pub order: u32,
    /// When the track was added to the playlist
    pub added_at: DateTime<Utc>,
}

/// A playlist with its entries populated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistView {
    /// Unique playlist identifier
    pub id: PlaylistId,
    /// Playlist name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Owner reference
    pub owner_id: Option<OwnerId>,
    /// Entries in playlist order
    pub tracks: Vec<PlaylistTrackView>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
    /// Write counter used for revision-checked saves
    pub revision: i64,
}

/// Outcome of adding a track to a playlist
#[derive(Debug, Clone, PartialEq)]
pub struct AddedTrack {
    /// The linked track (newly created or existing)
    pub track: Track,
    /// The new entry
    pub entry: PlaylistEntry,
    /// Whether the track was created by this request
    pub created: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playlist() -> Playlist {
        Playlist::create(CreatePlaylist {
            name: "Road Trip Mix".to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    fn orders(playlist: &Playlist) -> Vec<(TrackId, u32)> {
        playlist
            .entries
            .ordered()
            .into_iter()
            .map(|e| (e.track_id.clone(), e.order))
            .collect()
    }

    #[test]
    fn create_requires_name() {
        let err = Playlist::create(CreatePlaylist::default()).unwrap_err();
        assert!(matches!(err, SetlistError::InvalidInput(_)));
    }

    #[test]
    fn add_track_appends_with_next_order() {
        let mut playlist = playlist();
        let first = TrackId::generate();
        let second = TrackId::generate();

        assert_eq!(playlist.add_track(first.clone()).unwrap().order, 1);
        assert_eq!(playlist.add_track(second.clone()).unwrap().order, 2);
        assert_eq!(playlist.entries.track_ids(), vec![first, second]);
    }

    #[test]
    fn add_track_twice_is_a_duplicate() {
        let mut playlist = playlist();
        let track = TrackId::generate();
        playlist.add_track(track.clone()).unwrap();

        let err = playlist.add_track(track).unwrap_err();
        assert!(matches!(err, SetlistError::Duplicate(_)));
        assert_eq!(playlist.entries.len(), 1);
    }

    #[test]
    fn remove_renumbers_remaining_entries() {
        let mut playlist = playlist();
        let ids: Vec<TrackId> = (0..3).map(|_| TrackId::generate()).collect();
        for id in &ids {
            playlist.add_track(id.clone()).unwrap();
        }

        playlist.remove_track(&ids[1]).unwrap();

        assert_eq!(
            orders(&playlist),
            vec![(ids[0].clone(), 1), (ids[2].clone(), 2)]
        );
    }

    #[test]
    fn remove_missing_entry_fails_without_change() {
        let mut playlist = playlist();
        playlist.add_track(TrackId::generate()).unwrap();
        let before = playlist.clone();

        let err = playlist.remove_track(&TrackId::generate()).unwrap_err();

        assert!(matches!(err, SetlistError::TrackNotInPlaylist { .. }));
        assert_eq!(playlist, before);
    }

    #[test]
    fn move_entry_shifts_neighbours() {
        let mut playlist = playlist();
        let ids: Vec<TrackId> = (0..4).map(|_| TrackId::generate()).collect();
        for id in &ids {
            playlist.add_track(id.clone()).unwrap();
        }

        let entry = playlist
            .update_entry(
                &ids[3],
                UpdatePlaylistEntry {
                    order: Some(2),
                    added_at: None,
                },
            )
            .unwrap();

        assert_eq!(entry.order, 2);
        assert_eq!(
            playlist.entries.track_ids(),
            vec![ids[0].clone(), ids[3].clone(), ids[1].clone(), ids[2].clone()]
        );
        let positions: Vec<u32> = orders(&playlist).into_iter().map(|(_, o)| o).collect();
        assert_eq!(positions, vec![1, 2, 3, 4]);
    }

    #[test]
    fn update_entry_validates_input() {
        let mut playlist = playlist();
        let track = TrackId::generate();
        playlist.add_track(track.clone()).unwrap();

        let empty = playlist.update_entry(&track, UpdatePlaylistEntry::default());
        assert!(matches!(empty, Err(SetlistError::InvalidInput(_))));

        let out_of_range = playlist.update_entry(
            &track,
            UpdatePlaylistEntry {
                order: Some(2),
                added_at: None,
            },
        );
        assert!(matches!(out_of_range, Err(SetlistError::InvalidInput(_))));
    }

    #[test]
    fn update_entry_overrides_added_at() {
        let mut playlist = playlist();
        let track = TrackId::generate();
        playlist.add_track(track.clone()).unwrap();
        let stamp = DateTime::parse_from_rfc3339("2020-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);

        let entry = playlist
            .update_entry(
                &track,
                UpdatePlaylistEntry {
                    order: None,
                    added_at: Some(stamp),
                },
            )
            .unwrap();

        assert_eq!(entry.added_at, stamp);
        assert_eq!(entry.order, 1);
    }

    #[test]
    fn stored_entries_are_normalized_on_load() {
        let track = TrackId::generate();
        let other = TrackId::generate();
        let at = now();
        let raw = vec![
            PlaylistEntry {
                track_id: other.clone(),
                order: 7,
                added_at: at,
            },
            PlaylistEntry {
                track_id: track.clone(),
                order: 3,
                added_at: at,
            },
            PlaylistEntry {
                track_id: track.clone(),
                order: 9,
                added_at: at,
            },
        ];

        let entries = PlaylistEntries::from(raw);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries.track_ids(), vec![track.clone(), other.clone()]);
        assert_eq!(entries.get(&track).unwrap().order, 1);
        assert_eq!(entries.get(&other).unwrap().order, 2);
    }

    #[test]
    fn add_request_shapes() {
        let id = TrackId::generate();
        assert_eq!(
            AddPlaylistTrack::existing(&id).into_source().unwrap(),
            TrackSource::Existing(id.clone())
        );

        let both = AddPlaylistTrack {
            track_id: Some(id.to_string()),
            title: Some("Song".to_string()),
            ..Default::default()
        };
        assert!(matches!(both.into_source(), Err(SetlistError::InvalidInput(_))));

        let neither = AddPlaylistTrack::default();
        assert!(matches!(neither.into_source(), Err(SetlistError::InvalidInput(_))));

        let malformed = AddPlaylistTrack {
            track_id: Some("abc".to_string()),
            ..Default::default()
        };
        assert!(matches!(malformed.into_source(), Err(SetlistError::InvalidInput(_))));

        let untitled = AddPlaylistTrack {
            artist: Some("Queen".to_string()),
            ..Default::default()
        };
        assert!(matches!(untitled.into_source(), Err(SetlistError::InvalidInput(_))));

        let new = AddPlaylistTrack::new_track(CreateTrack::titled("Song"));
        assert!(matches!(new.into_source(), Ok(TrackSource::New(_))));
    }

    #[test]
    fn resolve_skips_dangling_entries() {
        let mut playlist = playlist();
        let known = Track::create(CreateTrack::titled("Known")).unwrap();
        playlist.add_track(TrackId::generate()).unwrap();
        playlist.add_track(known.id.clone()).unwrap();

        let tracks = HashMap::from([(known.id.clone(), known.clone())]);
        let view = playlist.resolve(&tracks);

        assert_eq!(view.tracks.len(), 1);
        assert_eq!(view.tracks[0].track, known);
        assert_eq!(view.tracks[0].order, 2);
    }
}

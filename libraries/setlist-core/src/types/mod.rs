//! Setlist domain types

mod ids;
mod playback;
mod playlist;
mod track;

pub use ids::{OwnerId, PlaybackId, PlaylistId, TrackId};
pub use playback::{CreatePlayback, PlaybackRecord, PlaybackView, UpdatePlayback};
pub use playlist::{
    resolve_entries, AddPlaylistTrack, AddedTrack, CreatePlaylist, Playlist, PlaylistEntries,
    PlaylistEntry, PlaylistTrackView, PlaylistView, TrackSource, UpdatePlaylist,
    UpdatePlaylistEntry,
};
pub use track::{CreateTrack, Track, TrackMetadata, UpdateTrack};

use chrono::{DateTime, SubsecRound, Utc};

/// Current time at the millisecond precision documents are stored with
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

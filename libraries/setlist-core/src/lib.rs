//! Setlist Core
//!
//! Storage-agnostic domain types, validation, and error handling for the
//! Setlist playlist service.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `Playlist` (with embedded, track-keyed
//!   entries), `PlaybackRecord`
//! - **Linking Rules**: duplicate prevention, append ordering, moves and
//!   renumbering live on `Playlist` so every store applies them the same way
//! - **Storage Trait**: `StorageContext`, implemented by `setlist-storage`
//! - **Error Handling**: unified `SetlistError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use setlist_core::types::{CreatePlaylist, Playlist, TrackId};
//!
//! let mut playlist = Playlist::create(CreatePlaylist {
//!     name: "Road Trip Mix".to_string(),
//!     ..Default::default()
//! })
//! .unwrap();
//!
//! let entry = playlist.add_track(TrackId::generate()).unwrap();
//! assert_eq!(entry.order, 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod policy;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use error::{Result, SetlistError};
pub use policy::OwnerPolicy;
pub use storage::StorageContext;

pub use types::{
    AddPlaylistTrack, AddedTrack, CreatePlayback, CreatePlaylist, CreateTrack, OwnerId,
    PlaybackId, PlaybackRecord, PlaybackView, Playlist, PlaylistEntries, PlaylistEntry,
    PlaylistId, PlaylistTrackView, PlaylistView, Track, TrackId, TrackMetadata, TrackSource,
    UpdatePlayback, UpdatePlaylist, UpdatePlaylistEntry, UpdateTrack,
};

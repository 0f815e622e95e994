//! Catalog access: album folders, their track listings and filename parsing.
//!
//! Everything that talks to the music server goes through the [`Fetch`]
//! trait so the strategies here can be exercised without a network.

mod albums;
mod fetch;
mod listing;
mod name;
mod path;
mod tracks;

pub use albums::{Album, AlbumDirectory, AlbumInfo, ListedAlbums, StaticAlbums, album_directory_for, load_albums};
pub use fetch::{Fetch, HttpFetcher};
pub use name::{TrackName, UNKNOWN_ARTIST, decode_reference};
pub use path::{encode_folder, source_for, track_from_source};
pub use tracks::{DirectoryListingSource, ManifestSource, TrackSource, load_tracks, track_source_for};

#[cfg(test)]
pub(crate) use fetch::MemoryFetcher;

//! Track listing strategies.
//!
//! A folder's tracks come either from a `songs.json` manifest or from the
//! server's HTML directory listing. Both sit behind [`TrackSource`] so the
//! rest of the player does not care which one is configured.

use crate::config::{CatalogSettings, TrackListing};
use crate::error::CatalogResult;

use super::fetch::Fetch;
use super::listing::anchor_targets;
use super::path::encode_folder;

/// Produces the ordered track filenames of one folder.
pub trait TrackSource: Send + Sync {
    fn list(&self, fetcher: &dyn Fetch, folder: &str) -> CatalogResult<Vec<String>>;
}

/// Reads `/<folder>/songs.json`, a JSON array of filenames.
pub struct ManifestSource;

impl TrackSource for ManifestSource {
    fn list(&self, fetcher: &dyn Fetch, folder: &str) -> CatalogResult<Vec<String>> {
        let body = fetcher.get_text(&format!("/{}/songs.json", encode_folder(folder)))?;
        let tracks: Vec<String> = serde_json::from_str(&body)?;
        Ok(tracks)
    }
}

/// Scrapes `/<folder>/` and keeps links to audio files inside that folder.
pub struct DirectoryListingSource {
    extensions: Vec<String>,
}

impl DirectoryListingSource {
    pub fn new(extensions: &[String]) -> Self {
        let extensions = extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self { extensions }
    }

    fn is_audio(&self, name: &str) -> bool {
        name.rsplit_once('.')
            .map(|(_, ext)| {
                let ext = ext.to_ascii_lowercase();
                self.extensions.iter().any(|e| *e == ext)
            })
            .unwrap_or(false)
    }
}

impl TrackSource for DirectoryListingSource {
    fn list(&self, fetcher: &dyn Fetch, folder: &str) -> CatalogResult<Vec<String>> {
        let listing_path = format!("/{}/", encode_folder(folder));
        let page = fetcher.url_for(&listing_path)?;
        let html = fetcher.get_text(&listing_path)?;

        let tracks = anchor_targets(&html, &page)
            .into_iter()
            .filter_map(|url| {
                url.path()
                    .strip_prefix(page.path())
                    .filter(|rest| !rest.is_empty() && !rest.contains('/'))
                    .map(str::to_string)
            })
            .filter(|name| self.is_audio(name))
            .collect();
        Ok(tracks)
    }
}

/// Build the configured [`TrackSource`].
pub fn track_source_for(settings: &CatalogSettings) -> Box<dyn TrackSource> {
    match settings.tracks {
        TrackListing::Manifest => Box::new(ManifestSource),
        TrackListing::DirectoryListing => Box::new(DirectoryListingSource::new(&settings.extensions)),
    }
}

/// List `folder` with `source`, degrading to an empty playlist on failure.
pub fn load_tracks(source: &dyn TrackSource, fetcher: &dyn Fetch, folder: &str) -> Vec<String> {
    match source.list(fetcher, folder) {
        Ok(tracks) => {
            tracing::info!(folder, count = tracks.len(), "loaded track listing");
            tracks
        }
        Err(e) => {
            tracing::warn!(folder, error = %e, "could not load track listing");
            Vec::new()
        }
    }
}

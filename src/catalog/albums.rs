//! Album folders and their `info.json` metadata.

use serde::Deserialize;

use crate::config::{AlbumListing, CatalogSettings};
use crate::error::CatalogResult;

use super::fetch::Fetch;
use super::listing::anchor_targets;
use super::name::decode_reference;
use super::path::encode_folder;

/// Contents of `/<root>/<folder>/info.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct AlbumInfo {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// One album card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Album {
    /// Folder name under the catalog root (decoded).
    pub folder: String,
    pub title: String,
    pub description: String,
    /// Server path of the cover image.
    pub cover: String,
}

impl Album {
    /// Folder path used for track listings, e.g. `songs/Anuv`.
    pub fn track_folder(&self, root: &str) -> String {
        format!("{}/{}", root.trim_matches('/'), self.folder)
    }
}

/// Produces the ordered list of album folder names.
pub trait AlbumDirectory: Send + Sync {
    fn folders(&self, fetcher: &dyn Fetch, root: &str) -> CatalogResult<Vec<String>>;
}

/// A fixed, configured list of folders.
pub struct StaticAlbums(pub Vec<String>);

impl AlbumDirectory for StaticAlbums {
    fn folders(&self, _fetcher: &dyn Fetch, _root: &str) -> CatalogResult<Vec<String>> {
        Ok(self.0.clone())
    }
}

/// Folders scraped from the root's directory listing.
pub struct ListedAlbums;

impl AlbumDirectory for ListedAlbums {
    fn folders(&self, fetcher: &dyn Fetch, root: &str) -> CatalogResult<Vec<String>> {
        let root = root.trim_matches('/');
        let listing_path = format!("/{}/", encode_folder(root));
        let page = fetcher.url_for(&listing_path)?;
        let html = fetcher.get_text(&listing_path)?;

        let marker = listing_path.clone();
        let root_name = root.rsplit('/').next().unwrap_or(root);
        let mut folders: Vec<String> = Vec::new();
        for url in anchor_targets(&html, &page) {
            let path = url.path();
            if !path.contains(&marker) || path.contains(".htaccess") {
                continue;
            }
            // Directory links end in '/', so the folder is the second-to-last segment.
            let segments: Vec<&str> = path.split('/').collect();
            let Some(segment) = segments.len().checked_sub(2).map(|i| segments[i]) else {
                continue;
            };
            let folder = decode_reference(segment).into_owned();
            if folder.is_empty() || folder == root_name || folders.contains(&folder) {
                continue;
            }
            folders.push(folder);
        }
        Ok(folders)
    }
}

/// Build the configured [`AlbumDirectory`].
pub fn album_directory_for(settings: &CatalogSettings) -> Box<dyn AlbumDirectory> {
    match settings.albums {
        AlbumListing::Static => Box::new(StaticAlbums(settings.folders.clone())),
        AlbumListing::DirectoryListing => Box::new(ListedAlbums),
    }
}

fn fetch_album(fetcher: &dyn Fetch, root: &str, folder: &str) -> CatalogResult<Album> {
    let base = format!("/{}", encode_folder(&format!("{root}/{folder}")));
    let body = fetcher.get_text(&format!("{base}/info.json"))?;
    let info: AlbumInfo = serde_json::from_str(&body)?;
    Ok(Album {
        folder: folder.to_string(),
        title: info.title,
        description: info.description,
        cover: format!("{base}/cover.jpg"),
    })
}

/// Load every album in `directory`, handing each card to `on_album` as soon as
/// its metadata arrives.
///
/// A folder whose `info.json` cannot be read is logged and skipped. Returns the
/// number of albums delivered.
pub fn load_albums(
    directory: &dyn AlbumDirectory,
    fetcher: &dyn Fetch,
    root: &str,
    mut on_album: impl FnMut(Album),
) -> usize {
    let folders = match directory.folders(fetcher, root) {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!(root, error = %e, "could not list album folders");
            return 0;
        }
    };

    let mut delivered = 0;
    for folder in folders {
        match fetch_album(fetcher, root, &folder) {
            Ok(album) => {
                delivered += 1;
                on_album(album);
            }
            Err(e) => tracing::warn!(folder, error = %e, "could not load album info"),
        }
    }
    tracing::info!(count = delivered, "album directory loaded");
    delivered
}

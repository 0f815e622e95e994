//! Server paths for folders and audio sources.
//!
//! A source is `/<folder>/<encoded filename>`; the helpers here build it and
//! take it apart again so the current track can be found in the playlist.

use super::name::decode_reference;

/// Percent-encode every segment of a folder path, keeping the separators.
pub fn encode_folder(folder: &str) -> String {
    folder
        .trim_matches('/')
        .split('/')
        .map(|segment| urlencoding::encode(&decode_reference(segment)).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Source path for `track` inside `folder`.
pub fn source_for(folder: &str, track: &str) -> String {
    let decoded = decode_reference(track);
    format!("/{}/{}", encode_folder(folder), urlencoding::encode(&decoded))
}

/// Reverse [`source_for`]: the decoded filename, if `source` lives in `folder`.
pub fn track_from_source(folder: &str, source: &str) -> Option<String> {
    let prefix = format!("/{}/", encode_folder(folder));
    source
        .strip_prefix(&prefix)
        .map(|rest| decode_reference(rest).into_owned())
}

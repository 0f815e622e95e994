//! Case-insensitive substring search over album cards and playlist rows.

use crate::catalog::Album;

use super::model::TrackRow;

/// True when any of `fields` contains `query`, ignoring case. Whitespace in
/// the query is significant; only an empty query matches everything.
pub fn matches_query(query: &str, fields: &[&str]) -> bool {
    if query.is_empty() {
        return true;
    }
    let query = query.to_lowercase();
    fields.iter().any(|f| f.to_lowercase().contains(&query))
}

/// Album cards match on title or description.
pub fn album_matches(album: &Album, query: &str) -> bool {
    matches_query(query, &[&album.title, &album.description])
}

/// Playlist rows match on song title or artist.
pub fn row_matches(row: &TrackRow, query: &str) -> bool {
    matches_query(query, &[&row.name.title, &row.name.artist])
}

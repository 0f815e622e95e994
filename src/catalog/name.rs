//! Display names derived from raw track filenames.
//!
//! Filenames on the server look like `Song Title - Artist Name - 320 Kbps.mp3`.
//! The parser drops the extension and bitrate annotations, then splits on the
//! first hyphen.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// Artist shown when a filename carries no hyphen-separated artist part.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

const AUDIO_EXTENSIONS: [&str; 6] = ["mp3", "flac", "wav", "ogg", "m4a", "aac"];

// "- 320 Kbps" first, then a bare " 128 Kbps" left over when there was no hyphen.
static HYPHEN_BITRATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)-\s*\d+\s*kbps").expect("valid bitrate regex"));
static BARE_BITRATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*\d+\s*kbps").expect("valid bitrate regex"));

/// Title and artist extracted from a filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackName {
    pub title: String,
    pub artist: String,
}

impl TrackName {
    /// Parse an already-decoded filename.
    pub fn parse(filename: &str) -> Self {
        let stem = strip_audio_extension(filename.trim());
        let stem = HYPHEN_BITRATE.replace_all(stem, "");
        let stem = BARE_BITRATE.replace_all(&stem, "");

        let mut parts = stem.trim().split('-');
        let title = parts.next().unwrap_or_default().trim().to_string();
        let artist = match parts.next() {
            Some(a) => a.trim().to_string(),
            None => UNKNOWN_ARTIST.to_string(),
        };

        Self { title, artist }
    }

    /// Decode a raw (possibly percent-encoded) reference, then parse it.
    pub fn from_reference(raw: &str) -> Self {
        Self::parse(&decode_reference(raw))
    }
}

/// Percent-decode a track reference. Undecodable input is returned as-is.
pub fn decode_reference(raw: &str) -> Cow<'_, str> {
    let trimmed = raw.trim();
    match urlencoding::decode(trimmed) {
        Ok(decoded) => decoded,
        Err(e) => {
            tracing::debug!(reference = raw, error = %e, "track reference is not valid UTF-8 once decoded");
            Cow::Borrowed(trimmed)
        }
    }
}

fn strip_audio_extension(name: &str) -> &str {
    if let Some((stem, ext)) = name.rsplit_once('.') {
        let ext = ext.to_ascii_lowercase();
        if AUDIO_EXTENSIONS.iter().any(|e| *e == ext) {
            return stem;
        }
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_artist_and_hyphenated_bitrate() {
        let name = TrackName::parse("Song Title - Artist Name - 320 Kbps.mp3");
        assert_eq!(name.title, "Song Title");
        assert_eq!(name.artist, "Artist Name");
    }

    #[test]
    fn bare_bitrate_without_hyphen_falls_back_to_unknown_artist() {
        let name = TrackName::parse("Track Only 128 Kbps.mp3");
        assert_eq!(name.title, "Track Only");
        assert_eq!(name.artist, UNKNOWN_ARTIST);
    }

    #[test]
    fn artist_is_only_the_segment_after_the_first_hyphen() {
        let name = TrackName::parse("Tum Hi Ho - Arijit Singh - Aashiqui 2.mp3");
        assert_eq!(name.title, "Tum Hi Ho");
        assert_eq!(name.artist, "Arijit Singh");
    }

    #[test]
    fn bitrate_glued_to_artist_is_removed() {
        let name = TrackName::parse("Kesariya -Arijit Singh 128 Kbps.mp3");
        assert_eq!(name.title, "Kesariya");
        assert_eq!(name.artist, "Arijit Singh");
    }

    #[test]
    fn extension_is_case_insensitive_and_optional() {
        assert_eq!(TrackName::parse("Intro.MP3").title, "Intro");
        assert_eq!(TrackName::parse("Intro.flac").title, "Intro");
        assert_eq!(TrackName::parse("Intro").title, "Intro");
        // Not an audio extension, keep it.
        assert_eq!(TrackName::parse("Mr. Brightside").title, "Mr. Brightside");
    }

    #[test]
    fn parsing_cleaned_pairs_is_idempotent() {
        for raw in [
            "Song Title - Artist Name - 320 Kbps.mp3",
            "Track Only 128 Kbps.mp3",
            "  Spaced  -  Out  .mp3",
        ] {
            let first = TrackName::parse(raw);
            let again = if first.artist == UNKNOWN_ARTIST {
                TrackName::parse(&first.title)
            } else {
                TrackName::parse(&format!("{} - {}", first.title, first.artist))
            };
            assert_eq!(first, again, "re-parsing {raw:?}");
        }
    }

    #[test]
    fn references_are_decoded_before_parsing() {
        let name = TrackName::from_reference("Song%20Title%20-%20Artist%20Name.mp3");
        assert_eq!(name.title, "Song Title");
        assert_eq!(name.artist, "Artist Name");
    }

    #[test]
    fn undecodable_reference_is_kept_verbatim() {
        assert_eq!(decode_reference("bad%FFname.mp3"), "bad%FFname.mp3");
        assert_eq!(decode_reference(" plain.mp3 "), "plain.mp3");
    }
}

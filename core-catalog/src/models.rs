//! Domain records received from the upstream catalog.
//!
//! All of these are immutable value records: they are deserialized from the
//! upstream wire format (field names match it one-to-one), passed through
//! the proxy unchanged, and never mutated locally. Ratings are bounded 0-100
//! by upstream convention but not enforced here.

use serde::{Deserialize, Serialize};

/// A charting artist.
///
/// `artist_id` is the handle for every downstream lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub artist_id: i64,
    pub artist_name: String,
    #[serde(default)]
    pub artist_country: String,
    #[serde(default)]
    pub artist_alias_list: Vec<String>,
}

/// An album, denormalized with its owning artist's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub album_id: i64,
    pub album_name: String,
    #[serde(default)]
    pub album_release_date: String,
    #[serde(default)]
    pub album_rating: i64,
    pub artist_id: i64,
    #[serde(default)]
    pub artist_name: String,
}

/// A track, denormalized with its owning album and artist names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub track_id: i64,
    pub track_name: String,
    #[serde(default)]
    pub track_rating: i64,
    pub album_id: i64,
    #[serde(default)]
    pub album_name: String,
    pub artist_id: i64,
    #[serde(default)]
    pub artist_name: String,
}

/// Lyrics for a track.
///
/// An empty `lyrics_body` means "not available" rather than absent. The two
/// tracking URLs are opaque pass-through values, never rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lyrics {
    pub lyrics_id: i64,
    #[serde(default)]
    pub lyrics_body: String,
    #[serde(default)]
    pub lyrics_language: String,
    #[serde(default)]
    pub lyrics_copyright: String,
    #[serde(default)]
    pub script_tracking_url: String,
    #[serde(default)]
    pub pixel_tracking_url: String,
    #[serde(default)]
    pub updated_time: String,
}

impl Lyrics {
    /// Whether there is renderable lyric text.
    pub fn has_body(&self) -> bool {
        !self.lyrics_body.trim().is_empty()
    }
}

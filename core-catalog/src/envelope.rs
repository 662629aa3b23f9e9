//! Strict decoding of the upstream response envelope.
//!
//! Every upstream call is wrapped as `message.header.status_code` plus
//! `message.body.<named list or record>`, where list elements are themselves
//! wrapped (`{"artist": {...}}`). This module validates that shape with
//! typed deserialization and fails closed on any structural mismatch; the
//! client maps those failures to `UpstreamUnavailable`.

use crate::models::{Album, Artist, Lyrics, Track};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Upstream status code signalling success.
pub(crate) const UPSTREAM_STATUS_OK: i64 = 200;

/// Upstream status code signalling the requested record does not exist.
pub(crate) const UPSTREAM_STATUS_NOT_FOUND: i64 = 404;

#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    pub message: Message,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Message {
    pub header: Header,
    /// Left untyped here: empty results arrive as `[]` rather than an
    /// object, so the body is validated per call.
    #[serde(default)]
    pub body: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Header {
    pub status_code: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ArtistListBody {
    pub artist_list: Vec<ArtistEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ArtistEntry {
    pub artist: Artist,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AlbumListBody {
    pub album_list: Vec<AlbumEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AlbumEntry {
    pub album: Album,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TrackListBody {
    pub track_list: Vec<TrackEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TrackEntry {
    pub track: Track,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LyricsBody {
    pub lyrics: Lyrics,
}

/// Parses the outer envelope from a raw response body.
pub(crate) fn parse_envelope(bytes: &[u8]) -> Result<Envelope, serde_json::Error> {
    serde_json::from_slice(bytes)
}

/// Deserializes a validated body into its typed form.
pub(crate) fn decode_body<B: DeserializeOwned>(
    body: serde_json::Value,
) -> Result<B, serde_json::Error> {
    serde_json::from_value(body)
}

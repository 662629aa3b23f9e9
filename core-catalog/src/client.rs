//! Upstream Catalog API Client
//!
//! Translates domain calls (list top artists, list an artist's albums, list
//! an album's tracks, get a track's lyrics) into parameterized HTTP requests
//! against the catalog API and unwraps the response envelope into plain
//! domain lists/records.
//!
//! ## API Endpoints
//!
//! - **Chart artists**: `{base}/chart.artists.get?country={cc}&page={p}&page_size={n}`
//! - **Artist albums**: `{base}/artist.albums.get?artist_id={id}&s_release_date=desc`
//! - **Album tracks**: `{base}/album.tracks.get?album_id={id}`
//! - **Track lyrics**: `{base}/track.lyrics.get?track_id={id}`
//! - **Track search**: `{base}/track.search?q={query}&s_track_rating=desc`
//!
//! ## API Key Requirement
//!
//! The catalog API requires an API key, attached as the `apikey` query
//! parameter on every call together with `format=json`.
//!
//! ## Error Policy
//!
//! One attempt per call, no retry, no caching. Any transport failure,
//! non-2xx status, or envelope shape mismatch fails closed with
//! [`CatalogError::UpstreamUnavailable`]; the underlying detail is logged
//! here and never surfaced to callers.

use crate::envelope::{
    decode_body, parse_envelope, AlbumListBody, ArtistListBody, Envelope, LyricsBody,
    TrackListBody, UPSTREAM_STATUS_NOT_FOUND, UPSTREAM_STATUS_OK,
};
use crate::error::{CatalogError, Result};
use crate::models::{Album, Artist, Lyrics, Track};
use core_runtime::http::{HttpClient, HttpMethod, HttpRequest};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Timeout for upstream API requests.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// First page of any listing.
pub const DEFAULT_PAGE: u32 = 1;

/// Page size for the chart artist listing.
pub const DEFAULT_ARTIST_PAGE_SIZE: u32 = 10;

/// Page size for an artist's album listing (latest releases only).
pub const DEFAULT_ALBUM_PAGE_SIZE: u32 = 3;

/// Page size for an album's track listing.
pub const DEFAULT_TRACK_PAGE_SIZE: u32 = 20;

/// Page size for track search results.
pub const DEFAULT_SEARCH_PAGE_SIZE: u32 = 20;

/// Client for the upstream catalog API.
///
/// Stateless apart from its credential; cheap to share behind an `Arc`.
pub struct MusixmatchClient {
    http_client: Arc<dyn HttpClient>,
    api_key: String,
    base_url: String,
}

impl MusixmatchClient {
    /// Creates a new catalog client.
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP seam for issuing requests
    /// * `api_key` - upstream API credential
    /// * `base_url` - catalog API base URL (see
    ///   [`core_runtime::config::MUSIXMATCH_API_BASE`])
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    /// Lists the top charting artists for a country.
    pub async fn list_chart_artists(
        &self,
        country: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<Artist>> {
        let envelope = self
            .get_envelope(
                "chart.artists.get",
                &[
                    ("country", country.to_string()),
                    ("page", page.to_string()),
                    ("page_size", page_size.to_string()),
                ],
                "artists",
            )
            .await?;

        let body: ArtistListBody = self.expect_body(envelope, "artists")?;
        Ok(body.artist_list.into_iter().map(|e| e.artist).collect())
    }

    /// Lists an artist's albums, newest releases first when `newest_first`.
    pub async fn list_artist_albums(
        &self,
        artist_id: i64,
        page: u32,
        page_size: u32,
        newest_first: bool,
    ) -> Result<Vec<Album>> {
        let mut params = vec![
            ("artist_id", artist_id.to_string()),
            ("page", page.to_string()),
            ("page_size", page_size.to_string()),
        ];
        if newest_first {
            params.push(("s_release_date", "desc".to_string()));
        }

        let envelope = self
            .get_envelope("artist.albums.get", &params, "albums")
            .await?;

        let body: AlbumListBody = self.expect_body(envelope, "albums")?;
        Ok(body.album_list.into_iter().map(|e| e.album).collect())
    }

    /// Lists an album's tracks.
    pub async fn list_album_tracks(
        &self,
        album_id: i64,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<Track>> {
        let envelope = self
            .get_envelope(
                "album.tracks.get",
                &[
                    ("album_id", album_id.to_string()),
                    ("page", page.to_string()),
                    ("page_size", page_size.to_string()),
                ],
                "tracks",
            )
            .await?;

        let body: TrackListBody = self.expect_body(envelope, "tracks")?;
        Ok(body.track_list.into_iter().map(|e| e.track).collect())
    }

    /// Fetches lyrics for a track.
    ///
    /// Returns `Ok(None)` when the upstream has no lyrics record for the
    /// track. A record with an empty body is still `Some`: "empty" is a
    /// rendering concern, not an absence.
    pub async fn get_track_lyrics(&self, track_id: i64) -> Result<Option<Lyrics>> {
        let envelope = self
            .get_envelope(
                "track.lyrics.get",
                &[("track_id", track_id.to_string())],
                "lyrics",
            )
            .await?;

        if envelope.message.header.status_code == UPSTREAM_STATUS_NOT_FOUND {
            debug!(track_id, "no lyrics record for track");
            return Ok(None);
        }

        let body: LyricsBody = self.expect_body(envelope, "lyrics")?;
        Ok(Some(body.lyrics))
    }

    /// Searches tracks by free-text query, best rated first.
    pub async fn search_tracks(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<Track>> {
        let envelope = self
            .get_envelope(
                "track.search",
                &[
                    ("q", query.to_string()),
                    ("page", page.to_string()),
                    ("page_size", page_size.to_string()),
                    ("s_track_rating", "desc".to_string()),
                ],
                "tracks",
            )
            .await?;

        let body: TrackListBody = self.expect_body(envelope, "tracks")?;
        Ok(body.track_list.into_iter().map(|e| e.track).collect())
    }

    /// Issues one GET and parses the outer envelope.
    async fn get_envelope(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
        resource: &'static str,
    ) -> Result<Envelope> {
        let mut url = format!(
            "{}/{}?apikey={}&format=json",
            self.base_url,
            endpoint,
            urlencoding::encode(&self.api_key)
        );
        for (key, value) in params {
            url.push_str(&format!("&{}={}", key, urlencoding::encode(value)));
        }

        debug!(endpoint, resource, "querying upstream catalog");

        let request = HttpRequest::new(HttpMethod::Get, url)
            .header("Accept", "application/json")
            .timeout(REQUEST_TIMEOUT);

        let response = self.http_client.execute(request).await.map_err(|e| {
            warn!(resource, error = %e, "upstream catalog request failed");
            CatalogError::unavailable(resource)
        })?;

        if !response.is_success() {
            warn!(
                resource,
                status = response.status,
                "upstream catalog returned error status"
            );
            return Err(CatalogError::unavailable(resource));
        }

        parse_envelope(&response.body).map_err(|e| {
            warn!(resource, error = %e, "upstream envelope failed validation");
            CatalogError::unavailable(resource)
        })
    }

    /// Validates the envelope status and decodes the named body.
    fn expect_body<B: serde::de::DeserializeOwned>(
        &self,
        envelope: Envelope,
        resource: &'static str,
    ) -> Result<B> {
        let status = envelope.message.header.status_code;
        if status != UPSTREAM_STATUS_OK {
            warn!(resource, status, "upstream reported non-success status");
            return Err(CatalogError::unavailable(resource));
        }

        decode_body(envelope.message.body).map_err(|e| {
            warn!(resource, error = %e, "upstream body failed validation");
            CatalogError::unavailable(resource)
        })
    }
}

//! Gateway to the proxy server's browse endpoints.
//!
//! The proxy wraps every success body under a resource key (`{"artists":
//! [...]}`) and every failure as `{"error": "..."}`; this module decodes
//! both shapes and nothing else.

use crate::error::{GatewayError, Result};
use async_trait::async_trait;
use core_catalog::models::{Album, Artist, Lyrics, Track};
use core_runtime::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client-side contract over the proxy's browse endpoints.
///
/// One method per disclosure tier. Implementations perform exactly one
/// request per call; memoization belongs to the panels, not the gateway.
#[async_trait]
pub trait BrowseGateway: Send + Sync {
    async fn fetch_chart_artists(&self, country: &str) -> Result<Vec<Artist>>;
    async fn fetch_artist_albums(&self, artist_id: i64) -> Result<Vec<Album>>;
    async fn fetch_album_tracks(&self, album_id: i64) -> Result<Vec<Track>>;
    async fn fetch_track_lyrics(&self, track_id: i64) -> Result<Option<Lyrics>>;
}

#[derive(Debug, Deserialize)]
struct ArtistsResponse {
    artists: Vec<Artist>,
}

#[derive(Debug, Deserialize)]
struct AlbumsResponse {
    albums: Vec<Album>,
}

#[derive(Debug, Deserialize)]
struct TracksResponse {
    tracks: Vec<Track>,
}

#[derive(Debug, Deserialize)]
struct LyricsResponse {
    lyrics: Option<Lyrics>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Production [`BrowseGateway`] over the HTTP seam.
pub struct HttpBrowseGateway {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
}

impl HttpBrowseGateway {
    pub fn new(http_client: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    async fn get<T: DeserializeOwned>(&self, path_and_query: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path_and_query);
        debug!(%url, "fetching from proxy");

        let request = HttpRequest::new(HttpMethod::Get, url)
            .header("Accept", "application/json")
            .timeout(REQUEST_TIMEOUT);

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        if !response.is_success() {
            return Err(Self::rejection_from(&response));
        }

        response
            .json()
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }

    fn rejection_from(response: &HttpResponse) -> GatewayError {
        let message = match response.json::<ErrorResponse>() {
            Ok(body) => body.error,
            Err(_) => {
                warn!(status = response.status, "proxy error body was not JSON");
                "unexpected proxy response".to_string()
            }
        };
        GatewayError::Rejected {
            status: response.status,
            message,
        }
    }
}

#[async_trait]
impl BrowseGateway for HttpBrowseGateway {
    async fn fetch_chart_artists(&self, country: &str) -> Result<Vec<Artist>> {
        let response: ArtistsResponse = self
            .get(&format!(
                "/musixmatch/artists?country={}",
                urlencoding::encode(country)
            ))
            .await?;
        Ok(response.artists)
    }

    async fn fetch_artist_albums(&self, artist_id: i64) -> Result<Vec<Album>> {
        let response: AlbumsResponse = self
            .get(&format!("/musixmatch/albums?artistId={}", artist_id))
            .await?;
        Ok(response.albums)
    }

    async fn fetch_album_tracks(&self, album_id: i64) -> Result<Vec<Track>> {
        let response: TracksResponse = self
            .get(&format!("/musixmatch/tracks?albumId={}", album_id))
            .await?;
        Ok(response.tracks)
    }

    async fn fetch_track_lyrics(&self, track_id: i64) -> Result<Option<Lyrics>> {
        let response: LyricsResponse = self
            .get(&format!("/musixmatch/lyrics?trackId={}", track_id))
            .await?;
        Ok(response.lyrics)
    }
}

//! Child sources for each disclosure tier.

use crate::error::Result;
use crate::gateway::BrowseGateway;
use crate::panel::ChildSource;
use async_trait::async_trait;
use core_catalog::models::{Album, Lyrics, Track};
use std::sync::Arc;

/// Placeholder text a shell renders for a lyrics panel in the `Empty` state.
pub const LYRICS_UNAVAILABLE_TEXT: &str = "Lyrics not available for this track";

/// Albums nested under an artist row.
pub struct AlbumsOfArtist {
    gateway: Arc<dyn BrowseGateway>,
    artist_id: i64,
}

impl AlbumsOfArtist {
    pub fn new(gateway: Arc<dyn BrowseGateway>, artist_id: i64) -> Self {
        Self { gateway, artist_id }
    }
}

#[async_trait]
impl ChildSource for AlbumsOfArtist {
    type Child = Album;

    fn describe(&self) -> String {
        format!("albums of artist {}", self.artist_id)
    }

    async fn load(&self) -> Result<Vec<Album>> {
        self.gateway.fetch_artist_albums(self.artist_id).await
    }
}

/// Tracks nested under an album row.
pub struct TracksOfAlbum {
    gateway: Arc<dyn BrowseGateway>,
    album_id: i64,
}

impl TracksOfAlbum {
    pub fn new(gateway: Arc<dyn BrowseGateway>, album_id: i64) -> Self {
        Self { gateway, album_id }
    }
}

#[async_trait]
impl ChildSource for TracksOfAlbum {
    type Child = Track;

    fn describe(&self) -> String {
        format!("tracks of album {}", self.album_id)
    }

    async fn load(&self) -> Result<Vec<Track>> {
        self.gateway.fetch_album_tracks(self.album_id).await
    }
}

/// Lyrics nested under a track row.
///
/// A track with no lyrics record, or a record with an empty body, yields no
/// children, so the panel lands in `Empty` and the shell renders
/// [`LYRICS_UNAVAILABLE_TEXT`].
pub struct LyricsOfTrack {
    gateway: Arc<dyn BrowseGateway>,
    track_id: i64,
}

impl LyricsOfTrack {
    pub fn new(gateway: Arc<dyn BrowseGateway>, track_id: i64) -> Self {
        Self { gateway, track_id }
    }
}

#[async_trait]
impl ChildSource for LyricsOfTrack {
    type Child = Lyrics;

    fn describe(&self) -> String {
        format!("lyrics of track {}", self.track_id)
    }

    async fn load(&self) -> Result<Vec<Lyrics>> {
        let lyrics = self.gateway.fetch_track_lyrics(self.track_id).await?;
        Ok(lyrics.into_iter().filter(Lyrics::has_body).collect())
    }
}

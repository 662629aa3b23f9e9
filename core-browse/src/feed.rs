//! # Artist Feed
//!
//! The top tier of the browser. Unlike the nested panels it fetches
//! eagerly at mount, and unlike them it surfaces failure to the user with a
//! retry affordance instead of collapsing silently.

use crate::error::Result;
use crate::gateway::BrowseGateway;
use core_catalog::models::Artist;
use std::sync::Arc;
use tracing::warn;

/// Message shown when the chart cannot be loaded.
pub const FEED_FAILED_TEXT: &str = "Could not load the artist chart";

/// Where the feed is in its load lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedState {
    /// Initial state, and the state during any fetch.
    Loading,
    Loaded(Vec<Artist>),
    /// Fetch failed; `message` is user-facing.
    Failed { message: String },
}

/// Eagerly-loading chart artist list.
pub struct ArtistFeed {
    gateway: Arc<dyn BrowseGateway>,
    country: Option<String>,
    state: FeedState,
}

impl ArtistFeed {
    /// Creates a feed in the `Loading` state; call
    /// [`load`](Self::load) with the session's country at mount.
    pub fn new(gateway: Arc<dyn BrowseGateway>) -> Self {
        Self {
            gateway,
            country: None,
            state: FeedState::Loading,
        }
    }

    /// Fetches the chart for a country.
    pub async fn load(&mut self, country: &str) {
        self.country = Some(country.to_string());
        self.state = FeedState::Loading;
        self.state = match self.gateway.fetch_chart_artists(country).await {
            Ok(artists) => FeedState::Loaded(artists),
            Err(e) => {
                warn!(country, error = %e, "artist chart load failed");
                FeedState::Failed {
                    message: FEED_FAILED_TEXT.to_string(),
                }
            }
        };
    }

    /// Re-fetches after a failure. A no-op in any other state.
    pub async fn retry(&mut self) {
        if !matches!(self.state, FeedState::Failed { .. }) {
            return;
        }
        let country = match self.country.clone() {
            Some(country) => country,
            None => return,
        };
        self.load(&country).await;
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub fn artists(&self) -> Option<&[Artist]> {
        match &self.state {
            FeedState::Loaded(artists) => Some(artists),
            _ => None,
        }
    }
}

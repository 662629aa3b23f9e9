//! # Browse Controller Module
//!
//! Client-side fetch controllers for the chart browser's cascading
//! disclosure UI: artists expand into albums, albums into tracks, tracks
//! into lyrics.
//!
//! ## Overview
//!
//! The top tier is the eager [`ArtistFeed`](feed::ArtistFeed); every nested
//! tier is a lazy [`DisclosurePanel`](panel::DisclosurePanel) that fetches
//! its children exactly once, on first expansion, through a
//! [`ChildSource`](panel::ChildSource). All network access goes through the
//! [`BrowseGateway`](gateway::BrowseGateway) trait, whose production
//! implementation talks to the proxy server.
//!
//! Panels share no state: no common cache, no locks, no cross-panel
//! coordination. Sibling panels fetching concurrently is the
//! normal case, and a panel's memory of having fetched dies with it.

pub mod error;
pub mod feed;
pub mod gateway;
pub mod panel;
pub mod sources;

pub use error::{GatewayError, Result};
pub use feed::{ArtistFeed, FeedState, FEED_FAILED_TEXT};
pub use gateway::{BrowseGateway, HttpBrowseGateway};
pub use panel::{ChildSource, DisclosurePanel, PanelState};
pub use sources::{AlbumsOfArtist, LyricsOfTrack, TracksOfAlbum, LYRICS_UNAVAILABLE_TEXT};

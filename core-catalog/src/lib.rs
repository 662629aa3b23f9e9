//! # Upstream Catalog Module
//!
//! Client for the external music catalog API (Musixmatch-compatible wire
//! format): top chart artists by country, an artist's albums, an album's
//! tracks, and a track's lyrics.
//!
//! ## Overview
//!
//! The [`MusixmatchClient`](client::MusixmatchClient) translates domain
//! calls into parameterized GET requests with the API-key credential
//! attached, and unwraps the upstream `message.body.<name>` envelope down to
//! plain domain records. Structural mismatches fail closed with
//! [`CatalogError::UpstreamUnavailable`](error::CatalogError), which carries
//! no upstream diagnostic detail.

pub mod client;
pub mod envelope;
pub mod error;
pub mod models;

pub use client::MusixmatchClient;
pub use error::{CatalogError, Result};
pub use models::{Album, Artist, Lyrics, Track};

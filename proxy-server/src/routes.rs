//! Route handlers for the proxy surface.
//!
//! Two rules hold on every path:
//!
//! - A missing or unparseable required id is answered with 400 and the
//!   exact `<Name> ID is required` message, before any upstream call.
//! - Upstream failure detail never reaches the client: catalog errors
//!   become a generic `Failed to fetch <resource>` at 500 and the cause is
//!   recorded only in the server logs. The one exception is an identity
//!   rejection, whose message is user-safe and passed through verbatim.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use core_auth::{AuthError, IdentityProvider};
use core_catalog::client::{
    DEFAULT_ALBUM_PAGE_SIZE, DEFAULT_ARTIST_PAGE_SIZE, DEFAULT_PAGE, DEFAULT_TRACK_PAGE_SIZE,
};
use core_catalog::MusixmatchClient;
use core_runtime::config::DEFAULT_COUNTRY;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::error;

/// Shared handler state.
pub struct AppState {
    pub catalog: Arc<MusixmatchClient>,
    pub identity: Arc<dyn IdentityProvider>,
}

/// Builds the full proxy router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/musixmatch/artists", get(list_artists))
        .route("/musixmatch/albums", get(list_albums))
        .route("/musixmatch/tracks", get(list_tracks))
        .route("/musixmatch/lyrics", get(get_lyrics))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/health", get(health))
        .with_state(state)
}

type Params = HashMap<String, String>;

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn fetch_failed(resource: &str) -> Response {
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        &format!("Failed to fetch {}", resource),
    )
}

/// Pulls a required numeric id out of the query string.
///
/// `name` is the user-facing noun for the 400 message ("Artist", "Album",
/// "Track").
fn require_id(params: &Params, key: &str, name: &str) -> Result<i64, Response> {
    params
        .get(key)
        .and_then(|raw| raw.parse().ok())
        .ok_or_else(|| {
            error_response(
                StatusCode::BAD_REQUEST,
                &format!("{} ID is required", name),
            )
        })
}

/// Optional paging parameter, falling back on absent or unparseable input.
fn page_param(params: &Params, key: &str, default: u32) -> u32 {
    params
        .get(key)
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}

async fn list_artists(State(state): State<Arc<AppState>>, Query(params): Query<Params>) -> Response {
    let country = params
        .get("country")
        .map(String::as_str)
        .unwrap_or(DEFAULT_COUNTRY);
    let page = page_param(&params, "page", DEFAULT_PAGE);
    let page_size = page_param(&params, "pageSize", DEFAULT_ARTIST_PAGE_SIZE);

    match state
        .catalog
        .list_chart_artists(country, page, page_size)
        .await
    {
        Ok(artists) => (StatusCode::OK, Json(json!({ "artists": artists }))).into_response(),
        Err(e) => {
            error!(error = %e, country, "artist chart fetch failed");
            fetch_failed("artists")
        }
    }
}

async fn list_albums(State(state): State<Arc<AppState>>, Query(params): Query<Params>) -> Response {
    let artist_id = match require_id(&params, "artistId", "Artist") {
        Ok(id) => id,
        Err(response) => return response,
    };
    let page = page_param(&params, "page", DEFAULT_PAGE);
    let page_size = page_param(&params, "pageSize", DEFAULT_ALBUM_PAGE_SIZE);

    match state
        .catalog
        .list_artist_albums(artist_id, page, page_size, true)
        .await
    {
        Ok(albums) => (StatusCode::OK, Json(json!({ "albums": albums }))).into_response(),
        Err(e) => {
            error!(error = %e, artist_id, "album list fetch failed");
            fetch_failed("albums")
        }
    }
}

async fn list_tracks(State(state): State<Arc<AppState>>, Query(params): Query<Params>) -> Response {
    let album_id = match require_id(&params, "albumId", "Album") {
        Ok(id) => id,
        Err(response) => return response,
    };
    let page = page_param(&params, "page", DEFAULT_PAGE);
    let page_size = page_param(&params, "pageSize", DEFAULT_TRACK_PAGE_SIZE);

    match state
        .catalog
        .list_album_tracks(album_id, page, page_size)
        .await
    {
        Ok(tracks) => (StatusCode::OK, Json(json!({ "tracks": tracks }))).into_response(),
        Err(e) => {
            error!(error = %e, album_id, "track list fetch failed");
            fetch_failed("tracks")
        }
    }
}

async fn get_lyrics(State(state): State<Arc<AppState>>, Query(params): Query<Params>) -> Response {
    let track_id = match require_id(&params, "trackId", "Track") {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.catalog.get_track_lyrics(track_id).await {
        // `None` serializes to a JSON null under the key.
        Ok(lyrics) => (StatusCode::OK, Json(json!({ "lyrics": lyrics }))).into_response(),
        Err(e) => {
            error!(error = %e, track_id, "lyrics fetch failed");
            fetch_failed("lyrics")
        }
    }
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

async fn login(State(state): State<Arc<AppState>>, Json(body): Json<LoginRequest>) -> Response {
    let (email, password) = match (body.email, body.password) {
        (Some(email), Some(password)) => (email, password),
        _ => {
            return error_response(StatusCode::BAD_REQUEST, "Email and password are required");
        }
    };

    match state.identity.sign_in(&email, &password).await {
        Ok(session) => (StatusCode::OK, Json(json!({ "user": session.user }))).into_response(),
        // The provider's rejection message is user-safe and passed through.
        Err(AuthError::Rejected(message)) => error_response(StatusCode::BAD_REQUEST, &message),
        Err(e) => {
            error!(error = %e, "login failed against identity provider");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

async fn logout(State(state): State<Arc<AppState>>) -> Response {
    match state.identity.sign_out().await {
        Ok(()) => (StatusCode::OK, Json(json!({}))).into_response(),
        Err(e) => {
            error!(error = %e, "logout failed against identity provider");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

async fn health() -> Response {
    (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response()
}

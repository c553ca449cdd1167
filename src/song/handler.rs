//! HTTP Handlers for the Song API

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

use super::{CreateSong, NewSong, Song, SongFilter, Songs};
use crate::error::{ApiError, ErrorResponse};
use crate::handler::AppState;
use crate::pagination::{DEFAULT_LIMIT, DEFAULT_OFFSET, PaginationParams, first_value, safe_slice};

/// Decoded query string. Never rejects: repeated keys keep their first value.
type QueryPairs = Query<Vec<(String, String)>>;

fn list_params(pairs: &[(String, String)]) -> (SongFilter, PaginationParams) {
    (
        SongFilter {
            group: first_value(pairs, "group"),
            song: first_value(pairs, "song"),
        },
        PaginationParams::from_pairs(pairs),
    )
}

fn parse_song_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .map_err(|e| ApiError::BadRequest(format!("couldn't parse song id {raw:?}: {e}")))
}

/// Decodes a JSON body whatever its `Content-Type` says.
fn payload<T: DeserializeOwned>(body: &[u8], what: &str) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(format!("couldn't parse {what}: {e}")))
}

/// Get songs with optional filters and pagination
#[utoipa::path(
    get,
    path = "/song/list",
    tag = "song",
    params(
        ("group" = Option<String>, Query, description = "Group name, case-insensitive substring"),
        ("song" = Option<String>, Query, description = "Song title, case-insensitive substring"),
        ("limit" = Option<i64>, Query, description = "Page size, at most 10"),
        ("offset" = Option<i64>, Query, description = "Rows to skip"),
    ),
    responses(
        (status = 200, description = "Matching songs", body = [Song]),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn list_songs(
    State(state): State<AppState>,
    Query(pairs): QueryPairs,
) -> Result<Json<Vec<Song>>, ApiError> {
    let (filter, page) = list_params(&pairs);
    let (limit, offset) = page.limit_and_offset(DEFAULT_LIMIT, DEFAULT_OFFSET);

    let songs = Songs::new(state.db.connection())
        .list_songs(&filter, limit, offset)
        .await
        .map_err(|e| ApiError::Storage("couldn't get songs", e))?;

    tracing::info!(count = songs.len(), limit, offset, "listed songs");
    Ok(Json(songs))
}

/// Get the verses of a song with pagination
#[utoipa::path(
    get,
    path = "/song/{id}/text",
    tag = "song",
    params(
        ("id" = i64, Path, description = "Song ID"),
        ("limit" = Option<i64>, Query, description = "Verses per page, at most 10"),
        ("offset" = Option<i64>, Query, description = "Verses to skip"),
    ),
    responses(
        (status = 200, description = "Verses", body = [String]),
        (status = 400, description = "Bad id or negative range", body = ErrorResponse),
        (status = 404, description = "Unknown song", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn get_song_text(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(pairs): QueryPairs,
) -> Result<Json<Vec<String>>, ApiError> {
    let id = parse_song_id(&id)?;

    let song = Songs::new(state.db.connection())
        .get_song(id)
        .await
        .map_err(|e| ApiError::Storage("couldn't get song", e))?;

    let verses = song.verses();
    if verses.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let (limit, offset) =
        PaginationParams::from_pairs(&pairs).limit_and_offset(DEFAULT_LIMIT, DEFAULT_OFFSET);
    let page = safe_slice(offset, limit, &verses)?;

    Ok(Json(page.iter().map(|v| v.to_string()).collect()))
}

/// Delete a song by ID
#[utoipa::path(
    delete,
    path = "/song/{id}/delete",
    tag = "song",
    params(("id" = i64, Path, description = "Song ID")),
    responses(
        (status = 204, description = "Deleted, or never existed"),
        (status = 400, description = "Bad id", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn delete_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_song_id(&id)?;

    Songs::new(state.db.connection())
        .delete_song(id)
        .await
        .map_err(|e| ApiError::Storage("couldn't delete song", e))?;

    tracing::info!(id, "deleted song");
    Ok(StatusCode::NO_CONTENT)
}

/// Replace every field of a song
#[utoipa::path(
    put,
    path = "/song/{id}/edit",
    tag = "song",
    params(("id" = i64, Path, description = "Song ID")),
    request_body = Song,
    responses(
        (status = 200, description = "Stored song", body = Song),
        (status = 400, description = "Bad id or body", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn edit_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Song>, ApiError> {
    let id = parse_song_id(&id)?;
    let mut song: Song = payload(&body, "song")?;
    song.id = id;

    let saved = Songs::new(state.db.connection())
        .save_song(&song)
        .await
        .map_err(|e| ApiError::Storage("couldn't update song", e))?;

    tracing::info!(id, "updated song");
    Ok(Json(saved))
}

/// Add a new song, enriched from the song detail service
#[utoipa::path(
    post,
    path = "/song/create",
    tag = "song",
    request_body = NewSong,
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Bad body", body = ErrorResponse),
        (status = 500, description = "Enrichment or storage failure", body = ErrorResponse),
    )
)]
pub async fn create_song(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    let new_song: NewSong = payload(&body, "song")?;

    let detail = state
        .details
        .fetch_detail(&new_song.group, &new_song.song)
        .await
        .map_err(|e| ApiError::Enrichment("couldn't get song detail", e))?;

    let created = Songs::new(state.db.connection())
        .create_song(CreateSong::enriched(new_song, detail))
        .await
        .map_err(|e| ApiError::Storage("couldn't create song", e))?;

    tracing::info!(id = created.id, group = %created.group, song = %created.song, "created song");
    Ok(StatusCode::CREATED.into_response())
}

//! Song Module
//!
//! Storage, HTTP handlers and routes for the song catalogue. A song is a
//! group/title pair enriched at creation time with its release date, lyrics
//! and a link fetched from the song detail service.
//!
//! # Usage
//!
//! ```rust,ignore
//! use songbook::song;
//!
//! for (name, sql) in song::migrations() {
//!     conn.execute_batch(sql).await?;
//! }
//!
//! let app = Router::new()
//!     .nest("/song", song::routes())
//!     .with_state(app_state);
//!
//! let songs = song::Songs::new(connection);
//! let found = songs.list_songs(&SongFilter::default(), 10, 0).await?;
//! ```

mod handler;
mod model;
mod repository;
mod routes;

pub use model::*;
pub use repository::Songs;
pub use routes::routes;

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Music Library API",
        version = "1.0",
        description = "API for managing music library"
    ),
    paths(
        handler::list_songs,
        handler::get_song_text,
        handler::delete_song,
        handler::edit_song,
        handler::create_song
    ),
    components(schemas(Song, NewSong, crate::error::ErrorResponse)),
    tags((name = "song", description = "Song catalogue"))
)]
pub struct ApiDoc;

pub fn migrations() -> &'static [(&'static str, &'static str)] {
    &[("song_001_schema.sql", include_str!("migrations/001_schema.sql"))]
}

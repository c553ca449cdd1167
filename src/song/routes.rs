use axum::{
    Router,
    routing::{delete, get, post, put},
};

use super::handler;
use crate::handler::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/list", get(handler::list_songs))
        .route("/:id/text", get(handler::get_song_text))
        .route("/:id/delete", delete(handler::delete_song))
        .route("/:id/edit", put(handler::edit_song))
        .route("/create", post(handler::create_song))
}

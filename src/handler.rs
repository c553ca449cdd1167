use std::sync::Arc;

use axum::{Json, Router, http::Method, response::IntoResponse, routing::get};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::db::Database;
use crate::enrichment::SongDetailClient;
use crate::docs;
use crate::song;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub details: Arc<SongDetailClient>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

pub async fn healthcheck() -> impl IntoResponse {
    info!("got healthcheck request");
    Json(StatusResponse { status: "ok" })
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .route("/", get(healthcheck))
        .nest("/song", song::routes())
        .merge(docs::routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

//! OpenAPI description of the song API, served under `/swagger`.

use axum::{
    Json, Router,
    response::{Html, IntoResponse},
    routing::get,
};
use utoipa::OpenApi;

use crate::handler::AppState;
use crate::song::ApiDoc;

pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

pub async fn swagger_ui() -> Html<&'static str> {
    Html(
        r##"
        <!doctype html>
        <html>
            <head>
                <title>Music Library API</title>
                <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
            </head>
            <body>
                <div id="swagger-ui"></div>
                <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
                <script>
                    window.onload = () => {
                        window.ui = SwaggerUIBundle({ url: "/swagger/doc.json", dom_id: "#swagger-ui" });
                    };
                </script>
            </body>
        </html>
        "##,
    )
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/swagger", get(swagger_ui))
        .route("/swagger/", get(swagger_ui))
        .route("/swagger/index.html", get(swagger_ui))
        .route("/swagger/doc.json", get(openapi_json))
}

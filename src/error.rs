use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PaginationError {
    #[error("limit or offset can't be less than 0")]
    InvalidRange,
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("song {0} not found")]
    NotFound(i64),
    #[error("query failed")]
    Query(#[from] libsql::Error),
    #[error("malformed row: {0}")]
    Decode(String),
}

#[derive(Debug, thiserror::Error)]
pub enum EnrichmentError {
    #[error("song detail service unavailable")]
    Unavailable(#[source] reqwest::Error),
    #[error("song detail service responded with {0}")]
    Upstream(reqwest::StatusCode),
    #[error("malformed song detail")]
    Decode(#[from] serde_json::Error),
}

/// Everything a handler can fail with. Each variant knows its status code.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("couldn't parse limit and offset")]
    Pagination(#[from] PaginationError),
    #[error("{0}")]
    Storage(&'static str, #[source] StorageError),
    #[error("{0}")]
    Enrichment(&'static str, #[source] EnrichmentError),
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Pagination(_) => StatusCode::BAD_REQUEST,
            ApiError::Storage(_, StorageError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Storage(..) | ApiError::Enrichment(..) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = crate::unpack_error(&self);

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %message, "request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %message, "rejected request");
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::BadRequest("couldn't parse song id".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(PaginationError::InvalidRange).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Storage("couldn't get song", StorageError::NotFound(3)).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Storage("couldn't get songs", StorageError::Decode("id".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Enrichment(
                "couldn't get song detail",
                EnrichmentError::Upstream(reqwest::StatusCode::BAD_GATEWAY)
            )
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_message_includes_cause_chain() {
        let err = ApiError::Storage("couldn't get song", StorageError::NotFound(42));
        assert_eq!(crate::unpack_error(&err), "couldn't get song: song 42 not found");

        let err = ApiError::from(PaginationError::InvalidRange);
        assert_eq!(
            crate::unpack_error(&err),
            "couldn't parse limit and offset: limit or offset can't be less than 0"
        );
    }
}

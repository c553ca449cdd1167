//! Client for the third-party song detail service.
//!
//! The service answers `GET <url>?group=<group>&song=<song>` with
//! `{"releaseDate": ..., "text": ..., "link": ...}`. Calls are made once per
//! song creation with no retry.

use reqwest::Client;

use crate::error::EnrichmentError;
use crate::song::SongDetail;

pub struct SongDetailClient {
    client: Client,
    url: String,
}

impl SongDetailClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), url)
    }

    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn fetch_detail(&self, group: &str, song: &str) -> Result<SongDetail, EnrichmentError> {
        tracing::debug!(group, song, "fetching song detail");

        let response = self
            .client
            .get(&self.url)
            .query(&[("group", group), ("song", song)])
            .send()
            .await
            .map_err(EnrichmentError::Unavailable)?;

        let status = response.status();
        if !status.is_success() {
            return Err(EnrichmentError::Upstream(status));
        }

        let body = response.bytes().await.map_err(EnrichmentError::Unavailable)?;
        let detail: SongDetail = serde_json::from_slice(&body)?;

        Ok(detail)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use axum::http::StatusCode;

    const DETAIL: &str = r#"{
        "releaseDate": "16.07.2006",
        "text": "Ooh baby, don't you know I suffer?\n\nOoh baby, can you hear me moan?",
        "link": "https://www.youtube.com/watch?v=Xsp3_a-PMTw"
    }"#;

    #[tokio::test]
    async fn test_fetch_detail() {
        let (url, calls) = spawn_detail_service(StatusCode::OK, DETAIL).await;
        let client = SongDetailClient::new(url);

        let detail = client.fetch_detail("Muse", "Supermassive Black Hole").await.unwrap();
        assert_eq!(detail.release_date, "16.07.2006");
        assert!(detail.text.starts_with("Ooh baby"));
        assert_eq!(detail.link, "https://www.youtube.com/watch?v=Xsp3_a-PMTw");

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0]["group"], "Muse");
        assert_eq!(calls[0]["song"], "Supermassive Black Hole");
    }

    #[tokio::test]
    async fn test_query_values_are_encoded() {
        let (url, calls) = spawn_detail_service(StatusCode::OK, DETAIL).await;
        let client = SongDetailClient::new(url);

        client.fetch_detail("AC/DC & Friends", "Who? #1 = 100%").await.unwrap();

        let calls = calls.lock().unwrap();
        assert_eq!(calls[0]["group"], "AC/DC & Friends");
        assert_eq!(calls[0]["song"], "Who? #1 = 100%");
        assert_eq!(calls[0].len(), 2);
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let (url, _) = spawn_detail_service(StatusCode::NOT_FOUND, "{}").await;
        let client = SongDetailClient::new(url);

        let err = client.fetch_detail("Muse", "Unknown").await.unwrap_err();
        assert!(matches!(err, EnrichmentError::Upstream(s) if s == StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let (url, _) = spawn_detail_service(StatusCode::OK, "not json").await;
        let client = SongDetailClient::new(url);

        let err = client.fetch_detail("Muse", "Hysteria").await.unwrap_err();
        assert!(matches!(err, EnrichmentError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_service() {
        let client = SongDetailClient::new(closed_endpoint().await);

        let err = client.fetch_detail("Muse", "Hysteria").await.unwrap_err();
        assert!(matches!(err, EnrichmentError::Unavailable(_)));
    }
}

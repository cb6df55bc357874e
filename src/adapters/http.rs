use crate::core::validator::ingest_feed;
use crate::domain::model::FeatureCollection;
use crate::utils::error::{QuakeError, Result};
use reqwest::Client;
use std::time::Duration;

/// One-shot GET of the earthquake feed. No retries.
#[derive(Debug, Clone)]
pub struct FeedClient {
    client: Client,
}

impl Default for FeedClient {
    fn default() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl FeedClient {
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    pub async fn fetch(&self, url: &str) -> Result<FeatureCollection> {
        tracing::debug!("Making feed request to: {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        tracing::debug!("Feed response status: {}", status);

        if !status.is_success() {
            return Err(QuakeError::FeedUnavailableError {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        tracing::debug!("Feed body: {} bytes", body.len());
        ingest_feed(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_fetch_parses_feature_collection() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/all_month.geojson");
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(serde_json::json!({
                        "type": "FeatureCollection",
                        "features": [
                            {"properties": {"mag": 2.1, "place": "a"}, "geometry": {"coordinates": [1, 2, 3]}}
                        ]
                    }));
            })
            .await;

        let client = FeedClient::new(None).unwrap();
        let collection = client
            .fetch(&server.url("/all_month.geojson"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(collection.features.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_fails_on_error_status() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/feed");
                then.status(503);
            })
            .await;

        let err = FeedClient::default()
            .fetch(&server.url("/feed"))
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert!(matches!(
            err,
            QuakeError::FeedUnavailableError { status: 503, .. }
        ));
    }

    #[tokio::test]
    async fn test_fetch_fails_on_non_json_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/feed");
                then.status(200).body("<html>maintenance</html>");
            })
            .await;

        let err = FeedClient::default()
            .fetch(&server.url("/feed"))
            .await
            .unwrap_err();

        assert!(matches!(err, QuakeError::FeedFormatError(_)));
    }
}

use std::time::Duration;

use reqwest::{Client, ClientBuilder};
use tracing::{debug, warn};
use url::Url;

use super::{ApiFailure, AtlasApi, CreateRequest, Created, CreationResult};
use crate::{constants::USER_AGENT, error::Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Talks to the Atlas REST API over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpAtlasClient {
    client: Client,
    endpoint: Url,
}

impl HttpAtlasClient {
    pub fn new(endpoint: &str) -> Result<Self> {
        let client = ClientBuilder::new()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Self::with_client(client, endpoint)
    }

    pub fn with_client(client: Client, endpoint: &str) -> Result<Self> {
        // A trailing slash keeps `join` from dropping the last path segment.
        let endpoint = Url::parse(&format!("{}/", endpoint.trim_end_matches('/')))?;
        Ok(Self { client, endpoint })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn measurements_url(&self) -> Result<Url> {
        Ok(self.endpoint.join("api/v2/measurements/")?)
    }

    pub fn results_url(&self, measurement_id: u64) -> Result<Url> {
        Ok(self
            .endpoint
            .join(&format!("api/v2/measurements/{measurement_id}/results/"))?)
    }

    /// Human-facing page of a measurement.
    pub fn measurement_page(&self, measurement_id: u64) -> String {
        format!(
            "{}/measurements/{measurement_id}/",
            self.endpoint.as_str().trim_end_matches('/')
        )
    }
}

impl AtlasApi for HttpAtlasClient {
    async fn create(&self, key: &str, request: &CreateRequest<'_>) -> CreationResult {
        let mut url = match self.measurements_url() {
            Ok(url) => url,
            Err(e) => {
                return CreationResult::Failed(ApiFailure {
                    http_msg: Some(e.to_string()),
                    additional_msg: None,
                });
            }
        };
        url.query_pairs_mut().append_pair("key", key);

        debug!(
            body = %serde_json::to_string(request).unwrap_or_default(),
            "Creating measurement at {}",
            self.endpoint
        );

        let response = match self.client.post(url).json(request).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Measurement creation request failed: {e}");
                return CreationResult::Failed(ApiFailure {
                    http_msg: Some(e.to_string()),
                    additional_msg: None,
                });
            }
        };

        let status = response.status();
        debug!("Creation endpoint answered {status}");

        if !status.is_success() {
            let http_msg = format!(
                "HTTP Error {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            );
            return CreationResult::Failed(ApiFailure {
                http_msg: Some(http_msg),
                additional_msg: response.text().await.ok(),
            });
        }

        match response.json::<Created>().await {
            Ok(created) if !created.measurements.is_empty() => CreationResult::Created(created),
            Ok(_) => CreationResult::Failed(ApiFailure::default()),
            Err(e) => CreationResult::Failed(ApiFailure {
                http_msg: Some(e.to_string()),
                additional_msg: None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::{
        config::Config,
        measurement::{MeasureOptions, MeasurementPlan, MeasurementType, build_plan},
    };

    fn plan() -> MeasurementPlan {
        let options = MeasureOptions {
            kind: MeasurementType::Ping,
            target: Some("example.com".to_string()),
            ..Default::default()
        };
        build_plan(&options, &Config::default()).unwrap()
    }

    #[test]
    fn test_urls() {
        let client = HttpAtlasClient::new("https://atlas.ripe.net").unwrap();
        assert_eq!(
            client.measurements_url().unwrap().as_str(),
            "https://atlas.ripe.net/api/v2/measurements/"
        );
        assert_eq!(
            client.results_url(42).unwrap().as_str(),
            "https://atlas.ripe.net/api/v2/measurements/42/results/"
        );
        assert_eq!(
            client.measurement_page(42),
            "https://atlas.ripe.net/measurements/42/"
        );

        let client = HttpAtlasClient::new("https://atlas.example.net/prefix/").unwrap();
        assert_eq!(
            client.measurements_url().unwrap().as_str(),
            "https://atlas.example.net/prefix/api/v2/measurements/"
        );
    }

    #[test]
    fn test_invalid_endpoint() {
        assert!(HttpAtlasClient::new("not a url").is_err());
    }

    #[tokio::test]
    async fn test_create_success() {
        let server = MockServer::start_async().await;
        let plan = plan();

        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/v2/measurements/")
                    .query_param("key", "secret")
                    .json_body(json!({
                        "definitions": [{
                            "type": "ping",
                            "af": 4,
                            "description": "",
                            "target": "example.com",
                            "is_oneoff": true,
                            "packets": 3,
                            "size": 48
                        }],
                        "probes": [{ "type": "area", "value": "WW", "requested": 50 }],
                        "is_oneoff": true
                    }));
                then.status(201).json_body(json!({ "measurements": [1234567] }));
            })
            .await;

        let client = HttpAtlasClient::new(&server.base_url()).unwrap();
        let result = client.create("secret", &CreateRequest::from(&plan)).await;

        mock.assert_async().await;
        assert_eq!(
            result,
            CreationResult::Created(Created {
                measurements: vec![1234567]
            })
        );
        assert!(result.is_success());
    }

    #[tokio::test]
    async fn test_create_rejected() {
        let server = MockServer::start_async().await;
        let plan = plan();

        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v2/measurements/");
                then.status(403)
                    .body(r#"{"error":{"status":403,"message":"Invalid API key"}}"#);
            })
            .await;

        let client = HttpAtlasClient::new(&server.base_url()).unwrap();
        let result = client.create("wrong", &CreateRequest::from(&plan)).await;

        mock.assert_async().await;
        let CreationResult::Failed(failure) = result else {
            panic!("expected a failure");
        };
        assert_eq!(failure.http_msg.as_deref(), Some("HTTP Error 403: Forbidden"));
        assert_eq!(
            failure.additional_msg.as_deref(),
            Some(r#"{"error":{"status":403,"message":"Invalid API key"}}"#)
        );
    }

    #[tokio::test]
    async fn test_create_with_no_ids_is_a_failure() {
        let server = MockServer::start_async().await;
        let plan = plan();

        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v2/measurements/");
                then.status(201).json_body(json!({ "measurements": [] }));
            })
            .await;

        let client = HttpAtlasClient::new(&server.base_url()).unwrap();
        let result = client.create("secret", &CreateRequest::from(&plan)).await;
        assert_eq!(result, CreationResult::Failed(ApiFailure::default()));
    }

    #[tokio::test]
    async fn test_transport_error_is_a_failure() {
        // Port 9 (discard) is closed on test hosts.
        let client = HttpAtlasClient::new("http://127.0.0.1:9").unwrap();
        let plan = plan();
        let result = client.create("secret", &CreateRequest::from(&plan)).await;

        let CreationResult::Failed(failure) = result else {
            panic!("expected a failure");
        };
        assert!(failure.http_msg.is_some());
        assert_eq!(failure.additional_msg, None);
    }
}

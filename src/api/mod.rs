use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::measurement::{MeasurementPlan, MeasurementRequest, SourceSpec};

pub use client::*;
pub use errors::*;

mod client;
mod errors;

/// Body of a measurement creation call.
#[derive(Debug, Clone, Serialize)]
pub struct CreateRequest<'a> {
    pub definitions: Vec<&'a MeasurementRequest>,
    pub probes: Vec<&'a SourceSpec>,
    pub is_oneoff: bool,
}

impl<'a> From<&'a MeasurementPlan> for CreateRequest<'a> {
    fn from(plan: &'a MeasurementPlan) -> Self {
        Self {
            definitions: vec![&plan.request],
            probes: vec![&plan.source],
            is_oneoff: plan.request.is_oneoff,
        }
    }
}

/// Successful creation response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Created {
    pub measurements: Vec<u64>,
}

/// What went wrong while creating a measurement, in the shape the error
/// reporter understands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiFailure {
    /// Transport or HTTP status message
    #[serde(rename = "HTTP_MSG", default, skip_serializing_if = "Option::is_none")]
    pub http_msg: Option<String>,
    /// Raw response body, usually JSON with an `error.message` field
    #[serde(rename = "ADDITIONAL_MSG", default, skip_serializing_if = "Option::is_none")]
    pub additional_msg: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreationResult {
    Created(Created),
    Failed(ApiFailure),
}

impl CreationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, CreationResult::Created(_))
    }
}

/// The remote side of measurement creation. One attempt per call; failures of
/// any kind come back as [`CreationResult::Failed`].
pub trait AtlasApi {
    fn create(
        &self,
        key: &str,
        request: &CreateRequest<'_>,
    ) -> impl Future<Output = CreationResult>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Config,
        measurement::{MeasureOptions, MeasurementType, build_plan},
    };

    #[test]
    fn test_create_request_payload() {
        let options = MeasureOptions {
            kind: MeasurementType::Ping,
            target: Some("example.com".to_string()),
            ..Default::default()
        };
        let plan = build_plan(&options, &Config::default()).unwrap();
        let body = serde_json::to_value(CreateRequest::from(&plan)).unwrap();

        assert_eq!(
            body,
            serde_json::json!({
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
            })
        );
    }

    #[test]
    fn test_failure_payload_field_names() {
        let failure: ApiFailure =
            serde_json::from_str(r#"{"HTTP_MSG": "Forbidden", "ADDITIONAL_MSG": "{}"}"#).unwrap();
        assert_eq!(failure.http_msg.as_deref(), Some("Forbidden"));
        assert_eq!(failure.additional_msg.as_deref(), Some("{}"));

        let failure: ApiFailure = serde_json::from_str("{}").unwrap();
        assert_eq!(failure, ApiFailure::default());
    }
}

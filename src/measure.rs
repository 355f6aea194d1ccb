use colored::*;
use tracing::{debug, info};

use crate::{
    api::{AtlasApi, CreateRequest, CreationResult, HttpAtlasClient, api_error},
    cli::MeasureArgs,
    config::Config,
    error::{Error, Result},
    measurement::{MeasurementPlan, build_plan},
    report::{Report, formatter},
    stream::{PollingResultStream, StreamOutcome, ctrl_c, stream_results},
};

/// Creates a measurement and, for one-offs, streams its results until the
/// probes are done or the user hits Ctrl-C.
pub async fn run_measure(args: MeasureArgs, config: &Config) -> Result<()> {
    let key = api_key(&args, config)?;
    let plan = build_plan(&args.into_options(), config)?;
    let formatter = formatter(&plan.request.kind.to_string())?;

    let client = HttpAtlasClient::new(&config.ripe_ncc.endpoint)?;
    let created_at = chrono::Utc::now().timestamp();
    let measurement_id = submit(&client, &key, &plan).await?;
    info!(measurement_id, "Measurement created");

    println!(
        "{}\n\n  {}",
        "Looking good! Your measurement was created and details about it can be found here:"
            .green(),
        client.measurement_page(measurement_id).cyan()
    );

    if !plan.wait_for_report {
        return Ok(());
    }

    println!("{}", "Connecting to stream...".green());
    let report = match &config.reports.templates {
        Some(dir) => Report::new(dir),
        None => Report::bundled(),
    };
    let mut stream = PollingResultStream::new(&client, measurement_id, &config.streaming)?
        .since(created_at)
        .expecting(plan.source.expected_results());

    let outcome = stream_results(&mut stream, ctrl_c(), |result| {
        formatter.render(&report, result)
    })
    .await?;

    if outcome == StreamOutcome::Interrupted {
        println!("\n{}", "Disconnecting from stream".green());
    }
    Ok(())
}

/// Submits the plan once and returns the id of the created measurement.
pub async fn submit<A: AtlasApi>(api: &A, key: &str, plan: &MeasurementPlan) -> Result<u64> {
    let result = api.create(key, &CreateRequest::from(plan)).await;
    debug!(success = result.is_success(), "Creation request finished");

    match result {
        CreationResult::Created(created) => match created.measurements.first() {
            Some(id) => Ok(*id),
            None => Err(api_error(&Default::default())),
        },
        CreationResult::Failed(failure) => Err(api_error(&failure)),
    }
}

fn api_key(args: &MeasureArgs, config: &Config) -> Result<String> {
    let usable = |key: &&String| !key.is_empty();
    args.auth
        .as_ref()
        .filter(usable)
        .or(config.authorisation.create.as_ref().filter(usable))
        .cloned()
        .ok_or_else(|| {
            Error::MissingArgument(
                "An API key is needed to create measurements. Pass --auth or set \
                 authorisation.create in the configuration file"
                    .to_string(),
            )
        })
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::{
        api::{ApiFailure, Created},
        measurement::{MeasureOptions, MeasurementType},
    };

    struct FakeApi {
        result: CreationResult,
        calls: RefCell<Vec<(String, serde_json::Value)>>,
    }

    impl FakeApi {
        fn answering(result: CreationResult) -> Self {
            Self {
                result,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl AtlasApi for FakeApi {
        async fn create(&self, key: &str, request: &CreateRequest<'_>) -> CreationResult {
            self.calls
                .borrow_mut()
                .push((key.to_string(), serde_json::to_value(request).unwrap()));
            self.result.clone()
        }
    }

    fn plan() -> MeasurementPlan {
        let options = MeasureOptions {
            kind: MeasurementType::Ntp,
            target: Some("pool.ntp.org".to_string()),
            ..Default::default()
        };
        build_plan(&options, &Config::default()).unwrap()
    }

    #[tokio::test]
    async fn test_submit_returns_first_id() {
        let api = FakeApi::answering(CreationResult::Created(Created {
            measurements: vec![555, 556],
        }));

        let id = submit(&api, "secret", &plan()).await.unwrap();
        assert_eq!(id, 555);

        let calls = api.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "secret");
        assert_eq!(calls[0].1["definitions"][0]["type"], "ntp");
        assert_eq!(calls[0].1["definitions"][0]["target"], "pool.ntp.org");
    }

    #[tokio::test]
    async fn test_submit_failure_is_reported() {
        let api = FakeApi::answering(CreationResult::Failed(ApiFailure {
            http_msg: Some("HTTP Error 400: Bad Request".to_string()),
            additional_msg: Some(r#"{"error":{"message":"Target is not allowed"}}"#.to_string()),
        }));

        let err = submit(&api, "secret", &plan()).await.unwrap_err();
        let Error::Api(message) = err else {
            panic!("expected an API error");
        };
        assert!(message.contains("HTTP Error 400: Bad Request"));
        assert!(message.contains("Target is not allowed"));
        assert_eq!(api.calls.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_submit_without_ids() {
        let api = FakeApi::answering(CreationResult::Created(Created {
            measurements: vec![],
        }));
        let err = submit(&api, "secret", &plan()).await.unwrap_err();
        assert!(matches!(err, Error::Api(_)));
    }

    #[test]
    fn test_api_key_resolution() {
        let mut config = Config::default();
        let mut args = MeasureArgs::default();
        assert!(matches!(
            api_key(&args, &config),
            Err(Error::MissingArgument(_))
        ));

        config.authorisation.create = Some("from-config".to_string());
        assert_eq!(api_key(&args, &config).unwrap(), "from-config");

        args.auth = Some("from-cli".to_string());
        assert_eq!(api_key(&args, &config).unwrap(), "from-cli");

        args.auth = Some(String::new());
        assert_eq!(api_key(&args, &config).unwrap(), "from-config");

        config.authorisation.create = Some(String::new());
        assert!(matches!(
            api_key(&args, &config),
            Err(Error::MissingArgument(_))
        ));
    }
}

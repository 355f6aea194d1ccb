//! Live results for a freshly created measurement.

use std::{
    collections::HashSet,
    future::Future,
    time::{Duration, Instant},
};

use reqwest::Client;
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    api::HttpAtlasClient,
    config::Streaming,
    error::{Error, Result},
};

/// A source of measurement results, delivered in batches as they appear.
pub trait ResultStream {
    /// The next batch of unseen results, or `None` once the stream is over.
    fn next_batch(&mut self) -> impl Future<Output = Result<Option<Vec<Value>>>>;
}

/// How a streaming session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOutcome {
    /// The stream ran out of results
    Finished,
    /// The user asked to stop
    Interrupted,
}

/// Feeds every streamed result to `on_result` until the stream ends or
/// `interrupt` completes, whichever comes first.
pub async fn stream_results<S, I, F>(
    stream: &mut S,
    interrupt: I,
    mut on_result: F,
) -> Result<StreamOutcome>
where
    S: ResultStream,
    I: Future<Output = ()>,
    F: FnMut(&Value) -> Result<()>,
{
    let pump = async {
        while let Some(batch) = stream.next_batch().await? {
            debug!("Received {} result(s)", batch.len());
            for result in &batch {
                on_result(result)?;
            }
        }
        Ok::<(), Error>(())
    };

    tokio::select! {
        biased;
        _ = interrupt => Ok(StreamOutcome::Interrupted),
        finished = pump => finished.map(|()| StreamOutcome::Finished),
    }
}

/// Resolves on Ctrl-C. If the signal handler cannot be installed it never resolves.
pub async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Unable to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}

/// Polls the results endpoint of one measurement.
///
/// Results are keyed by probe and timestamp so each is yielded once. The stream
/// ends when the expected number of results has arrived or nothing new shows up
/// for `idle_timeout`.
pub struct PollingResultStream {
    client: Client,
    url: Url,
    start: i64,
    poll_interval: Duration,
    idle_timeout: Duration,
    expected: Option<usize>,
    seen: HashSet<(u64, i64)>,
    last_activity: Instant,
    polled: bool,
}

impl PollingResultStream {
    pub fn new(api: &HttpAtlasClient, measurement_id: u64, settings: &Streaming) -> Result<Self> {
        Ok(Self {
            client: api.client().clone(),
            url: api.results_url(measurement_id)?,
            start: chrono::Utc::now().timestamp(),
            poll_interval: Duration::from_secs(settings.poll_interval),
            idle_timeout: Duration::from_secs(settings.idle_timeout),
            expected: None,
            seen: HashSet::new(),
            last_activity: Instant::now(),
            polled: false,
        })
    }

    /// Only return results stamped at or after `start` (unix seconds).
    pub fn since(mut self, start: i64) -> Self {
        self.start = start;
        self
    }

    /// Stop once this many distinct results have been seen.
    pub fn expecting(mut self, results: u32) -> Self {
        self.expected = Some(results as usize);
        self
    }

    #[cfg(test)]
    fn with_timing(mut self, poll_interval: Duration, idle_timeout: Duration) -> Self {
        self.poll_interval = poll_interval;
        self.idle_timeout = idle_timeout;
        self
    }

    fn is_complete(&self) -> bool {
        self.expected.is_some_and(|expected| self.seen.len() >= expected)
    }

    async fn poll(&self) -> Result<Vec<Value>> {
        let mut url = self.url.clone();
        url.query_pairs_mut()
            .append_pair("start", &self.start.to_string())
            .append_pair("format", "json");
        debug!("GET {url}");

        let results = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<Value>>()
            .await?;
        Ok(results)
    }
}

impl ResultStream for PollingResultStream {
    async fn next_batch(&mut self) -> Result<Option<Vec<Value>>> {
        loop {
            if self.is_complete() {
                info!("All {} expected results received", self.seen.len());
                return Ok(None);
            }
            if self.polled {
                if self.last_activity.elapsed() >= self.idle_timeout {
                    info!("No new results for {:?}, closing stream", self.idle_timeout);
                    return Ok(None);
                }
                sleep(self.poll_interval).await;
            }
            self.polled = true;

            let mut fresh = Vec::new();
            for result in self.poll().await? {
                let key = result["prb_id"].as_u64().zip(result["timestamp"].as_i64());
                match key {
                    Some(key) if self.seen.insert(key) => fresh.push(result),
                    Some(_) => {}
                    None => warn!("Skipping result without probe id or timestamp"),
                }
            }

            if !fresh.is_empty() {
                self.last_activity = Instant::now();
                return Ok(Some(fresh));
            }
        }
    }
}

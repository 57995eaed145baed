use hyper::Uri;
use std::time::{Duration, Instant};

use crate::client::{send_get, to_uri, HttpsClient};
use crate::error::ConfigError;
use crate::models::outcome::{classify, Outcome, Sample};
use crate::models::probe_config::ProbeConfig;

/// Receives one sample per probe iteration.
pub trait ResultSink: Send + Sync {
    fn record(&self, sample: Sample);
}

/// One simulated user's behaviour: GET the protected endpoint, classify the
/// status, report it. Holds no per-request state, so a single probe is
/// shared by every user of a run.
pub struct BulkheadProbe {
    client: HttpsClient,
    target: Uri,
    max_duration: Option<Duration>,
}

impl BulkheadProbe {
    pub fn new(client: HttpsClient, config: &ProbeConfig) -> Result<Self, ConfigError> {
        let url = config.target_url()?;
        let target = to_uri(&url).map_err(|_| ConfigError::InvalidPath(config.path.clone()))?;
        Ok(Self {
            client,
            target,
            max_duration: config.request_timeout(),
        })
    }

    pub fn target(&self) -> &Uri {
        &self.target
    }

    pub async fn run_once(&self) -> Sample {
        let start = Instant::now();
        let outcome = match send_get(&self.client, &self.target, self.max_duration).await {
            Ok(status) => classify(status),
            Err(e) => Outcome::Transport(e),
        };
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        match outcome.failure_message() {
            None => tracing::debug!(elapsed_ms, "request admitted"),
            Some(reason) => tracing::debug!(elapsed_ms, %reason, "request failed"),
        }

        Sample { outcome, elapsed_ms }
    }

    pub async fn run_iteration(&self, sink: &dyn ResultSink) {
        let sample = self.run_once().await;
        sink.record(sample);
    }
}

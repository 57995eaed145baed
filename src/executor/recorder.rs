use std::sync::{LockResult, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Local;

use crate::models::metrics::Metrics;
use crate::models::outcome::{Outcome, Sample};
use crate::models::probe_config::ProbeConfig;
use crate::probe::ResultSink;
use crate::utils::hardware::HardwareInfo;

#[derive(Debug)]
pub struct MetricsRecorder {
    metrics: Mutex<Metrics>,
    response_times: Mutex<Vec<f64>>,
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

// A user task aborted mid-update must not take the whole report down with it.
fn relock<'a, T>(guard: LockResult<MutexGuard<'a, T>>) -> MutexGuard<'a, T> {
    guard.unwrap_or_else(PoisonError::into_inner)
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            metrics: Mutex::new(Metrics::new()),
            response_times: Mutex::new(Vec::new()),
        }
    }

    pub fn snapshot(&self) -> Metrics {
        relock(self.metrics.lock()).clone()
    }

    pub fn finish(
        &self,
        config: &ProbeConfig,
        target_url: &str,
        elapsed: Duration,
        worker: HardwareInfo,
    ) -> Metrics {
        let mut m = relock(self.metrics.lock()).clone();
        let response_times = relock(self.response_times.lock());

        let mut sorted = response_times.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let elapsed_secs = elapsed.as_secs_f64();

        m.name = config.name.clone();
        m.target_url = target_url.to_string();
        m.http_method = "GET".to_string();
        m.duration_secs = config.duration;
        m.users = config.users;
        m.median_response_time = calculate_median(&sorted);
        m.p95_response_time = calculate_percentile(&sorted, 95.0);
        m.elapsed_secs = elapsed_secs;
        m.throughput = if elapsed_secs > 0.0 {
            m.total_requests as f64 / elapsed_secs
        } else {
            0.0
        };
        if m.total_requests == 0 {
            m.fastest_response = 0.0;
            m.slowest_response = 0.0;
        } else {
            m.average_response_time = m.total_duration / m.total_requests as f64;
        }
        m.timestamp = Local::now().format("%Y/%m/%d %H:%M:%S").to_string();
        m.worker = worker;
        m
    }
}

impl ResultSink for MetricsRecorder {
    fn record(&self, sample: Sample) {
        relock(self.response_times.lock()).push(sample.elapsed_ms);

        let mut m = relock(self.metrics.lock());
        m.total_requests += 1;
        m.total_duration += sample.elapsed_ms;

        *m.status_counts.entry(sample.outcome.status_key()).or_insert(0) += 1;

        match &sample.outcome {
            Outcome::Success => m.successful_requests += 1,
            Outcome::BulkheadRejection(_) => m.bulkhead_rejections += 1,
            Outcome::UnexpectedStatus(_) => m.unexpected_statuses += 1,
            Outcome::Transport(_) => m.transport_errors += 1,
        }
        if let Some(reason) = sample.outcome.failure_message() {
            m.failed_requests += 1;
            *m.failures.entry(reason).or_insert(0) += 1;
        }

        if sample.elapsed_ms < m.fastest_response {
            m.fastest_response = sample.elapsed_ms;
        }
        if sample.elapsed_ms > m.slowest_response {
            m.slowest_response = sample.elapsed_ms;
        }
    }
}

pub fn calculate_median(sorted: &[f64]) -> f64 {
    let len = sorted.len();
    if len == 0 {
        return 0.0;
    }
    if len % 2 == 0 {
        (sorted[len / 2 - 1] + sorted[len / 2]) / 2.0
    } else {
        sorted[len / 2]
    }
}

/// Nearest-rank percentile over already sorted data.
pub fn calculate_percentile(sorted: &[f64], pct: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = ((pct / 100.0) * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

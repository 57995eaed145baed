use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task;
use tokio::time::sleep;

use crate::client::build_client;
use crate::error::ConfigError;
use crate::models::metrics::Metrics;
use crate::models::probe_config::{ProbeConfig, MAX_DURATION_SECS};
use crate::probe::{BulkheadProbe, ResultSink};
use crate::utils::hardware::get_hardware_info;

pub mod recorder;
pub mod report;

pub use recorder::MetricsRecorder;

const STOP_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runs `config.users` simulated users against the bulkhead endpoint until the
/// configured duration elapses or `running` is cleared, then returns the
/// aggregated metrics. Requests still in flight at that point are dropped.
pub async fn run_load_test(
    config: ProbeConfig,
    running: Arc<AtomicBool>,
) -> Result<Metrics, ConfigError> {
    config.validate()?;
    let target_url = config.target_url()?.to_string();

    let probe = Arc::new(BulkheadProbe::new(build_client(), &config)?);
    let recorder = Arc::new(MetricsRecorder::new());

    tracing::info!(
        name = %config.name,
        target = %target_url,
        users = config.users,
        duration_secs = config.duration,
        wait_time_ms = config.wait_time_ms,
        "starting load test"
    );

    let started = Instant::now();
    let end_time = started
        .checked_add(config.run_duration())
        .ok_or(ConfigError::DurationTooLong {
            duration: config.duration,
            max: MAX_DURATION_SECS,
        })?;
    let wait_time = config.wait_time();
    let mut handles = Vec::with_capacity(config.users as usize);

    for user in 0..config.users {
        let probe = Arc::clone(&probe);
        let recorder = Arc::clone(&recorder);
        let running = Arc::clone(&running);
        let start_delay = config.spawn_delay(user);

        let handle = task::spawn(async move {
            if !start_delay.is_zero() {
                sleep(start_delay).await;
            }
            run_user(&probe, recorder.as_ref(), wait_time, end_time, &running).await;
        });

        handles.push(handle);
    }

    wait_for_stop(end_time, &running).await;

    for handle in handles.iter() {
        handle.abort();
    }

    for handle in handles {
        let _ = handle.await;
    }

    let elapsed = started.elapsed();
    let metrics = recorder.finish(&config, &target_url, elapsed, get_hardware_info());

    tracing::info!(
        name = %metrics.name,
        total = metrics.total_requests,
        failed = metrics.failed_requests,
        bulkhead_rejections = metrics.bulkhead_rejections,
        rps = metrics.throughput,
        "load test finished"
    );

    Ok(metrics)
}

/// One simulated user. Loops with no pacing beyond `wait_time`.
pub async fn run_user(
    probe: &BulkheadProbe,
    sink: &dyn ResultSink,
    wait_time: Duration,
    end_time: Instant,
    running: &AtomicBool,
) {
    while running.load(Ordering::Relaxed) && Instant::now() < end_time {
        probe.run_iteration(sink).await;

        if wait_time.is_zero() {
            task::yield_now().await;
        } else {
            sleep(wait_time).await;
        }
    }
}

async fn wait_for_stop(end_time: Instant, running: &AtomicBool) {
    loop {
        let now = Instant::now();
        if now >= end_time || !running.load(Ordering::Relaxed) {
            return;
        }
        sleep(STOP_POLL_INTERVAL.min(end_time - now)).await;
    }
}

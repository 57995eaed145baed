use serde::Serialize;
use std::collections::BTreeMap;

use crate::utils::hardware::HardwareInfo;

#[derive(Debug, Default, Clone, Serialize)]
pub struct Metrics {
    pub name: String,
    pub target_url: String,
    pub http_method: String,
    pub duration_secs: u64,
    pub users: u64,

    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub bulkhead_rejections: u64,
    pub unexpected_statuses: u64,
    pub transport_errors: u64,

    pub fastest_response: f64,
    pub slowest_response: f64,
    pub average_response_time: f64,
    pub median_response_time: f64,
    pub p95_response_time: f64,

    pub total_duration: f64,
    pub elapsed_secs: f64,
    pub throughput: f64,

    pub timestamp: String,

    pub status_counts: BTreeMap<String, u64>,
    pub failures: BTreeMap<String, u64>,

    pub worker: HardwareInfo,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            fastest_response: f64::MAX,
            slowest_response: f64::MIN,
            ..Default::default()
        }
    }

    pub fn error_rate(&self) -> f64 {
        if self.total_requests == 0 {
            return 0.0;
        }
        self.failed_requests as f64 / self.total_requests as f64
    }
}

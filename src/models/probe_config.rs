use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_HOST: &str = "http://localhost:8900";
pub const DEFAULT_PATH: &str = "/app/api/products";

pub const MAX_USERS: u64 = 10_000;
/// One week, in seconds.
pub const MAX_DURATION_SECS: u64 = 7 * 24 * 60 * 60;

/// Everything a run needs. Passed to the executor as a value; nothing about
/// the target lives in shared state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub name: String,
    pub host: String,
    pub path: String,
    /// Pause between iterations of one user, in milliseconds.
    pub wait_time_ms: u64,
    pub users: u64,
    /// Seconds.
    pub duration: u64,
    /// Seconds over which user start-up is spread.
    pub ramp_up: u64,
    pub timeout_ms: Option<u64>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            name: "bulkhead".to_string(),
            host: DEFAULT_HOST.to_string(),
            path: DEFAULT_PATH.to_string(),
            wait_time_ms: 0,
            users: 10,
            duration: 30,
            ramp_up: 0,
            timeout_ms: None,
        }
    }
}

impl ProbeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.users == 0 {
            return Err(ConfigError::NoUsers);
        }
        if self.users > MAX_USERS {
            return Err(ConfigError::TooManyUsers { users: self.users, max: MAX_USERS });
        }
        if self.duration == 0 {
            return Err(ConfigError::ZeroDuration);
        }
        if self.duration > MAX_DURATION_SECS {
            return Err(ConfigError::DurationTooLong {
                duration: self.duration,
                max: MAX_DURATION_SECS,
            });
        }
        if self.ramp_up > self.duration {
            return Err(ConfigError::RampUpTooLong {
                ramp_up: self.ramp_up,
                duration: self.duration,
            });
        }
        self.target_url().map(|_| ())
    }

    pub fn target_url(&self) -> Result<Url, ConfigError> {
        let base = Url::parse(&self.host).map_err(|source| ConfigError::InvalidHost {
            host: self.host.clone(),
            source,
        })?;
        match base.scheme() {
            "http" | "https" => {}
            other => return Err(ConfigError::UnsupportedScheme(other.to_string())),
        }
        if !self.path.starts_with('/') {
            return Err(ConfigError::InvalidPath(self.path.clone()));
        }

        // host + path, the way the original runner joined them
        let joined = format!("{}{}", self.host.trim_end_matches('/'), self.path);
        Url::parse(&joined).map_err(|source| ConfigError::InvalidHost {
            host: self.host.clone(),
            source,
        })
    }

    pub fn wait_time(&self) -> Duration {
        Duration::from_millis(self.wait_time_ms)
    }

    pub fn run_duration(&self) -> Duration {
        Duration::from_secs(self.duration)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub fn spawn_delay(&self, user: u64) -> Duration {
        if self.ramp_up == 0 || self.users == 0 {
            return Duration::ZERO;
        }
        let spread_ms = self.ramp_up.saturating_mul(1000).saturating_mul(user);
        Duration::from_millis(spread_ms / self.users)
    }
}

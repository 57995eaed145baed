use figment::{providers::{Env, Format, Serialized, Toml}, Figment};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::models::probe_config::ProbeConfig;

pub const SETTINGS_FILE: &str = "loadforge.toml";
pub const ENV_PREFIX: &str = "LOADFORGE_";

/// Startup configuration of the worker process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerSettings {
    pub bind_addr: String,
    /// Run `probe` once, print the report and exit instead of serving `/ws`.
    pub headless: bool,
    pub probe: ProbeConfig,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            headless: false,
            probe: ProbeConfig::default(),
        }
    }
}

impl WorkerSettings {
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(WorkerSettings::default()))
            .merge(Toml::file(SETTINGS_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let settings: WorkerSettings = figment.extract().map_err(Box::new)?;
        if settings.headless {
            settings.probe.validate()?;
        }
        Ok(settings)
    }
}

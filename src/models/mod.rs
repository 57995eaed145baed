pub mod metrics;
pub mod outcome;
pub mod probe_config;

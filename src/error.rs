use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid host '{host}': {source}")]
    InvalidHost {
        host: String,
        #[source]
        source: url::ParseError,
    },
    #[error("unsupported scheme '{0}', expected http or https")]
    UnsupportedScheme(String),
    #[error("request path must start with '/', got '{0}'")]
    InvalidPath(String),
    #[error("at least one simulated user is required")]
    NoUsers,
    #[error("too many simulated users: {users} (max {max})")]
    TooManyUsers { users: u64, max: u64 },
    #[error("test duration must be greater than zero")]
    ZeroDuration,
    #[error("test duration of {duration}s exceeds the {max}s limit")]
    DurationTooLong { duration: u64, max: u64 },
    #[error("ramp-up of {ramp_up}s is longer than the {duration}s test")]
    RampUpTooLong { ramp_up: u64, duration: u64 },
    #[error("failed to load worker settings: {0}")]
    Settings(#[from] Box<figment::Error>),
}

/// Failure below the HTTP status line: the request never produced a response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Connection refused or host unreachable")]
    Connect,
    #[error("Timeout")]
    Timeout,
    #[error("Connection closed unexpectedly")]
    Closed,
    #[error("Invalid request URI: {0}")]
    InvalidUri(String),
    #[error("Network error: {0}")]
    Other(String),
}

impl From<hyper::Error> for TransportError {
    fn from(e: hyper::Error) -> Self {
        if e.is_connect() {
            TransportError::Connect
        } else if e.is_timeout() {
            TransportError::Timeout
        } else if e.is_closed() || e.is_incomplete_message() {
            TransportError::Closed
        } else {
            TransportError::Other(e.to_string())
        }
    }
}

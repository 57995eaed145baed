use hyper::StatusCode;
use std::fmt;

use crate::error::TransportError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Admitted by the bulkhead; a 200 may also come from the fallback
    /// covering an internal timeout.
    Success,
    BulkheadRejection(u16),
    UnexpectedStatus(u16),
    Transport(TransportError),
}

/// Pure mapping from status code to outcome.
pub fn classify(status: StatusCode) -> Outcome {
    match status.as_u16() {
        200 => Outcome::Success,
        500 | 503 => Outcome::BulkheadRejection(status.as_u16()),
        code => Outcome::UnexpectedStatus(code),
    }
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }

    pub fn failure_message(&self) -> Option<String> {
        match self {
            Outcome::Success => None,
            Outcome::BulkheadRejection(code) => Some(format!("Bulkhead Rejection: {}", code)),
            Outcome::UnexpectedStatus(code) => Some(format!("Unexpected status: {}", code)),
            Outcome::Transport(err) => Some(err.to_string()),
        }
    }

    /// Key used in the status breakdown of the report.
    pub fn status_key(&self) -> String {
        match self {
            Outcome::Success => StatusCode::OK.as_u16().to_string(),
            Outcome::BulkheadRejection(code) | Outcome::UnexpectedStatus(code) => code.to_string(),
            Outcome::Transport(TransportError::Timeout) => "TIMEOUT".to_string(),
            Outcome::Transport(_) => "REQUEST_ERROR".to_string(),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.failure_message() {
            Some(msg) => f.write_str(&msg),
            None => f.write_str("Success"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub outcome: Outcome,
    pub elapsed_ms: f64,
}

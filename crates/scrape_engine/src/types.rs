use std::fmt;
use std::path::PathBuf;

use crate::export::ExportError;

#[derive(Debug)]
pub enum EngineEvent {
    /// Decoded text from the scrape stream, in arrival order.
    StreamText(String),
    StreamFinished(StreamSummary),
    StreamFailed(TransportError),
    ExportFinished(Result<PathBuf, ExportError>),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StreamSummary {
    pub bytes: u64,
    pub chunks: usize,
    pub encoding: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct TransportError {
    pub kind: FailureKind,
    pub message: String,
}

impl TransportError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    /// The engine task ended without reporting an outcome.
    Aborted,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Aborted => write!(f, "aborted"),
        }
    }
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::new(FailureKind::Timeout, err.to_string());
    }
    if let Some(status) = err.status() {
        return TransportError::new(FailureKind::HttpStatus(status.as_u16()), err.to_string());
    }
    TransportError::new(FailureKind::Network, err.to_string())
}

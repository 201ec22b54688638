use std::fmt;

use plant_core::ArgumentError;
use thiserror::Error;

/// Message used when a rejected upload carries no usable `detail`.
pub const UPLOAD_FAILED: &str = "Upload failed";
/// Message used for any non-success status read.
pub const UPLOAD_STATUS_FAILED: &str = "Failed to fetch upload status";

/// Failure of a single client operation. `Display` is the caller-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ClientError {
    pub kind: FailureKind,
    pub message: String,
}

impl ClientError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<ArgumentError> for ClientError {
    fn from(err: ArgumentError) -> Self {
        let name = match &err {
            ArgumentError::Missing(name) => *name,
            ArgumentError::UnknownDestination(_) => "destination",
        };
        Self::new(FailureKind::InvalidArgument { name }, err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidArgument { name: &'static str },
    InvalidUrl,
    HttpStatus(u16),
    UploadRejected(u16),
    Timeout,
    Network,
    Decode,
    Io,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidArgument { name } => write!(f, "invalid argument {name}"),
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::UploadRejected(code) => write!(f, "upload rejected with status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "undecodable response body"),
            FailureKind::Io => write!(f, "io error"),
        }
    }
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        return ClientError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ClientError::new(FailureKind::Decode, err.to_string());
    }
    ClientError::new(FailureKind::Network, err.to_string())
}

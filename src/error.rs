//! Error types
//!
//! Negotiation failures stay inside the session layer and are reported as
//! events; validation and reorder failures are returned to the caller before
//! any state is touched.

use std::fmt;
use std::io;

use thiserror::Error;

/// Result type alias for crate operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type
#[derive(Debug, Error)]
pub enum Error {
    /// Session setup failed
    #[error("Negotiation failed: {0}")]
    Negotiation(#[from] NegotiationError),

    /// Camera configuration import was rejected
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Thumbnail reorder was rejected
    #[error(transparent)]
    Reorder(#[from] ReorderError),

    /// Persistence store failure
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Error reported by the platform WebRTC implementation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct PeerError(pub String);

impl PeerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Failure while establishing a receive-only session
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NegotiationError {
    /// WHEP endpoint answered with a non-success status
    #[error("WHEP failed: {0}")]
    Status(u16),

    /// Request could not be sent or the body could not be read
    #[error("WHEP request error: {0}")]
    Http(String),

    /// Local peer connection rejected an operation
    #[error("Peer connection error: {0}")]
    Peer(#[from] PeerError),

    /// Endpoint returned a success status with no answer body
    #[error("WHEP answer was empty")]
    EmptyAnswer,

    /// Session was destroyed before negotiation finished
    #[error("Negotiation cancelled")]
    Cancelled,
}

impl From<reqwest::Error> for NegotiationError {
    fn from(err: reqwest::Error) -> Self {
        NegotiationError::Http(err.to_string())
    }
}

/// Kind of problem found in one imported camera entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    /// Entry is not an object or has no non-empty `id`
    MissingId,
    /// Entry has neither a `webrtc` nor a `url` value
    MissingSourceUrl,
    /// Another entry already uses this id
    DuplicateId(String),
}

/// One rejected entry of a camera import batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Zero-based position in the imported array
    pub index: usize,
    pub kind: ViolationKind,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ViolationKind::MissingId => write!(f, "entry {}: missing id", self.index),
            ViolationKind::MissingSourceUrl => {
                write!(f, "entry {}: missing webrtc/url", self.index)
            }
            ViolationKind::DuplicateId(id) => {
                write!(f, "entry {}: duplicate id {:?}", self.index, id)
            }
        }
    }
}

/// Camera configuration import rejected as a whole
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Text is not valid JSON
    #[error("Invalid JSON: {0}")]
    MalformedJson(String),

    /// JSON is valid but not an array
    #[error("Expected an array of {{ id, name, webrtc/url }} objects")]
    NotAnArray,

    /// One or more entries failed validation
    #[error("Invalid camera configuration: {}", join_violations(.0))]
    Invalid(Vec<Violation>),
}

impl ValidationError {
    /// Violations listed by this error (empty for JSON-level failures)
    pub fn violations(&self) -> &[Violation] {
        match self {
            ValidationError::Invalid(v) => v,
            _ => &[],
        }
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Thumbnail ordering rejected with no change applied
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReorderError {
    /// The ordering omitted cameras that are still configured
    #[error("Reorder is missing cameras: {}", .0.join(", "))]
    MissingIds(Vec<String>),
}

/// Persistence store failure
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

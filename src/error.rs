use std::error::Error;
use std::fmt;

use crate::record::RecordId;
use crate::store::StoreError;

/// Error type for record service and HTTP operations.
#[derive(Debug)]
pub enum RecordError {
    /// The id is not a positive integer.
    InvalidId,
    /// No versions exist for the id.
    NotFound(RecordId),
    /// Legacy create on an id that already has versions.
    AlreadyExists(RecordId),
    /// The request body is not a JSON object of string or null values.
    MalformedBody(String),
    /// The `versions` query is neither a keyword nor a list of integers.
    InvalidVersions(String),
    /// Backing storage failed.
    Storage(StoreError),
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::InvalidId => write!(f, "invalid id; id must be a positive number"),
            RecordError::NotFound(id) => write!(f, "record of id {} does not exist", id),
            RecordError::AlreadyExists(id) => write!(f, "record of id {} already exists", id),
            RecordError::MalformedBody(_) => write!(f, "invalid input; could not parse json"),
            RecordError::InvalidVersions(_) => write!(
                f,
                "invalid versions; expected all, latest or a comma-separated list of versions"
            ),
            RecordError::Storage(e) => write!(f, "storage failure: {}", e),
        }
    }
}

impl Error for RecordError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RecordError::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for RecordError {
    fn from(err: StoreError) -> Self {
        RecordError::Storage(err)
    }
}

impl RecordError {
    /// Map this error to an HTTP-style status code.
    ///
    /// The v1 surface reports `NotFound` as 400; see `http::v1`.
    pub fn status_code(&self) -> u16 {
        match self {
            RecordError::InvalidId => 400,
            RecordError::NotFound(_) => 404,
            RecordError::AlreadyExists(_) => 409,
            RecordError::MalformedBody(_) => 400,
            RecordError::InvalidVersions(_) => 400,
            RecordError::Storage(_) => 500,
        }
    }

    /// Message safe to return to a client. Storage causes stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            RecordError::Storage(_) => "internal error".to_string(),
            other => other.to_string(),
        }
    }
}

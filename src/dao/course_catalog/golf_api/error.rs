use reqwest::StatusCode;
use thiserror::Error;

use crate::dao::storage::StorageError;

pub type GolfApiResult<T> = Result<T, GolfApiError>;

/// Failures of the golf course API client.
#[derive(Debug, Error)]
pub enum GolfApiError {
    #[error("missing golf course API environment variable `{var}`")]
    MissingEnvVar { var: &'static str },
    #[error("failed to build golf course API client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to send golf course API request to `{path}`")]
    RequestSend {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("unexpected golf course API status {status} for `{path}`")]
    RequestStatus { path: String, status: StatusCode },
    #[error("failed to decode golf course API response for `{path}`")]
    DecodeResponse {
        path: String,
        #[source]
        source: reqwest::Error,
    },
}

impl From<GolfApiError> for StorageError {
    fn from(err: GolfApiError) -> Self {
        StorageError::remote(err.to_string(), err)
    }
}

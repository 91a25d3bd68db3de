use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    Validation,
    Internal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Why a county view could not be produced. The user-facing warning is the
/// same for every variant; the variants exist so the log stream can tell a
/// bad selection from an upstream outage.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("no boundary geometry for {state}/{county}")]
    EmptyBoundary { state: String, county: String },
    #[error("upstream service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("malformed upstream response: {0}")]
    MalformedResponse(String),
}

impl RetrievalError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }
}

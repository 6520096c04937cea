use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The only status value the API uses for success.
pub const SUCCESS: &str = "SUCCESS";
/// Status value the API (and the mock server) uses for failures.
pub const ERROR: &str = "ERROR";

/// `status`/`message` pair embedded in every response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    #[serde(rename = "status", default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Status {
    pub fn success() -> Self {
        Self {
            value: SUCCESS.to_string(),
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            value: ERROR.to_string(),
            message: Some(message.into()),
        }
    }

    /// Anything but an exact `SUCCESS`, including an empty value, is a failure.
    pub fn has_failed(&self) -> bool {
        self.value != SUCCESS
    }

    pub fn check(&self) -> Result<(), ApiError> {
        if self.has_failed() {
            Err(ApiError::from(self.clone()))
        } else {
            Ok(())
        }
    }
}

/// Failure reported by the remote API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{status}: {message}")]
pub struct ApiError {
    pub status: String,
    pub message: String,
}

impl From<Status> for ApiError {
    fn from(status: Status) -> Self {
        ApiError {
            status: status.value,
            message: status.message.unwrap_or_default(),
        }
    }
}

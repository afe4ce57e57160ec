//! The backend's response envelope.

use serde::Deserialize;

use crate::error::ApiError;

/// Every endpoint responds with `{ success: boolean, data, message? }`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default = "none")]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

fn none<T>() -> Option<T> {
    None
}

impl<T> ApiEnvelope<T> {
    /// Unwrap a successful envelope into its payload.
    pub fn into_result(self) -> Result<T, ApiError> {
        if !self.success {
            return Err(ApiError::backend(self.message));
        }
        self.data
            .ok_or_else(|| ApiError::decode("successful response without data"))
    }

    /// For mutation endpoints where the payload is irrelevant.
    pub fn into_ack(self) -> Result<(), ApiError> {
        if self.success {
            Ok(())
        } else {
            Err(ApiError::backend(self.message))
        }
    }
}

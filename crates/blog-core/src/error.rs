//! Request failure type shared by every entity store.

use thiserror::Error;

use crate::domain::EntityId;

/// A failed request against the entity API.
///
/// Stores do not distinguish between the variants: each one ends the request
/// the same way and surfaces its message through `error_message`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Invalid request: {0}")]
    Invalid(String),
}

impl ApiError {
    pub fn not_found(entity_name: &str, id: EntityId) -> Self {
        ApiError::Status {
            status: 404,
            message: format!("{entity_name} with id {id} not found"),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::Status {
            status: 400,
            message: message.into(),
        }
    }

    /// HTTP status carried by the failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Invalid(_) => Some(400),
            _ => None,
        }
    }
}

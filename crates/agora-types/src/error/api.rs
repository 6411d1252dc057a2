//! Request errors.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::format::format_api_error;

/// Errors that can occur when calling the REST service.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum ApiError {
    /// The request was never answered: it could not be built or sent, or no response came back
    #[error("Transport failure: {message}")]
    Transport {
        /// Description of the transport failure
        message: String,
    },

    /// The server answered 401; the session has been torn down
    #[error("Authentication required")]
    Authentication {
        /// Error body, if the server sent one
        payload: Option<Value>,
    },

    /// The server rejected the request (4xx other than 401)
    #[error("Request rejected ({status})")]
    Validation {
        /// HTTP status code
        status: u16,
        /// Error body, usually a field-error map
        payload: Option<Value>,
    },

    /// The server failed (5xx)
    #[error("Server error ({status})")]
    Server {
        /// HTTP status code
        status: u16,
        /// Error body, if any
        payload: Option<Value>,
    },

    /// A successful response did not have the expected shape
    #[error("Invalid response: {message}")]
    Decode {
        /// Description of the decode failure
        message: String,
    },
}

impl ApiError {
    /// Classify a non-success HTTP status.
    pub fn from_status(status: u16, payload: Option<Value>) -> Self {
        match status {
            401 => Self::Authentication { payload },
            500..=u16::MAX => Self::Server { status, payload },
            _ => Self::Validation { status, payload },
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport { message: message.into() }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode { message: message.into() }
    }

    /// HTTP status, when a response was received.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { .. } => Some(401),
            Self::Validation { status, .. } | Self::Server { status, .. } => Some(*status),
            Self::Transport { .. } | Self::Decode { .. } => None,
        }
    }

    /// Error body sent by the server, if any.
    pub const fn payload(&self) -> Option<&Value> {
        match self {
            Self::Authentication { payload }
            | Self::Validation { payload, .. }
            | Self::Server { payload, .. } => payload.as_ref(),
            Self::Transport { .. } | Self::Decode { .. } => None,
        }
    }

    /// Message describing the failure when there is no payload to show.
    pub fn fallback_message(&self) -> String {
        match self {
            Self::Transport { message } | Self::Decode { message } => message.clone(),
            Self::Authentication { .. } => "Request failed with status code 401".to_string(),
            Self::Validation { status, .. } | Self::Server { status, .. } => {
                format!("Request failed with status code {status}")
            }
        }
    }

    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// One human-readable line (or lines) suitable for showing to the user.
    pub fn user_message(&self) -> String {
        format_api_error(self)
    }
}

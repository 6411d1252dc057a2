//! Error types for the Agora client.

use agora_types::{ApiError, FormError, PostId};
use thiserror::Error;

use crate::config::ConfigError;

/// Errors returned by [`crate::AgoraClient`] operations.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The REST call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Input was rejected before sending.
    #[error(transparent)]
    Form(#[from] FormError),

    /// The client could not be set up.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The post only exists locally; its create request has not completed.
    #[error("Post {0} has not been published yet")]
    Unpublished(PostId),
}

impl ClientError {
    /// Text to show the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(err) => err.user_message(),
            Self::Form(err) => err.message.clone(),
            other => other.to_string(),
        }
    }

    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api(err) if err.is_unauthorized())
    }
}

//! Core domain models for the Agora client.
//!
//! This module contains the data structures exchanged with the REST service.

mod auth;
mod post;
mod profile;
mod reaction;

// Re-export all models
pub use auth::{AccessToken, LoginResponse, ServerMessage};
pub use post::{Post, PostDraft, PostId};
pub use profile::{Profile, UserId};
pub use reaction::{ConflictingReaction, ReactionKind, ReactionSnapshot, ReactionState};

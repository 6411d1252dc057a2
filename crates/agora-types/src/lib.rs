//! # Agora Types
//!
//! Core types, models, and error definitions for the Agora client.
//!
//! This crate provides the foundational type system for the Agora workspace:
//!
//! - **`error`** - Request error taxonomy, server error-payload formatting, form errors
//! - **`models`** - Domain models (Post, Profile, reaction state machine, credentials)
//! - **`forms`** - Outbound form payloads with client-side validation rules
//!
//! ## Architecture Role
//!
//! `agora-types` sits at the bottom of the dependency graph:
//!
//! ```text
//!          agora-types (this crate)
//!                  │
//!                  ▼
//!            agora-client
//!                  │
//!                  ▼
//!              agora-cli
//! ```
//!
//! All types are designed to be:
//! - **Serializable** via serde, matching the REST service's wire names
//! - **Clone** for cheap sharing across async boundaries
//! - **PartialEq** for testing and comparison

pub mod error;
pub mod forms;
pub mod models;

// Re-export error types for convenience
pub use error::{format_api_error, ApiError, FormError, GENERIC_ERROR_MESSAGE};

// Re-export core model types
pub use forms::{FormRules, LoginForm, MediaUpload, NewPost, ProfileUpdate, SignupForm};
pub use models::{
    AccessToken, LoginResponse, Post, PostDraft, PostId, Profile, ReactionKind, ReactionSnapshot,
    ReactionState, ServerMessage, UserId,
};

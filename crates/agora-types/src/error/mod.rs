//! Typed error definitions for Agora.
//!
//! - **`ApiError`** - every way a call to the REST service can fail
//! - **`format_api_error`** - turns any server error payload into one human-readable string
//! - **`FormError`** - input rejected on the client before a request was made

mod api;
mod form;
mod format;

pub use api::ApiError;
pub use form::FormError;
pub use format::{format_api_error, format_payload, GENERIC_ERROR_MESSAGE};

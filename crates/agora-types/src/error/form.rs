//! Client-side form errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

/// Key validator uses for struct-level (schema) errors.
pub(crate) const SCHEMA_FIELD: &str = "__all__";

/// Input rejected before any request was sent.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[error("{message}")]
pub struct FormError {
    /// Offending field, `None` for errors about the form as a whole
    pub field: Option<String>,
    /// Message to show next to the form
    pub message: String,
}

impl FormError {
    pub fn new(field: Option<&str>, message: impl Into<String>) -> Self {
        Self { field: field.map(str::to_string), message: message.into() }
    }

    /// Pick the first failure, walking fields in `field_order` (the order they appear on
    /// the form). Fields missing from `field_order` are considered afterwards by name.
    pub fn from_validation(errors: &ValidationErrors, field_order: &[&str]) -> Self {
        let all = errors.errors();

        let mut remaining: Vec<&str> = all
            .keys()
            .map(|key| key.as_ref())
            .filter(|key| !field_order.contains(key))
            .collect();
        remaining.sort_unstable();

        field_order
            .iter()
            .copied()
            .chain(remaining)
            .find_map(|field| match all.get(field) {
                Some(ValidationErrorsKind::Field(failures)) => failures.first().map(|failure| {
                    let message = failure
                        .message
                        .as_ref()
                        .map_or_else(|| failure.code.to_string(), ToString::to_string);
                    let field = (field != SCHEMA_FIELD).then_some(field);
                    Self::new(field, message)
                }),
                _ => None,
            })
            .unwrap_or_else(|| Self::new(None, "Invalid input"))
    }
}

use serde::Serialize;
use thiserror::Error;

/// A single offending input field with a human-readable reason.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self { field, message: message.into() }
    }
}

/// Malformed or out-of-range input. Carries every offending field, not just
/// the first one found.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid fields: {}", field_list(.fields))]
pub struct ValidationError {
    pub fields: Vec<FieldError>,
}

fn field_list(fields: &[FieldError]) -> String {
    fields.iter().map(|f| f.field).collect::<Vec<_>>().join(", ")
}

//! Error types for redlog.
//!
//! None of these errors can cause a classified value to be emitted in clear
//! text: extraction failures become markers and redactor failures become
//! erasure.

use thiserror::Error;

/// Errors raised while configuring classifications or redactors.
///
/// These surface at startup, when registries are built.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A classification set was declared without any member.
    #[error("classification set must contain at least one classification")]
    EmptyClassificationSet,

    /// A classification definition has an empty taxonomy or category.
    #[error("invalid classification '{taxonomy}:{category}': taxonomy and category must be non-empty")]
    InvalidClassification {
        /// Taxonomy as written in the configuration.
        taxonomy: String,
        /// Category as written in the configuration.
        category: String,
    },

    /// The configuration document could not be parsed.
    #[cfg(feature = "serde")]
    #[error("failed to parse redaction configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors raised while reading a field from a structured value.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The shape has no field at this index.
    #[error("shape `{shape}` has no field at index {index}")]
    UnknownField {
        /// Name of the shape being read.
        shape: &'static str,
        /// Requested descriptor index.
        index: usize,
    },

    /// The field accessor failed.
    #[error("failed to read field `{field}`: {reason}")]
    Accessor {
        /// Name of the field being read.
        field: &'static str,
        /// Human-readable failure reason.
        reason: String,
    },
}

impl ExtractError {
    /// Builds an accessor failure for `field`.
    pub fn accessor(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Accessor {
            field,
            reason: reason.into(),
        }
    }
}

/// Errors raised by a [`crate::Redactor`] implementation.
#[derive(Debug, Error)]
pub enum RedactionError {
    /// The redactor cannot handle this kind of value.
    #[error("redactor does not support this value")]
    Unsupported,

    /// The redactor failed for another reason.
    #[error("redaction failed: {0}")]
    Failed(String),
}

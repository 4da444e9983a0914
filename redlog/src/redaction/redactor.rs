//! The [`Redactor`] capability and its built-in implementations.

use std::{borrow::Cow, fmt};

use super::policy::{TextRedactionPolicy, REDACTED_PLACEHOLDER};
use crate::{error::RedactionError, value::Value};

/// Turns a raw value into a safe-to-emit representation.
///
/// Implementations must be deterministic and must not block. An `Err` is
/// never fatal: the registry substitutes erasure for that value.
pub trait Redactor: Send + Sync {
    /// Redacts `value`.
    fn redact(&self, value: &Value) -> Result<Value, RedactionError>;
}

impl fmt::Debug for dyn Redactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Redactor")
    }
}

/// Replaces every value, including absent ones, with a fixed placeholder.
///
/// The original value is discarded; this is erasure, not masking.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErasingRedactor {
    placeholder: Cow<'static, str>,
}

impl ErasingRedactor {
    /// Erases with [`REDACTED_PLACEHOLDER`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            placeholder: Cow::Borrowed(REDACTED_PLACEHOLDER),
        }
    }

    /// Erases with a custom placeholder.
    #[must_use]
    pub fn with_placeholder(placeholder: impl Into<Cow<'static, str>>) -> Self {
        Self {
            placeholder: placeholder.into(),
        }
    }

    /// The placeholder every value is replaced with.
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub(crate) fn erase(&self) -> Value {
        Value::Str(self.placeholder.clone().into_owned())
    }
}

impl Default for ErasingRedactor {
    fn default() -> Self {
        Self::new()
    }
}

impl Redactor for ErasingRedactor {
    fn redact(&self, _value: &Value) -> Result<Value, RedactionError> {
        Ok(self.erase())
    }
}

/// Returns values unchanged.
///
/// Use for classifications that policy allows in clear text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NullRedactor;

impl Redactor for NullRedactor {
    fn redact(&self, value: &Value) -> Result<Value, RedactionError> {
        Ok(value.clone())
    }
}

/// Applies a [`TextRedactionPolicy`] to the textual form of a value.
///
/// Scalars are rendered to text first. Markers carry no data and pass
/// through unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextRedactor {
    policy: TextRedactionPolicy,
}

impl TextRedactor {
    /// Wraps `policy`.
    #[must_use]
    pub const fn new(policy: TextRedactionPolicy) -> Self {
        Self { policy }
    }

    /// The wrapped policy.
    pub const fn policy(&self) -> &TextRedactionPolicy {
        &self.policy
    }
}

impl From<TextRedactionPolicy> for TextRedactor {
    fn from(policy: TextRedactionPolicy) -> Self {
        Self::new(policy)
    }
}

impl Redactor for TextRedactor {
    fn redact(&self, value: &Value) -> Result<Value, RedactionError> {
        if value.is_marker() {
            return Ok(value.clone());
        }
        let text = match value {
            Value::Str(text) => Cow::Borrowed(text.as_str()),
            other => Cow::Owned(other.to_string()),
        };
        Ok(Value::Str(self.policy.apply_to(&text)))
    }
}

//! Redaction policy: how classified values are rewritten.
//!
//! - **`policy`**: pure text masking strategies (`TextRedactionPolicy`)
//! - **`redactor`**: the `Redactor` capability and built-in implementations
//! - **`registry`**: classification → redactor bindings with a fallback

mod policy;
mod redactor;
mod registry;

pub use policy::{KeepConfig, MaskConfig, TextRedactionPolicy, MASK_CHAR, REDACTED_PLACEHOLDER};
pub use redactor::{ErasingRedactor, NullRedactor, Redactor, TextRedactor};
pub use registry::{RedactorRegistry, RedactorRegistryBuilder};

//! Structured logging with classification-driven redaction.
//!
//! Call sites log rich structured values; fields labeled with a
//! [`Classification`] are rewritten or erased by a [`Redactor`] before any
//! [`LogSink`] sees them, including when they sit deep inside nested values.
//!
//! The crate separates:
//! - **Classification**: what kind of sensitive data a field holds
//!   ([`Classification`], [`DataClassification`] markers).
//! - **Policy**: how each classification is redacted ([`RedactorRegistry`]).
//! - **Shape**: which fields a type has and how each is labeled
//!   ([`Structured`], usually derived).
//!
//! Key rules:
//! - `#[sensitive(Class, ...)]` classifies a field; its value (scalar or
//!   nested) is redacted as one unit, redactors applied in attachment order.
//! - Bare `#[sensitive]` marks a nested structured field as transitive: with
//!   transitive traversal requested, its own fields are emitted one by one.
//! - Unannotated leaf fields pass through unchanged; unannotated nested
//!   values are not emitted.
//! - Unbound classifications use the fallback redactor, which erases unless
//!   configured otherwise. A failing redactor erases.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use redlog::{
//!     testing::CapturingSink, Classification, DataClassification, ErasingRedactor, Level,
//!     LogPipeline, NullRedactor, RedactorRegistry, Structured, Value,
//! };
//!
//! struct PersonalData;
//! impl DataClassification for PersonalData {
//!     const CLASSIFICATION: Classification = Classification::new("MyTaxonomy", "MyClassification");
//! }
//!
//! #[derive(Structured)]
//! struct User {
//!     id: String,
//!     #[sensitive(PersonalData)]
//!     name: String,
//! }
//!
//! let registry = RedactorRegistry::builder()
//!     .set_redactor(PersonalData::CLASSIFICATION, ErasingRedactor::new())
//!     .set_fallback(NullRedactor)
//!     .build();
//! let pipeline = LogPipeline::new(Arc::new(registry));
//! let sink = CapturingSink::new();
//!
//! let user = User { id: "abcd".into(), name: "Charles".into() };
//! pipeline.emit(&sink, Level::Info, "user {id} active", &user);
//!
//! let record = &sink.records()[0];
//! assert_eq!(record.message, "user abcd active");
//! assert_eq!(record.get("name"), Some(&Value::from("[REDACTED]")));
//! ```
//!
//! What this crate does not do: store, rotate or ship logs. Sinks own that.

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::default_trait_access,
    clippy::doc_markdown,
    clippy::if_not_else,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::needless_pass_by_value,
    clippy::needless_ifs,
    clippy::use_self,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::enum_glob_use,
    clippy::struct_excessive_bools,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::result_large_err,
    clippy::future_not_send,
    clippy::option_if_let_else,
    clippy::from_over_into,
    clippy::manual_inspect
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

pub use redlog_derive::Structured;

#[allow(unused_extern_crates)]
extern crate self as redlog;

// Module declarations
mod classification;
#[cfg(feature = "serde")]
pub mod config;
mod error;
mod extract;
mod pipeline;
mod redaction;
mod shape;
mod sink;
#[cfg(feature = "slog")]
pub mod slog;
pub mod testing;
mod value;

// Re-exports
pub use classification::{
    Classification, CreditCard, DataClassification, Email, IpAddress, PhoneNumber, Pii, Secret,
    Taxonomy, Token, BUILTIN_TAXONOMY,
};
pub use error::{ConfigError, ExtractError, RedactionError};
pub use extract::{EmittedProperty, ExtractOptions, Properties, PropertyExtractor, DEFAULT_MAX_DEPTH};
pub use pipeline::{
    render_template, Level, LogEvent, LogPipeline, LogRecord, ParseLevelError, PipelineOptions,
};
pub use redaction::{
    ErasingRedactor, KeepConfig, MaskConfig, NullRedactor, Redactor, RedactorRegistry,
    RedactorRegistryBuilder, TextRedactionPolicy, TextRedactor, MASK_CHAR, REDACTED_PLACEHOLDER,
};
pub use shape::{ClassificationSet, FieldDescriptor, Shape, Structured};
#[cfg(feature = "serde")]
pub use sink::JsonSink;
pub use sink::LogSink;
pub use value::{
    FieldValue, LogField, Value, ABSENT_MARKER, EXTRACTION_FAILED_MARKER, TRUNCATED_MARKER,
};

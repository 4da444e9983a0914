//! Declarative redaction configuration.
//!
//! A [`RedactionConfig`] describes the redactor bindings and pipeline options
//! in data, typically loaded from JSON at startup:
//!
//! ```json
//! {
//!   "fallback": { "kind": "pass_through" },
//!   "bindings": [
//!     { "taxonomy": "MyTaxonomy", "category": "MyClassification", "redactor": { "kind": "erase" } },
//!     { "taxonomy": "redlog", "category": "credit_card", "redactor": { "kind": "keep_last", "count": 4 } }
//!   ],
//!   "pipeline": { "transitive": true }
//! }
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    classification::Classification,
    error::ConfigError,
    pipeline::{LogPipeline, PipelineOptions},
    redaction::{
        ErasingRedactor, NullRedactor, Redactor, RedactorRegistry, TextRedactionPolicy,
        TextRedactor,
    },
};

/// A redactor described in configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum RedactorSpec {
    /// Replace the value with a placeholder.
    Erase {
        /// Placeholder text; `[REDACTED]` when omitted.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
    },
    /// Leave the value unchanged.
    PassThrough,
    /// Keep the first `count` characters.
    KeepFirst {
        /// Visible characters.
        count: usize,
    },
    /// Keep the last `count` characters.
    KeepLast {
        /// Visible characters.
        count: usize,
    },
    /// Mask the first `count` characters.
    MaskFirst {
        /// Masked characters.
        count: usize,
    },
    /// Mask the last `count` characters.
    MaskLast {
        /// Masked characters.
        count: usize,
    },
}

impl RedactorSpec {
    /// Builds the described redactor.
    pub fn build(&self) -> Arc<dyn Redactor> {
        match self {
            Self::Erase { placeholder: None } => Arc::new(ErasingRedactor::new()),
            Self::Erase {
                placeholder: Some(placeholder),
            } => Arc::new(ErasingRedactor::with_placeholder(placeholder.clone())),
            Self::PassThrough => Arc::new(NullRedactor),
            Self::KeepFirst { count } => text(TextRedactionPolicy::keep_first(*count)),
            Self::KeepLast { count } => text(TextRedactionPolicy::keep_last(*count)),
            Self::MaskFirst { count } => text(TextRedactionPolicy::mask_first(*count)),
            Self::MaskLast { count } => text(TextRedactionPolicy::mask_last(*count)),
        }
    }
}

impl Default for RedactorSpec {
    fn default() -> Self {
        Self::Erase { placeholder: None }
    }
}

fn text(policy: TextRedactionPolicy) -> Arc<dyn Redactor> {
    Arc::new(TextRedactor::new(policy))
}

/// One classification → redactor binding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BindingConfig {
    /// Taxonomy of the classification.
    pub taxonomy: String,
    /// Category within the taxonomy.
    pub category: String,
    /// Redactor to bind.
    pub redactor: RedactorSpec,
}

impl BindingConfig {
    /// The classification this binding targets, validated.
    pub fn classification(&self) -> Result<Classification, ConfigError> {
        if self.taxonomy.trim().is_empty() || self.category.trim().is_empty() {
            return Err(ConfigError::InvalidClassification {
                taxonomy: self.taxonomy.clone(),
                category: self.category.clone(),
            });
        }
        Ok(Classification::owned(
            self.taxonomy.clone(),
            self.category.clone(),
        ))
    }
}

/// Full redaction configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RedactionConfig {
    /// Redactor for classifications without a binding.
    pub fallback: RedactorSpec,
    /// Bindings, applied in order; a later duplicate replaces an earlier one.
    pub bindings: Vec<BindingConfig>,
    /// Failure placeholder; `[REDACTED]` when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_placeholder: Option<String>,
    /// Pipeline defaults.
    pub pipeline: PipelineOptions,
}

impl RedactionConfig {
    /// Parses a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builds the frozen registry.
    pub fn build_registry(&self) -> Result<RedactorRegistry, ConfigError> {
        let mut builder = RedactorRegistry::builder().set_shared_fallback(self.fallback.build());
        if let Some(placeholder) = &self.failure_placeholder {
            builder = builder
                .set_failure_placeholder(ErasingRedactor::with_placeholder(placeholder.clone()));
        }
        for binding in &self.bindings {
            builder =
                builder.set_shared_redactor(binding.classification()?, binding.redactor.build());
        }
        tracing::debug!(bindings = self.bindings.len(), "redactor registry configured");
        Ok(builder.build())
    }

    /// Builds a pipeline over a freshly built registry.
    pub fn build_pipeline(&self) -> Result<LogPipeline, ConfigError> {
        Ok(LogPipeline::with_options(
            Arc::new(self.build_registry()?),
            self.pipeline,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::{RedactionConfig, RedactorSpec};
    use crate::{error::ConfigError, Classification, Value, REDACTED_PLACEHOLDER};

    const PERSONAL: Classification = Classification::new("MyTaxonomy", "MyClassification");
    const CARD: Classification = Classification::new("redlog", "credit_card");
    const OTHER: Classification = Classification::new("MyTaxonomy", "Other");

    #[test]
    fn parses_and_builds_registry() {
        let config = RedactionConfig::from_json(
            r#"{
                "fallback": { "kind": "pass_through" },
                "bindings": [
                    { "taxonomy": "MyTaxonomy", "category": "MyClassification", "redactor": { "kind": "erase" } },
                    { "taxonomy": "redlog", "category": "credit_card", "redactor": { "kind": "keep_last", "count": 4 } }
                ],
                "pipeline": { "transitive": true }
            }"#,
        )
        .unwrap();
        assert!(config.pipeline.transitive);
        assert_eq!(config.pipeline.max_depth, crate::extract::DEFAULT_MAX_DEPTH);
        assert_eq!(config.pipeline.max_nodes, crate::extract::DEFAULT_MAX_NODES);

        let registry = config.build_registry().unwrap();
        assert_eq!(registry.len(), 2);
        let redact = |c: &Classification, v: &str| registry.resolve(c).redact(&Value::from(v)).unwrap();
        assert_eq!(redact(&PERSONAL, "Charles"), Value::from(REDACTED_PLACEHOLDER));
        assert_eq!(redact(&CARD, "4111111111111111"), Value::from("************1111"));
        assert_eq!(redact(&OTHER, "clear"), Value::from("clear"));
    }

    #[test]
    fn traversal_bounds_are_configurable() {
        let config =
            RedactionConfig::from_json(r#"{ "pipeline": { "max_depth": 4, "max_nodes": 64 } }"#)
                .unwrap();
        assert_eq!(config.pipeline.max_depth, 4);
        assert_eq!(config.pipeline.max_nodes, 64);
        assert!(!config.pipeline.transitive);
    }

    #[test]
    fn empty_document_erases_everything() {
        let config = RedactionConfig::from_json("{}").unwrap();
        assert_eq!(config.fallback, RedactorSpec::Erase { placeholder: None });
        assert!(!config.pipeline.transitive);
        let registry = config.build_registry().unwrap();
        assert_eq!(
            registry.resolve(&OTHER).redact(&Value::from("x")).unwrap(),
            Value::from(REDACTED_PLACEHOLDER)
        );
    }

    #[test]
    fn rejects_empty_classification_components() {
        let config = RedactionConfig::from_json(
            r#"{ "bindings": [ { "taxonomy": "", "category": "x", "redactor": { "kind": "pass_through" } } ] }"#,
        )
        .unwrap();
        assert!(matches!(
            config.build_registry(),
            Err(ConfigError::InvalidClassification { .. })
        ));
    }

    #[test]
    fn rejects_unknown_fields_and_kinds() {
        assert!(matches!(
            RedactionConfig::from_json(r#"{ "fallbck": { "kind": "erase" } }"#),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            RedactionConfig::from_json(r#"{ "fallback": { "kind": "shred" } }"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn custom_placeholders() {
        let config = RedactionConfig::from_json(
            r#"{ "fallback": { "kind": "erase", "placeholder": "***" }, "failure_placeholder": "<erased>" }"#,
        )
        .unwrap();
        let registry = config.build_registry().unwrap();
        assert_eq!(
            registry.resolve(&OTHER).redact(&Value::Bool(true)).unwrap(),
            Value::from("***")
        );
        assert!(format!("{registry:?}").contains("<erased>"));
    }
}

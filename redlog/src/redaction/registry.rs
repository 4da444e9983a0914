//! Classification → redactor bindings.
//!
//! Bindings are collected by [`RedactorRegistryBuilder`] at startup and frozen
//! into a [`RedactorRegistry`] by [`RedactorRegistryBuilder::build`]. The
//! frozen registry has no mutating methods, so it can be shared across
//! threads without locking.

use std::{collections::HashMap, sync::Arc};

use super::redactor::{ErasingRedactor, Redactor};
use crate::{classification::Classification, shape::ClassificationSet, value::Value};

/// Collects redactor bindings before the first log emission.
///
/// ```rust
/// use redlog::{
///     Classification, ErasingRedactor, NullRedactor, RedactorRegistry, Redactor, Value,
/// };
///
/// const PERSONAL: Classification = Classification::new("MyTaxonomy", "MyClassification");
///
/// let registry = RedactorRegistry::builder()
///     .set_redactor(PERSONAL, ErasingRedactor::new())
///     .set_fallback(NullRedactor)
///     .build();
///
/// let erased = registry.resolve(&PERSONAL).redact(&Value::from("Charles")).unwrap();
/// assert_eq!(erased, Value::from("[REDACTED]"));
/// ```
#[derive(Default)]
pub struct RedactorRegistryBuilder {
    bindings: HashMap<Classification, Arc<dyn Redactor>>,
    fallback: Option<Arc<dyn Redactor>>,
    erasing: ErasingRedactor,
}

impl RedactorRegistryBuilder {
    /// Creates an empty builder. The fallback defaults to erasure.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `redactor` to `classification`. Last write wins.
    #[must_use]
    pub fn set_redactor<R>(self, classification: Classification, redactor: R) -> Self
    where
        R: Redactor + 'static,
    {
        self.set_shared_redactor(classification, Arc::new(redactor))
    }

    /// Binds an already shared redactor to `classification`. Last write wins.
    #[must_use]
    pub fn set_shared_redactor(
        mut self,
        classification: Classification,
        redactor: Arc<dyn Redactor>,
    ) -> Self {
        if self.bindings.insert(classification, redactor).is_some() {
            tracing::debug!("redactor binding replaced");
        }
        self
    }

    /// Binds one redactor to every member of `set`.
    #[must_use]
    pub fn set_redactor_for_set<R>(self, set: ClassificationSet, redactor: R) -> Self
    where
        R: Redactor + 'static,
    {
        let shared: Arc<dyn Redactor> = Arc::new(redactor);
        set.iter().fold(self, |builder, classification| {
            builder.set_shared_redactor(classification.clone(), Arc::clone(&shared))
        })
    }

    /// Sets the redactor used for classifications without a binding.
    #[must_use]
    pub fn set_fallback<R>(self, redactor: R) -> Self
    where
        R: Redactor + 'static,
    {
        self.set_shared_fallback(Arc::new(redactor))
    }

    /// Sets an already shared fallback redactor.
    #[must_use]
    pub fn set_shared_fallback(mut self, redactor: Arc<dyn Redactor>) -> Self {
        self.fallback = Some(redactor);
        self
    }

    /// Sets the placeholder used when a redactor fails.
    ///
    /// Also the default fallback, unless [`Self::set_fallback`] is called.
    #[must_use]
    pub fn set_failure_placeholder(mut self, erasing: ErasingRedactor) -> Self {
        self.erasing = erasing;
        self
    }

    /// Freezes the bindings.
    #[must_use]
    pub fn build(self) -> RedactorRegistry {
        let Self {
            bindings,
            fallback,
            erasing,
        } = self;
        let fallback = fallback.unwrap_or_else(|| Arc::new(erasing.clone()));
        RedactorRegistry {
            bindings,
            fallback,
            erasing,
        }
    }
}

/// Frozen classification → redactor bindings plus one fallback.
pub struct RedactorRegistry {
    bindings: HashMap<Classification, Arc<dyn Redactor>>,
    fallback: Arc<dyn Redactor>,
    erasing: ErasingRedactor,
}

impl RedactorRegistry {
    /// Starts a builder.
    #[must_use]
    pub fn builder() -> RedactorRegistryBuilder {
        RedactorRegistryBuilder::new()
    }

    /// Returns the redactor bound to `classification`, or the fallback.
    pub fn resolve(&self, classification: &Classification) -> &dyn Redactor {
        self.bindings
            .get(classification)
            .map_or(self.fallback.as_ref(), Arc::as_ref)
    }

    /// Returns `true` if `classification` has an explicit binding.
    pub fn is_bound(&self, classification: &Classification) -> bool {
        self.bindings.contains_key(classification)
    }

    /// Number of explicit bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns `true` if only the fallback is configured.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Runs `value` through the redactor of each member of `set`, in
    /// attachment order, each output feeding the next.
    ///
    /// A failing redactor erases the value and ends the chain.
    pub fn redact(&self, set: ClassificationSet, value: Value) -> Value {
        let mut current = value;
        for classification in set {
            match self.resolve(classification).redact(&current) {
                Ok(next) => current = next,
                Err(err) => {
                    tracing::warn!(
                        classification = %classification,
                        error = %err,
                        "redactor failed; erasing value"
                    );
                    return self.erasing.erase();
                }
            }
        }
        current
    }
}

impl Default for RedactorRegistry {
    fn default() -> Self {
        RedactorRegistryBuilder::new().build()
    }
}

impl std::fmt::Debug for RedactorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut bound: Vec<String> = self.bindings.keys().map(ToString::to_string).collect();
        bound.sort();
        f.debug_struct("RedactorRegistry")
            .field("bound", &bound)
            .field("failure_placeholder", &self.erasing.placeholder())
            .finish_non_exhaustive()
    }
}

//! Walks structured values and yields redacted properties.
//!
//! [`Properties`] is a lazy iterator: field accessors run only as it is
//! advanced. Traversal rules per field:
//!
//! | Descriptor | Field value | Emitted |
//! |------------|-------------|---------|
//! | classified | anything | one property, redacted through the registry |
//! | transitive, call transitive | nested structured value | its fields, path-prefixed |
//! | transitive, call not transitive | nested structured value | nothing |
//! | plain | nested structured value | nothing |
//! | plain or transitive | leaf value | the value unchanged |
//!
//! Classification wins over transitivity: a classified nested value is
//! rendered as a whole and redacted, its children are never emitted on their
//! own. Cycles, the depth bound and the per-call node budget end traversal
//! with [`Value::Truncated`].

use std::{fmt, iter::FusedIterator};

use crate::{
    error::ExtractError,
    redaction::RedactorRegistry,
    shape::{ClassificationSet, FieldDescriptor, Identity, Structured},
    value::{FieldValue, Value, TRUNCATED_MARKER},
};

/// Default for [`ExtractOptions::max_depth`].
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Default for [`ExtractOptions::max_nodes`].
pub const DEFAULT_MAX_NODES: usize = 1024;

/// One emitted `(path, value)` pair.
#[derive(Clone, Debug, PartialEq)]
pub struct EmittedProperty {
    path: String,
    value: Value,
    classifications: Option<ClassificationSet>,
}

impl EmittedProperty {
    pub(crate) fn new(
        path: String,
        value: Value,
        classifications: Option<ClassificationSet>,
    ) -> Self {
        Self {
            path,
            value,
            classifications,
        }
    }

    /// Dotted path, e.g. `user.InnerData.RedactedData`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Final value, after redaction.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Classifications the value was redacted under, if any.
    pub fn classifications(&self) -> Option<ClassificationSet> {
        self.classifications
    }

    /// Splits into path and value.
    pub fn into_parts(self) -> (String, Value) {
        (self.path, self.value)
    }
}

impl fmt::Display for EmittedProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.path, self.value)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for EmittedProperty {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let classifications: Option<Vec<String>> = self
            .classifications
            .map(|set| set.iter().map(ToString::to_string).collect());
        let mut state = serializer.serialize_struct("EmittedProperty", 3)?;
        state.serialize_field("path", &self.path)?;
        state.serialize_field("value", &self.value)?;
        state.serialize_field("classifications", &classifications)?;
        state.end()
    }
}

/// Traversal options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct ExtractOptions {
    /// Walk into nested values of fields marked transitive.
    pub transitive: bool,
    /// Nested levels walked below the root before emitting a truncation
    /// marker.
    pub max_depth: usize,
    /// Nested values walked or rendered per extracted root before emitting
    /// truncation markers.
    ///
    /// Shared sub-objects are visited at every occurrence, so a graph whose
    /// levels each point twice at the next one grows exponentially with
    /// depth. This bounds the work of one call regardless of shape.
    pub max_nodes: usize,
}

impl ExtractOptions {
    /// Non-transitive traversal with the default depth bound.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            transitive: false,
            max_depth: DEFAULT_MAX_DEPTH,
            max_nodes: DEFAULT_MAX_NODES,
        }
    }

    /// Sets [`Self::transitive`].
    #[must_use]
    pub const fn transitive(mut self, transitive: bool) -> Self {
        self.transitive = transitive;
        self
    }

    /// Sets [`Self::max_depth`].
    #[must_use]
    pub const fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets [`Self::max_nodes`].
    #[must_use]
    pub const fn max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Produces [`Properties`] iterators over structured values.
#[derive(Clone, Copy, Debug)]
pub struct PropertyExtractor<'r> {
    registry: &'r RedactorRegistry,
    options: ExtractOptions,
}

impl<'r> PropertyExtractor<'r> {
    /// Creates an extractor resolving redactors from `registry`.
    pub const fn new(registry: &'r RedactorRegistry, options: ExtractOptions) -> Self {
        Self { registry, options }
    }

    /// Traversal options in effect.
    pub const fn options(&self) -> ExtractOptions {
        self.options
    }

    /// Properties of `value`, with paths relative to it.
    pub fn properties<'v>(&self, value: &'v dyn Structured) -> Properties<'v, 'r> {
        self.properties_with_prefix("", value)
    }

    /// Properties of `value`, with paths prefixed by `prefix.`.
    ///
    /// An empty prefix yields paths relative to `value`.
    pub fn properties_with_prefix<'v>(
        &self,
        prefix: &str,
        value: &'v dyn Structured,
    ) -> Properties<'v, 'r> {
        Properties {
            registry: self.registry,
            options: self.options,
            stack: vec![Frame::new(value, prefix.to_owned())],
            nodes: 0,
        }
    }

    /// Resolves a single leaf read, classified or not, into its final value.
    ///
    /// Nested values are rendered whole; callers that want to walk them
    /// should use [`Self::properties_with_prefix`] instead.
    pub fn resolve_value(
        &self,
        name: &str,
        read: Result<FieldValue<'_>, ExtractError>,
        classifications: Option<ClassificationSet>,
    ) -> Value {
        let raw = match read {
            Ok(FieldValue::Value(value)) => value,
            Ok(FieldValue::Absent) => Value::Absent,
            Ok(FieldValue::Nested(nested)) => {
                Value::Str(WholeRenderer::new(self.registry, self.options).render(nested))
            }
            Err(err) => {
                report_extraction_failure(name, &err);
                Value::ExtractionFailed
            }
        };
        match classifications {
            Some(set) => self.registry.redact(set, raw),
            None => raw,
        }
    }
}

struct Frame<'v> {
    value: &'v dyn Structured,
    fields: &'static [FieldDescriptor],
    next: usize,
    prefix: String,
    identity: Identity,
}

impl<'v> Frame<'v> {
    fn new(value: &'v dyn Structured, prefix: String) -> Self {
        Self {
            value,
            fields: value.shape().fields(),
            next: 0,
            prefix,
            identity: Identity::of(value),
        }
    }
}

/// Lazy iterator over the redacted properties of a structured value.
pub struct Properties<'v, 'r> {
    registry: &'r RedactorRegistry,
    options: ExtractOptions,
    stack: Vec<Frame<'v>>,
    /// Nested values walked or rendered so far.
    nodes: usize,
}

impl fmt::Debug for Properties<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Properties")
            .field("options", &self.options)
            .field("depth", &self.stack.len())
            .field("nodes", &self.nodes)
            .finish_non_exhaustive()
    }
}

impl Properties<'_, '_> {
    fn on_ancestor_path(&self, identity: Identity) -> bool {
        self.stack.iter().any(|frame| frame.identity == identity)
    }

    fn remaining_nodes(&self) -> usize {
        self.options.max_nodes.saturating_sub(self.nodes)
    }

    fn render_whole(&mut self, value: &dyn Structured) -> String {
        let mut renderer = WholeRenderer {
            registry: self.registry,
            max_depth: self.options.max_depth,
            ancestors: self.stack.iter().map(|frame| frame.identity).collect(),
            budget: self.remaining_nodes(),
        };
        let rendered = renderer.render(value);
        self.nodes += self.remaining_nodes() - renderer.budget;
        rendered
    }
}

impl Iterator for Properties<'_, '_> {
    type Item = EmittedProperty;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;
            let Some(descriptor) = frame.fields.get(frame.next).copied() else {
                self.stack.pop();
                continue;
            };
            let index = frame.next;
            frame.next += 1;
            let owner = frame.value;
            let path = join_path(&frame.prefix, descriptor.name());

            let read = owner.field(index);

            if let Some(set) = descriptor.classifications() {
                let raw = match read {
                    Ok(FieldValue::Value(value)) => value,
                    Ok(FieldValue::Absent) => Value::Absent,
                    Ok(FieldValue::Nested(nested)) => Value::Str(self.render_whole(nested)),
                    Err(err) => {
                        report_extraction_failure(&path, &err);
                        Value::ExtractionFailed
                    }
                };
                let value = self.registry.redact(set, raw);
                return Some(EmittedProperty::new(path, value, Some(set)));
            }

            match read {
                Ok(FieldValue::Value(value)) => {
                    return Some(EmittedProperty::new(path, value, None));
                }
                Ok(FieldValue::Absent) => {
                    return Some(EmittedProperty::new(path, Value::Absent, None));
                }
                Err(err) => {
                    report_extraction_failure(&path, &err);
                    return Some(EmittedProperty::new(path, Value::ExtractionFailed, None));
                }
                Ok(FieldValue::Nested(nested)) => {
                    if !(descriptor.is_transitive() && self.options.transitive) {
                        continue;
                    }
                    let identity = Identity::of(nested);
                    if self.on_ancestor_path(identity) {
                        tracing::debug!(path = %path, "cycle detected; truncating traversal");
                        return Some(EmittedProperty::new(path, Value::Truncated, None));
                    }
                    if self.stack.len() > self.options.max_depth {
                        tracing::debug!(path = %path, "depth bound reached; truncating traversal");
                        return Some(EmittedProperty::new(path, Value::Truncated, None));
                    }
                    if self.remaining_nodes() == 0 {
                        tracing::debug!(path = %path, "node budget spent; truncating traversal");
                        return Some(EmittedProperty::new(path, Value::Truncated, None));
                    }
                    self.nodes += 1;
                    self.stack.push(Frame::new(nested, path));
                }
            }
        }
    }
}

impl FusedIterator for Properties<'_, '_> {}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_owned()
    } else {
        let mut path = String::with_capacity(prefix.len() + 1 + name.len());
        path.push_str(prefix);
        path.push('.');
        path.push_str(name);
        path
    }
}

fn report_extraction_failure(path: &str, err: &ExtractError) {
    tracing::warn!(path = %path, error = %err, "field extraction failed");
}

/// Renders a nested value as one string, for redaction as a whole.
///
/// Children keep their own classifications, so a pass-through policy on the
/// outer node does not expose classified children.
struct WholeRenderer<'r> {
    registry: &'r RedactorRegistry,
    max_depth: usize,
    ancestors: Vec<Identity>,
    /// Nodes this renderer may still visit.
    budget: usize,
}

impl<'r> WholeRenderer<'r> {
    fn new(registry: &'r RedactorRegistry, options: ExtractOptions) -> Self {
        Self {
            registry,
            max_depth: options.max_depth,
            ancestors: Vec::new(),
            budget: options.max_nodes,
        }
    }

    fn render(&mut self, value: &dyn Structured) -> String {
        let identity = Identity::of(value);
        if self.budget == 0
            || self.ancestors.contains(&identity)
            || self.ancestors.len() > self.max_depth
        {
            return TRUNCATED_MARKER.to_owned();
        }
        self.budget -= 1;
        self.ancestors.push(identity);

        let shape = value.shape();
        let mut out = String::from(shape.name());
        out.push_str(" {");
        for (index, descriptor) in shape.fields().iter().enumerate() {
            out.push_str(if index == 0 { " " } else { ", " });
            out.push_str(descriptor.name());
            out.push_str(": ");
            let raw = match value.field(index) {
                Ok(FieldValue::Value(value)) => value,
                Ok(FieldValue::Absent) => Value::Absent,
                Ok(FieldValue::Nested(nested)) => Value::Str(self.render(nested)),
                Err(err) => {
                    report_extraction_failure(descriptor.name(), &err);
                    Value::ExtractionFailed
                }
            };
            let rendered = match descriptor.classifications() {
                Some(set) => self.registry.redact(set, raw),
                None => raw,
            };
            out.push_str(&rendered.to_string());
        }
        if !shape.fields().is_empty() {
            out.push(' ');
        }
        out.push('}');

        self.ancestors.pop();
        out
    }
}

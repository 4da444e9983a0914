//! Log emission: gate, extract, merge, render, hand to the sink.
//!
//! The pipeline holds no per-call state. Everything it hands to a sink has
//! already been through the redactor registry.

use std::{fmt, str::FromStr, sync::Arc};

use crate::{
    extract::{EmittedProperty, ExtractOptions, PropertyExtractor},
    redaction::RedactorRegistry,
    shape::{ClassificationSet, Structured},
    sink::LogSink,
    value::{FieldValue, LogField, Value},
};

/// Options a pipeline applies to every event unless overridden.
pub type PipelineOptions = ExtractOptions;

/// Severity of a log record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Level {
    /// Very fine-grained diagnostics.
    Trace,
    /// Debugging information.
    Debug,
    /// Normal operation.
    Info,
    /// Something unexpected that the application recovered from.
    Warning,
    /// A failure of the current operation.
    Error,
    /// A failure requiring immediate attention.
    Critical,
}

impl Level {
    /// Lowercase name, as used in configuration and JSON output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing an unknown level name.
#[derive(Debug, thiserror::Error)]
#[error("unknown log level `{0}`")]
pub struct ParseLevelError(String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" | "information" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            "critical" | "fatal" => Ok(Self::Critical),
            _ => Err(ParseLevelError(s.to_owned())),
        }
    }
}

/// What a sink receives: the template, the rendered message, and the
/// redacted properties in emission order.
#[derive(Clone, Debug)]
pub struct LogRecord<'a> {
    level: Level,
    template: &'a str,
    message: String,
    properties: Vec<EmittedProperty>,
}

impl<'a> LogRecord<'a> {
    /// Severity.
    pub const fn level(&self) -> Level {
        self.level
    }

    /// The message template as written at the call site.
    pub const fn template(&self) -> &'a str {
        self.template
    }

    /// The template with holes filled from redacted values.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Redacted properties, parameters first.
    pub fn properties(&self) -> &[EmittedProperty] {
        &self.properties
    }

    /// Looks up a property by exact path.
    pub fn get(&self, path: &str) -> Option<&Value> {
        self.properties
            .iter()
            .find(|property| property.path() == path)
            .map(EmittedProperty::value)
    }

    /// Iterates `(key, value)` pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.properties
            .iter()
            .map(|property| (property.path(), property.value()))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for LogRecord<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use std::collections::HashMap;

        use serde::ser::{SerializeMap, SerializeStruct};

        // repeated paths get `#2`, `#3`, ... suffixes in emission order
        struct Pairs<'r>(&'r [EmittedProperty]);

        impl serde::Serialize for Pairs<'_> {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                let mut map = serializer.serialize_map(Some(self.0.len()))?;
                let mut seen: HashMap<&str, usize> = HashMap::new();
                for property in self.0 {
                    let occurrence = seen.entry(property.path()).or_insert(0);
                    *occurrence += 1;
                    if *occurrence == 1 {
                        map.serialize_entry(property.path(), property.value())?;
                    } else {
                        let key = format!("{}#{}", property.path(), occurrence);
                        map.serialize_entry(&key, property.value())?;
                    }
                }
                map.end()
            }
        }

        let mut state = serializer.serialize_struct("LogRecord", 4)?;
        state.serialize_field("level", &self.level)?;
        state.serialize_field("message", &self.message)?;
        state.serialize_field("template", self.template)?;
        state.serialize_field("properties", &Pairs(&self.properties))?;
        state.end()
    }
}

/// Ties the registry, the extractor and a sink together.
///
/// Cheap to clone; clones share the frozen registry.
///
/// ```rust
/// use std::sync::Arc;
///
/// use redlog::{testing::CapturingSink, Level, LogPipeline, RedactorRegistry};
///
/// let pipeline = LogPipeline::new(Arc::new(RedactorRegistry::default()));
/// let sink = CapturingSink::new();
/// pipeline
///     .event(Level::Info, "{count} users online")
///     .param("count", &3_u32)
///     .emit(&sink);
/// assert_eq!(sink.records()[0].message, "3 users online");
/// ```
#[derive(Clone, Debug)]
pub struct LogPipeline {
    registry: Arc<RedactorRegistry>,
    options: ExtractOptions,
}

impl LogPipeline {
    /// Creates a pipeline with default (non-transitive) extraction options.
    #[must_use]
    pub fn new(registry: Arc<RedactorRegistry>) -> Self {
        Self::with_options(registry, ExtractOptions::default())
    }

    /// Creates a pipeline with explicit extraction options.
    #[must_use]
    pub const fn with_options(registry: Arc<RedactorRegistry>, options: ExtractOptions) -> Self {
        Self { registry, options }
    }

    /// The frozen registry.
    pub fn registry(&self) -> &RedactorRegistry {
        &self.registry
    }

    /// Default extraction options for emitted events.
    pub const fn options(&self) -> ExtractOptions {
        self.options
    }

    /// Emits the properties of `value` with the pipeline's default options.
    pub fn emit<S>(&self, sink: &S, level: Level, template: &str, value: &dyn Structured)
    where
        S: LogSink + ?Sized,
    {
        self.event(level, template).properties(value).emit(sink);
    }

    /// Starts an event for the builder-style API.
    pub fn event<'p, 'a>(&'p self, level: Level, template: &'a str) -> LogEvent<'p, 'a> {
        LogEvent {
            pipeline: self,
            level,
            template,
            options: self.options,
            params: Vec::new(),
            sources: Vec::new(),
        }
    }
}

struct Param<'a> {
    name: &'a str,
    value: &'a dyn LogField,
    classifications: Option<ClassificationSet>,
}

struct Source<'a> {
    prefix: &'a str,
    value: &'a dyn Structured,
}

/// A log event under construction.
///
/// Nothing is read from the attached values until [`LogEvent::emit`], and
/// nothing at all if the sink is disabled for the event's level.
#[must_use = "an event does nothing until `emit` is called"]
pub struct LogEvent<'p, 'a> {
    pipeline: &'p LogPipeline,
    level: Level,
    template: &'a str,
    options: ExtractOptions,
    params: Vec<Param<'a>>,
    sources: Vec<Source<'a>>,
}

impl<'a> LogEvent<'_, 'a> {
    /// Adds an unclassified template parameter.
    ///
    /// A structured parameter is walked with `name` as its path prefix.
    pub fn param(mut self, name: &'a str, value: &'a dyn LogField) -> Self {
        self.params.push(Param {
            name,
            value,
            classifications: None,
        });
        self
    }

    /// Adds a classified template parameter.
    pub fn classified_param(
        mut self,
        name: &'a str,
        classifications: ClassificationSet,
        value: &'a dyn LogField,
    ) -> Self {
        self.params.push(Param {
            name,
            value,
            classifications: Some(classifications),
        });
        self
    }

    /// Adds the properties of `value`, with paths relative to it.
    pub fn properties(self, value: &'a dyn Structured) -> Self {
        self.properties_named("", value)
    }

    /// Adds the properties of `value`, with paths prefixed by `prefix.`.
    pub fn properties_named(mut self, prefix: &'a str, value: &'a dyn Structured) -> Self {
        self.sources.push(Source { prefix, value });
        self
    }

    /// Overrides transitive traversal for this event.
    pub const fn transitive(mut self, transitive: bool) -> Self {
        self.options.transitive = transitive;
        self
    }

    /// Gates on the sink, extracts, renders and hands the record over.
    pub fn emit<S>(self, sink: &S)
    where
        S: LogSink + ?Sized,
    {
        if !sink.is_enabled(self.level) {
            return;
        }

        let extractor = PropertyExtractor::new(self.pipeline.registry(), self.options);
        let mut properties = Vec::new();
        for param in &self.params {
            match (param.value.to_field(), param.classifications) {
                (FieldValue::Nested(nested), None) => {
                    properties.extend(extractor.properties_with_prefix(param.name, nested));
                }
                (read, classifications) => {
                    let value = extractor.resolve_value(param.name, Ok(read), classifications);
                    properties.push(EmittedProperty::new(
                        param.name.to_owned(),
                        value,
                        classifications,
                    ));
                }
            }
        }
        for source in &self.sources {
            properties.extend(extractor.properties_with_prefix(source.prefix, source.value));
        }

        let message = render_template(self.template, &properties);
        sink.accept(&LogRecord {
            level: self.level,
            template: self.template,
            message,
            properties,
        });
    }
}

impl fmt::Debug for LogEvent<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogEvent")
            .field("level", &self.level)
            .field("template", &self.template)
            .field("params", &self.params.len())
            .field("sources", &self.sources.len())
            .finish_non_exhaustive()
    }
}

/// Fills `{Name}` holes in `template` from `properties` (exact path match).
///
/// `{{` and `}}` produce literal braces; holes without a matching property
/// are kept verbatim.
pub fn render_template(template: &str, properties: &[EmittedProperty]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        if let Some(after) = tail.strip_prefix("{{") {
            out.push('{');
            rest = after;
        } else if let Some(after) = tail.strip_prefix("}}") {
            out.push('}');
            rest = after;
        } else if let (true, Some(end)) = (tail.starts_with('{'), tail.find('}')) {
            let hole = &tail[1..end];
            match properties.iter().find(|property| property.path() == hole) {
                Some(property) => out.push_str(&property.value().to_string()),
                None => out.push_str(&tail[..=end]),
            }
            rest = &tail[end + 1..];
        } else {
            out.push_str(&tail[..1]);
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}

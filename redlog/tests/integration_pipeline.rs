//! End-to-end tests for the log emission pipeline.
//!
//! These tests exercise the integration of:
//! - `Structured` derive metadata,
//! - classification-bound redactor selection, and
//! - transitive traversal, parameters and message templates.

use std::{cell::Cell, sync::Arc, thread};

use redlog::{
    testing::CapturingSink, Classification, ClassificationSet, DataClassification, ErasingRedactor,
    ExtractError, ExtractOptions, FieldDescriptor, FieldValue, Level, LogField, LogPipeline,
    NullRedactor, RedactorRegistry, Shape, Structured, TextRedactionPolicy, TextRedactor, Value,
    REDACTED_PLACEHOLDER,
};

struct PersonalData;

impl DataClassification for PersonalData {
    const CLASSIFICATION: Classification = Classification::new("MyTaxonomy", "MyClassification");
}

#[derive(Structured)]
#[log(rename_all = "PascalCase")]
struct InnerUserData {
    #[sensitive(PersonalData)]
    redacted_data: String,
    public_data: String,
}

#[derive(Structured)]
#[log(rename_all = "PascalCase")]
struct User {
    id: String,
    #[sensitive(PersonalData)]
    name: String,
    #[sensitive(PersonalData)]
    email: String,
    #[sensitive]
    inner_data: InnerUserData,
}

fn user() -> User {
    User {
        id: "abcd".into(),
        name: "Charles".into(),
        email: "charles.mingus@bluenote.com".into(),
        inner_data: InnerUserData {
            redacted_data: "0b1c1f0e-guid".into(),
            public_data: "2024-01-01T00:00:00Z".into(),
        },
    }
}

fn erasing_pipeline() -> LogPipeline {
    let registry = RedactorRegistry::builder()
        .set_redactor(PersonalData::CLASSIFICATION, ErasingRedactor::new())
        .set_fallback(NullRedactor)
        .build();
    LogPipeline::new(Arc::new(registry))
}

fn redacted() -> Value {
    Value::from(REDACTED_PLACEHOLDER)
}

#[test]
fn test_user_logged_in_transitive() {
    let pipeline = erasing_pipeline();
    let sink = CapturingSink::new();
    let user = user();

    pipeline
        .event(Level::Info, "User logged in")
        .properties_named("user", &user)
        .transitive(true)
        .emit(&sink);

    let records = sink.records();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.message, "User logged in");
    assert_eq!(
        record.paths(),
        vec![
            "user.Id",
            "user.Name",
            "user.Email",
            "user.InnerData.RedactedData",
            "user.InnerData.PublicData",
        ]
    );
    assert_eq!(record.get("user.Id"), Some(&Value::from("abcd")));
    assert_eq!(record.get("user.Name"), Some(&redacted()));
    assert_eq!(record.get("user.Email"), Some(&redacted()));
    assert_eq!(record.get("user.InnerData.RedactedData"), Some(&redacted()));
    assert_eq!(
        record.get("user.InnerData.PublicData"),
        Some(&Value::from("2024-01-01T00:00:00Z"))
    );
}

#[test]
fn test_non_transitive_skips_nested_values() {
    let pipeline = erasing_pipeline();
    let sink = CapturingSink::new();

    pipeline.emit(&sink, Level::Info, "User logged in", &user());

    let record = &sink.records()[0];
    assert_eq!(record.paths(), vec!["Id", "Name", "Email"]);
    assert!(record.get("InnerData.RedactedData").is_none());
    assert!(record.get("InnerData").is_none());
}

#[test]
fn test_pipeline_options_set_default_transitivity() {
    let registry = Arc::new(RedactorRegistry::default());
    let pipeline = LogPipeline::with_options(registry, ExtractOptions::new().transitive(true));
    let sink = CapturingSink::new();

    pipeline.emit(&sink, Level::Info, "User logged in", &user());
    assert!(sink.records()[0].get("InnerData.PublicData").is_some());

    // the event can still opt out
    pipeline
        .event(Level::Info, "User logged in")
        .properties(&user())
        .transitive(false)
        .emit(&sink);
    assert!(sink.records()[1].get("InnerData.PublicData").is_none());
}

#[test]
fn test_classified_nested_value_is_one_property() {
    #[derive(Structured)]
    struct Envelope {
        #[sensitive(PersonalData)]
        owner: User,
        label: &'static str,
    }

    let pipeline = erasing_pipeline();
    let sink = CapturingSink::new();
    let envelope = Envelope {
        owner: user(),
        label: "outbox",
    };

    pipeline
        .event(Level::Info, "sent")
        .properties(&envelope)
        .transitive(true)
        .emit(&sink);

    let record = &sink.records()[0];
    assert_eq!(record.paths(), vec!["owner", "label"]);
    assert_eq!(record.get("owner"), Some(&redacted()));
}

#[test]
fn test_pass_through_on_outer_node_keeps_inner_redaction() {
    struct Audited;
    impl DataClassification for Audited {
        const CLASSIFICATION: Classification = Classification::new("MyTaxonomy", "Audited");
    }

    #[derive(Structured)]
    struct Envelope {
        #[sensitive(Audited)]
        owner: InnerUserData,
    }

    let pipeline = erasing_pipeline();
    let sink = CapturingSink::new();
    let envelope = Envelope {
        owner: InnerUserData {
            redacted_data: "secret-guid".into(),
            public_data: "now".into(),
        },
    };

    pipeline.emit(&sink, Level::Info, "sent", &envelope);

    // `Audited` falls back to pass-through, the inner classified field does not
    let owner = sink.records()[0].get("owner").cloned().unwrap();
    let rendered = owner.as_str().unwrap().to_owned();
    assert_eq!(
        rendered,
        "InnerUserData { RedactedData: [REDACTED], PublicData: now }"
    );
    assert!(!rendered.contains("secret-guid"));
}

#[test]
fn test_params_come_first_and_fill_the_template() {
    static PERSONAL: [Classification; 1] = [PersonalData::CLASSIFICATION];

    let pipeline = erasing_pipeline();
    let sink = CapturingSink::new();
    let user = user();
    let attempts = 3_u32;
    let name = "Charles";

    pipeline
        .event(Level::Warning, "{name} failed {attempts} logins as {user.Id} {{id}}")
        .param("attempts", &attempts)
        .classified_param("name", ClassificationSet::new(&PERSONAL), &name)
        .param("user", &user)
        .emit(&sink);

    let record = &sink.records()[0];
    assert_eq!(record.level, Level::Warning);
    assert_eq!(record.message, "[REDACTED] failed 3 logins as abcd {id}");
    assert_eq!(
        record.paths(),
        vec!["attempts", "name", "user.Id", "user.Name", "user.Email"]
    );
    assert_eq!(record.get("attempts"), Some(&Value::U64(3)));
    assert_eq!(record.template, "{name} failed {attempts} logins as {user.Id} {{id}}");
}

#[test]
fn test_chained_classifications_apply_in_order() {
    struct Financial;
    impl DataClassification for Financial {
        const CLASSIFICATION: Classification = Classification::new("MyTaxonomy", "Financial");
    }

    #[derive(Structured)]
    struct Payment {
        #[sensitive(PersonalData, Financial)]
        card: String,
    }

    let registry = RedactorRegistry::builder()
        .set_redactor(
            PersonalData::CLASSIFICATION,
            TextRedactor::new(TextRedactionPolicy::keep_last(4)),
        )
        .set_redactor(
            Financial::CLASSIFICATION,
            TextRedactor::new(TextRedactionPolicy::mask_last(1).with_mask_char('#')),
        )
        .build();
    let pipeline = LogPipeline::new(Arc::new(registry));
    let sink = CapturingSink::new();

    pipeline.emit(
        &sink,
        Level::Info,
        "paid",
        &Payment {
            card: "4111111111111111".into(),
        },
    );

    assert_eq!(
        sink.records()[0].get("card"),
        Some(&Value::from("************111#"))
    );
}

/// A hand-registered shape counting accessor calls.
struct Counted {
    reads: Cell<usize>,
}

static COUNTED_FIELDS: [FieldDescriptor; 1] = [FieldDescriptor::plain("value")];
static COUNTED_SHAPE: Shape = Shape::new("Counted", &COUNTED_FIELDS);

impl Structured for Counted {
    fn shape(&self) -> &'static Shape {
        &COUNTED_SHAPE
    }

    fn field(&self, index: usize) -> Result<FieldValue<'_>, ExtractError> {
        self.reads.set(self.reads.get() + 1);
        match index {
            0 => Ok(FieldValue::Value(Value::I64(42))),
            _ => Err(ExtractError::UnknownField {
                shape: "Counted",
                index,
            }),
        }
    }
}

impl LogField for Counted {
    fn to_field(&self) -> FieldValue<'_> {
        FieldValue::Nested(self)
    }
}

#[test]
fn test_disabled_sink_reads_nothing() {
    let pipeline = erasing_pipeline();
    let sink = CapturingSink::disabled();
    let counted = Counted {
        reads: Cell::new(0),
    };

    pipeline.emit(&sink, Level::Critical, "never", &counted);
    pipeline
        .event(Level::Info, "never {value}")
        .param("value", &counted)
        .emit(&sink);

    assert_eq!(counted.reads.get(), 0);
    assert!(sink.is_empty());

    sink.set_enabled(true);
    pipeline.emit(&sink, Level::Info, "now", &counted);
    assert_eq!(counted.reads.get(), 1);
    assert_eq!(sink.records()[0].get("value"), Some(&Value::I64(42)));
}

#[test]
fn test_level_gate() {
    let pipeline = erasing_pipeline();
    let sink = CapturingSink::with_min_level(Level::Warning);
    let counted = Counted {
        reads: Cell::new(0),
    };

    pipeline.emit(&sink, Level::Info, "dropped", &counted);
    pipeline.emit(&sink, Level::Error, "kept", &counted);

    assert_eq!(counted.reads.get(), 1);
    assert_eq!(sink.take().len(), 1);
    assert!(sink.is_empty());
}

#[test]
fn test_concurrent_emission_shares_the_registry() {
    let pipeline = erasing_pipeline();
    let sink = CapturingSink::new();

    thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                for _ in 0..50 {
                    pipeline
                        .event(Level::Info, "User logged in")
                        .properties_named("user", &user())
                        .transitive(true)
                        .emit(&sink);
                }
            });
        }
    });

    let records = sink.records();
    assert_eq!(records.len(), 400);
    for record in records {
        assert_eq!(record.get("user.Name"), Some(&redacted()));
        assert_eq!(record.get("user.InnerData.RedactedData"), Some(&redacted()));
        assert_eq!(record.get("user.Id"), Some(&Value::from("abcd")));
    }
}

#[test]
fn test_redacted_debug() {
    let rendered = format!("{:?}", user());
    assert!(rendered.contains("id: \"abcd\""));
    assert!(rendered.contains("name: [REDACTED]"));
    assert!(!rendered.contains("Charles"));
    assert!(!rendered.contains("0b1c1f0e"));
}

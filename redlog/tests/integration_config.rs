//! Configuration-driven pipelines writing JSON lines.

#![cfg(feature = "serde")]

use redlog::{
    config::RedactionConfig, Classification, ConfigError, DataClassification, JsonSink, Level,
    Structured,
};
use serde_json::{json, Value as JsonValue};

struct PersonalData;

impl DataClassification for PersonalData {
    const CLASSIFICATION: Classification = Classification::new("MyTaxonomy", "MyClassification");
}

struct Card;

impl DataClassification for Card {
    const CLASSIFICATION: Classification = Classification::new("MyTaxonomy", "Card");
}

#[derive(Structured)]
struct Wallet {
    #[sensitive(Card)]
    number: String,
    #[sensitive(Unknown)]
    pin: String,
}

struct Unknown;

impl DataClassification for Unknown {
    const CLASSIFICATION: Classification = Classification::new("Other", "Unknown");
}

#[derive(Structured)]
struct Customer {
    id: u32,
    #[sensitive(PersonalData)]
    email: String,
    phone: Option<String>,
    #[sensitive]
    wallet: Wallet,
}

fn customer() -> Customer {
    Customer {
        id: 17,
        email: "charles.mingus@bluenote.com".into(),
        phone: None,
        wallet: Wallet {
            number: "4111111111111111".into(),
            pin: "0000".into(),
        },
    }
}

const CONFIG: &str = r#"{
    "fallback": { "kind": "erase", "placeholder": "<hidden>" },
    "bindings": [
        {
            "taxonomy": "MyTaxonomy",
            "category": "MyClassification",
            "redactor": { "kind": "erase" }
        },
        {
            "taxonomy": "MyTaxonomy",
            "category": "Card",
            "redactor": { "kind": "keep_last", "count": 4 }
        }
    ],
    "pipeline": { "transitive": true }
}"#;

fn parse_lines(bytes: &[u8]) -> Vec<JsonValue> {
    std::str::from_utf8(bytes)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn test_configured_pipeline_writes_redacted_json() {
    let config = RedactionConfig::from_json(CONFIG).unwrap();
    let pipeline = config.build_pipeline().unwrap();
    assert!(pipeline.options().transitive);

    let sink = JsonSink::new(Vec::new());
    pipeline
        .event(Level::Info, "customer {customer.id} checked out")
        .properties_named("customer", &customer())
        .emit(&sink);
    pipeline.emit(&sink, Level::Debug, "below the sink level", &customer());

    let lines = parse_lines(&sink.into_inner());
    assert_eq!(lines.len(), 1);
    assert_eq!(
        lines[0],
        json!({
            "level": "info",
            "message": "customer 17 checked out",
            "template": "customer {customer.id} checked out",
            "properties": {
                "customer.id": 17,
                "customer.email": "[REDACTED]",
                "customer.phone": null,
                "customer.wallet.number": "************1111",
                "customer.wallet.pin": "<hidden>"
            }
        })
    );
}

#[test]
fn test_empty_config_erases_everything_classified() {
    let pipeline = RedactionConfig::from_json("{}")
        .unwrap()
        .build_pipeline()
        .unwrap();
    let sink = JsonSink::new(Vec::new()).with_min_level(Level::Trace);

    pipeline.emit(&sink, Level::Trace, "customer", &customer());

    let lines = parse_lines(&sink.into_inner());
    assert_eq!(
        lines[0]["properties"],
        json!({
            "id": 17,
            "email": "[REDACTED]",
            "phone": null
        })
    );
}

#[test]
fn test_invalid_bindings_are_rejected() {
    let config = RedactionConfig::from_json(
        r#"{ "bindings": [ { "taxonomy": " ", "category": "x", "redactor": { "kind": "pass_through" } } ] }"#,
    )
    .unwrap();
    assert!(matches!(
        config.build_pipeline(),
        Err(ConfigError::InvalidClassification { .. })
    ));

    assert!(matches!(
        RedactionConfig::from_json(r#"{ "fallback": { "kind": "scramble" } }"#),
        Err(ConfigError::Parse(_))
    ));
}

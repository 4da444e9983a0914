//! A periodic worker logging a user with classified fields as JSON lines.
//!
//! Run with `cargo run --example simple_worker [seconds]`. The worker stops
//! after `seconds` (default 5) or on Ctrl-C.

use std::{
    sync::Arc,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use tokio_util::sync::CancellationToken;

use redlog::{
    Classification, DataClassification, ErasingRedactor, JsonSink, Level, LogPipeline, LogSink,
    NullRedactor, RedactorRegistry, Structured,
};

/// Personal data: erased on output.
struct PersonalData;

impl DataClassification for PersonalData {
    // both strings are arbitrary identifiers, matched again when binding redactors
    const CLASSIFICATION: Classification = Classification::new("MyTaxonomy", "MyClassification");
}

#[derive(Structured)]
#[log(rename_all = "PascalCase")]
struct InnerUserData {
    #[sensitive(PersonalData)]
    redacted_data: String,
    public_data: String,
}

impl InnerUserData {
    fn new(tick: u64) -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self {
            redacted_data: format!("{:016x}-{tick:04}", now.as_nanos()),
            public_data: now.as_secs().to_string(),
        }
    }
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

fn log_user<S: LogSink>(pipeline: &LogPipeline, sink: &S, tick: u64) {
    if !sink.is_enabled(Level::Info) {
        return;
    }
    let user = User {
        id: "abcd".into(),
        name: "Charles".into(),
        email: "charles.mingus@bluenote.com".into(),
        inner_data: InnerUserData::new(tick),
    };
    // without `transitive(true)` InnerData is left out entirely
    pipeline
        .event(Level::Info, "User logged in")
        .properties_named("user", &user)
        .transitive(true)
        .emit(sink);
}

async fn run<S: LogSink>(pipeline: &LogPipeline, sink: &S, token: CancellationToken) {
    let mut interval = tokio::time::interval(Duration::from_secs(1));
    let mut tick = 0;
    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = interval.tick() => {
                log_user(pipeline, sink, tick);
                tick += 1;
            }
        }
    }
}

#[tokio::main]
async fn main() {
    let seconds = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(5);

    let registry = RedactorRegistry::builder()
        .set_redactor(PersonalData::CLASSIFICATION, ErasingRedactor::new())
        .set_fallback(NullRedactor)
        .build();
    let pipeline = LogPipeline::new(Arc::new(registry));
    let sink = JsonSink::stdout();

    let token = CancellationToken::new();
    let stopper = {
        let token = token.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(seconds)) => {}
                _ = tokio::signal::ctrl_c() => {}
            }
            token.cancel();
        })
    };

    run(&pipeline, &sink, token).await;
    let _ = stopper.await;
}

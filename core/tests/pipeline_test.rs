use greeter_core::errors::{DEFAULT_HTTP_ERROR, INVALID_NAME_ERROR, REQUIRED_NAME_ERROR};
use greeter_core::*;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
enum Record {
    Started,
    Ended,
    Failure(LogEnvelope),
    SerializationFailed(String),
    DomainMissing,
}

#[derive(Default)]
struct RecordingDiagnostics {
    records: Mutex<Vec<Record>>,
}

impl RecordingDiagnostics {
    fn records(&self) -> Vec<Record> {
        self.records.lock().unwrap().clone()
    }

    fn push(&self, record: Record) {
        self.records.lock().unwrap().push(record);
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn started(&self, _: &ApiRequest) {
        self.push(Record::Started);
    }

    fn ended(&self, _: &ApiRequest) {
        self.push(Record::Ended);
    }

    fn failure(&self, envelope: &LogEnvelope) {
        self.push(Record::Failure(envelope.clone()));
    }

    fn serialization_failed(&self, reason: &str) {
        self.push(Record::SerializationFailed(reason.to_string()));
    }

    fn domain_missing(&self) {
        self.push(Record::DomainMissing);
    }
}

fn greeter(config: HandlerConfig) -> (Handler<Greeting>, Arc<RecordingDiagnostics>) {
    let diagnostics = Arc::new(RecordingDiagnostics::default());
    let handler = Handler::from_config(
        &config,
        Arc::new(StaticConfig::new("docs.example.com")),
        diagnostics.clone(),
    );
    (handler, diagnostics)
}

fn event(raw: &str) -> ApiRequest {
    serde_json::from_str(raw).unwrap()
}

fn assert_fixed_headers(response: &ApiResponse, domain: &str) {
    assert_eq!(response.headers.len(), 4);
    assert_eq!(response.header("Content-Type"), Some("application/json"));
    assert_eq!(response.header("Access-Control-Allow-Headers"), Some("Content-Type"));
    assert_eq!(
        response.header("Access-Control-Allow-Methods"),
        Some("OPTIONS,GET,POST,PUT,DELETE")
    );
    assert_eq!(
        response.header("Access-Control-Allow-Origin"),
        Some(format!("https://{}", domain).as_str())
    );
}

#[test]
fn test_hello_scenario() {
    let (handler, diagnostics) = greeter(HandlerConfig::hello());
    let response = handler.handle(&event(r#"{"queryStringParameters": {"name": "John"}}"#));

    assert_eq!(response.status_code, 200);
    assert_eq!(response.json_body().unwrap(), json!({"message": "Hello, John!"}));
    assert_fixed_headers(&response, "docs.example.com");
    assert_eq!(diagnostics.records(), vec![Record::Started, Record::Ended]);
}

#[test]
fn test_goodbye_keeps_name_verbatim() {
    let (handler, _) = greeter(HandlerConfig::goodbye());
    let response = handler.handle(&event(r#"{"queryStringParameters": {"name": " Jane Doe "}}"#));

    assert_eq!(response.status_code, 200);
    assert_eq!(response.json_body().unwrap(), json!({"message": "Goodbye,  Jane Doe !"}));
}

#[test]
fn test_missing_parameter_scenarios() {
    let events = [
        "{}",
        r#"{"queryStringParameters": null}"#,
        r#"{"queryStringParameters": {}}"#,
        r#"{"queryStringParameters": {"nickname": "Johnny"}}"#,
    ];

    for raw in events {
        let (handler, diagnostics) = greeter(HandlerConfig::hello());
        let response = handler.handle(&event(raw));

        assert_eq!(response.status_code, 400, "event: {}", raw);
        assert_eq!(response.json_body().unwrap(), json!({"error": REQUIRED_NAME_ERROR}));
        assert!(response.body.contains("required"));
        assert_fixed_headers(&response, "docs.example.com");

        let records = diagnostics.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], Record::Started);
        assert!(matches!(&records[1], Record::Failure(e) if e.error == REQUIRED_NAME_ERROR));
    }
}

#[test]
fn test_invalid_parameter_scenarios() {
    let events = [
        r#"{"queryStringParameters": {"name": ""}}"#,
        r#"{"queryStringParameters": {"name": null}}"#,
        r#"{"queryStringParameters": {"name": "  "}}"#,
    ];

    for raw in events {
        let (handler, _) = greeter(HandlerConfig::hello());
        let response = handler.handle(&event(raw));

        assert_eq!(response.status_code, 400, "event: {}", raw);
        assert_eq!(response.json_body().unwrap(), json!({"error": INVALID_NAME_ERROR}));
    }
}

#[test]
fn test_unclassified_error_masking() {
    struct Boom;

    impl Transform for Boom {
        type Body = Value;

        fn apply(&self, _: &ValidatedName) -> greeter_core::Result<Value> {
            Err(anyhow::anyhow!("boom").into())
        }
    }

    let diagnostics = Arc::new(RecordingDiagnostics::default());
    let handler = Handler::new(
        Boom,
        DEFAULT_HTTP_ERROR,
        Arc::new(StaticConfig::new("docs.example.com")),
        diagnostics.clone(),
    );
    let response = handler.handle(&ApiRequest::with_query([("name", "John")]));

    assert_eq!(response.status_code, 500);
    assert_eq!(response.json_body().unwrap(), json!({"error": DEFAULT_HTTP_ERROR}));
    assert!(!response.body.contains("boom"));
    assert_fixed_headers(&response, "docs.example.com");

    let failures: Vec<LogEnvelope> = diagnostics
        .records()
        .into_iter()
        .filter_map(|r| match r {
            Record::Failure(envelope) => Some(envelope),
            _ => None,
        })
        .collect();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].error.contains("boom"));
    assert!(!failures[0].trace.is_empty());
}

#[test]
fn test_unserializable_body_falls_back() {
    struct BadBody;

    impl serde::Serialize for BadBody {
        fn serialize<S: serde::Serializer>(&self, _: S) -> std::result::Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("not representable"))
        }
    }

    struct Bad;

    impl Transform for Bad {
        type Body = BadBody;

        fn apply(&self, _: &ValidatedName) -> greeter_core::Result<BadBody> {
            Ok(BadBody)
        }
    }

    let diagnostics = Arc::new(RecordingDiagnostics::default());
    let handler = Handler::new(
        Bad,
        DEFAULT_HTTP_ERROR,
        Arc::new(StaticConfig::new("docs.example.com")),
        diagnostics.clone(),
    );
    let response = handler.handle(&ApiRequest::with_query([("name", "John")]));

    assert_eq!(response.status_code, 500);
    assert_eq!(
        response.json_body().unwrap(),
        json!({"error": "An unexpected error occurred."})
    );
    assert!(diagnostics.records().iter().any(
        |r| matches!(r, Record::SerializationFailed(reason) if reason.contains("not representable"))
    ));
}

#[test]
fn test_missing_domain_is_not_substituted() {
    let diagnostics = Arc::new(RecordingDiagnostics::default());
    let handler = Handler::from_config(
        &HandlerConfig::hello(),
        Arc::new(StaticConfig::unset()),
        diagnostics.clone(),
    );
    let response = handler.handle(&ApiRequest::with_query([("name", "John")]));

    assert_eq!(response.status_code, 200);
    assert_fixed_headers(&response, "");
    assert!(diagnostics.records().contains(&Record::DomainMissing));
}

#[test]
fn test_env_config_is_read_per_response() {
    // the only test in this binary that touches the environment
    let handler = Handler::from_config(
        &HandlerConfig::hello(),
        Arc::new(EnvConfig),
        Arc::new(TracingDiagnostics),
    );
    let request = ApiRequest::with_query([("name", "John")]);

    unsafe { std::env::set_var("DOCS_DOMAIN_NAME", "first.example.com") };
    let first = handler.handle(&request);
    unsafe { std::env::set_var("DOCS_DOMAIN_NAME", "second.example.com") };
    let second = handler.handle(&request);
    unsafe { std::env::remove_var("DOCS_DOMAIN_NAME") };

    assert_fixed_headers(&first, "first.example.com");
    assert_fixed_headers(&second, "second.example.com");
}

#[test]
fn test_response_round_trips_through_json() {
    let (handler, _) = greeter(HandlerConfig::new("Howdy"));
    let response = handler.handle(&ApiRequest::with_query([("name", "Partner")]));

    let wire = serde_json::to_string(&response).unwrap();
    let decoded: ApiResponse = serde_json::from_str(&wire).unwrap();
    assert_eq!(decoded, response);
    assert_eq!(decoded.json_body().unwrap(), json!({"message": "Howdy, Partner!"}));
}

//! APM document assembly.
//!
//! Turns a synthesized [`Trace`] into the transaction and span documents an
//! Elastic APM data stream expects. Host names, client addresses and similar
//! decoration are random and carry no invariants.

use chrono::{DateTime, SecondsFormat, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::{json, Value};

use crate::synth::timing::Category;
use crate::synth::trace::{random_uuid, Span, Transaction};

const ENVIRONMENT: &str = "production";

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) Chrome/91.0",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 14_6 like Mac OS X)",
];

const POSTGRES_STATEMENTS: &[&str] = &[
    "SELECT * FROM users WHERE id = $1",
    "UPDATE products SET stock = stock - 1 WHERE id = $1",
    "INSERT INTO orders (user_id, total) VALUES ($1, $2)",
    "SELECT * FROM accounts WHERE user_id = $1 AND active = true",
];

const MONGO_STATEMENTS: &[&str] = &[
    r#"db.products.find({category: "electronics"})"#,
    "db.users.updateOne({_id: ObjectId()}, {$set: {lastLogin: new Date()}})",
    r#"db.orders.aggregate([{$match: {status: "pending"}}])"#,
];

const CACHE_COMMANDS: &[&str] = &["GET", "SET", "HGETALL", "ZADD"];

/// Labels stamped on every document of a run.
#[derive(Debug, Clone)]
pub struct DocumentLabels {
    pub industry: String,
    /// Active scenario display name.
    pub scenario: Option<String>,
}

impl DocumentLabels {
    pub fn to_value(&self) -> Value {
        let mut labels = json!({
            "industry": self.industry,
            "environment": ENVIRONMENT,
        });
        if let Some(scenario) = &self.scenario {
            labels["scenario"] = json!(scenario);
        }
        labels
    }
}

pub fn iso_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn pick<R: Rng + ?Sized>(options: &[&'static str], rng: &mut R) -> &'static str {
    options.choose(rng).copied().unwrap_or_default()
}

fn node_name<R: Rng + ?Sized>(service: &str, max: u32, rng: &mut R) -> String {
    format!("{}-{:02}", service, rng.gen_range(1..=max))
}

/// Build the transaction document.
pub fn transaction_document<R: Rng + ?Sized>(
    tx: &Transaction,
    labels: &DocumentLabels,
    rng: &mut R,
) -> Value {
    let domain = format!("{}.{}.example.com", tx.service, labels.industry);
    let host = node_name(&tx.service, 5, rng);

    json!({
        "@timestamp": iso_timestamp(tx.timestamp),
        "timestamp": { "us": tx.timestamp.timestamp_micros() },
        "trace": { "id": tx.trace_id.to_string() },
        "transaction": {
            "id": tx.id.to_string(),
            "name": tx.operation.name,
            "type": "request",
            "duration": { "us": tx.duration_us },
            "result": if tx.is_error { "HTTP 5xx" } else { "HTTP 2xx" },
            "sampled": true,
            "span_count": { "started": tx.span_count },
        },
        "event": { "outcome": outcome(tx.is_error) },
        "processor": { "event": "transaction", "name": "transaction" },
        "http": {
            "request": { "method": tx.operation.method },
            "response": { "status_code": if tx.is_error { 500 } else { 200 } },
            "version": "1.1",
        },
        "url": {
            "path": tx.operation.path,
            "scheme": "https",
            "domain": domain,
            "full": format!("https://{}{}", domain, tx.operation.path),
        },
        "user_agent": { "original": pick(USER_AGENTS, rng) },
        "client": {
            "ip": format!(
                "{}.{}.{}.{}",
                rng.gen_range(10..=200),
                rng.gen_range(1..=255),
                rng.gen_range(1..=255),
                rng.gen_range(1..=255),
            ),
        },
        "service": {
            "name": tx.service,
            "environment": ENVIRONMENT,
            "node": { "name": node_name(&tx.service, 3, rng) },
            "language": { "name": "rust", "version": "1.80.0" },
        },
        "agent": {
            "name": "rust",
            "version": env!("CARGO_PKG_VERSION"),
            "ephemeral_id": random_uuid(rng).to_string(),
        },
        "host": {
            "hostname": host,
            "name": host,
            "ip": format!("10.0.{}.{}", rng.gen_range(1..=255), rng.gen_range(1..=255)),
        },
        "labels": labels.to_value(),
    })
}

/// Span name by category (`SELECT FROM postgres-db`).
pub fn span_name(service: &str, category: Category) -> String {
    match category {
        Category::Db => format!("SELECT FROM {}", service),
        Category::Cache => format!("GET {}", service),
        Category::Messaging => format!("SEND {}", service),
        Category::Storage | Category::External => format!("POST {}/process", service),
    }
}

/// Build a span document; `transaction_start` anchors the span's offset.
pub fn span_document<R: Rng + ?Sized>(
    span: &Span,
    transaction_start: DateTime<Utc>,
    labels: &DocumentLabels,
    rng: &mut R,
) -> Value {
    let timestamp = span.timestamp(transaction_start);
    let subtype = span.kind.subtype;

    let mut doc = json!({
        "@timestamp": iso_timestamp(timestamp),
        "timestamp": { "us": timestamp.timestamp_micros() },
        "trace": { "id": span.trace_id.to_string() },
        "parent": { "id": span.parent_id.to_string() },
        "span": {
            "id": span.id.to_string(),
            "name": span_name(&span.service, span.kind.category),
            "type": span.kind.category.as_str(),
            "subtype": subtype,
            "duration": { "us": span.duration_us },
            "start": { "offset_ms": span.offset_ms },
        },
        "event": { "outcome": outcome(span.is_error) },
        "processor": { "event": "span", "name": "transaction" },
        "observer": { "version": "8.0.0", "type": "apm-server" },
        "service": {
            "name": span.service,
            "environment": ENVIRONMENT,
            "node": { "name": node_name(&span.service, 3, rng) },
            "target": { "type": subtype, "name": span.service },
        },
        "destination": {
            "service": {
                "name": span.service,
                "resource": format!("{}/{}", subtype, span.service),
                "type": subtype,
            },
        },
        "agent": { "name": "rust", "version": env!("CARGO_PKG_VERSION") },
        "labels": labels.to_value(),
    });

    match span.kind.category {
        Category::Db => {
            let statements = if subtype == "mongodb" { MONGO_STATEMENTS } else { POSTGRES_STATEMENTS };
            doc["db"] = json!({
                "instance": span.service,
                "type": subtype,
                "statement": pick(statements, rng),
            });
        }
        Category::Cache => {
            doc["db"] = json!({ "type": "redis", "statement": pick(CACHE_COMMANDS, rng) });
        }
        Category::Messaging => {
            doc["message"] = json!({ "queue": { "name": format!("{}-queue", span.service) } });
        }
        Category::Storage | Category::External => {}
    }

    doc
}

fn outcome(is_error: bool) -> &'static str {
    if is_error {
        "failure"
    } else {
        "success"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{self, Perturbation};
    use crate::synth::trace::TraceSynthesizer;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn labels(scenario: Option<&str>) -> DocumentLabels {
        DocumentLabels {
            industry: "ecommerce".into(),
            scenario: scenario.map(String::from),
        }
    }

    #[test]
    fn test_transaction_document_fields() {
        let mut rng = StdRng::seed_from_u64(1);
        let start = DateTime::parse_from_rfc3339("2024-06-01T12:00:00Z").unwrap().with_timezone(&Utc);
        let profile = catalog::industry("ecommerce").unwrap();
        let p = Perturbation { error_rate: 1.0, ..Perturbation::baseline() };
        let trace = TraceSynthesizer::new(profile, &p).synthesize_from("web-frontend", start, &mut rng);

        let doc = transaction_document(&trace.transaction, &labels(Some("Black Friday")), &mut rng);
        assert_eq!(doc["@timestamp"], "2024-06-01T12:00:00.000000Z");
        assert_eq!(doc["timestamp"]["us"], 1_717_243_200_000_000i64);
        assert_eq!(doc["trace"]["id"], trace.transaction.trace_id.to_string());
        assert_eq!(doc["transaction"]["duration"]["us"], trace.transaction.duration_us);
        assert_eq!(doc["transaction"]["span_count"]["started"], 5);
        assert_eq!(doc["event"]["outcome"], "failure");
        assert_eq!(doc["http"]["response"]["status_code"], 500);
        assert_eq!(doc["url"]["domain"], "web-frontend.ecommerce.example.com");
        assert_eq!(doc["labels"]["scenario"], "Black Friday");
        assert_eq!(doc["service"]["name"], "web-frontend");
    }

    #[test]
    fn test_span_documents_carry_category_metadata() {
        let mut rng = StdRng::seed_from_u64(2);
        let start = Utc::now();
        let profile = catalog::industry("banking").unwrap();
        let p = Perturbation::baseline();
        let trace = TraceSynthesizer::new(profile, &p).synthesize_from("transaction-service", start, &mut rng);

        for span in &trace.spans {
            let doc = span_document(span, start, &labels(None), &mut rng);
            assert_eq!(doc["parent"]["id"], trace.transaction.id.to_string());
            assert_eq!(doc["span"]["duration"]["us"], span.duration_us);
            assert!(doc["labels"].get("scenario").is_none());
            match span.service.as_str() {
                "kafka-broker" => {
                    assert_eq!(doc["span"]["type"], "messaging");
                    assert_eq!(doc["span"]["name"], "SEND kafka-broker");
                    assert_eq!(doc["message"]["queue"]["name"], "kafka-broker-queue");
                }
                "payment-service" => {
                    assert_eq!(doc["span"]["type"], "external");
                    assert_eq!(doc["destination"]["service"]["resource"], "http/payment-service");
                    assert!(doc.get("db").is_none());
                }
                _ => {}
            }
        }
    }

    #[test]
    fn test_db_span_statement() {
        let mut rng = StdRng::seed_from_u64(3);
        let start = Utc::now();
        let profile = catalog::industry("ecommerce").unwrap();
        let p = Perturbation::baseline();
        let trace = TraceSynthesizer::new(profile, &p).synthesize_from("inventory-service", start, &mut rng);

        let db = trace.spans.iter().find(|s| s.service == "postgres-db").unwrap();
        let doc = span_document(db, start, &labels(None), &mut rng);
        assert_eq!(doc["span"]["name"], "SELECT FROM postgres-db");
        assert_eq!(doc["db"]["type"], "postgresql");
        assert!(POSTGRES_STATEMENTS.contains(&doc["db"]["statement"].as_str().unwrap()));
    }
}

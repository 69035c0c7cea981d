//! Tests for span classification

use chrono::{TimeZone, Utc};
use serde_json::json;

use super::*;

fn span(span_type: SpanType, status: SpanStatus, metadata: JsonValue) -> Span {
    let metadata = match metadata {
        JsonValue::Object(map) => map,
        _ => Map::new(),
    };
    Span {
        span_id: "s1".to_string(),
        parent_span_id: None,
        name: "op".to_string(),
        span_type,
        status,
        started_at: Utc.timestamp_millis_opt(0).unwrap(),
        ended_at: None,
        duration_ms: Some(10.0),
        input_tokens: None,
        output_tokens: None,
        model: None,
        error_message: None,
        metadata,
    }
}

fn line_pairs(metrics: &SpanMetrics) -> Vec<(String, String)> {
    metrics
        .lines()
        .into_iter()
        .map(|l| (l.label, l.value))
        .collect()
}

fn pair(label: &str, value: &str) -> (String, String) {
    (label.to_string(), value.to_string())
}

// ============================================================================
// CATEGORY & COLOUR
// ============================================================================

#[test]
fn test_category_colors() {
    let cases = [
        (SpanType::Llm, SpanColor::Purple),
        (SpanType::Embedding, SpanColor::Indigo),
        (SpanType::Retrieval, SpanColor::Teal),
        (SpanType::Generation, SpanColor::Blue),
        (SpanType::Db, SpanColor::Amber),
        (SpanType::External, SpanColor::Green),
        (SpanType::Internal, SpanColor::Slate),
        (SpanType::parse("queue"), SpanColor::Gray),
    ];
    for (span_type, expected) in cases {
        let c = classify_span(&span(span_type.clone(), SpanStatus::Completed, json!({})));
        assert_eq!(c.color, expected, "colour for {}", span_type);
    }
}

#[test]
fn test_failed_always_red() {
    for span_type in [SpanType::Llm, SpanType::Db, SpanType::Other("x".into())] {
        let c = classify_span(&span(span_type, SpanStatus::Failed, json!({})));
        assert_eq!(c.color, SpanColor::Red);
        assert_eq!(c.status, StatusBadge::Failed);
    }
}

#[test]
fn test_unknown_type_and_status_degrade() {
    let c = classify_span(&span(
        SpanType::parse("workflow"),
        SpanStatus::parse("cancelled"),
        json!({}),
    ));
    assert_eq!(c.category, SpanCategory::Unknown);
    assert_eq!(c.status, StatusBadge::Neutral);
    assert_eq!(c.color, SpanColor::Gray);
    assert!(c.error.is_none());
}

#[test]
fn test_hex_and_ansi_values() {
    assert_eq!(SpanColor::Red.hex(), "#ef4444");
    assert!(SpanColor::Purple.ansi().starts_with("\x1b[38;5;"));
}

// ============================================================================
// LLM
// ============================================================================

#[test]
fn test_llm_tokens_without_cost() {
    let mut s = span(SpanType::Llm, SpanStatus::Completed, json!({}));
    s.input_tokens = Some(100);
    s.output_tokens = Some(200);

    let c = classify_span(&s);
    assert_eq!(
        line_pairs(&c.metrics),
        vec![
            pair("Input Tokens", "100"),
            pair("Output Tokens", "200"),
            pair("Total Tokens", "300"),
        ]
    );
}

#[test]
fn test_llm_full_block() {
    let mut s = span(
        SpanType::Llm,
        SpanStatus::Completed,
        json!({ "cost_usd": 0.00123, "temperature": 0.2 }),
    );
    s.model = Some("gpt-4o".to_string());
    s.input_tokens = Some(12_345);
    s.output_tokens = Some(655);

    let c = classify_span(&s);
    assert_eq!(
        line_pairs(&c.metrics),
        vec![
            pair("Model", "gpt-4o"),
            pair("Input Tokens", "12,345"),
            pair("Output Tokens", "655"),
            pair("Total Tokens", "13,000"),
            pair("Cost", "$0.0012"),
        ]
    );
}

#[test]
fn test_llm_partial_tokens() {
    let mut s = span(SpanType::Llm, SpanStatus::Completed, json!({}));
    s.output_tokens = Some(40);
    let c = classify_span(&s);
    match &c.metrics {
        SpanMetrics::Llm(m) => {
            assert_eq!(m.input_tokens, None);
            assert_eq!(m.total_tokens(), Some(40));
        }
        other => panic!("expected llm metrics, got {:?}", other),
    }
}

#[test]
fn test_llm_total_tokens_saturates() {
    let mut s = span(SpanType::Llm, SpanStatus::Completed, json!({}));
    s.input_tokens = Some(i64::MAX);
    s.output_tokens = Some(1);
    let c = classify_span(&s);
    match &c.metrics {
        SpanMetrics::Llm(m) => assert_eq!(m.total_tokens(), Some(i64::MAX)),
        other => panic!("expected llm metrics, got {:?}", other),
    }
    assert!(
        c.metrics
            .lines()
            .iter()
            .any(|l| l.label == "Total Tokens" && l.value == "9,223,372,036,854,775,807")
    );
}

#[test]
fn test_llm_without_fields_falls_back_to_generic() {
    let s = span(SpanType::Llm, SpanStatus::Completed, json!({ "provider": "acme" }));
    let c = classify_span(&s);
    assert_eq!(line_pairs(&c.metrics), vec![pair("provider", "acme")]);
}

// ============================================================================
// DB
// ============================================================================

#[test]
fn test_db_block_with_verbatim_query() {
    let query = "SELECT *\n  FROM users\n WHERE id = $1";
    let s = span(
        SpanType::Db,
        SpanStatus::Completed,
        json!({ "operation": "select", "table": "users", "rows_affected": 1200, "query": query }),
    );
    let c = classify_span(&s);
    let lines = c.metrics.lines();
    assert_eq!(lines[0], MetricLine::plain("Operation", "select".to_string()));
    assert_eq!(lines[1].value, "users");
    assert_eq!(lines[2].value, "1,200");
    assert_eq!(lines[3].value, query);
    assert_eq!(lines[3].kind, MetricKind::Verbatim);
}

#[test]
fn test_failed_db_keeps_error_and_metrics() {
    let mut s = span(
        SpanType::Db,
        SpanStatus::Failed,
        json!({ "operation": "insert", "table": "orders" }),
    );
    s.error_message = Some("duplicate key value violates unique constraint".to_string());

    let c = classify_span(&s);
    assert_eq!(
        c.error.as_deref(),
        Some("duplicate key value violates unique constraint")
    );
    assert_eq!(c.color, SpanColor::Red);
    assert_eq!(
        line_pairs(&c.metrics),
        vec![pair("Operation", "insert"), pair("Table", "orders")]
    );
}

#[test]
fn test_db_otel_aliases() {
    let s = span(
        SpanType::Db,
        SpanStatus::Completed,
        json!({ "db.operation": "UPDATE", "db.statement": "UPDATE t SET x = 1" }),
    );
    match classify_span(&s).metrics {
        SpanMetrics::Db(m) => {
            assert_eq!(m.operation.as_deref(), Some("UPDATE"));
            assert_eq!(m.query.as_deref(), Some("UPDATE t SET x = 1"));
            assert!(m.table.is_none());
        }
        other => panic!("expected db metrics, got {:?}", other),
    }
}

// ============================================================================
// EXTERNAL
// ============================================================================

#[test]
fn test_external_block() {
    let s = span(
        SpanType::External,
        SpanStatus::Completed,
        json!({ "url": "https://api.example.com/v1/search", "method": "post", "status_code": "201" }),
    );
    let c = classify_span(&s);
    let lines = c.metrics.lines();
    assert_eq!(
        line_pairs(&c.metrics),
        vec![
            pair("Method", "POST"),
            pair("URL", "https://api.example.com/v1/search"),
            pair("Status Code", "201"),
        ]
    );
    assert_eq!(lines[1].kind, MetricKind::Link);
}

#[test]
fn test_external_without_fields_is_generic() {
    let s = span(SpanType::External, SpanStatus::Completed, json!({}));
    assert_eq!(
        classify_span(&s).metrics,
        SpanMetrics::Generic(GenericMetrics::default())
    );
}

// ============================================================================
// GENERIC & ERRORS
// ============================================================================

#[test]
fn test_generic_value_coercion() {
    let s = span(
        SpanType::Retrieval,
        SpanStatus::Completed,
        json!({
            "index": "docs",
            "top_k": 12345,
            "rerank": true,
            "filter": { "lang": "en" },
            "ids": [1, 2],
            "cursor": null
        }),
    );
    assert_eq!(
        line_pairs(&classify_span(&s).metrics),
        vec![
            pair("index", "docs"),
            pair("top_k", "12,345"),
            pair("rerank", "Yes"),
            pair("filter", r#"{"lang":"en"}"#),
            pair("ids", "[1,2]"),
            pair("cursor", "-"),
        ]
    );
}

#[test]
fn test_generic_truncated_with_more_indicator() {
    let mut meta = Map::new();
    for i in 0..13 {
        meta.insert(format!("k{:02}", i), json!(i));
    }
    let s = span(SpanType::Internal, SpanStatus::Completed, JsonValue::Object(meta));

    let c = classify_span(&s);
    let lines = c.metrics.lines();
    assert_eq!(lines.len(), MAX_METADATA_ENTRIES + 1);
    assert_eq!(lines[0].label, "k00");
    assert_eq!(lines[9].label, "k09");
    let last = lines.last().unwrap();
    assert_eq!(last.kind, MetricKind::Overflow);
    assert_eq!(last.value, "+3 more");
}

#[test]
fn test_custom_metadata_limit() {
    let s = span(
        SpanType::Internal,
        SpanStatus::Completed,
        json!({ "a": 1, "b": 2, "c": 3 }),
    );
    match classify_span_with_limit(&s, 1).metrics {
        SpanMetrics::Generic(m) => {
            assert_eq!(m.entries, vec![pair("a", "1")]);
            assert_eq!(m.remaining, 2);
        }
        other => panic!("expected generic metrics, got {:?}", other),
    }
}

#[test]
fn test_error_only_for_failed_spans() {
    let mut s = span(SpanType::Internal, SpanStatus::Completed, json!({}));
    s.error_message = Some("stale message".to_string());
    assert!(classify_span(&s).error.is_none());

    s.status = SpanStatus::Failed;
    assert_eq!(classify_span(&s).error.as_deref(), Some("stale message"));

    s.error_message = Some("   ".to_string());
    assert!(classify_span(&s).error.is_none());
}

#[test]
fn test_classification_is_idempotent() {
    let mut s = span(
        SpanType::Llm,
        SpanStatus::Failed,
        json!({ "cost_usd": 0.5, "extra": [1, 2, 3] }),
    );
    s.input_tokens = Some(1);
    s.error_message = Some("boom".to_string());
    assert_eq!(classify_span(&s), classify_span(&s));
}

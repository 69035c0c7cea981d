//! Span classification and metric extraction
//!
//! Maps a span to a presentation category, a colour, a status badge, and a
//! type-specific metric block. Metadata is read defensively: every field is
//! optional and absent fields are omitted, never filled with placeholders.
//! When a typed block would be empty the span falls back to a generic
//! listing of its metadata.

use serde_json::{Map, Value as JsonValue};

use crate::core::constants::MAX_METADATA_ENTRIES;
use crate::data::types::{META_COST_USD, Span, SpanStatus, SpanType};
use crate::utils::json::{display_value, get_f64, get_first_string, get_i64};
use crate::utils::string::{format_usd, group_digits};

// Metadata keys, with OpenTelemetry-style aliases accepted as fallbacks
const DB_OPERATION_KEYS: &[&str] = &["operation", "db.operation"];
const DB_TABLE_KEYS: &[&str] = &["table", "db.sql.table"];
const DB_ROWS_KEYS: &[&str] = &["rows_affected", "db.rows_affected"];
const DB_QUERY_KEYS: &[&str] = &["query", "db.statement"];
const HTTP_URL_KEYS: &[&str] = &["url", "http.url"];
const HTTP_METHOD_KEYS: &[&str] = &["method", "http.method"];
const HTTP_STATUS_KEYS: &[&str] = &["status_code", "http.status_code"];

// ============================================================================
// CATEGORY & COLOUR
// ============================================================================

/// Presentation category derived from `span_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanCategory {
    Llm,
    Embedding,
    Retrieval,
    Generation,
    Db,
    External,
    Internal,
    Unknown,
}

impl SpanCategory {
    pub fn from_span_type(span_type: &SpanType) -> Self {
        match span_type {
            SpanType::Llm => Self::Llm,
            SpanType::Embedding => Self::Embedding,
            SpanType::Retrieval => Self::Retrieval,
            SpanType::Generation => Self::Generation,
            SpanType::Db => Self::Db,
            SpanType::External => Self::External,
            SpanType::Internal => Self::Internal,
            SpanType::Other(_) => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Llm => "llm",
            Self::Embedding => "embedding",
            Self::Retrieval => "retrieval",
            Self::Generation => "generation",
            Self::Db => "db",
            Self::External => "external",
            Self::Internal => "internal",
            Self::Unknown => "unknown",
        }
    }

    /// Base colour before status overrides
    pub fn color(&self) -> SpanColor {
        match self {
            Self::Llm => SpanColor::Purple,
            Self::Embedding => SpanColor::Indigo,
            Self::Retrieval => SpanColor::Teal,
            Self::Generation => SpanColor::Blue,
            Self::Db => SpanColor::Amber,
            Self::External => SpanColor::Green,
            Self::Internal => SpanColor::Slate,
            Self::Unknown => SpanColor::Gray,
        }
    }
}

/// Bar colour, usable by both web (hex) and terminal (ANSI) hosts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanColor {
    Purple,
    Indigo,
    Teal,
    Blue,
    Amber,
    Green,
    Slate,
    Gray,
    Red,
}

impl SpanColor {
    pub fn hex(&self) -> &'static str {
        match self {
            Self::Purple => "#a855f7",
            Self::Indigo => "#6366f1",
            Self::Teal => "#14b8a6",
            Self::Blue => "#3b82f6",
            Self::Amber => "#f59e0b",
            Self::Green => "#22c55e",
            Self::Slate => "#64748b",
            Self::Gray => "#94a3b8",
            Self::Red => "#ef4444",
        }
    }

    /// ANSI foreground escape (256-colour palette)
    pub fn ansi(&self) -> &'static str {
        match self {
            Self::Purple => "\x1b[38;5;135m",
            Self::Indigo => "\x1b[38;5;63m",
            Self::Teal => "\x1b[38;5;37m",
            Self::Blue => "\x1b[38;5;33m",
            Self::Amber => "\x1b[38;5;214m",
            Self::Green => "\x1b[38;5;40m",
            Self::Slate => "\x1b[38;5;67m",
            Self::Gray => "\x1b[38;5;246m",
            Self::Red => "\x1b[38;5;196m",
        }
    }
}

/// Status presentation; unknown statuses render neutrally
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBadge {
    Completed,
    Failed,
    InProgress,
    Neutral,
}

impl StatusBadge {
    pub fn from_status(status: &SpanStatus) -> Self {
        match status {
            SpanStatus::Completed => Self::Completed,
            SpanStatus::Failed => Self::Failed,
            SpanStatus::InProgress => Self::InProgress,
            SpanStatus::Other(_) => Self::Neutral,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Completed => "✔",
            Self::Failed => "✖",
            Self::InProgress => "…",
            Self::Neutral => "·",
        }
    }

    pub fn color(&self) -> SpanColor {
        match self {
            Self::Completed => SpanColor::Green,
            Self::Failed => SpanColor::Red,
            Self::InProgress => SpanColor::Amber,
            Self::Neutral => SpanColor::Gray,
        }
    }
}

// ============================================================================
// METRICS
// ============================================================================

/// LLM call usage; every field independently optional
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LlmMetrics {
    pub model: Option<String>,
    pub input_tokens: Option<i64>,
    pub output_tokens: Option<i64>,
    pub cost_usd: Option<f64>,
}

impl LlmMetrics {
    /// Sum of the token counts that are present
    pub fn total_tokens(&self) -> Option<i64> {
        match (self.input_tokens, self.output_tokens) {
            (None, None) => None,
            (i, o) => Some(i.unwrap_or(0).saturating_add(o.unwrap_or(0))),
        }
    }

    fn is_empty(&self) -> bool {
        self.model.is_none()
            && self.input_tokens.is_none()
            && self.output_tokens.is_none()
            && self.cost_usd.is_none()
    }
}

/// Database call details
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DbMetrics {
    pub operation: Option<String>,
    pub table: Option<String>,
    pub rows_affected: Option<i64>,
    /// Raw query text, shown verbatim
    pub query: Option<String>,
}

impl DbMetrics {
    fn is_empty(&self) -> bool {
        self.operation.is_none()
            && self.table.is_none()
            && self.rows_affected.is_none()
            && self.query.is_none()
    }
}

/// Outbound HTTP call details
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExternalMetrics {
    pub url: Option<String>,
    pub method: Option<String>,
    pub status_code: Option<i64>,
}

impl ExternalMetrics {
    fn is_empty(&self) -> bool {
        self.url.is_none() && self.method.is_none() && self.status_code.is_none()
    }
}

/// Metadata listed as key/value strings in producer order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenericMetrics {
    pub entries: Vec<(String, String)>,
    /// Entries not shown because of the display limit
    pub remaining: usize,
}

/// Type-specific metric block
#[derive(Debug, Clone, PartialEq)]
pub enum SpanMetrics {
    Llm(LlmMetrics),
    Db(DbMetrics),
    External(ExternalMetrics),
    Generic(GenericMetrics),
}

/// Kind of a displayed metric line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Plain,
    /// Multi-line text that must be printed verbatim (e.g. SQL)
    Verbatim,
    /// Clickable when the host supports it
    Link,
    /// "+N more" indicator after a truncated listing
    Overflow,
}

/// One labelled line of the metric block
#[derive(Debug, Clone, PartialEq)]
pub struct MetricLine {
    pub label: String,
    pub value: String,
    pub kind: MetricKind,
}

impl MetricLine {
    fn plain(label: &str, value: String) -> Self {
        Self {
            label: label.to_string(),
            value,
            kind: MetricKind::Plain,
        }
    }
}

impl SpanMetrics {
    /// Display lines in a fixed order, omitting absent fields
    pub fn lines(&self) -> Vec<MetricLine> {
        let mut lines = Vec::new();
        match self {
            Self::Llm(m) => {
                if let Some(model) = &m.model {
                    lines.push(MetricLine::plain("Model", model.clone()));
                }
                if let Some(n) = m.input_tokens {
                    lines.push(MetricLine::plain("Input Tokens", group_digits(n)));
                }
                if let Some(n) = m.output_tokens {
                    lines.push(MetricLine::plain("Output Tokens", group_digits(n)));
                }
                if let Some(n) = m.total_tokens() {
                    lines.push(MetricLine::plain("Total Tokens", group_digits(n)));
                }
                if let Some(cost) = m.cost_usd {
                    lines.push(MetricLine::plain("Cost", format_usd(cost)));
                }
            }
            Self::Db(m) => {
                if let Some(op) = &m.operation {
                    lines.push(MetricLine::plain("Operation", op.clone()));
                }
                if let Some(table) = &m.table {
                    lines.push(MetricLine::plain("Table", table.clone()));
                }
                if let Some(n) = m.rows_affected {
                    lines.push(MetricLine::plain("Rows Affected", group_digits(n)));
                }
                if let Some(query) = &m.query {
                    lines.push(MetricLine {
                        label: "Query".to_string(),
                        value: query.clone(),
                        kind: MetricKind::Verbatim,
                    });
                }
            }
            Self::External(m) => {
                if let Some(method) = &m.method {
                    lines.push(MetricLine::plain("Method", method.clone()));
                }
                if let Some(url) = &m.url {
                    lines.push(MetricLine {
                        label: "URL".to_string(),
                        value: url.clone(),
                        kind: MetricKind::Link,
                    });
                }
                if let Some(code) = m.status_code {
                    lines.push(MetricLine::plain("Status Code", code.to_string()));
                }
            }
            Self::Generic(m) => {
                for (key, value) in &m.entries {
                    lines.push(MetricLine::plain(key, value.clone()));
                }
                if m.remaining > 0 {
                    lines.push(MetricLine {
                        label: String::new(),
                        value: format!("+{} more", m.remaining),
                        kind: MetricKind::Overflow,
                    });
                }
            }
        }
        lines
    }
}

// ============================================================================
// CLASSIFICATION
// ============================================================================

/// Everything a renderer needs to present one span
#[derive(Debug, Clone, PartialEq)]
pub struct SpanClassification {
    pub category: SpanCategory,
    /// Category colour, or red when the span failed
    pub color: SpanColor,
    pub status: StatusBadge,
    /// Error text to show marked, present only for failed spans
    pub error: Option<String>,
    pub metrics: SpanMetrics,
}

/// Classify a span with the default metadata display limit
pub fn classify_span(span: &Span) -> SpanClassification {
    classify_span_with_limit(span, MAX_METADATA_ENTRIES)
}

/// Classify a span, listing at most `max_metadata_entries` generic entries
pub fn classify_span_with_limit(span: &Span, max_metadata_entries: usize) -> SpanClassification {
    let category = SpanCategory::from_span_type(&span.span_type);
    let status = StatusBadge::from_status(&span.status);
    let failed = span.status.is_failed();

    let color = if failed {
        SpanColor::Red
    } else {
        category.color()
    };

    let error = if failed {
        span.error_message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
    } else {
        None
    };

    let metrics = extract_metrics(category, span).unwrap_or_else(|| {
        SpanMetrics::Generic(generic_metrics(&span.metadata, max_metadata_entries))
    });

    SpanClassification {
        category,
        color,
        status,
        error,
        metrics,
    }
}

/// Typed block for the span's category, `None` when nothing is present
fn extract_metrics(category: SpanCategory, span: &Span) -> Option<SpanMetrics> {
    let meta = &span.metadata;
    match category {
        SpanCategory::Llm => {
            let m = LlmMetrics {
                model: span
                    .model
                    .clone()
                    .filter(|m| !m.trim().is_empty())
                    .or_else(|| get_first_string(meta, &["model"])),
                input_tokens: span.input_tokens,
                output_tokens: span.output_tokens,
                cost_usd: get_f64(meta, META_COST_USD),
            };
            (!m.is_empty()).then_some(SpanMetrics::Llm(m))
        }
        SpanCategory::Db => {
            let m = DbMetrics {
                operation: get_first_string(meta, DB_OPERATION_KEYS),
                table: get_first_string(meta, DB_TABLE_KEYS),
                rows_affected: first_i64(meta, DB_ROWS_KEYS),
                query: get_first_string(meta, DB_QUERY_KEYS),
            };
            (!m.is_empty()).then_some(SpanMetrics::Db(m))
        }
        SpanCategory::External => {
            let m = ExternalMetrics {
                url: get_first_string(meta, HTTP_URL_KEYS),
                method: get_first_string(meta, HTTP_METHOD_KEYS).map(|m| m.to_uppercase()),
                status_code: first_i64(meta, HTTP_STATUS_KEYS),
            };
            (!m.is_empty()).then_some(SpanMetrics::External(m))
        }
        _ => None,
    }
}

fn first_i64(meta: &Map<String, JsonValue>, keys: &[&str]) -> Option<i64> {
    keys.iter().find_map(|k| get_i64(meta, k))
}

fn generic_metrics(meta: &Map<String, JsonValue>, limit: usize) -> GenericMetrics {
    let entries = meta
        .iter()
        .take(limit)
        .map(|(k, v)| (k.clone(), display_value(v)))
        .collect();
    GenericMetrics {
        entries,
        remaining: meta.len().saturating_sub(limit),
    }
}

#[cfg(test)]
#[path = "classify_tests.rs"]
mod tests;

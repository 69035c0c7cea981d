//! Trace and span records as delivered by a trace provider

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use super::enums::{SpanStatus, SpanType};
use crate::utils::json::get_f64;
use crate::utils::time::millis_between;

/// Metadata key carrying the USD cost of an LLM call
pub const META_COST_USD: &str = "cost_usd";

// ============================================================================
// SPAN
// ============================================================================

/// One observed unit of work within a trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub span_id: String,
    #[serde(default)]
    pub parent_span_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub span_type: SpanType,
    #[serde(default)]
    pub status: SpanStatus,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration_ms: Option<f64>,
    #[serde(default)]
    pub input_tokens: Option<i64>,
    #[serde(default)]
    pub output_tokens: Option<i64>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub metadata: Map<String, JsonValue>,
}

impl Span {
    /// Parent id, treating empty strings as absent
    pub fn parent_id(&self) -> Option<&str> {
        self.parent_span_id
            .as_deref()
            .filter(|p| !p.trim().is_empty())
    }

    /// Provided duration, else derived from the end timestamp
    pub fn effective_duration_ms(&self) -> Option<f64> {
        if let Some(d) = self.duration_ms.filter(|d| d.is_finite() && *d >= 0.0) {
            return Some(d);
        }
        self.ended_at
            .map(|end| millis_between(self.started_at, end))
            .filter(|d| *d >= 0.0)
    }

    /// Instant the span finished (or `started_at` when unknown).
    ///
    /// Durations reaching past the representable range end at `MAX_UTC`.
    pub fn effective_end(&self) -> DateTime<Utc> {
        if let Some(end) = self.ended_at {
            return end;
        }
        match self.effective_duration_ms() {
            Some(ms) => Some(TimeDelta::microseconds((ms * 1_000.0) as i64))
                .and_then(|delta| self.started_at.checked_add_signed(delta))
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
            None => self.started_at,
        }
    }

    /// `metadata.cost_usd` when present and numeric
    pub fn cost_usd(&self) -> Option<f64> {
        get_f64(&self.metadata, META_COST_USD)
    }
}

// ============================================================================
// TRACE
// ============================================================================

/// Aggregate token and cost usage across a trace's LLM spans
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TraceTotals {
    pub input_tokens: i64,
    pub output_tokens: i64,
    pub cost_usd: f64,
    pub llm_calls: usize,
}

impl TraceTotals {
    pub fn total_tokens(&self) -> i64 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

/// A full trace: identity plus its read-only span snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub trace_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: Option<SpanStatus>,
    #[serde(default)]
    pub duration_ms: Option<f64>,
    #[serde(default)]
    pub spans: Vec<Span>,
}

impl Trace {
    /// Earliest `started_at` across all spans
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.spans.iter().map(|s| s.started_at).min()
    }

    /// Wall-clock extent of the trace in milliseconds.
    ///
    /// Uses the provided duration when it is usable, otherwise the distance
    /// from the earliest start to the latest end.
    pub fn total_duration_ms(&self) -> Option<f64> {
        if let Some(d) = self.duration_ms.filter(|d| d.is_finite() && *d > 0.0) {
            return Some(d);
        }
        let start = self.start_time()?;
        let end = self.spans.iter().map(Span::effective_end).max()?;
        Some(millis_between(start, end))
    }

    /// Status derived from constituent spans.
    ///
    /// Any failure wins, then any span still running; otherwise completed.
    pub fn derived_status(&self) -> SpanStatus {
        derive_status(&self.spans)
    }

    /// Status to display: the provider's value when set, else derived
    pub fn display_status(&self) -> SpanStatus {
        match &self.status {
            Some(s) if !matches!(s, SpanStatus::Other(v) if v.is_empty()) => s.clone(),
            _ => self.derived_status(),
        }
    }

    /// Token and cost totals over `llm` spans
    pub fn totals(&self) -> TraceTotals {
        self.spans
            .iter()
            .filter(|s| s.span_type == SpanType::Llm)
            .fold(TraceTotals::default(), |mut acc, s| {
                acc.input_tokens = acc.input_tokens.saturating_add(s.input_tokens.unwrap_or(0));
                acc.output_tokens = acc.output_tokens.saturating_add(s.output_tokens.unwrap_or(0));
                acc.cost_usd += s.cost_usd().unwrap_or(0.0);
                acc.llm_calls += 1;
                acc
            })
    }

    pub fn find_span(&self, span_id: &str) -> Option<&Span> {
        self.spans.iter().find(|s| s.span_id == span_id)
    }
}

/// Derive a trace-level status from its spans
pub fn derive_status(spans: &[Span]) -> SpanStatus {
    if spans.iter().any(|s| s.status == SpanStatus::Failed) {
        SpanStatus::Failed
    } else if spans.iter().any(|s| s.status == SpanStatus::InProgress) {
        SpanStatus::InProgress
    } else {
        SpanStatus::Completed
    }
}

// ============================================================================
// TRACE SUMMARY (list view)
// ============================================================================

/// One row of the trace list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceSummary {
    pub trace_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: SpanStatus,
    #[serde(default)]
    pub duration_ms: Option<f64>,
    #[serde(default)]
    pub span_count: usize,
    #[serde(default)]
    pub document_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    pub started_at: DateTime<Utc>,
}

impl TraceSummary {
    pub fn from_trace(trace: &Trace) -> Self {
        Self {
            trace_id: trace.trace_id.clone(),
            name: trace.name.clone(),
            status: trace.display_status(),
            duration_ms: trace.total_duration_ms(),
            span_count: trace.spans.len(),
            document_id: None,
            user_id: None,
            started_at: trace.start_time().unwrap_or(DateTime::UNIX_EPOCH),
        }
    }
}

//! Timeline layout
//!
//! Positions every span bar as percentages of the trace's wall-clock extent.
//! All functions here are pure.

use chrono::{DateTime, Utc};

use crate::core::constants::{AXIS_MARKERS, FLOOR_WIDTH_PERCENT};
use crate::data::types::{Span, Trace};
use crate::utils::time::{format_time_label, millis_between};

/// Horizontal placement of one span bar, in percent of the timeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarGeometry {
    pub left: f64,
    pub width: f64,
}

/// A labelled tick on the shared time axis
#[derive(Debug, Clone, PartialEq)]
pub struct AxisMarker {
    pub percent: f64,
    pub label: String,
}

/// Start instant and total duration used to lay out one trace
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeBounds {
    pub start: DateTime<Utc>,
    pub total_duration_ms: Option<f64>,
}

impl TimeBounds {
    /// Bounds for a trace, `None` when it has no spans
    pub fn of_trace(trace: &Trace) -> Option<Self> {
        Some(Self {
            start: trace.start_time()?,
            total_duration_ms: trace.total_duration_ms(),
        })
    }

    pub fn layout(&self, span: &Span) -> BarGeometry {
        layout_span(span, self.start, self.total_duration_ms)
    }
}

/// Usable divisor: absent, zero, negative, or non-finite totals become 1ms
fn effective_total(total_duration_ms: Option<f64>) -> f64 {
    total_duration_ms
        .filter(|d| d.is_finite() && *d > 0.0)
        .unwrap_or(1.0)
}

/// Compute a span's bar position.
///
/// `left` is the offset from `trace_start` and `width` the span's duration,
/// both relative to `total_duration_ms`. Spans with no duration count as
/// 1ms. The result always satisfies `0 <= left <= 100` and
/// `FLOOR_WIDTH_PERCENT <= width <= 100`; the upper bounds are deliberate so
/// spans starting or running past the trace end stay inside the bar column.
pub fn layout_span(
    span: &Span,
    trace_start: DateTime<Utc>,
    total_duration_ms: Option<f64>,
) -> BarGeometry {
    let total = effective_total(total_duration_ms);

    let offset = millis_between(trace_start, span.started_at);
    let left = (offset / total * 100.0).clamp(0.0, 100.0);

    let duration = span.effective_duration_ms().unwrap_or(1.0);
    let width = (duration / total * 100.0).clamp(FLOOR_WIDTH_PERCENT, 100.0);

    BarGeometry {
        left: if left.is_finite() { left } else { 0.0 },
        width: if width.is_finite() {
            width
        } else {
            FLOOR_WIDTH_PERCENT
        },
    }
}

/// Axis markers at 0/25/50/75/100% of the total duration
pub fn axis_markers(total_duration_ms: Option<f64>) -> Vec<AxisMarker> {
    let total = total_duration_ms
        .filter(|d| d.is_finite() && *d > 0.0)
        .unwrap_or(0.0);
    AXIS_MARKERS
        .iter()
        .map(|&percent| AxisMarker {
            percent,
            label: format_time_label(total * percent / 100.0),
        })
        .collect()
}

//! Renderer-ready waterfall model
//!
//! Composes tree flattening, layout, time labels and classification for one
//! trace snapshot. Recomputed per render; holds borrows into the trace.

use crate::data::types::{Span, SpanStatus, Trace, TraceTotals};
use crate::utils::time::format_time_label;

use super::classify::{SpanClassification, classify_span_with_limit};
use super::layout::{AxisMarker, BarGeometry, TimeBounds, axis_markers};
use super::tree::{RenderNode, build_render_nodes};

/// Label shown for spans that have not finished
pub const RUNNING_LABEL: &str = "running";

/// One waterfall row
#[derive(Debug, Clone, PartialEq)]
pub struct WaterfallRow<'a> {
    pub node: RenderNode<'a>,
    pub bar: BarGeometry,
    pub duration_label: String,
    pub classification: SpanClassification,
}

impl<'a> WaterfallRow<'a> {
    pub fn span(&self) -> &'a Span {
        self.node.span
    }

    pub fn depth(&self) -> usize {
        self.node.depth
    }
}

/// Everything needed to draw one trace: header, axis, rows
#[derive(Debug, Clone)]
pub struct Waterfall<'a> {
    pub trace: &'a Trace,
    pub status: SpanStatus,
    pub total_duration_ms: Option<f64>,
    pub duration_label: String,
    pub totals: TraceTotals,
    pub axis: Vec<AxisMarker>,
    pub rows: Vec<WaterfallRow<'a>>,
}

impl<'a> Waterfall<'a> {
    pub fn build(trace: &'a Trace, max_metadata_entries: usize) -> Self {
        let bounds = TimeBounds::of_trace(trace);
        let total_duration_ms = bounds.and_then(|b| b.total_duration_ms);

        let rows: Vec<WaterfallRow<'a>> = build_render_nodes(&trace.spans)
            .into_iter()
            .map(|node| WaterfallRow {
                node,
                bar: match bounds {
                    Some(b) => b.layout(node.span),
                    None => BarGeometry {
                        left: 0.0,
                        width: 100.0,
                    },
                },
                duration_label: node
                    .span
                    .effective_duration_ms()
                    .map(format_time_label)
                    .unwrap_or_else(|| RUNNING_LABEL.to_string()),
                classification: classify_span_with_limit(node.span, max_metadata_entries),
            })
            .collect();

        tracing::debug!(
            trace_id = %trace.trace_id,
            spans = trace.spans.len(),
            rows = rows.len(),
            "Built waterfall"
        );

        Self {
            trace,
            status: trace.display_status(),
            total_duration_ms,
            duration_label: format_time_label(total_duration_ms.unwrap_or(0.0)),
            totals: trace.totals(),
            axis: axis_markers(total_duration_ms),
            rows,
        }
    }

    /// Flattened nodes in display order
    pub fn nodes(&self) -> Vec<RenderNode<'a>> {
        self.rows.iter().map(|r| r.node).collect()
    }

    pub fn row(&self, span_id: &str) -> Option<&WaterfallRow<'a>> {
        self.rows.iter().find(|r| r.node.span.span_id == span_id)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::{FLOOR_WIDTH_PERCENT, MAX_METADATA_ENTRIES};
    use crate::data::types::SpanType;
    use crate::domain::traces::classify::SpanColor;
    use chrono::{DateTime, TimeZone, Utc};

    fn ts(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_704_067_200_000 + ms).unwrap()
    }

    fn span(id: &str, parent: Option<&str>, start: i64, duration: Option<f64>) -> Span {
        Span {
            span_id: id.to_string(),
            parent_span_id: parent.map(str::to_string),
            name: id.to_string(),
            span_type: SpanType::Internal,
            status: SpanStatus::Completed,
            started_at: ts(start),
            ended_at: None,
            duration_ms: duration,
            input_tokens: None,
            output_tokens: None,
            model: None,
            error_message: None,
            metadata: Default::default(),
        }
    }

    fn trace(spans: Vec<Span>) -> Trace {
        Trace {
            trace_id: "t1".to_string(),
            name: "chat turn".to_string(),
            status: None,
            duration_ms: None,
            spans,
        }
    }

    #[test]
    fn test_huge_duration_still_builds() {
        let t = trace(vec![
            span("A", None, 0, Some(1e16)),
            span("B", Some("A"), 100, Some(50.0)),
        ]);
        let w = Waterfall::build(&t, MAX_METADATA_ENTRIES);
        assert_eq!(w.rows.len(), 2);
        let total = w.total_duration_ms.unwrap();
        assert!(total.is_finite() && total > 0.0);
        for row in &w.rows {
            assert!((0.0..=100.0).contains(&row.bar.left));
            assert!(row.bar.width >= FLOOR_WIDTH_PERCENT && row.bar.width <= 100.0);
        }
    }

    #[test]
    fn test_build_three_span_trace() {
        let t = trace(vec![
            span("A", None, 0, Some(1000.0)),
            span("B", Some("A"), 100, Some(500.0)),
            span("C", Some("A"), 700, Some(200.0)),
        ]);
        let w = Waterfall::build(&t, MAX_METADATA_ENTRIES);

        let ids: Vec<&str> = w.rows.iter().map(|r| r.span().span_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
        assert_eq!(w.rows[1].depth(), 1);
        assert!((w.rows[1].bar.left - 10.0).abs() < 1e-9);
        assert!((w.rows[2].bar.width - 20.0).abs() < 1e-9);
        assert_eq!(w.rows[1].duration_label, "500ms");
        assert_eq!(w.duration_label, "1.0s");
        assert_eq!(w.axis.len(), 5);
        assert_eq!(w.status, SpanStatus::Completed);
    }

    #[test]
    fn test_running_span_label() {
        let t = trace(vec![span("A", None, 0, None)]);
        let w = Waterfall::build(&t, MAX_METADATA_ENTRIES);
        assert_eq!(w.rows[0].duration_label, RUNNING_LABEL);
    }

    #[test]
    fn test_failed_row_is_red_and_trace_failed() {
        let mut failed = span("B", Some("A"), 10, Some(5.0));
        failed.status = SpanStatus::Failed;
        let t = trace(vec![span("A", None, 0, Some(100.0)), failed]);
        let w = Waterfall::build(&t, MAX_METADATA_ENTRIES);
        assert_eq!(w.rows[1].classification.color, SpanColor::Red);
        assert_eq!(w.status, SpanStatus::Failed);
    }

    #[test]
    fn test_row_lookup_and_nodes() {
        let t = trace(vec![span("A", None, 0, Some(10.0)), span("B", Some("A"), 0, Some(1.0))]);
        let w = Waterfall::build(&t, MAX_METADATA_ENTRIES);
        assert!(w.row("B").is_some());
        assert!(w.row("zzz").is_none());
        assert_eq!(w.nodes().len(), 2);
    }

    #[test]
    fn test_empty_trace() {
        let t = trace(vec![]);
        let w = Waterfall::build(&t, MAX_METADATA_ENTRIES);
        assert!(w.is_empty());
        assert_eq!(w.duration_label, "0ms");
        assert_eq!(w.total_duration_ms, None);
    }
}

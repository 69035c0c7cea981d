//! Trace waterfall engine
//!
//! - `tree` - group spans by parent and flatten into depth-annotated rows
//! - `layout` - bar geometry and axis markers on the shared timeline
//! - `classify` - category, colour, status and metric block per span
//! - `waterfall` - composes the above into a renderer-ready model
//!
//! Everything here is pure and synchronous; fetching lives in `data`.

pub mod classify;
pub mod layout;
pub mod tree;
pub mod waterfall;

pub use classify::{
    DbMetrics, ExternalMetrics, GenericMetrics, LlmMetrics, MetricKind, MetricLine, SpanCategory,
    SpanClassification, SpanColor, SpanMetrics, StatusBadge, classify_span,
    classify_span_with_limit,
};
pub use layout::{AxisMarker, BarGeometry, TimeBounds, axis_markers, layout_span};
pub use tree::{RenderNode, SpanTree, build_render_nodes, build_span_tree};
pub use waterfall::{Waterfall, WaterfallRow};

pub use crate::utils::time::format_time_label;

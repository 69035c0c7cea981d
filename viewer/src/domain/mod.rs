//! Domain logic for trace inspection
//!
//! - `traces` - waterfall engine (tree, layout, classification)
//! - `view` - selection and trace-open lifecycle for a detail view

pub mod traces;
pub mod view;

pub use traces::{
    RenderNode, SpanClassification, Waterfall, build_render_nodes, classify_span,
    format_time_label, layout_span,
};
pub use view::{SelectionController, TraceView, ViewState};

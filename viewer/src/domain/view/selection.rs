//! Selection state for one open trace view
//!
//! States: no trace open -> trace open with nothing selected -> span
//! selected. Opening any trace clears the selection; closing clears
//! everything.

use crate::data::types::Span;
use crate::domain::traces::RenderNode;

/// Tracks the open trace and the single selected span within it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionController {
    trace_id: Option<String>,
    selected: Option<String>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a trace; any previous selection is dropped
    pub fn open(&mut self, trace_id: impl Into<String>) {
        self.trace_id = Some(trace_id.into());
        self.selected = None;
    }

    pub fn close(&mut self) {
        self.trace_id = None;
        self.selected = None;
    }

    pub fn is_open(&self) -> bool {
        self.trace_id.is_some()
    }

    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Select a span by id. Ignored when no trace is open.
    ///
    /// The id is not checked against the trace: an unknown id simply
    /// resolves to nothing.
    pub fn select(&mut self, span_id: impl Into<String>) {
        if self.trace_id.is_none() {
            tracing::debug!("Ignoring selection with no trace open");
            return;
        }
        self.selected = Some(span_id.into());
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn current(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Selected span within `spans`, if it exists there
    pub fn resolve<'a>(&self, spans: &'a [Span]) -> Option<&'a Span> {
        let id = self.current()?;
        spans.iter().rev().find(|s| s.span_id == id)
    }

    /// Move to the next row; the last row is sticky
    pub fn select_next(&mut self, nodes: &[RenderNode<'_>]) -> Option<&str> {
        let target = match self.position(nodes) {
            Some(i) => (i + 1).min(nodes.len() - 1),
            None => 0,
        };
        self.select_row(nodes, target)
    }

    /// Move to the previous row; the first row is sticky
    pub fn select_previous(&mut self, nodes: &[RenderNode<'_>]) -> Option<&str> {
        let target = match self.position(nodes) {
            Some(i) => i.saturating_sub(1),
            None => nodes.len().saturating_sub(1),
        };
        self.select_row(nodes, target)
    }

    fn position(&self, nodes: &[RenderNode<'_>]) -> Option<usize> {
        let id = self.current()?;
        nodes.iter().position(|n| n.span.span_id == id)
    }

    fn select_row(&mut self, nodes: &[RenderNode<'_>], index: usize) -> Option<&str> {
        let node = nodes.get(index)?;
        self.select(node.span.span_id.clone());
        self.current()
    }
}

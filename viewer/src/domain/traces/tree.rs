//! Span tree building and flattening
//!
//! Spans arrive as a flat list with parent references. `build_span_tree`
//! groups them by parent (orphans become roots) and `build_render_nodes`
//! walks that grouping depth-first, pre-order, into indented rows.
//!
//! The walk uses an explicit stack and a visited set, so pathologically deep
//! traces cannot overflow the call stack and parent cycles terminate.

use std::collections::{HashMap, HashSet};

use crate::data::types::Span;

/// One row of the flattened tree
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderNode<'a> {
    pub span: &'a Span,
    pub depth: usize,
}

/// Spans grouped by parent, each bucket in input order
#[derive(Debug, Default)]
pub struct SpanTree<'a> {
    /// Spans in input order after duplicate resolution
    spans: Vec<&'a Span>,
    roots: Vec<&'a Span>,
    children: HashMap<&'a str, Vec<&'a Span>>,
}

impl<'a> SpanTree<'a> {
    /// Direct children of `parent`; `None` yields the root bucket
    pub fn children(&self, parent: Option<&str>) -> &[&'a Span] {
        match parent {
            None => &self.roots,
            Some(id) => self.children.get(id).map(Vec::as_slice).unwrap_or(&[]),
        }
    }

    /// Number of distinct spans in the tree
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Flatten into depth-annotated rows (pre-order, siblings in input order)
    pub fn flatten(&self) -> Vec<RenderNode<'a>> {
        let mut nodes = Vec::with_capacity(self.spans.len());
        let mut visited: HashSet<&str> = HashSet::with_capacity(self.spans.len());

        for &root in &self.roots {
            self.walk(root, &mut visited, &mut nodes);
        }

        // Whatever is left sits on a parent cycle (or below one)
        if nodes.len() < self.spans.len() {
            for &span in &self.spans {
                if visited.contains(span.span_id.as_str()) {
                    continue;
                }
                tracing::warn!(
                    span_id = %span.span_id,
                    parent_span_id = ?span.parent_span_id,
                    "Cyclic parent chain; rendering span as root"
                );
                self.walk(span, &mut visited, &mut nodes);
            }
        }

        nodes
    }

    fn walk(
        &self,
        root: &'a Span,
        visited: &mut HashSet<&'a str>,
        nodes: &mut Vec<RenderNode<'a>>,
    ) {
        let mut stack = vec![(root, 0usize)];
        while let Some((span, depth)) = stack.pop() {
            if !visited.insert(span.span_id.as_str()) {
                continue;
            }
            nodes.push(RenderNode { span, depth });
            // Reverse so the first child is popped first
            for &child in self.children(Some(&span.span_id)).iter().rev() {
                if !visited.contains(child.span_id.as_str()) {
                    stack.push((child, depth + 1));
                }
            }
        }
    }
}

/// Group spans by parent.
///
/// A span whose parent id is absent, empty, or not present in the list is a
/// root. When several records share a `span_id` the last one wins and keeps
/// its own position in the input.
pub fn build_span_tree(spans: &[Span]) -> SpanTree<'_> {
    let mut last_index: HashMap<&str, usize> = HashMap::with_capacity(spans.len());
    for (i, span) in spans.iter().enumerate() {
        if last_index.insert(span.span_id.as_str(), i).is_some() {
            tracing::warn!(span_id = %span.span_id, "Duplicate span id; keeping last record");
        }
    }

    let kept: Vec<&Span> = spans
        .iter()
        .enumerate()
        .filter(|(i, span)| last_index.get(span.span_id.as_str()) == Some(i))
        .map(|(_, span)| span)
        .collect();

    let mut tree = SpanTree {
        spans: Vec::with_capacity(kept.len()),
        roots: Vec::new(),
        children: HashMap::new(),
    };
    for span in kept {
        match span.parent_id().filter(|p| last_index.contains_key(p)) {
            Some(parent) => tree.children.entry(parent).or_default().push(span),
            None => tree.roots.push(span),
        }
        tree.spans.push(span);
    }
    tree
}

/// Build the flattened, depth-annotated row list for a span list
pub fn build_render_nodes(spans: &[Span]) -> Vec<RenderNode<'_>> {
    build_span_tree(spans).flatten()
}

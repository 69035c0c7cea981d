//! Trace provider backends
//!
//! - `http` - REST API client (reqwest) with retry on transient failures
//! - `file` - JSON trace files on disk
//! - `memory` - in-process traces, optionally with artificial latency

mod file;
mod http;
mod memory;

pub use file::FileTraceProvider;
pub use http::{HttpProviderConfig, HttpTraceProvider};
pub use memory::MemoryTraceProvider;

use crate::data::types::{ListTracesParams, Page, Trace, TraceSummary};

/// Filter, sort (newest first) and paginate summaries of in-process traces
pub(crate) fn paginate_traces(traces: &[Trace], params: &ListTracesParams) -> Page<TraceSummary> {
    let mut matching: Vec<TraceSummary> = traces
        .iter()
        .map(TraceSummary::from_trace)
        .filter(|s| params.matches(s))
        .collect();
    matching.sort_by(|a, b| {
        b.started_at
            .cmp(&a.started_at)
            .then_with(|| a.trace_id.cmp(&b.trace_id))
    });

    let total = matching.len() as u64;
    let (_, limit) = params.normalized();
    let items = matching
        .into_iter()
        .skip(params.offset())
        .take(limit as usize)
        .collect();

    Page { items, total }
}

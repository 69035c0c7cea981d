use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::paginate_traces;
use crate::data::error::DataError;
use crate::data::traits::TraceProvider;
use crate::data::types::{ListTracesParams, Page, Trace, TraceSummary};

/// In-process trace source.
///
/// Per-trace latency lets callers reproduce out-of-order responses when
/// several fetches are in flight.
#[derive(Debug, Default)]
pub struct MemoryTraceProvider {
    traces: RwLock<Vec<Trace>>,
    latency: RwLock<HashMap<String, Duration>>,
}

impl MemoryTraceProvider {
    pub fn new(traces: Vec<Trace>) -> Self {
        Self {
            traces: RwLock::new(traces),
            latency: RwLock::new(HashMap::new()),
        }
    }

    /// Insert or replace a trace (matched by id)
    pub fn insert(&self, trace: Trace) {
        let mut traces = self.traces.write();
        match traces.iter_mut().find(|t| t.trace_id == trace.trace_id) {
            Some(existing) => *existing = trace,
            None => traces.push(trace),
        }
    }

    /// Delay every `get_trace` for this id by `delay`
    pub fn set_latency(&self, trace_id: &str, delay: Duration) {
        self.latency.write().insert(trace_id.to_string(), delay);
    }
}

#[async_trait]
impl TraceProvider for MemoryTraceProvider {
    async fn list_traces(
        &self,
        params: &ListTracesParams,
    ) -> Result<Page<TraceSummary>, DataError> {
        Ok(paginate_traces(&self.traces.read(), params))
    }

    async fn get_trace(&self, trace_id: &str) -> Result<Option<Trace>, DataError> {
        let delay = self.latency.read().get(trace_id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self
            .traces
            .read()
            .iter()
            .find(|t| t.trace_id == trace_id)
            .cloned())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

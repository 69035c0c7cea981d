//! Provider trait for trace data sources
//!
//! The engine never fetches data itself. Hosts hand it traces obtained
//! through a `TraceProvider`; each backend (HTTP API, JSON files, memory)
//! implements the same read contract.

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::types::{ListTracesParams, Page, Trace, TraceSummary};

/// Read contract for trace data
#[async_trait]
pub trait TraceProvider: Send + Sync + std::fmt::Debug {
    /// List trace summaries with filters and pagination
    async fn list_traces(&self, params: &ListTracesParams)
    -> Result<Page<TraceSummary>, DataError>;

    /// Fetch a single trace with its full span list
    async fn get_trace(&self, trace_id: &str) -> Result<Option<Trace>, DataError>;

    /// Human-readable backend name
    fn name(&self) -> &'static str;
}

//! Shared data types for trace providers and the engine

mod enums;
mod trace;

pub use enums::{SpanStatus, SpanType};
pub use trace::{META_COST_USD, Span, Trace, TraceSummary, TraceTotals, derive_status};

use serde::{Deserialize, Serialize};

use crate::core::constants::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};

// ============================================================================
// Query parameters
// ============================================================================

/// Filters and pagination for the trace list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListTracesParams {
    /// 1-based page number
    pub page: u32,
    pub limit: u32,
    pub status: Option<SpanStatus>,
    /// Case-insensitive substring match on trace name or id
    pub search: Option<String>,
}

impl Default for ListTracesParams {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
            status: None,
            search: None,
        }
    }
}

impl ListTracesParams {
    /// Page and limit clamped to valid ranges
    pub fn normalized(&self) -> (u32, u32) {
        (self.page.max(1), self.limit.clamp(1, MAX_PAGE_LIMIT))
    }

    /// Zero-based offset of the first item on the page
    pub fn offset(&self) -> usize {
        let (page, limit) = self.normalized();
        (page as usize - 1) * limit as usize
    }

    /// Whether a summary passes the status and search filters
    pub fn matches(&self, summary: &TraceSummary) -> bool {
        if let Some(status) = &self.status
            && &summary.status != status
        {
            return false;
        }
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            return summary.name.to_lowercase().contains(&needle)
                || summary.trace_id.to_lowercase().contains(&needle);
        }
        true
    }
}

/// One page of results plus the unpaginated total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

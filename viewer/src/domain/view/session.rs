//! Trace detail view lifecycle
//!
//! A `TraceView` owns the state of one open trace: the fetched snapshot and
//! the selection. Fetches go through a `TraceProvider`; when the user moves
//! on before a fetch resolves, its result is discarded instead of replacing
//! the newer trace.
//!
//! Each `open` and `close` bumps a generation counter. A fetch remembers the
//! generation it started under and is applied only if that is still current.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::data::traits::TraceProvider;
use crate::data::types::{Span, Trace};
use crate::domain::traces::build_render_nodes;

use super::selection::SelectionController;

/// Where the view currently stands
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Closed,
    Loading { trace_id: String },
    Loaded { trace: Arc<Trace> },
    Failed { trace_id: String, message: String },
}

/// Result of an `open` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    /// The response was applied to the view
    Applied,
    /// A newer open or a close happened first; the response was dropped
    Superseded,
}

#[derive(Debug)]
struct ViewInner {
    generation: u64,
    state: ViewState,
    selection: SelectionController,
}

/// One trace detail view backed by a provider
#[derive(Debug)]
pub struct TraceView<P: TraceProvider + ?Sized> {
    provider: Arc<P>,
    inner: Mutex<ViewInner>,
}

impl<P: TraceProvider + ?Sized> TraceView<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self {
            provider,
            inner: Mutex::new(ViewInner {
                generation: 0,
                state: ViewState::Closed,
                selection: SelectionController::new(),
            }),
        }
    }

    /// Open a trace and fetch it.
    ///
    /// The selection is reset immediately. Fetch errors and unknown ids end
    /// in `ViewState::Failed`; nothing is retried here.
    pub async fn open(&self, trace_id: &str) -> OpenOutcome {
        let generation = {
            let mut inner = self.inner.lock();
            inner.generation += 1;
            inner.state = ViewState::Loading {
                trace_id: trace_id.to_string(),
            };
            inner.selection.open(trace_id);
            inner.generation
        };

        tracing::debug!(
            trace_id,
            generation,
            provider = self.provider.name(),
            "Fetching trace"
        );
        let result = self.provider.get_trace(trace_id).await;

        let mut inner = self.inner.lock();
        if inner.generation != generation {
            tracing::debug!(
                trace_id,
                generation,
                current = inner.generation,
                "Discarding stale trace response"
            );
            return OpenOutcome::Superseded;
        }

        inner.state = match result {
            Ok(Some(trace)) => ViewState::Loaded {
                trace: Arc::new(trace),
            },
            Ok(None) => ViewState::Failed {
                trace_id: trace_id.to_string(),
                message: format!("Trace not found: {}", trace_id),
            },
            Err(e) => {
                tracing::warn!(trace_id, error = %e, "Failed to fetch trace");
                ViewState::Failed {
                    trace_id: trace_id.to_string(),
                    message: e.to_string(),
                }
            }
        };
        OpenOutcome::Applied
    }

    /// Close the view; in-flight fetches will be discarded
    pub fn close(&self) {
        let mut inner = self.inner.lock();
        inner.generation += 1;
        inner.state = ViewState::Closed;
        inner.selection.close();
    }

    pub fn state(&self) -> ViewState {
        self.inner.lock().state.clone()
    }

    /// Loaded trace snapshot, if any
    pub fn trace(&self) -> Option<Arc<Trace>> {
        match &self.inner.lock().state {
            ViewState::Loaded { trace } => Some(Arc::clone(trace)),
            _ => None,
        }
    }

    pub fn select(&self, span_id: &str) {
        self.inner.lock().selection.select(span_id);
    }

    pub fn selected(&self) -> Option<String> {
        self.inner.lock().selection.current().map(str::to_string)
    }

    /// Selected span in the loaded trace; `None` for unknown ids
    pub fn selected_span(&self) -> Option<Span> {
        let inner = self.inner.lock();
        match &inner.state {
            ViewState::Loaded { trace } => inner.selection.resolve(&trace.spans).cloned(),
            _ => None,
        }
    }

    /// Move the selection down one row of the loaded trace
    pub fn select_next(&self) -> Option<String> {
        self.navigate(true)
    }

    /// Move the selection up one row of the loaded trace
    pub fn select_previous(&self) -> Option<String> {
        self.navigate(false)
    }

    fn navigate(&self, forward: bool) -> Option<String> {
        let trace = self.trace()?;
        let nodes = build_render_nodes(&trace.spans);
        let mut inner = self.inner.lock();
        let selected = if forward {
            inner.selection.select_next(&nodes)
        } else {
            inner.selection.select_previous(&nodes)
        };
        selected.map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::error::DataError;
    use crate::data::providers::MemoryTraceProvider;
    use crate::data::types::{ListTracesParams, Page, SpanStatus, SpanType, TraceSummary};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::time::Duration;

    fn span(id: &str, parent: Option<&str>) -> Span {
        Span {
            span_id: id.to_string(),
            parent_span_id: parent.map(str::to_string),
            name: id.to_string(),
            span_type: SpanType::Internal,
            status: SpanStatus::Completed,
            started_at: Utc.timestamp_millis_opt(0).unwrap(),
            ended_at: None,
            duration_ms: Some(5.0),
            input_tokens: None,
            output_tokens: None,
            model: None,
            error_message: None,
            metadata: Default::default(),
        }
    }

    fn trace(id: &str) -> Trace {
        Trace {
            trace_id: id.to_string(),
            name: format!("trace {}", id),
            status: None,
            duration_ms: None,
            spans: vec![span("A", None), span("B", Some("A"))],
        }
    }

    fn loaded_id(state: &ViewState) -> Option<&str> {
        match state {
            ViewState::Loaded { trace } => Some(trace.trace_id.as_str()),
            _ => None,
        }
    }

    #[derive(Debug)]
    struct FailingProvider;

    #[async_trait]
    impl TraceProvider for FailingProvider {
        async fn list_traces(
            &self,
            _params: &ListTracesParams,
        ) -> Result<Page<TraceSummary>, DataError> {
            Err(DataError::status("test", 500, "down"))
        }

        async fn get_trace(&self, _trace_id: &str) -> Result<Option<Trace>, DataError> {
            Err(DataError::status("test", 500, "down"))
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    #[tokio::test]
    async fn test_open_loads_trace() {
        let view = TraceView::new(Arc::new(MemoryTraceProvider::new(vec![trace("t1")])));
        assert_eq!(view.state(), ViewState::Closed);

        assert_eq!(view.open("t1").await, OpenOutcome::Applied);
        assert_eq!(loaded_id(&view.state()), Some("t1"));
    }

    #[tokio::test]
    async fn test_open_unknown_trace_fails_inline() {
        let view = TraceView::new(Arc::new(MemoryTraceProvider::default()));
        view.open("nope").await;
        match view.state() {
            ViewState::Failed { trace_id, message } => {
                assert_eq!(trace_id, "nope");
                assert!(message.contains("not found"));
            }
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_provider_error_becomes_failed_state() {
        let view = TraceView::new(Arc::new(FailingProvider));
        view.open("t1").await;
        match view.state() {
            ViewState::Failed { message, .. } => assert!(message.contains("500")),
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_selection_reset_on_new_trace() {
        let provider = MemoryTraceProvider::new(vec![trace("a"), trace("b")]);
        let view = TraceView::new(Arc::new(provider));

        view.open("a").await;
        view.select("B");
        assert_eq!(view.selected().as_deref(), Some("B"));
        assert_eq!(view.selected_span().map(|s| s.span_id), Some("B".to_string()));

        view.open("b").await;
        assert_eq!(view.selected(), None);
    }

    #[tokio::test]
    async fn test_selected_unknown_span_is_none() {
        let view = TraceView::new(Arc::new(MemoryTraceProvider::new(vec![trace("a")])));
        view.open("a").await;
        view.select("ghost");
        assert!(view.selected_span().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_response_discarded() {
        let provider = MemoryTraceProvider::new(vec![trace("slow"), trace("fast")]);
        provider.set_latency("slow", Duration::from_millis(300));
        let view = TraceView::new(Arc::new(provider));

        let (slow, fast) = tokio::join!(view.open("slow"), view.open("fast"));

        assert_eq!(slow, OpenOutcome::Superseded);
        assert_eq!(fast, OpenOutcome::Applied);
        assert_eq!(loaded_id(&view.state()), Some("fast"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_discards_in_flight_fetch() {
        let provider = MemoryTraceProvider::new(vec![trace("slow")]);
        provider.set_latency("slow", Duration::from_millis(100));
        let view = TraceView::new(Arc::new(provider));

        let close_later = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            view.close();
        };
        let (outcome, _) = tokio::join!(view.open("slow"), close_later);

        assert_eq!(outcome, OpenOutcome::Superseded);
        assert_eq!(view.state(), ViewState::Closed);
    }

    #[tokio::test]
    async fn test_views_do_not_interfere() {
        let provider: Arc<MemoryTraceProvider> =
            Arc::new(MemoryTraceProvider::new(vec![trace("a"), trace("b")]));
        let left = TraceView::new(Arc::clone(&provider));
        let right = TraceView::new(provider);

        left.open("a").await;
        right.open("b").await;
        left.select("B");

        assert_eq!(loaded_id(&left.state()), Some("a"));
        assert_eq!(loaded_id(&right.state()), Some("b"));
        assert_eq!(right.selected(), None);
    }

    #[tokio::test]
    async fn test_keyboard_navigation() {
        let view = TraceView::new(Arc::new(MemoryTraceProvider::new(vec![trace("a")])));
        assert_eq!(view.select_next(), None);

        view.open("a").await;
        assert_eq!(view.select_next().as_deref(), Some("A"));
        assert_eq!(view.select_next().as_deref(), Some("B"));
        assert_eq!(view.select_previous().as_deref(), Some("A"));
    }

    #[tokio::test]
    async fn test_dyn_provider() {
        let provider: Arc<dyn TraceProvider> =
            Arc::new(MemoryTraceProvider::new(vec![trace("a")]));
        let view = TraceView::new(provider);
        assert_eq!(view.open("a").await, OpenOutcome::Applied);
    }
}

//! Core application

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::core::cli::{self, Commands};
use crate::core::config::{AppConfig, SourceConfig};
use crate::core::constants::{DEFAULT_LOG_FILTER, ENV_LOG};
use crate::data::providers::{FileTraceProvider, HttpProviderConfig, HttpTraceProvider};
use crate::data::traits::TraceProvider;
use crate::data::types::ListTracesParams;
use crate::domain::traces::Waterfall;
use crate::domain::view::{TraceView, ViewState};
use crate::render::{render_detail, render_load_error, render_trace_list, render_waterfall};

pub struct CoreApp {
    pub config: AppConfig,
    pub provider: Arc<dyn TraceProvider>,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        let config = AppConfig::load(&cli_config)?;
        let app = Self::init(config)?;

        match command {
            Commands::Show { trace_id, select } => app.show(&trace_id, select.as_deref()).await,
            Commands::List {
                page,
                limit,
                status,
                search,
            } => {
                let mut params = ListTracesParams {
                    page,
                    status,
                    search,
                    ..Default::default()
                };
                if let Some(limit) = limit {
                    params.limit = limit;
                }
                app.list(&params).await
            }
        }
    }

    pub fn init(config: AppConfig) -> Result<Self> {
        let provider: Arc<dyn TraceProvider> = match &config.source {
            SourceConfig::File(path) => Arc::new(FileTraceProvider::new(path.clone())),
            SourceConfig::Api(api) => Arc::new(
                HttpTraceProvider::new(HttpProviderConfig {
                    base_url: api.base_url.clone(),
                    token: api.token.clone(),
                    timeout_secs: api.timeout_secs,
                    max_attempts: api.max_attempts,
                })
                .context("Failed to create trace API client")?,
            ),
        };
        tracing::debug!(provider = provider.name(), "Trace provider ready");

        Ok(Self { config, provider })
    }

    /// Render one trace and, if requested, the selected span's detail panel
    pub async fn show(&self, trace_id: &str, select: Option<&str>) -> Result<()> {
        print!("{}", self.render_show(trace_id, select).await);
        Ok(())
    }

    async fn render_show(&self, trace_id: &str, select: Option<&str>) -> String {
        let opts = &self.config.render;
        let view = TraceView::new(Arc::clone(&self.provider));
        view.open(trace_id).await;

        match view.state() {
            ViewState::Loaded { trace } => {
                if let Some(span_id) = select {
                    view.select(span_id);
                }
                let waterfall = Waterfall::build(&trace, opts.max_metadata_entries);
                let selected = view.selected();
                let mut out = render_waterfall(&waterfall, selected.as_deref(), opts);
                match render_detail(&waterfall, selected.as_deref(), opts) {
                    Some(detail) => out.push_str(&detail),
                    None => {
                        if let Some(span_id) = selected {
                            tracing::warn!(span_id = %span_id, "Selected span not found in trace");
                        }
                    }
                }
                out
            }
            ViewState::Failed { trace_id, message } => render_load_error(&trace_id, &message, opts),
            ViewState::Closed | ViewState::Loading { .. } => String::new(),
        }
    }

    /// Print one page of trace summaries
    pub async fn list(&self, params: &ListTracesParams) -> Result<()> {
        let page = self
            .provider
            .list_traces(params)
            .await
            .with_context(|| format!("Failed to list traces from {}", self.provider.name()))?;
        print!("{}", render_trace_list(&page, params, &self.config.render));
        Ok(())
    }

    fn init_logging() {
        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_writer(std::io::stderr)
            .compact()
            .with_env_filter(filter)
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::RenderConfig;
    use crate::data::providers::MemoryTraceProvider;
    use crate::data::types::{Span, SpanStatus, SpanType, Trace};
    use chrono::{TimeZone, Utc};

    fn app(traces: Vec<Trace>) -> CoreApp {
        CoreApp {
            config: AppConfig {
                source: SourceConfig::File("unused".into()),
                render: RenderConfig {
                    width: 100,
                    color: false,
                    max_metadata_entries: 10,
                },
            },
            provider: Arc::new(MemoryTraceProvider::new(traces)),
        }
    }

    fn sample() -> Trace {
        let span = Span {
            span_id: "root".to_string(),
            parent_span_id: None,
            name: "handle".to_string(),
            span_type: SpanType::Internal,
            status: SpanStatus::Completed,
            started_at: Utc.timestamp_millis_opt(1_704_067_200_000).unwrap(),
            ended_at: None,
            duration_ms: Some(40.0),
            input_tokens: None,
            output_tokens: None,
            model: None,
            error_message: None,
            metadata: Default::default(),
        };
        Trace {
            trace_id: "t1".to_string(),
            name: "request".to_string(),
            status: None,
            duration_ms: None,
            spans: vec![span],
        }
    }

    #[tokio::test]
    async fn test_show_with_selection() {
        let out = app(vec![sample()]).render_show("t1", Some("root")).await;
        assert!(out.contains("request (t1)"));
        assert!(out.contains("› ✔ handle"));
        assert!(out.contains("Type: internal  Status: ✔ completed"));
    }

    #[tokio::test]
    async fn test_show_unknown_selection_omits_detail() {
        let out = app(vec![sample()]).render_show("t1", Some("ghost")).await;
        assert!(out.contains("request (t1)"));
        assert!(!out.contains("Type:"));
    }

    #[tokio::test]
    async fn test_show_missing_trace_prints_inline_error() {
        let out = app(vec![]).render_show("nope", None).await;
        assert!(out.starts_with("✖ Failed to load trace nope:"));
    }

    #[test]
    fn test_init_builds_file_provider() {
        let core = CoreApp::init(AppConfig {
            source: SourceConfig::File("traces.json".into()),
            render: RenderConfig::default(),
        })
        .unwrap();
        assert_eq!(core.provider.name(), "file");
    }
}

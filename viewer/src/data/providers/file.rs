use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::future::try_join_all;

use super::paginate_traces;
use crate::data::error::DataError;
use crate::data::traits::TraceProvider;
use crate::data::types::{ListTracesParams, Page, Trace, TraceSummary};

/// Trace provider reading JSON exports from disk.
///
/// The path is either a single file holding one trace object or an array
/// of traces, or a directory whose `*.json` files each hold the same.
/// Files are re-read on every call so edits show up without a restart.
#[derive(Debug, Clone)]
pub struct FileTraceProvider {
    path: PathBuf,
}

impl FileTraceProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load_all(&self) -> Result<Vec<Trace>, DataError> {
        let metadata = tokio::fs::metadata(&self.path).await?;
        if !metadata.is_dir() {
            return load_file(&self.path).await;
        }

        let mut files = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.path).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        files.sort();

        let loaded = try_join_all(files.iter().map(|path| load_dir_entry(path.as_path()))).await?;
        Ok(loaded.into_iter().flatten().collect())
    }
}

/// Load a directory member; malformed files are skipped
async fn load_dir_entry(path: &Path) -> Result<Vec<Trace>, DataError> {
    match load_file(path).await {
        Err(DataError::Decode { what, error }) => {
            tracing::warn!(file = %what, error = %error, "Skipping malformed trace file");
            Ok(Vec::new())
        }
        other => other,
    }
}

async fn load_file(path: &Path) -> Result<Vec<Trace>, DataError> {
    let bytes = tokio::fs::read(path).await?;
    parse_traces(&bytes).map_err(|e| DataError::decode(path.display().to_string(), e))
}

/// Parse one trace object or an array of traces
fn parse_traces(bytes: &[u8]) -> Result<Vec<Trace>, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_slice(bytes)?;
    if value.is_array() {
        serde_json::from_value(value)
    } else {
        serde_json::from_value(value).map(|trace: Trace| vec![trace])
    }
}

#[async_trait]
impl TraceProvider for FileTraceProvider {
    async fn list_traces(
        &self,
        params: &ListTracesParams,
    ) -> Result<Page<TraceSummary>, DataError> {
        let traces = self.load_all().await?;
        Ok(paginate_traces(&traces, params))
    }

    async fn get_trace(&self, trace_id: &str) -> Result<Option<Trace>, DataError> {
        let traces = self.load_all().await?;
        Ok(traces.into_iter().find(|t| t.trace_id == trace_id))
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

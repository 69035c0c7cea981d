//! Classification enums for trace data
//!
//! Both enums parse leniently from strings: unknown values are kept as
//! `Other` so a newer producer never breaks rendering.

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// SPAN TYPE
// ============================================================================

/// Declared kind of work a span represents
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SpanType {
    Llm,
    Embedding,
    Retrieval,
    Generation,
    Db,
    External,
    Internal,
    /// Any value outside the known set (kept verbatim, lowercased)
    Other(String),
}

impl SpanType {
    pub fn parse(value: &str) -> Self {
        let normalized = value.trim().to_lowercase();
        match normalized.as_str() {
            "llm" => Self::Llm,
            "embedding" => Self::Embedding,
            "retrieval" => Self::Retrieval,
            "generation" => Self::Generation,
            "db" => Self::Db,
            "external" => Self::External,
            "internal" => Self::Internal,
            _ => Self::Other(normalized),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Llm => "llm",
            Self::Embedding => "embedding",
            Self::Retrieval => "retrieval",
            Self::Generation => "generation",
            Self::Db => "db",
            Self::External => "external",
            Self::Internal => "internal",
            Self::Other(s) if s.is_empty() => "unknown",
            Self::Other(s) => s,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl Default for SpanType {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for SpanType {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<SpanType> for String {
    fn from(value: SpanType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for SpanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SPAN STATUS
// ============================================================================

/// Execution status of a span (also used for derived trace status)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SpanStatus {
    Completed,
    Failed,
    InProgress,
    /// Any value outside the known set; rendered neutrally
    Other(String),
}

impl SpanStatus {
    pub fn parse(value: &str) -> Self {
        let normalized = value.trim().to_lowercase();
        match normalized.as_str() {
            "completed" | "ok" | "success" => Self::Completed,
            "failed" | "error" => Self::Failed,
            "in_progress" | "in-progress" | "running" => Self::InProgress,
            _ => Self::Other(normalized),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::InProgress => "in_progress",
            Self::Other(s) if s.is_empty() => "unknown",
            Self::Other(s) => s,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

impl Default for SpanStatus {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for SpanStatus {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<SpanStatus> for String {
    fn from(value: SpanStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for SpanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

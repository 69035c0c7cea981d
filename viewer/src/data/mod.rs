//! Trace data access
//!
//! Types shared with the engine, the provider contract, and its backends.

pub mod error;
pub mod providers;
pub mod traits;
pub mod types;

pub use error::DataError;
pub use providers::{
    FileTraceProvider, HttpProviderConfig, HttpTraceProvider, MemoryTraceProvider,
};
pub use traits::TraceProvider;

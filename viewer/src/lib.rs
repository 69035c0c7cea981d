//! TraceScope viewer
//!
//! Trace waterfall engine, trace providers, and the terminal host that
//! drives them.

pub mod app;
pub mod core;
pub mod data;
pub mod domain;
pub mod render;
pub mod utils;

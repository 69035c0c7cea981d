//! Terminal rendering
//!
//! Turns engine output into plain or ANSI-coloured text. Functions return
//! strings; printing is left to the caller.

pub mod detail;
pub mod list;
pub mod waterfall;

pub use detail::{render_detail, render_load_error};
pub use list::render_trace_list;
pub use waterfall::{render_header, render_waterfall};

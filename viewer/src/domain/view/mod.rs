//! Trace detail view state: selection and fetch lifecycle

pub mod selection;
pub mod session;

pub use selection::SelectionController;
pub use session::{OpenOutcome, TraceView, ViewState};

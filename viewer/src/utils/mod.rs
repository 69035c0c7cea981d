//! Utility functions for the application

pub mod json;
pub mod retry;
pub mod string;
pub mod terminal;
pub mod time;

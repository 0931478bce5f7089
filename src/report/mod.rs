//! Terminal reporting: fetch tables, run summaries, panel previews.

pub mod format;

pub use format::*;

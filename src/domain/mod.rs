//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - series declarations and raw observations (`SeriesSpec`, `Observation`)
//! - normalized monthly series (`MonthlySeries`)
//! - run configuration (`RunConfig`) and the built-in FRED catalog

pub mod types;

pub use types::*;

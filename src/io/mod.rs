//! Input/output helpers.
//!
//! - raw series CSV ingest + validation (`ingest`)
//! - artifact and manifest exports (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;

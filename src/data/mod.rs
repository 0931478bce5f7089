//! Data sources feeding the pipeline.
//!
//! - `fred`: blocking FRED observations client (online retrieval)
//! - `sample`: seeded synthetic series generator (offline runs and tests)

pub mod fred;
pub mod sample;

pub use fred::*;
pub use sample::*;

//! The alignment core: monthly grid, series normalizer, grid merger, and
//! derived views.
//!
//! Stages communicate through immutable values: raw series go into the
//! normalizer, one [`FilledTable`] crosses the fill barrier, and each view
//! derives a fresh table from it without touching the source.

pub mod grid;
pub mod merge;
pub mod normalize;
pub mod views;

pub use grid::*;
pub use merge::*;
pub use normalize::*;
pub use views::*;

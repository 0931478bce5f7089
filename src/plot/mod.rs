//! Terminal charting for exported artifacts.

pub mod ascii;

pub use ascii::*;

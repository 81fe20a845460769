//! Core types and constants for the SAR drift engine

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;

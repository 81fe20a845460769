//! Input validation and error types

pub mod data;
pub mod error;

pub use data::{CaseValidator, ValidationConfig};
pub use error::{SarError, SarResult, Violation};

//! Infrastructure error conversions

pub mod conversions;

pub use conversions::{status_to_wrapper_error, InfraError};

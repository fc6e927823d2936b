//! # Forgeprops Domain
//!
//! Provider-agnostic types for the entity property engine.
//!
//! This crate contains:
//! - `Property`, `PropertyValue` and `PropertyBag`
//! - The closed `EntityType` and `ProviderType` enumerations
//! - Domain error types and Result definitions
//! - Configuration structures for the GitHub and GitLab providers
//! - Well-known property keys shared by every provider
//!
//! ## Architecture
//! - No dependencies on other forgeprops crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;

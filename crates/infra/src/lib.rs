//! # Forgeprops Infrastructure
//!
//! Provider implementations of the core property ports.
//!
//! This crate contains:
//! - The reqwest-based HTTP client and status-to-error mapping
//! - GitHub and GitLab clients, entity fetchers and record converters
//! - The provider factory keyed by provider class
//! - Configuration loading (environment, JSON and TOML files)
//! - Tracing subscriber initialisation
//!
//! ## Architecture
//! - Implements traits defined in `forgeprops-core`
//! - Depends on `forgeprops-domain` and `forgeprops-core`
//! - Contains all "impure" code (network, filesystem, environment)

pub mod config;
pub mod errors;
pub mod http;
pub mod integrations;
pub mod observability;

// Re-export commonly used items
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use integrations::{
    create_provider, ForgeProvider, GitHubProvider, GitLabProvider, ProviderCredentials,
};
pub use observability::{init_tracing, LogFormat};

//! # Forgeprops Core
//!
//! Provider-agnostic fetch-and-merge logic - no HTTP or provider SDK code.
//!
//! This crate contains:
//! - The fetch wrapper port and the cancellation-aware [`FetchContext`]
//! - Property origins, entity fetchers and the fetcher registry
//! - The property service: single-key and all-properties fetches plus the
//!   operational merge policy
//! - The object-safe [`PropertyProvider`] port implemented per provider
//!
//! ## Architecture Principles
//! - Only depends on `forgeprops-domain`
//! - All network access goes through [`PropertyWrapper`] implementations
//! - Fetcher tables are immutable after construction; no shared mutable state

pub mod properties;
pub mod provider_ports;

pub use properties::context::FetchContext;
pub use properties::errors::DefinitionError;
pub use properties::fetcher::{EntityFetcher, EntityFetcherBuilder, NameResolver, PropertyOrigin};
pub use properties::merge::{merge_operational, operational_subset};
pub use properties::ports::{PropertyFetcherFactory, PropertyWrapper, SharedWrapper};
pub use properties::registry::FetcherRegistry;
pub use properties::service::PropertyService;
pub use provider_ports::PropertyProvider;

//! Property fetching engine
//!
//! Leaves first: `ports` (wrapper and factory traits), `context`
//! (cancellation and deadlines), `fetcher` (origins and entity fetchers),
//! `registry`, `merge`, `identity` and finally `service`, which ties them
//! together.

pub mod context;
pub mod errors;
pub mod fetcher;
pub mod identity;
pub mod merge;
pub mod ports;
pub mod registry;
pub mod service;

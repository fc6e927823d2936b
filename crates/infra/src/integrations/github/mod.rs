//! GitHub provider
//!
//! Repository, pull request, container package and release properties over
//! the GitHub REST API.

pub mod client;
pub mod properties;
pub mod provider;
pub mod records;

pub use client::GitHubClient;
pub use provider::{GitHubProvider, GITHUB_CLASS};

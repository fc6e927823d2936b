//! GitLab provider
//!
//! Project, merge request and release properties over the GitLab REST API
//! (v4). GitLab has no artifact support.

pub mod client;
pub mod properties;
pub mod provider;
pub mod records;

pub use client::GitLabClient;
pub use provider::{GitLabProvider, GITLAB_CLASS};

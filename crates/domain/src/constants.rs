//! Property keys and defaults shared by every provider
//!
//! Provider-specific keys live next to their fetchers in `forgeprops-infra`
//! and carry a `github/` or `gitlab/` prefix.

// General entity properties
pub const PROPERTY_NAME: &str = "name";
pub const PROPERTY_UPSTREAM_ID: &str = "upstream_id";

// General repository properties
pub const REPO_PROPERTY_IS_PRIVATE: &str = "is_private";
pub const REPO_PROPERTY_IS_ARCHIVED: &str = "is_archived";
pub const REPO_PROPERTY_IS_FORK: &str = "is_fork";

/// Separator between the segments of a qualified entity name (`owner/repo`).
pub const NAME_SEPARATOR: char = '/';

// Provider defaults
pub const DEFAULT_GITHUB_ENDPOINT: &str = "https://api.github.com";
pub const DEFAULT_GITLAB_ENDPOINT: &str = "https://gitlab.com/api/v4/";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_HTTP_MAX_ATTEMPTS: usize = 1;
pub const DEFAULT_HTTP_BASE_BACKOFF_MS: u64 = 200;
pub const DEFAULT_USER_AGENT: &str = "forgeprops";

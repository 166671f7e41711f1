// ── Runtime coordinator configuration ──
//
// Describes *where* to poll and *how often*. Carries the bearer token
// but never touches disk; the CLI resolves a profile and hands one in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// Default pause between background refresh cycles.
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 300;

/// Configuration for polling one household.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// GraphQL endpoint.
    pub endpoint: Url,
    /// Household bearer token.
    pub token: SecretString,
    /// Per-request timeout.
    pub timeout: Duration,
    /// How often the background task refreshes (seconds). 0 = never.
    pub refresh_interval_secs: u64,
}

impl CoordinatorConfig {
    /// Configuration for `token` against `endpoint`, with default timing.
    pub fn new(endpoint: Url, token: SecretString) -> Self {
        Self {
            endpoint,
            token,
            timeout: Duration::from_secs(30),
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
        }
    }
}

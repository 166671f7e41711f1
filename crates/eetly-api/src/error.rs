use thiserror::Error;

/// Top-level error type for the `eetly-api` crate.
///
/// Covers every way a single GraphQL round trip can fail: transport,
/// HTTP status, GraphQL-level errors, and payload decoding.
/// `eetly-core` tags these with the query family that produced them.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The server rejected the bearer token (`invalid-jwt` / `invalid-headers`).
    #[error("Invalid or expired token: {message}")]
    InvalidToken { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Any HTTP status other than 200, regardless of body content.
    #[error("HTTP {status}: {preview}")]
    Http { status: u16, preview: String },

    /// Building the HTTP client failed.
    #[error("Client setup failed: {0}")]
    Setup(String),

    // ── GraphQL ─────────────────────────────────────────────────────
    /// The response carried an `errors` array.
    #[error("GraphQL error: {message}")]
    Graphql {
        message: String,
        code: Option<String>,
    },

    /// The response had neither `errors` nor `data`.
    #[error("Response has no `data` key")]
    MissingData,

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if a new token is needed to recover from this error.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            Self::InvalidToken { .. } => true,
            Self::Http { status, .. } => *status == 401 || *status == 403,
            _ => false,
        }
    }

    /// Returns `true` if this is a transient error worth retrying on the
    /// next scheduled cycle.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Http { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if the request ran past its timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }

    /// The HTTP status behind this error, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_status_is_auth_failure() {
        let err = Error::Http {
            status: 401,
            preview: String::new(),
        };
        assert!(err.is_auth_failure());
        assert!(!err.is_transient());
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn server_errors_are_transient() {
        let err = Error::Http {
            status: 503,
            preview: "maintenance".into(),
        };
        assert!(err.is_transient());
        assert!(!err.is_auth_failure());
    }

    #[test]
    fn graphql_errors_carry_no_status() {
        let err = Error::Graphql {
            message: "field not found".into(),
            code: Some("validation-failed".into()),
        };
        assert_eq!(err.status(), None);
        assert!(!err.is_transient());
    }
}

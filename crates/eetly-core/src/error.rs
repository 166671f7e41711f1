// ── Core error types ──
//
// Cycle-scoped failures. Every fetch or decode failure names the query
// family that caused it so the caller can report which part of the
// schedule is stale. None of these are fatal to the process.

use thiserror::Error;

use crate::query::QueryFamily;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Cycle failures ───────────────────────────────────────────────
    /// Non-200 status, network error, or GraphQL `errors` on one query.
    #[error("{family} query failed: {source}")]
    Transport {
        family: QueryFamily,
        #[source]
        source: eetly_api::Error,
    },

    /// A response was missing a key the normalizer needs.
    #[error("malformed {family} response: {detail}")]
    MalformedResponse { family: QueryFamily, detail: String },

    /// A one-shot cycle ended without a snapshot to hand out.
    #[error("refresh cycle did not publish a snapshot ({outcome})")]
    NotPublished { outcome: String },

    // ── Setup errors ─────────────────────────────────────────────────
    #[error("Client setup failed: {0}")]
    Setup(#[from] eetly_api::Error),
}

impl CoreError {
    pub(crate) fn transport(family: QueryFamily, source: eetly_api::Error) -> Self {
        Self::Transport { family, source }
    }

    pub(crate) fn malformed(family: QueryFamily, detail: impl Into<String>) -> Self {
        Self::MalformedResponse {
            family,
            detail: detail.into(),
        }
    }

    /// The query family that failed, for cycle failures.
    pub fn family(&self) -> Option<QueryFamily> {
        match self {
            Self::Transport { family, .. } | Self::MalformedResponse { family, .. } => {
                Some(*family)
            }
            Self::NotPublished { .. } | Self::Setup(_) => None,
        }
    }

    /// Returns `true` if the token was rejected.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            Self::Transport { source, .. } | Self::Setup(source) => source.is_auth_failure(),
            Self::MalformedResponse { .. } | Self::NotPublished { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_failures_name_their_family() {
        let err = CoreError::malformed(QueryFamily::List, "missing key `eetschema_list`");
        assert_eq!(err.family(), Some(QueryFamily::List));
        assert_eq!(
            err.to_string(),
            "malformed list response: missing key `eetschema_list`"
        );
    }

    #[test]
    fn rejected_token_is_auth_failure() {
        let err = CoreError::transport(
            QueryFamily::Info,
            eetly_api::Error::InvalidToken {
                message: "JWTExpired".into(),
            },
        );
        assert!(err.is_auth_failure());
        assert_eq!(err.family(), Some(QueryFamily::Info));
    }

    #[test]
    fn unpublished_oneshot_has_no_family() {
        let err = CoreError::NotPublished {
            outcome: "roster changed".into(),
        };
        assert_eq!(err.family(), None);
        assert!(!err.is_auth_failure());
        assert_eq!(
            err.to_string(),
            "refresh cycle did not publish a snapshot (roster changed)"
        );
    }
}

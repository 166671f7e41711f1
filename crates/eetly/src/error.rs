//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use eetly_config::ConfigError;
use eetly_core::{CoreError, QueryFamily};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const REBUILD: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Fetching ─────────────────────────────────────────────────────
    #[error("Could not fetch the {family} query")]
    #[diagnostic(
        code(eetly::fetch_failed),
        help("Check your network connection and the endpoint.\nDetail: {detail}")
    )]
    FetchFailed { family: QueryFamily, detail: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(eetly::timeout),
        help("Increase the timeout with --timeout or try again later.")
    )]
    Timeout,

    #[error("The server sent an unexpected {family} response")]
    #[diagnostic(code(eetly::malformed), help("Detail: {detail}"))]
    Malformed { family: QueryFamily, detail: String },

    #[error("The household roster changed during the refresh")]
    #[diagnostic(
        code(eetly::roster_changed),
        help("Residents were added or removed. Run the command again.")
    )]
    RosterChanged,

    // ── Authentication ───────────────────────────────────────────────
    #[error("The household token was rejected")]
    #[diagnostic(
        code(eetly::auth_failed),
        help(
            "The token may have expired.\n\
             Store a new one with: eetly config set-token"
        )
    )]
    AuthFailed,

    #[error("No token configured for profile '{profile}'")]
    #[diagnostic(
        code(eetly::no_credentials),
        help(
            "Configure a profile with: eetly config init\n\
             Or set the EETLY_TOKEN environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Lookup ───────────────────────────────────────────────────────
    #[error("Resident '{name}' not found")]
    #[diagnostic(code(eetly::not_found), help("Known residents: {known}"))]
    ResidentNotFound { name: String, known: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(eetly::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(eetly::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: eetly config init --name {name}"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No profile configured")]
    #[diagnostic(
        code(eetly::no_config),
        help(
            "Create one with: eetly config init\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(eetly::config))]
    Config { message: String },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FetchFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::ResidentNotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::RosterChanged => exit_code::REBUILD,
            Self::Validation { .. } | Self::NoConfig { .. } => exit_code::USAGE,
            Self::Malformed { .. } | Self::Config { .. } | Self::Io(_) => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        if err.is_auth_failure() {
            return Self::AuthFailed;
        }
        match err {
            CoreError::Transport { family, source } => {
                if source.is_timeout() {
                    Self::Timeout
                } else {
                    Self::FetchFailed {
                        family,
                        detail: source.to_string(),
                    }
                }
            }
            CoreError::MalformedResponse { family, detail } => Self::Malformed { family, detail },
            CoreError::NotPublished { .. } => Self::RosterChanged,
            CoreError::Setup(source) => Self::Config {
                message: source.to_string(),
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::UnknownProfile { name, available } => {
                Self::ProfileNotFound { name, available }
            }
            ConfigError::Io(e) => Self::Io(e),
            other => Self::Config {
                message: other.to_string(),
            },
        }
    }
}

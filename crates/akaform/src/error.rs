//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use akaform_config::ConfigError;
use akaform_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const REJECTED: i32 = 6;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(akaform::auth_failed),
        help(
            "Verify the EdgeGrid client token, client secret and access token\n\
             of the active profile. Run: akaform config show"
        )
    )]
    AuthFailed { message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(akaform::no_credentials),
        help(
            "Add a [profiles.{profile}] section to the config file, or store\n\
             secrets with the system keyring under service 'akaform'.\n\
             Run: akaform config path"
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(akaform::not_found),
        help("Run: akaform resources to see registered types")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
    },

    #[error("{message}")]
    #[diagnostic(code(akaform::rejected))]
    Rejected { message: String },

    // ── Operations ───────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(akaform::operation))]
    Core(CoreError),

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(akaform::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(akaform::profile_not_found),
        help("Available profiles: {available}")
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(akaform::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' was not confirmed")]
    #[diagnostic(
        code(akaform::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NotConfirmed { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(akaform::json))]
    Json(#[from] serde_json::Error),

    #[error("YAML output failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Rejected { .. } => exit_code::REJECTED,
            Self::Validation { .. } | Self::NotConfirmed { .. } => exit_code::USAGE,
            Self::Core(e) if e.is_not_found() => exit_code::NOT_FOUND,
            Self::Core(e) => match e.root() {
                CoreError::Validation { .. }
                | CoreError::InvalidIdFormat { .. }
                | CoreError::InvalidActionCombination { .. }
                | CoreError::ValueSetFailed { .. } => exit_code::USAGE,
                CoreError::Rejected { .. } => exit_code::REJECTED,
                CoreError::AuthenticationFailed { .. }
                | CoreError::RemoteLookupFailed {
                    source: akaform_api::Error::Authentication { .. },
                    ..
                } => exit_code::AUTH,
                _ => exit_code::GENERAL,
            },
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                resource_type: entity_type,
                identifier,
            },
            CoreError::Rejected { message } => CliError::Rejected { message },
            // Wrapped errors keep their operation prefix.
            other => CliError::Core(other),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile, .. } => CliError::NoCredentials { profile },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(other),
        }
    }
}

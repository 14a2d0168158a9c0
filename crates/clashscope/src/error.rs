//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use clashscope_config::ConfigError;
use clashscope_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the clash detection service: {reason}")]
    #[diagnostic(
        code(clashscope::connection_failed),
        help(
            "Check the base URL and your network.\n\
             Use --insecure (-k) against a local mock with a self-signed certificate."
        )
    )]
    ConnectionFailed { reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(clashscope::auth_failed),
        help(
            "Access tokens expire; fetch a fresh one.\n\
             Run: clashscope config set-token"
        )
    )]
    AuthFailed { message: String },

    #[error("No access token configured for profile '{profile}'")]
    #[diagnostic(
        code(clashscope::no_credentials),
        help(
            "Pass --token, set CLASHSCOPE_TOKEN, or run: clashscope config set-token\n\
             Tokens include their scheme, e.g. \"Bearer eyJ...\"."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(clashscope::not_found),
        help("Run: clashscope {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("No {resource} found for project {project}")]
    #[diagnostic(code(clashscope::no_data))]
    NoData { resource: String, project: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error ({code}): {message}")]
    #[diagnostic(code(clashscope::api_error))]
    ApiError { code: String, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(clashscope::validation))]
    Validation { field: String, reason: String },

    #[error("No project selected")]
    #[diagnostic(
        code(clashscope::no_project),
        help("Pass --project, set CLASHSCOPE_PROJECT, or add project_id to your profile.")
    )]
    NoProject,

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(clashscope::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: clashscope config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(clashscope::config),
        help("Config file: {path}")
    )]
    Config { message: String, path: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::NoData { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NoProject | Self::ProfileNotFound { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::AuthNotReady => CliError::NoCredentials {
                profile: "current".into(),
            },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::Http { status, message } => {
                if status == 401 || status == 403 {
                    CliError::AuthFailed { message }
                } else {
                    CliError::ApiError {
                        code: status.to_string(),
                        message,
                    }
                }
            }

            CoreError::Network { reason } => CliError::ConnectionFailed { reason },

            CoreError::Deserialization { message } => CliError::ApiError {
                code: "bad_payload".into(),
                message,
            },

            CoreError::NoData { resource, project } => CliError::NoData { resource, project },

            CoreError::MalformedInput { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                list_command: format!("{entity_type}s list"),
                resource_type: entity_type,
                identifier,
            },

            CoreError::Config { message } => CliError::Config {
                message,
                path: clashscope_config::config_path().display().to_string(),
            },

            CoreError::Internal(message) => CliError::ApiError {
                code: "internal".into(),
                message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: "(none)".into(),
            },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
                path: clashscope_config::config_path().display().to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_auth_exits_with_auth_code() {
        let err = CliError::from(CoreError::AuthNotReady);
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }

    #[test]
    fn unauthorized_status_is_an_auth_failure() {
        let err = CliError::from(CoreError::Http {
            status: 401,
            message: "token expired".into(),
        });
        assert!(matches!(err, CliError::AuthFailed { .. }));
    }

    #[test]
    fn server_error_is_general() {
        let err = CliError::from(CoreError::Http {
            status: 500,
            message: "boom".into(),
        });
        assert_eq!(err.exit_code(), exit_code::GENERAL);
    }

    #[test]
    fn empty_listing_maps_to_not_found_code() {
        let err = CliError::from(CoreError::NoData {
            resource: "runs".into(),
            project: "p1".into(),
        });
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
    }
}

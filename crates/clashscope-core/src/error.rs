// ── Core error types ──
//
// User-facing errors from clashscope-core. Consumers never see raw
// reqwest errors or JSON parse failures; the `From<clashscope_api::Error>`
// impl translates transport-layer errors into domain variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Integration errors ───────────────────────────────────────────
    /// No authorization provider installed. Raised loudly: the façade was
    /// used before the host finished starting up.
    #[error("Authorization provider is not ready -- sign in before querying the service")]
    AuthNotReady,

    /// The provider could not produce a usable token. A token the service
    /// rejects arrives as `Http { status: 401 }` instead.
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Remote errors (render as "no data") ──────────────────────────
    #[error("Clash detection service returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Request could not complete: {reason}")]
    Network { reason: String },

    #[error("Unexpected response payload: {message}")]
    Deserialization { message: String },

    #[error("No {resource} returned for project {project}")]
    NoData { resource: String, project: String },

    #[error("Malformed input: {message}")]
    MalformedInput { message: String },

    // ── Lookup errors ────────────────────────────────────────────────
    #[error("Entity not found: {entity_type} with id {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns `true` for failures a presentation layer should render as an
    /// empty state: the call was made but produced nothing usable.
    ///
    /// `AuthNotReady`, configuration and internal errors are not absent;
    /// they point at integration bugs and must surface.
    pub fn is_absent(&self) -> bool {
        matches!(
            self,
            Self::Http { .. }
                | Self::Network { .. }
                | Self::Deserialization { .. }
                | Self::NoData { .. }
                | Self::MalformedInput { .. }
                | Self::NotFound { .. }
        )
    }
}

/// Collapse "absent" failures into `None`, keeping loud failures as errors.
///
/// This is the read path most presentation code wants: an empty table on a
/// 500, a hard failure when the host forgot to install authorization.
pub trait OrAbsent<T> {
    fn or_absent(self) -> Result<Option<T>, CoreError>;
}

impl<T> OrAbsent<T> for Result<T, CoreError> {
    fn or_absent(self) -> Result<Option<T>, CoreError> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_absent() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<clashscope_api::Error> for CoreError {
    fn from(err: clashscope_api::Error) -> Self {
        match err {
            clashscope_api::Error::AuthMissing => CoreError::AuthNotReady,
            clashscope_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            clashscope_api::Error::Transport(ref e) => {
                if let Some(status) = e.status() {
                    CoreError::Http {
                        status: status.as_u16(),
                        message: e.to_string(),
                    }
                } else {
                    CoreError::Network {
                        reason: e.to_string(),
                    }
                }
            }
            clashscope_api::Error::InvalidUrl(e) => CoreError::MalformedInput {
                message: format!("Invalid URL: {e}"),
            },
            clashscope_api::Error::Tls(msg) => CoreError::Config {
                message: format!("TLS error: {msg}"),
            },
            clashscope_api::Error::Http { status, message } => CoreError::Http { status, message },
            clashscope_api::Error::Deserialization { message, body: _ } => {
                CoreError::Deserialization { message }
            }
            clashscope_api::Error::MalformedInput(message) => {
                CoreError::MalformedInput { message }
            }
        }
    }
}

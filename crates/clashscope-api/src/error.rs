use thiserror::Error;

/// Top-level error type for the `clashscope-api` crate.
///
/// Every transport operation returns one of these instead of collapsing
/// failures into "no data". `clashscope-core` maps them into user-facing
/// variants and decides which ones render as an empty state.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authorization ───────────────────────────────────────────────
    /// No token provider has been installed yet. This is a sequencing bug
    /// in the host (client used before startup finished).
    #[error("Authorization provider is not set -- install a token provider before issuing requests")]
    AuthMissing,

    /// The token provider was present but could not produce a usable token.
    /// A 401 from the service is reported as `Http`.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate setup error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Service ─────────────────────────────────────────────────────
    /// Non-success status from the clash-detection service.
    #[error("Clash detection API error (HTTP {status}): {message}")]
    Http { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// Input rejected before any I/O (e.g. an empty result link).
    #[error("Malformed input: {0}")]
    MalformedInput(String),
}

impl Error {
    /// Returns `true` if no authorization provider was available.
    pub fn is_auth_missing(&self) -> bool {
        matches!(self, Self::AuthMissing)
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Http { status: 404, .. } => true,
            _ => false,
        }
    }

    /// Returns `true` for failures that originate on the remote side or the
    /// network path: the request was attempted but yielded no usable data.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Http { .. } | Self::Deserialization { .. }
        )
    }

    /// HTTP status code, when the failure carries one.
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
    fn http_404_is_not_found() {
        let err = Error::Http {
            status: 404,
            message: "missing".into(),
        };
        assert!(err.is_not_found());
        assert!(err.is_remote());
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn auth_missing_is_not_remote() {
        let err = Error::AuthMissing;
        assert!(err.is_auth_missing());
        assert!(!err.is_remote());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn malformed_input_has_no_status() {
        let err = Error::MalformedInput("empty result link".into());
        assert!(!err.is_remote());
        assert!(!err.is_not_found());
    }
}

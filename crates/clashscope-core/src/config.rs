// ── Runtime service configuration ──
//
// Describes *how* to reach the clash-detection service. Carries the token
// and transport tuning but never touches disk; the CLI builds a
// `ServiceConfig` from its profile and hands it in.

use secrecy::SecretString;
use url::Url;

use clashscope_api::{DEFAULT_ACCEPT, DEFAULT_BASE_URL, RunRequest};

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// Web PKI roots (strict).
    #[default]
    SystemDefaults,
    /// Also trust a custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification. Local mock services only.
    DangerAcceptInvalid,
}

/// Configuration for one clash-detection service endpoint.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Service root, e.g. `https://api.bentley.com/clashdetection`.
    pub base_url: Url,
    /// Versioned media type sent as `Accept` on resource calls.
    pub accept: String,
    /// Full `Authorization` header value (`Bearer ...`). When `None`, the
    /// host must install a token provider before the first call.
    pub token: Option<SecretString>,
    pub tls: TlsVerification,
    /// Target of [`ClashReview::start_test_run`](crate::ClashReview::start_test_run).
    pub default_run: Option<RunRequest>,
    /// Initial state of the zoom-to-clash flag.
    pub apply_zoom: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            accept: DEFAULT_ACCEPT.into(),
            token: None,
            tls: TlsVerification::default(),
            default_run: None,
            apply_zoom: true,
        }
    }
}

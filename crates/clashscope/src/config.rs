//! CLI configuration: thin wrapper around `clashscope_config` shared types.
//!
//! Adds the resolution step that respects `GlobalOpts` flag overrides
//! (--base-url, --token, --project, --insecure).

use secrecy::SecretString;

use clashscope_core::{DEFAULT_ACCEPT, ServiceConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use clashscope_config::{
    Config, Profile, RunDefaults, config_path, load_config_or_default, save_config,
};

/// Everything a service-bound command needs, flags already applied.
#[derive(Debug)]
pub struct Resolved {
    pub service: ServiceConfig,
    pub project_id: Option<String>,
    pub run_defaults: RunDefaults,
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Translate config file + profile + global flags into a `Resolved`.
///
/// Flag values take priority over profile values. A missing profile is
/// fine as long as the flags carry a token; an explicitly requested
/// profile that does not exist is an error.
pub fn resolve(global: &GlobalOpts, cfg: &Config) -> Result<Resolved, CliError> {
    let profile_name = active_profile_name(global, cfg);

    let profile = match cfg.profiles.get(&profile_name) {
        Some(p) => p.clone(),
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                available: available_profiles(cfg),
                name: profile_name,
            });
        }
        None => Profile::default(),
    };

    // 1. Base URL (flag > env > profile)
    let url_str = global.base_url.as_deref().unwrap_or(&profile.base_url);
    let url_str = if url_str.is_empty() {
        clashscope_core::DEFAULT_BASE_URL
    } else {
        url_str
    };
    let base_url: url::Url = url_str.parse().map_err(|_| CliError::Validation {
        field: "base_url".into(),
        reason: format!("invalid URL: {url_str}"),
    })?;

    // 2. Token (flag > profile resolution)
    let token = resolve_token_with_flag(&profile, &profile_name, global)?;

    // 3. TLS verification
    let tls = if global.insecure {
        TlsVerification::DangerAcceptInvalid
    } else {
        clashscope_config::profile_tls(&profile, cfg.defaults.insecure)
    };

    let run_defaults = profile.run.clone().unwrap_or_default();

    Ok(Resolved {
        service: ServiceConfig {
            base_url,
            accept: profile.accept.clone().unwrap_or_else(|| DEFAULT_ACCEPT.into()),
            token: Some(token),
            tls,
            default_run: run_defaults.to_request(),
            apply_zoom: true,
        },
        project_id: global.project.clone().or(profile.project_id),
        run_defaults,
    })
}

/// Comma-separated profile names, for help text.
pub fn available_profiles(cfg: &Config) -> String {
    let mut names: Vec<_> = cfg.profiles.keys().cloned().collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort();
    names.join(", ")
}

fn resolve_token_with_flag(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<SecretString, CliError> {
    if let Some(ref token) = global.token {
        return Ok(SecretString::from(token.clone()));
    }
    Ok(clashscope_config::resolve_token(profile, profile_name)?)
}

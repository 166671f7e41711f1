//! CLI-side configuration: layers global flags over the shared
//! `eetly-config` profiles and produces a `CoordinatorConfig`.
//!
//! Core never sees these types -- it receives a pre-built config.

use std::time::Duration;

use secrecy::SecretString;

use eetly_api::DEFAULT_ENDPOINT;
use eetly_config::{Config, Defaults, DisplayOptions, Profile};
use eetly_core::CoordinatorConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use eetly_config::{config_path, load_config_or_default, save_config, store_token};

/// Everything a view command needs to run.
pub struct Resolved {
    pub profile_name: String,
    pub coordinator: CoordinatorConfig,
    pub display: DisplayOptions,
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Build the coordinator config from file, profile, and flag overrides.
///
/// Precedence for each setting: flag (or `EETLY_*` env) > profile >
/// defaults. A `--token` alone is enough to run without any config file.
pub fn resolve(global: &GlobalOpts) -> Result<Resolved, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        None if global.token.is_some() => Profile::default(),
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: cfg.available_profiles(),
            });
        }
        None => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };

    resolve_profile(&profile, &profile_name, &cfg.defaults, global)
}

/// Translate a profile + global flags into a coordinator config.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    global: &GlobalOpts,
) -> Result<Resolved, CliError> {
    // 1. Endpoint (flag > env > profile)
    let endpoint_str = global.endpoint.as_deref().unwrap_or(&profile.endpoint);
    let endpoint = eetly_config::parse_endpoint(endpoint_str)?;

    // 2. Token (flag > profile chain)
    let token = match global.token.as_deref() {
        Some(t) if t.trim().is_empty() => {
            return Err(CliError::Validation {
                field: "token".into(),
                reason: "token cannot be empty".into(),
            });
        }
        Some(t) => SecretString::from(t.to_owned()),
        None => eetly_config::resolve_token(profile, profile_name)?,
    };

    // 3. Timing
    let mut coordinator = CoordinatorConfig::new(endpoint, token);
    coordinator.timeout = Duration::from_secs(
        global
            .timeout
            .or(profile.timeout)
            .unwrap_or(defaults.timeout),
    );
    coordinator.refresh_interval_secs = profile
        .refresh_interval
        .unwrap_or(defaults.refresh_interval);

    // 4. Display flags only ever switch options on
    let display = DisplayOptions {
        show_balance: global.show_balance || profile.display.show_balance,
        custom_pictures: global.custom_pictures || profile.display.custom_pictures,
        resident_units: global.resident_units || profile.display.resident_units,
    };

    Ok(Resolved {
        profile_name: profile_name.to_owned(),
        coordinator,
        display,
    })
}

/// The endpoint a new profile should use.
pub fn endpoint_for_new_profile(global: &GlobalOpts) -> Result<String, CliError> {
    let raw = global.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT);
    eetly_config::parse_endpoint(raw)?;
    Ok(raw.to_owned())
}

//! Config subcommand handlers.

use secrecy::{ExposeSecret, SecretString};

use eetly_config::{Config, DisplayOptions, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, InitArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Copy of the config with plaintext tokens masked.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.token.is_some() {
            profile.token = Some("****".into());
        }
    }
    cfg
}

/// Format config for display, masking sensitive fields.
fn format_config_redacted(cfg: &Config) -> String {
    toml::to_string_pretty(&redacted(cfg)).unwrap_or_else(|e| format!("# unrenderable: {e}"))
}

fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Token from `--token`/`EETLY_TOKEN`, otherwise read from the terminal.
fn read_token(global: &GlobalOpts) -> Result<SecretString, CliError> {
    let raw = match global.token.clone() {
        Some(token) => token,
        None => rpassword::prompt_password("Household token: ").map_err(prompt_err)?,
    };
    if raw.trim().is_empty() {
        return Err(CliError::Validation {
            field: "token".into(),
            reason: "token cannot be empty".into(),
        });
    }
    Ok(SecretString::from(raw.trim().to_owned()))
}

// ── Init ────────────────────────────────────────────────────────────

fn init(args: InitArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = config::load_config_or_default();
    let endpoint = config::endpoint_for_new_profile(global)?;

    let mut profile = cfg
        .profiles
        .get(&args.name)
        .cloned()
        .unwrap_or_default();
    profile.endpoint = endpoint;
    profile.display = DisplayOptions {
        show_balance: global.show_balance,
        custom_pictures: global.custom_pictures,
        resident_units: global.resident_units,
    };

    if let Some(var) = args.token_env {
        profile.token_env = Some(var);
        profile.token = None;
    } else {
        let token = read_token(global)?;
        match config::store_token(&args.name, &token) {
            Ok(()) => {
                eprintln!("✓ Token stored in system keyring");
                profile.token = None;
            }
            Err(err) => {
                tracing::warn!(error = %err, "keyring unavailable, saving token to config file");
                eprintln!("! Keyring unavailable, token saved to the config file in plaintext");
                profile.token = Some(token.expose_secret().to_owned());
            }
        }
    }

    cfg.profiles.insert(args.name.clone(), profile);
    if cfg.default_profile.is_none() || cfg.profiles.len() == 1 {
        cfg.default_profile = Some(args.name.clone());
    }

    let path = config::save_config(&cfg)?;
    eprintln!("✓ Configuration written to {}", path.display());
    eprintln!("  Profile: {}", args.name);
    eprintln!("\n  Test it: eetly check");
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init(init_args) => init(init_args, global),

        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config_or_default());
            let out = output::render_single(global.output, &cfg, format_config_redacted, |_| {
                "config".into()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: eetly config init");
            } else {
                let lines: Vec<String> = cfg
                    .profiles
                    .keys()
                    .map(|name| {
                        let marker = if name == default { " *" } else { "" };
                        format!("{name}{marker}")
                    })
                    .collect();
                output::print_output(&lines.join("\n"), global.quiet);
            }
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            cfg.profile(&name)?;
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }

        ConfigCommand::SetToken { profile } => {
            let cfg = config::load_config_or_default();
            let profile_name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));
            let existing: &Profile = cfg.profile(&profile_name)?;
            if let Some(var) = &existing.token_env {
                eprintln!("! Profile '{profile_name}' reads its token from ${var} before the keyring");
            }

            let token = read_token(global)?;
            config::store_token(&profile_name, &token)?;
            eprintln!("✓ Token stored in system keyring for '{profile_name}'");
            Ok(())
        }
    }
}

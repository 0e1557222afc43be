//! Configuration loading, validation and env substitution.
//!
//! Config files: `klintar.toml`, `klintar.yaml`, or `klintar.json`
//! Searched in `./` then `~/.config/klintar/`.
//!
//! Supports `${ENV_VAR}` substitution in all string values. The variables
//! `DISCORD_BOT_TOKEN`, `CHANNELS_WHITELIST`, `FRONTEND_ORIGIN` and `PORT`
//! override file values.

pub mod env_subst;
pub mod loader;
pub mod schema;
pub mod template;
pub mod validate;

pub use {
    loader::{
        apply_env_overrides, apply_env_overrides_with, config_dir, discover_and_load,
        find_or_default_config_path, load_config, load_effective, write_default_config,
    },
    schema::{DiscordConfig, KlintarConfig, ServerConfig},
    validate::{Diagnostic, Severity, ValidationResult},
};

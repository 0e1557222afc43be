use std::path::{Path, PathBuf};

use {
    secrecy::Secret,
    tracing::{debug, warn},
};

use crate::{env_subst::substitute_env, schema::KlintarConfig, template::default_config_template};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &[
    "klintar.toml",
    "klintar.yaml",
    "klintar.yml",
    "klintar.json",
];

/// Environment variables that override file values.
pub const ENV_DISCORD_TOKEN: &str = "DISCORD_BOT_TOKEN";
pub const ENV_CHANNELS_WHITELIST: &str = "CHANNELS_WHITELIST";
pub const ENV_FRONTEND_ORIGIN: &str = "FRONTEND_ORIGIN";
pub const ENV_PORT: &str = "PORT";

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> anyhow::Result<KlintarConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./klintar.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/klintar/klintar.{toml,yaml,yml,json}` (user-global)
///
/// Returns `KlintarConfig::default()` if no config file is found.
pub fn discover_and_load() -> KlintarConfig {
    if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => return cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            },
        }
    } else {
        debug!("no config file found, using defaults");
    }
    KlintarConfig::default()
}

/// Load the effective configuration: the explicit file if given, otherwise
/// the discovered one, then environment overrides on top.
pub fn load_effective(path: Option<&Path>) -> anyhow::Result<KlintarConfig> {
    let config = match path {
        Some(p) => load_config(p)?,
        None => discover_and_load(),
    };
    Ok(apply_env_overrides(config))
}

/// Find the first config file in standard locations.
pub(crate) fn find_config_file() -> Option<PathBuf> {
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.exists() {
            return Some(p);
        }
    }

    if let Some(dir) = config_dir() {
        for name in CONFIG_FILENAMES {
            let p = dir.join(name);
            if p.exists() {
                return Some(p);
            }
        }
    }

    None
}

/// Returns the user-global config directory (`~/.config/klintar/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "klintar").map(|d| d.config_dir().to_path_buf())
}

/// Returns the path of an existing config file, or the default TOML path.
pub fn find_or_default_config_path() -> PathBuf {
    if let Some(path) = find_config_file() {
        return path;
    }
    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("klintar.toml")
}

/// Write the documented default template to `path`, creating parent
/// directories. Refuses to overwrite an existing file.
pub fn write_default_config(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        anyhow::bail!("config file already exists: {}", path.display());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, default_config_template())?;
    debug!(path = %path.display(), "wrote default config");
    Ok(())
}

/// Apply `DISCORD_BOT_TOKEN`, `CHANNELS_WHITELIST`, `FRONTEND_ORIGIN` and
/// `PORT` from the process environment.
pub fn apply_env_overrides(config: KlintarConfig) -> KlintarConfig {
    apply_env_overrides_with(config, |name| std::env::var(name).ok())
}

/// Same as [`apply_env_overrides`] with a custom lookup, so tests do not
/// have to mutate the process environment.
pub fn apply_env_overrides_with(
    mut config: KlintarConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> KlintarConfig {
    if let Some(token) = lookup(ENV_DISCORD_TOKEN).filter(|t| !t.trim().is_empty()) {
        config.discord.token = Some(Secret::new(token));
    }

    if let Some(raw) = lookup(ENV_CHANNELS_WHITELIST) {
        config.discord.channels_whitelist = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
    }

    if let Some(origin) = lookup(ENV_FRONTEND_ORIGIN).filter(|o| !o.trim().is_empty()) {
        config.server.allowed_origin = origin.trim().to_string();
    }

    if let Some(raw) = lookup(ENV_PORT).filter(|p| !p.trim().is_empty()) {
        match raw.trim().parse::<u16>() {
            Ok(port) => config.server.port = port,
            Err(e) => {
                warn!(value = %raw, error = %e, "ignoring invalid {ENV_PORT}");
            },
        }
    }

    config
}

fn parse_config(raw: &str, path: &Path) -> anyhow::Result<KlintarConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, secrecy::ExposeSecret, std::collections::HashMap};

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn env_overrides_every_field() {
        let cfg = apply_env_overrides_with(
            KlintarConfig::default(),
            env(&[
                ("DISCORD_BOT_TOKEN", "tok"),
                ("CHANNELS_WHITELIST", " 1, 2 ,,3 "),
                ("FRONTEND_ORIGIN", "https://klintar.example"),
                ("PORT", "8080"),
            ]),
        );
        assert_eq!(cfg.discord.token().unwrap().expose_secret(), "tok");
        assert_eq!(cfg.discord.channels_whitelist, vec!["1", "2", "3"]);
        assert_eq!(cfg.server.allowed_origin, "https://klintar.example");
        assert_eq!(cfg.server.port, 8080);
    }

    #[test]
    fn missing_env_keeps_file_values() {
        let mut base = KlintarConfig::default();
        base.server.port = 9000;
        base.discord.channels_whitelist = vec!["7".into()];
        let cfg = apply_env_overrides_with(base, env(&[]));
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.discord.channels_whitelist, vec!["7"]);
        assert!(cfg.discord.token().is_none());
    }

    #[test]
    fn invalid_port_is_ignored() {
        let cfg = apply_env_overrides_with(KlintarConfig::default(), env(&[("PORT", "http")]));
        assert_eq!(cfg.server.port, crate::schema::DEFAULT_PORT);
    }

    #[test]
    fn empty_whitelist_env_clears_list() {
        let mut base = KlintarConfig::default();
        base.discord.channels_whitelist = vec!["7".into()];
        let cfg = apply_env_overrides_with(base, env(&[("CHANNELS_WHITELIST", "")]));
        assert!(cfg.discord.channels_whitelist.is_empty());
    }

    #[test]
    fn loads_each_format() {
        let dir = tempfile::tempdir().unwrap();

        let toml_path = dir.path().join("klintar.toml");
        std::fs::write(&toml_path, "[server]\nport = 4000\n").unwrap();
        assert_eq!(load_config(&toml_path).unwrap().server.port, 4000);

        let yaml_path = dir.path().join("klintar.yaml");
        std::fs::write(&yaml_path, "server:\n  port: 4001\n").unwrap();
        assert_eq!(load_config(&yaml_path).unwrap().server.port, 4001);

        let json_path = dir.path().join("klintar.json");
        std::fs::write(&json_path, r#"{"server":{"port":4002}}"#).unwrap();
        assert_eq!(load_config(&json_path).unwrap().server.port, 4002);

        let ini_path = dir.path().join("klintar.ini");
        std::fs::write(&ini_path, "port=1").unwrap();
        assert!(load_config(&ini_path).is_err());
    }

    #[test]
    fn default_template_parses_and_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("klintar.toml");
        write_default_config(&path).unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.server.port, crate::schema::DEFAULT_PORT);
        assert_eq!(cfg.discord.history_limit, crate::schema::DEFAULT_HISTORY_LIMIT);

        assert!(write_default_config(&path).is_err());
    }
}

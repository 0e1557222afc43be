/// Config schema types (server, discord).
use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

/// Port used when neither the config file, `PORT`, nor `--port` set one.
pub const DEFAULT_PORT: u16 = 3001;

/// Messages fetched per request by default.
pub const DEFAULT_HISTORY_LIMIT: u8 = 50;

/// Discord caps a single history request at 100 messages.
pub const MAX_HISTORY_LIMIT: u8 = 100;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KlintarConfig {
    pub server: ServerConfig,
    pub discord: DiscordConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to. Defaults to "0.0.0.0".
    pub bind: String,
    /// Port to listen on. Defaults to 3001.
    pub port: u16,
    /// Value of `Access-Control-Allow-Origin`; `"*"` allows any origin.
    pub allowed_origin: String,
    /// Emit a tracing span per HTTP request.
    pub http_request_logs: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            port: DEFAULT_PORT,
            allowed_origin: "*".into(),
            http_request_logs: false,
        }
    }
}

/// Discord bot configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    /// Bot token. Without it the bot never connects and reads return 503.
    #[serde(
        serialize_with = "serialize_option_secret",
        skip_serializing_if = "Option::is_none"
    )]
    pub token: Option<Secret<String>>,
    /// Channel ids the API may read. Empty means every channel.
    pub channels_whitelist: Vec<String>,
    /// Messages fetched per request (1..=100).
    pub history_limit: u8,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            token: None,
            channels_whitelist: Vec::new(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl std::fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("channels_whitelist", &self.channels_whitelist)
            .field("history_limit", &self.history_limit)
            .finish()
    }
}

impl DiscordConfig {
    /// The token, if one is configured and not blank.
    #[must_use]
    pub fn token(&self) -> Option<&Secret<String>> {
        self.token
            .as_ref()
            .filter(|t| !t.expose_secret().trim().is_empty())
    }

    /// The configured limit clamped to what Discord accepts.
    #[must_use]
    pub fn effective_history_limit(&self) -> u8 {
        self.history_limit.clamp(1, MAX_HISTORY_LIMIT)
    }
}

impl KlintarConfig {
    /// Copy of the config with secrets replaced, safe to print.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut cfg = self.clone();
        if cfg.discord.token.is_some() {
            cfg.discord.token = Some(Secret::new("[REDACTED]".into()));
        }
        cfg
    }
}

// ── Serde helpers for Secret<String> ────────────────────────────────────────

fn serialize_option_secret<S: serde::Serializer>(
    secret: &Option<Secret<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match secret {
        Some(s) => serializer.serialize_some(s.expose_secret()),
        None => serializer.serialize_none(),
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = KlintarConfig::default();
        assert_eq!(cfg.server.bind, "0.0.0.0");
        assert_eq!(cfg.server.port, 3001);
        assert_eq!(cfg.server.allowed_origin, "*");
        assert!(!cfg.server.http_request_logs);
        assert!(cfg.discord.token().is_none());
        assert!(cfg.discord.channels_whitelist.is_empty());
        assert_eq!(cfg.discord.history_limit, 50);
    }

    #[test]
    fn deserialize_partial_toml() {
        let cfg: KlintarConfig = toml::from_str(
            r#"
[server]
port = 8080

[discord]
token = "abc.def"
channels_whitelist = ["1", "2"]
"#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.bind, "0.0.0.0");
        assert_eq!(cfg.discord.token().unwrap().expose_secret(), "abc.def");
        assert_eq!(cfg.discord.channels_whitelist, vec!["1", "2"]);
        assert_eq!(cfg.discord.history_limit, 50);
    }

    #[test]
    fn blank_token_counts_as_missing() {
        let cfg = DiscordConfig {
            token: Some(Secret::new("   ".into())),
            ..Default::default()
        };
        assert!(cfg.token().is_none());
    }

    #[test]
    fn history_limit_is_clamped() {
        let mut cfg = DiscordConfig::default();
        cfg.history_limit = 0;
        assert_eq!(cfg.effective_history_limit(), 1);
        cfg.history_limit = 200;
        assert_eq!(cfg.effective_history_limit(), 100);
        cfg.history_limit = 25;
        assert_eq!(cfg.effective_history_limit(), 25);
    }

    #[test]
    fn debug_and_redacted_hide_token() {
        let mut cfg = KlintarConfig::default();
        cfg.discord.token = Some(Secret::new("super-secret".into()));
        assert!(!format!("{cfg:?}").contains("super-secret"));

        let printed = toml::to_string(&cfg.redacted()).unwrap();
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("[REDACTED]"));
    }
}

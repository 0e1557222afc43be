//! Configuration validation engine.
//!
//! Checks a config file against the known schema, detects unknown or
//! misspelled fields, and reports settings that leave the API unusable or
//! exposed.

use std::{collections::HashMap, path::Path};

use serde_json::Value;

use crate::{
    loader::apply_env_overrides,
    schema::{KlintarConfig, MAX_HISTORY_LIMIT},
};

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Category: "syntax", "unknown-field", "type-error", "security", "discord"
    pub category: &'static str,
    /// Dotted path, e.g. "server.prot"
    pub path: String,
    pub message: String,
}

impl Diagnostic {
    fn new(
        severity: Severity,
        category: &'static str,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category,
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result of validating a configuration file.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
    pub config_path: Option<std::path::PathBuf>,
}

impl ValidationResult {
    /// Returns `true` if any diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Count diagnostics by severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

// ── Schema tree for unknown-field detection ─────────────────────────────────

/// Expected shape of the configuration.
enum KnownKeys {
    Struct(HashMap<&'static str, KnownKeys>),
    Leaf,
}

/// Build the schema map mirroring every field in `schema.rs`.
fn build_schema_map() -> KnownKeys {
    use KnownKeys::{Leaf, Struct};

    Struct(HashMap::from([
        (
            "server",
            Struct(HashMap::from([
                ("bind", Leaf),
                ("port", Leaf),
                ("allowed_origin", Leaf),
                ("http_request_logs", Leaf),
            ])),
        ),
        (
            "discord",
            Struct(HashMap::from([
                ("token", Leaf),
                ("channels_whitelist", Leaf),
                ("history_limit", Leaf),
            ])),
        ),
    ]))
}

// ── Levenshtein distance ────────────────────────────────────────────────────

fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr = vec![0; b_chars.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b_chars.len()]
}

/// Closest candidate within `max_distance` edits, if any.
fn suggest<'a>(needle: &str, candidates: &[&'a str], max_distance: usize) -> Option<&'a str> {
    candidates
        .iter()
        .map(|&c| (c, levenshtein(needle, c)))
        .filter(|&(_, d)| d > 0 && d <= max_distance)
        .min_by_key(|&(_, d)| d)
        .map(|(c, _)| c)
}

// ── Core validation ─────────────────────────────────────────────────────────

/// Validate a config file at the given path, or the discovered config file if
/// `path` is `None`. Semantic checks see environment overrides, so a token
/// supplied through `DISCORD_BOT_TOKEN` is not reported as missing.
#[must_use]
pub fn validate(path: Option<&Path>) -> ValidationResult {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => crate::loader::find_config_file(),
    };

    let Some(ref actual_path) = config_path else {
        let mut diagnostics = vec![Diagnostic::new(
            Severity::Info,
            "file-ref",
            "",
            "no config file found; using defaults",
        )];
        check_semantics(
            &apply_env_overrides(KlintarConfig::default()),
            &mut diagnostics,
        );
        return ValidationResult {
            diagnostics,
            config_path: None,
        };
    };

    let format = actual_path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("toml");

    match std::fs::read_to_string(actual_path) {
        Ok(content) => {
            let content = crate::env_subst::substitute_env(&content);
            let mut result = validate_str(&content, format, apply_env_overrides);
            result.config_path = Some(actual_path.clone());
            result
        },
        Err(e) => ValidationResult {
            diagnostics: vec![Diagnostic::new(
                Severity::Error,
                "syntax",
                "",
                format!("failed to read config file: {e}"),
            )],
            config_path: Some(actual_path.clone()),
        },
    }
}

/// Validate a TOML string without touching the file system or environment.
#[must_use]
pub fn validate_toml_str(toml_str: &str) -> ValidationResult {
    validate_str(toml_str, "toml", |cfg| cfg)
}

fn validate_str(
    raw: &str,
    format: &str,
    overrides: impl FnOnce(KlintarConfig) -> KlintarConfig,
) -> ValidationResult {
    let mut diagnostics = Vec::new();

    // 1. Syntax
    let value = match parse_value(raw, format) {
        Ok(v) => v,
        Err(message) => {
            diagnostics.push(Diagnostic::new(Severity::Error, "syntax", "", message));
            return ValidationResult {
                diagnostics,
                config_path: None,
            };
        },
    };

    // 2. Unknown fields
    check_unknown_fields(&value, &build_schema_map(), "", &mut diagnostics);

    // 3. Types, then 4. semantics on the parsed config
    match serde_json::from_value::<KlintarConfig>(value) {
        Ok(config) => check_semantics(&overrides(config), &mut diagnostics),
        Err(e) => diagnostics.push(Diagnostic::new(
            Severity::Error,
            "type-error",
            "",
            format!("type error: {e}"),
        )),
    }

    ValidationResult {
        diagnostics,
        config_path: None,
    }
}

fn parse_value(raw: &str, format: &str) -> Result<Value, String> {
    match format {
        "toml" => {
            let v: toml::Value =
                toml::from_str(raw).map_err(|e| format!("TOML syntax error: {e}"))?;
            serde_json::to_value(v).map_err(|e| format!("TOML conversion error: {e}"))
        },
        "yaml" | "yml" => {
            let v: serde_yaml::Value =
                serde_yaml::from_str(raw).map_err(|e| format!("YAML syntax error: {e}"))?;
            serde_json::to_value(v).map_err(|e| format!("YAML conversion error: {e}"))
        },
        "json" => serde_json::from_str(raw).map_err(|e| format!("JSON syntax error: {e}")),
        other => Err(format!("unsupported config format: .{other}")),
    }
}

/// Walk the value tree against the schema tree and flag unknown keys.
fn check_unknown_fields(
    value: &Value,
    schema: &KnownKeys,
    prefix: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let (Value::Object(table), KnownKeys::Struct(fields)) = (value, schema) else {
        return;
    };
    let known_keys: Vec<&str> = fields.keys().copied().collect();
    for (key, child_value) in table {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        if let Some(child_schema) = fields.get(key.as_str()) {
            check_unknown_fields(child_value, child_schema, &path, diagnostics);
            continue;
        }
        let level = if prefix.is_empty() {
            " at top level"
        } else {
            ""
        };
        let message = match suggest(key, &known_keys, 3) {
            Some(s) => format!("unknown field{level} (did you mean \"{s}\"?)"),
            None => format!("unknown field{level}"),
        };
        diagnostics.push(Diagnostic::new(
            Severity::Error,
            "unknown-field",
            path,
            message,
        ));
    }
}

/// Run semantic checks on a successfully parsed config.
fn check_semantics(config: &KlintarConfig, diagnostics: &mut Vec<Diagnostic>) {
    if config.discord.token().is_none() {
        diagnostics.push(Diagnostic::new(
            Severity::Warning,
            "discord",
            "discord.token",
            "no bot token configured; the bot will never connect and reads return 503",
        ));
    }

    let limit = config.discord.history_limit;
    if limit == 0 || limit > MAX_HISTORY_LIMIT {
        diagnostics.push(Diagnostic::new(
            Severity::Warning,
            "discord",
            "discord.history_limit",
            format!(
                "history_limit {limit} is outside 1-{MAX_HISTORY_LIMIT}; {} will be used",
                config.discord.effective_history_limit()
            ),
        ));
    }

    for (i, id) in config.discord.channels_whitelist.iter().enumerate() {
        let id = id.trim();
        if !id.is_empty() && !id.chars().all(|c| c.is_ascii_digit()) {
            diagnostics.push(Diagnostic::new(
                Severity::Warning,
                "discord",
                format!("discord.channels_whitelist[{i}]"),
                format!("\"{id}\" is not a Discord channel id and will never match"),
            ));
        }
    }

    if config.discord.channels_whitelist.is_empty() {
        diagnostics.push(Diagnostic::new(
            Severity::Info,
            "discord",
            "discord.channels_whitelist",
            "whitelist is empty; every channel the bot can see is readable",
        ));
    }

    let is_localhost = matches!(
        config.server.bind.as_str(),
        "127.0.0.1" | "localhost" | "::1"
    );
    if config.server.allowed_origin.trim() == "*" && !is_localhost {
        diagnostics.push(Diagnostic::new(
            Severity::Warning,
            "security",
            "server.allowed_origin",
            format!(
                "any origin may call the API while binding to {}",
                config.server.bind
            ),
        ));
    }

    if config.server.allowed_origin.trim().is_empty() {
        diagnostics.push(Diagnostic::new(
            Severity::Error,
            "security",
            "server.allowed_origin",
            "allowed_origin must be \"*\" or an origin such as https://example.com",
        ));
    }
}

//! Default configuration template with every option documented.

/// Generate the default config template written by `klintar config init`.
pub fn default_config_template() -> String {
    format!(
        r##"# Klintar Configuration
# =====================
# Every option is listed with its default. Changes require a restart.
#
# Environment variable substitution is supported: ${{ENV_VAR}} or
# ${{ENV_VAR:-fallback}}. The variables DISCORD_BOT_TOKEN, CHANNELS_WHITELIST,
# FRONTEND_ORIGIN and PORT always override the values below.

[server]
bind = "0.0.0.0"                  # Address to bind to
port = {port}                       # Port to listen on
allowed_origin = "*"              # CORS origin allowed to call the API ("*" = any)
http_request_logs = false         # Trace every HTTP request (debugging)

[discord]
# token = "${{DISCORD_BOT_TOKEN}}"  # Bot token; without it the API answers 503
channels_whitelist = []           # Readable channel ids; empty = all channels
history_limit = {limit}                # Messages returned per request (1-100)
"##,
        port = crate::schema::DEFAULT_PORT,
        limit = crate::schema::DEFAULT_HISTORY_LIMIT,
    )
}

mod config_commands;

use {
    clap::{Parser, Subcommand},
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "klintar", about = "Klintar — read-only Discord channel history API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Config file to use instead of the discovered one.
    #[arg(long, global = true, env = "KLINTAR_CONFIG")]
    config: Option<std::path::PathBuf>,

    /// Address to bind to (overrides config value).
    #[arg(long, global = true)]
    bind: Option<String>,

    /// Port to listen on (overrides config value and PORT).
    #[arg(long, global = true)]
    port: Option<u16>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway (default when no subcommand is provided).
    Gateway,
    /// Configuration management.
    Config {
        #[command(subcommand)]
        action: config_commands::ConfigAction,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_telemetry(&cli);

    match cli.command {
        None | Some(Commands::Gateway) => {
            info!(version = env!("CARGO_PKG_VERSION"), "klintar starting");

            let mut config = klintar_config::load_effective(cli.config.as_deref())?;

            // CLI args override config and environment values
            if let Some(bind) = cli.bind {
                config.server.bind = bind;
            }
            if let Some(port) = cli.port {
                config.server.port = port;
            }

            klintar_gateway::server::start_gateway(config).await
        },
        Some(Commands::Config { action }) => {
            config_commands::handle_config(action, cli.config.as_deref())
        },
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, clap::CommandFactory};

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_to_gateway() {
        let cli = Cli::try_parse_from(["klintar"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.log_level, "info");
        assert!(!cli.json_logs);
    }

    #[test]
    fn global_overrides_parse_after_subcommand() {
        let cli =
            Cli::try_parse_from(["klintar", "gateway", "--port", "8080", "--bind", "127.0.0.1"])
                .unwrap();
        assert!(matches!(cli.command, Some(Commands::Gateway)));
        assert_eq!(cli.port, Some(8080));
        assert_eq!(cli.bind.as_deref(), Some("127.0.0.1"));
    }

    #[test]
    fn config_init_takes_optional_path() {
        let cli = Cli::try_parse_from(["klintar", "config", "init", "/tmp/k.toml"]).unwrap();
        match cli.command {
            Some(Commands::Config {
                action: config_commands::ConfigAction::Init { path },
            }) => assert_eq!(path.unwrap().to_str(), Some("/tmp/k.toml")),
            _ => panic!("expected config init"),
        }
    }
}

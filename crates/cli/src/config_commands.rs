use std::path::{Path, PathBuf};

use {anyhow::Result, clap::Subcommand};

use klintar_config::validate::{self, Severity};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors/warnings.
    Check {
        /// Show informational diagnostics in addition to errors and warnings.
        #[arg(long)]
        verbose: bool,
    },
    /// Print the effective configuration (file + environment), token redacted.
    Show,
    /// Write a documented default config file.
    Init {
        /// Destination (defaults to ~/.config/klintar/klintar.toml).
        path: Option<PathBuf>,
    },
}

pub fn handle_config(action: ConfigAction, config_path: Option<&Path>) -> Result<()> {
    match action {
        ConfigAction::Check { verbose } => check(config_path, verbose),
        ConfigAction::Show => show(config_path),
        ConfigAction::Init { path } => init(path),
    }
}

/// ANSI color codes.
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn check(config_path: Option<&Path>, verbose: bool) -> Result<()> {
    let result = validate::validate(config_path);

    if let Some(ref path) = result.config_path {
        eprintln!("Checking {}\n", path.display());
    } else {
        eprintln!("No config file found; checking defaults.\n");
    }

    let mut shown = 0;
    for d in &result.diagnostics {
        if d.severity == Severity::Info && !verbose {
            continue;
        }

        let color = match d.severity {
            Severity::Error => RED,
            Severity::Warning => YELLOW,
            Severity::Info => CYAN,
        };

        if d.path.is_empty() {
            eprintln!("  {BOLD}{color}{}{RESET} {}", d.severity, d.message);
        } else {
            eprintln!(
                "  {BOLD}{color}{}{RESET} {}: {}",
                d.severity, d.path, d.message
            );
        }
        shown += 1;
    }

    let errors = result.count(Severity::Error);
    let warnings = result.count(Severity::Warning);

    if shown > 0 {
        eprintln!();
    }

    if errors == 0 && warnings == 0 {
        eprintln!("No issues found.");
    } else {
        eprintln!("{errors} error(s), {warnings} warning(s)");
    }

    if errors > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn show(config_path: Option<&Path>) -> Result<()> {
    let config = klintar_config::load_effective(config_path)?;
    print!("{}", toml::to_string_pretty(&config.redacted())?);
    Ok(())
}

fn init(path: Option<PathBuf>) -> Result<()> {
    let path = match path {
        Some(p) => p,
        None => klintar_config::config_dir()
            .ok_or_else(|| anyhow::anyhow!("could not determine the config directory"))?
            .join("klintar.toml"),
    };
    klintar_config::write_default_config(&path)?;
    eprintln!("Wrote {}", path.display());
    Ok(())
}

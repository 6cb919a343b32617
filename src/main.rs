//! epi-wallet - wallet core command line
//!
//! Validates GTINs, inspects message documents and checks configuration files

#![allow(missing_docs)]

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use epi_wallet::core::import::parse_message_files;
use epi_wallet::core::messages::message_type;
use epi_wallet::utils::logging::init_logging;
use epi_wallet::{Config, validate_gtin};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;

#[derive(Debug, Parser)]
#[command(name = "epi-wallet", version, about = "Product information wallet tools")]
struct Cli {
    /// Configuration file; environment variables are used when omitted
    #[arg(short, long, global = true, env = "EPI_WALLET_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate GTIN-14 codes
    Gtin {
        #[arg(required = true)]
        codes: Vec<String>,
    },
    /// Parse message documents and summarize them per message type
    Import {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigCommand {
    /// Load and validate a configuration file
    Check { path: PathBuf },
}

async fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => Config::from_file(path)
            .await
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => Config::from_env().context("Failed to read configuration from environment")?,
    };
    Ok(config)
}

fn check_gtins(codes: &[String]) -> bool {
    let mut all_valid = true;
    for code in codes {
        let result = validate_gtin(code);
        println!("{}: {}", code, result.message);
        all_valid &= result.is_valid;
    }
    all_valid
}

async fn summarize_import(files: &[PathBuf]) -> anyhow::Result<()> {
    let messages = parse_message_files(files).await?;

    let mut per_type: BTreeMap<&str, usize> = BTreeMap::new();
    for message in &messages {
        *per_type
            .entry(message_type(message).unwrap_or("<untyped>"))
            .or_default() += 1;
    }

    println!("{} messages in {} files", messages.len(), files.len());
    for (kind, count) in per_type {
        println!("  {:<20} {}", kind, count);
    }
    Ok(())
}

async fn check_config(path: &Path) -> anyhow::Result<()> {
    let config = Config::from_file(path)
        .await
        .with_context(|| format!("Failed to load {}", path.display()))?;
    if let Err(e) = config.validate() {
        bail!("{} is invalid: {}", path.display(), e);
    }
    println!("{} is valid", path.display());
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = load_config(cli.config.as_deref()).await?;
    init_logging(config.logging())?;
    debug!("Running {:?}", cli.command);

    match cli.command {
        Command::Gtin { codes } => Ok(check_gtins(&codes)),
        Command::Import { files } => summarize_import(&files).await.map(|()| true),
        Command::Config {
            command: ConfigCommand::Check { path },
        } => check_config(&path).await.map(|()| true),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            // Alternate formatting prints the whole context chain
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

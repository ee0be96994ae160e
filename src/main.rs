// SPDX-License-Identifier: AGPL-3.0-or-later
//! pi-provision: interactive provisioning wizard for headless Pi deployments

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use pi_provision::keygen::SshKeygen;
use pi_provision::provision::Provisioner;
use pi_provision::schema::{questionnaire, QuestionKind};
use pi_provision::wizard;
use pi_provision::Config;

/// pi-provision: guided setup for a headless Raspberry Pi
///
/// Asks a sequence of questions, generates an SSH keypair named after the
/// chosen hostname, and writes the settings script consumed by the
/// provisioning scripts.
#[derive(Parser, Debug)]
#[command(name = "pi-provision")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "pi-provision.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Dry run mode (no keypair generation, no file writes)
    #[arg(long)]
    dry_run: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the interactive wizard
    Run,

    /// List the questions the wizard will ask
    #[command(alias = "ls")]
    Questions {
        /// Emit the questionnaire as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show configuration
    Config,

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(cli.debug)
        .init();

    match cli.command {
        Commands::Version => {
            println!("pi-provision v{}", env!("CARGO_PKG_VERSION"));
            println!("Guided setup for headless Raspberry Pi deployments");
            Ok(())
        }

        Commands::Config => show_config(&cli.config),

        Commands::Questions { json } => list_questions(&cli.config, json),

        Commands::Run => run_wizard(&cli.config, cli.dry_run).await,
    }
}

/// Run the questionnaire and the derivation pipeline
async fn run_wizard(config_path: &PathBuf, dry_run: bool) -> anyhow::Result<()> {
    let config = Config::load(config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let keygen = SshKeygen::new(&config.key_type);
    let provisioner = Provisioner::new(keygen, &config, dry_run);

    provisioner
        .ensure_key_dir()
        .with_context(|| format!("Failed to create key directory {}", config.key_dir.display()))?;

    let questions = questionnaire(&config);
    info!(questions = questions.len(), "Starting questionnaire");

    let mut answers = wizard::run_console(&questions).await?;

    let outcome = provisioner.run(&mut answers).await?;

    println!();
    if dry_run {
        println!("[DRY RUN] Settings document for {}:", outcome.settings_path.display());
        println!();
        print!("{}", outcome.document);
    } else {
        println!("Keypair written to {}", outcome.keypair.private_key.display());
        println!("Settings written to {}", outcome.settings_path.display());
    }

    println!();
    println!("Provisioning settings ready");
    Ok(())
}

/// List the questionnaire
fn list_questions(config_path: &PathBuf, json: bool) -> anyhow::Result<()> {
    let config = Config::load(config_path)?;
    let questions = questionnaire(&config);

    if json {
        println!("{}", serde_json::to_string_pretty(&questions)?);
        return Ok(());
    }

    println!("The wizard asks, in order:");
    println!();
    for (index, question) in questions.iter().enumerate() {
        let kind = match &question.kind {
            QuestionKind::Input => "text".to_string(),
            QuestionKind::Number => "number".to_string(),
            QuestionKind::Select { choices } => format!("choice of {}", choices.len()),
        };

        let mut notes = vec![kind];
        if question.visible_when.is_some() {
            notes.push("conditional".to_string());
        }
        if question.transient {
            notes.push("internal".to_string());
        }

        println!(
            "  {:>2}. {:<26} {} ({})",
            index + 1,
            question.key,
            question.message,
            notes.join(", ")
        );
    }

    Ok(())
}

/// Show the current configuration
fn show_config(config_path: &PathBuf) -> anyhow::Result<()> {
    if !config_path.exists() {
        let config = Config::default();
        println!("No configuration file found. Using defaults:");
        println!();
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    let config = Config::from_file(config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["pi-provision", "version"]).unwrap();
        match cli.command {
            Commands::Version => {}
            _ => panic!("Expected Version command"),
        }
    }

    #[test]
    fn test_cli_run_command() {
        let cli = Cli::try_parse_from(["pi-provision", "run"]).unwrap();
        match cli.command {
            Commands::Run => {}
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_dry_run_flag() {
        let cli = Cli::try_parse_from(["pi-provision", "--dry-run", "run"]).unwrap();
        assert!(cli.dry_run);
    }

    #[test]
    fn test_cli_questions_json_flag() {
        let cli = Cli::try_parse_from(["pi-provision", "questions", "--json"]).unwrap();
        match cli.command {
            Commands::Questions { json } => assert!(json),
            _ => panic!("Expected Questions command"),
        }
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::try_parse_from(["pi-provision", "-v", "questions"]).unwrap();
        assert!(cli.verbose);
    }
}

//! Recast CLI - apply saved presets to text through LLM providers
//!
//! This is the main entry point for the `recast` binary, providing commands
//! for converting text, previewing provider requests, and managing presets
//! and configuration.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;
mod store;

use cli::{Cli, Commands};
use colored::control;
use config::Config;
use error::{Error, Result};
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;

#[tokio::main]
async fn main() {
    // API keys may live in a local .env file
    dotenv::dotenv().ok();

    let cli = Cli::parse_args();

    control::set_override(cli.use_color());

    if let Err(e) = init_logging(&cli) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    match run(cli).await {
        Ok(()) => process::exit(0),
        Err(e) => {
            if let Error::Conversion { kind, .. } = &e {
                tracing::debug!(kind = %kind, "Conversion failed");
            }

            eprintln!("{}", error::format_error(&e, control::SHOULD_COLORIZE.should_colorize()));

            if e.should_show_help() {
                eprintln!("\nFor more information, try '--help'");
            }

            process::exit(e.exit_code());
        }
    }
}

/// Main application logic
#[instrument(skip(cli), fields(command = command_name(&cli.command)))]
async fn run(cli: Cli) -> Result<()> {
    let _timer = Timer::with_details("cli_execution", command_name(&cli.command));

    let config = {
        let _config_timer = Timer::new("config_loading");
        Config::load_with_file(cli.config.as_deref())?
    };

    let mut output = OutputWriter::new(cli.output, cli.use_color(), cli.quiet);

    tracing::info!(
        command = command_name(&cli.command),
        verbosity = cli.verbosity_level(),
        "Executing command"
    );

    match cli.command {
        Commands::Convert(args) => handlers::handle_convert(args, &config, &mut output).await,
        Commands::Preview(args) => handlers::handle_preview(args, &config, &mut output).await,
        Commands::Preset(args) => handlers::handle_preset(args, &config, &mut output).await,
        Commands::Modes => handlers::handle_modes(&mut output),
        Commands::Models(args) => handlers::handle_models(args, &mut output),
        Commands::Config(args) => handlers::handle_config(args, &config, &mut output).await,
        Commands::Completions(args) => handlers::handle_completions(args),
    }
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Convert(_) => "convert",
        Commands::Preview(_) => "preview",
        Commands::Preset(_) => "preset",
        Commands::Modes => "modes",
        Commands::Models(_) => "models",
        Commands::Config(_) => "config",
        Commands::Completions(_) => "completions",
    }
}

/// Initialize the logging system
fn init_logging(cli: &Cli) -> Result<()> {
    let mut logging_config = LoggingConfig::from_verbosity(cli.verbosity_level());
    logging_config.merge_with_env();

    // If quiet mode, only log errors
    if cli.quiet {
        logging_config.level = "error".to_string();
    }

    logging::init_logging(logging_config)
}

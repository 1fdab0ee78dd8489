//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.

mod catalog;
mod config;
mod convert;
mod preset;
mod preview;
mod utils;

pub use catalog::{handle_models, handle_modes};
pub use config::handle_config;
pub use convert::handle_convert;
pub use preset::handle_preset;
pub use preview::handle_preview;

use crate::cli::CompletionsArgs;
use crate::error::Result;
use clap::CommandFactory;

/// Handle the completions command
pub fn handle_completions(args: CompletionsArgs) -> Result<()> {
    let mut cmd = crate::cli::Cli::command();
    let name = cmd.get_name().to_string();

    clap_complete::generate(
        args.shell.to_clap_shell(),
        &mut cmd,
        name,
        &mut std::io::stdout(),
    );

    Ok(())
}

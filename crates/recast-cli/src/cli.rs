//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API,
//! providing a type-safe and well-documented command interface.

use clap::{Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use recast_core::{Language, Provider};
use std::path::PathBuf;

/// Recast CLI - apply saved presets to text through LLM providers
///
/// Select a preset (provider, model, transform mode, language and generation
/// settings), feed it text, and get the rewritten text back.
#[derive(Parser, Debug)]
#[command(
    name = "recast",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "RECAST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(short, long, value_enum, global = true, default_value = "human")]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply a preset to input text
    Convert(ConvertArgs),

    /// Show the compiled instruction and provider request without sending it
    Preview(PreviewArgs),

    /// Manage saved presets
    Preset(PresetArgs),

    /// List the known transform modes
    Modes,

    /// List the known models per provider
    Models(ModelsArgs),

    /// Manage configuration files and settings
    Config(ConfigArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Where the input text comes from
#[derive(Parser, Debug, Clone)]
pub struct InputArgs {
    /// Input text (read from --file or stdin when omitted)
    #[arg(value_name = "TEXT")]
    pub text: Option<String>,

    /// Read the input text from a file
    #[arg(short, long, value_name = "PATH", conflicts_with = "text")]
    pub file: Option<PathBuf>,
}

/// Arguments for the convert command
#[derive(Parser, Debug)]
pub struct ConvertArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Preset name or id (defaults to the selected preset)
    #[arg(short, long, value_name = "PRESET")]
    pub preset: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Save the converted text to a file
    #[arg(long = "save-to", value_name = "OUTPUT_FILE")]
    pub save_to: Option<PathBuf>,
}

/// Arguments for the preview command
#[derive(Parser, Debug)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Preset name or id (defaults to the selected preset)
    #[arg(short, long, value_name = "PRESET")]
    pub preset: Option<String>,
}

/// Arguments for the preset command
#[derive(Parser, Debug)]
pub struct PresetArgs {
    #[command(subcommand)]
    pub action: PresetAction,
}

/// Preset management actions
#[derive(Subcommand, Debug)]
pub enum PresetAction {
    /// List saved presets
    List,

    /// Show one preset
    Show {
        /// Preset name or id
        preset: String,
    },

    /// Save a new preset and select it
    Add(PresetFieldArgs),

    /// Replace the fields of an existing preset
    Overwrite {
        /// Preset name or id
        preset: String,

        #[command(flatten)]
        fields: PresetFieldArgs,
    },

    /// Delete a preset
    Delete {
        /// Preset name or id
        preset: String,
    },

    /// Make a preset the default for convert and preview
    Select {
        /// Preset name or id
        preset: String,
    },
}

/// Editable preset fields
///
/// On `add`, omitted fields take the form defaults. On `overwrite`, omitted
/// fields keep their current values.
#[derive(Parser, Debug, Clone, Default)]
pub struct PresetFieldArgs {
    /// Display name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Provider (anthropic, openai, gemini)
    #[arg(long, value_parser = parse_provider)]
    pub provider: Option<Provider>,

    /// Model identifier
    #[arg(short, long)]
    pub model: Option<String>,

    /// Transform mode (see `recast modes`)
    #[arg(long = "mode")]
    pub transform_mode: Option<String>,

    /// Output language
    #[arg(short, long, value_enum)]
    pub language: Option<LanguageArg>,

    /// Sampling temperature (clamped to 0.0-1.0 when sent)
    #[arg(short, long)]
    pub temperature: Option<f64>,

    /// Maximum output tokens
    #[arg(long)]
    pub max_tokens: Option<u32>,
}

/// Arguments for the models command
#[derive(Parser, Debug)]
pub struct ModelsArgs {
    /// Only list models of this provider
    #[arg(short, long, value_parser = parse_provider)]
    pub provider: Option<Provider>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a default configuration file
    Init(ConfigInitArgs),

    /// Show current configuration values (API keys redacted)
    Show(ConfigShowArgs),

    /// Print the configuration and preset store locations
    Path,
}

/// Arguments for config init
#[derive(Parser, Debug)]
pub struct ConfigInitArgs {
    /// Target file (defaults to the user config directory)
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Force overwrite existing config files
    #[arg(long)]
    pub force: bool,
}

/// Arguments for config show
#[derive(Parser, Debug)]
pub struct ConfigShowArgs {
    /// Show configuration in specified format
    #[arg(short, long, value_enum, default_value = "toml")]
    pub format: ConfigFormat,
}

/// Configuration file formats
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    /// TOML format
    Toml,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

/// Output language choices
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LanguageArg {
    /// Japanese
    Ja,
    /// English
    En,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

impl From<LanguageArg> for Language {
    fn from(language: LanguageArg) -> Self {
        match language {
            LanguageArg::Ja => Language::Ja,
            LanguageArg::En => Language::En,
        }
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}

fn parse_provider(value: &str) -> std::result::Result<Provider, String> {
    value.parse::<Provider>().map_err(|e| e.to_string())
}

//! Configuration command handlers

use crate::cli::{ConfigAction, ConfigArgs, ConfigFormat, ConfigInitArgs, ConfigShowArgs};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::redaction;
use crate::output::OutputWriter;
use recast_core::credentials::env_var_name;
use recast_core::Provider;

/// Handle the config command
pub async fn handle_config(
    args: ConfigArgs,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    match args.action {
        ConfigAction::Init(init_args) => handle_config_init(init_args, output),
        ConfigAction::Show(show_args) => handle_config_show(show_args, config, output),
        ConfigAction::Path => handle_config_path(config, output),
    }
}

/// Handle config init subcommand
fn handle_config_init(args: ConfigInitArgs, output: &mut OutputWriter) -> Result<()> {
    let path = match args.path {
        Some(path) => path,
        None => Config::user_config_path()
            .ok_or_else(|| Error::config("Unable to determine user config directory"))?,
    };

    if path.exists() && !args.force {
        output.warning(&format!(
            "Config already exists at {} (use --force to overwrite)",
            path.display()
        ))?;
        return Ok(());
    }

    // Only TOML keeps the commented template
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") | Some("json") => Config::default().save(&path)?,
        _ => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, Config::default_toml())?;
        }
    }

    output.success(&format!("✓ Created config at {}", path.display()))?;
    output.info("Edit it to set API keys, base URLs and timeouts.")?;
    Ok(())
}

/// Handle config show subcommand
fn handle_config_show(
    args: ConfigShowArgs,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    output.writeln(render(config, args.format)?.trim_end())
}

/// Serialize the configuration with API keys masked
fn render(config: &Config, format: ConfigFormat) -> Result<String> {
    let mut value = serde_json::to_value(config)?;
    redaction::redact_json_value(&mut value);

    let content = match format {
        ConfigFormat::Toml => toml::to_string_pretty(&value)
            .map_err(|e| Error::config(format!("Failed to serialize as TOML: {}", e)))?,
        ConfigFormat::Json => serde_json::to_string_pretty(&value)?,
        ConfigFormat::Yaml => serde_yaml::to_string(&value)?,
    };
    Ok(content)
}

/// Handle config path subcommand
fn handle_config_path(config: &Config, output: &mut OutputWriter) -> Result<()> {
    match Config::user_config_path() {
        Some(path) => {
            let state = if path.exists() { "exists" } else { "not created" };
            output.writeln(&format!("config:  {} ({})", path.display(), state))?;
        }
        None => output.writeln("config:  <no user config directory>")?,
    }
    output.writeln(&format!("presets: {}", config.paths.presets_file.display()))?;

    for provider in Provider::ALL {
        let from_config = config
            .get_provider(provider)
            .and_then(|p| p.api_key.as_ref())
            .is_some();
        let from_env = std::env::var(env_var_name(provider)).is_ok_and(|v| !v.trim().is_empty());
        let state = match (from_env, from_config) {
            (true, _) => "set (environment)",
            (false, true) => "set (config file)",
            (false, false) => "unset",
        };
        output.writeln(&format!("{:<18} {}", env_var_name(provider), state))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;
    use tempfile::TempDir;

    fn config_with_key() -> Config {
        let mut config = Config::default();
        config.providers.insert(
            "openai".to_string(),
            ProviderConfig {
                api_key: Some("sk-config-secret-value".to_string()),
                base_url: Some("http://localhost:8080".to_string()),
            },
        );
        config
    }

    #[test]
    fn test_show_masks_api_keys() {
        let config = config_with_key();
        for format in [ConfigFormat::Toml, ConfigFormat::Json, ConfigFormat::Yaml] {
            let rendered = render(&config, format).unwrap();
            assert!(!rendered.contains("sk-config-secret-value"), "{:?}", format);
            assert!(rendered.contains("***"));
            assert!(rendered.contains("http://localhost:8080"));
        }
    }

    #[test]
    fn test_shown_toml_parses_back() {
        let rendered = render(&Config::default(), ConfigFormat::Toml).unwrap();
        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_init_writes_loadable_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut output = OutputWriter::new(crate::cli::OutputFormat::Json, false, true);
        handle_config_init(
            ConfigInitArgs {
                path: Some(path.clone()),
                force: false,
            },
            &mut output,
        )
        .unwrap();

        let loaded = Config::load_with_file(Some(&path)).unwrap();
        assert_eq!(loaded.http, Config::default().http);
    }

    #[test]
    fn test_init_yaml_uses_plain_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".recast.yaml");

        let mut output = OutputWriter::new(crate::cli::OutputFormat::Json, false, true);
        handle_config_init(
            ConfigInitArgs {
                path: Some(path.clone()),
                force: false,
            },
            &mut output,
        )
        .unwrap();

        assert_eq!(Config::from_file(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_init_keeps_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "default_preset = \"mine\"\n").unwrap();

        let mut output = OutputWriter::new(crate::cli::OutputFormat::Json, false, true);
        handle_config_init(
            ConfigInitArgs {
                path: Some(path.clone()),
                force: false,
            },
            &mut output,
        )
        .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "default_preset = \"mine\"\n");
    }
}

//! Convert command handler

use crate::cli::ConvertArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use recast_core::models::is_known_model;
use recast_core::{CancellationToken, Converter, HttpClient, TransformResult};
use std::fs;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::utils::{open_store, read_input};

/// Handle the convert command
#[instrument(skip_all, fields(preset = args.preset.as_deref().unwrap_or("<selected>")))]
pub async fn handle_convert(
    args: ConvertArgs,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    let timer = Timer::new("convert_command");

    let input = read_input(&args.input)?;
    if input.is_empty() {
        return Err(Error::MissingInput);
    }

    let store = open_store(config)?;
    let preset = store
        .resolve(args.preset.as_deref(), config.default_preset.as_deref())?
        .clone();

    if !is_known_model(preset.provider, &preset.model) {
        warn!(provider = %preset.provider, model = %preset.model, "Model is not in the known list");
    }

    let mut http_config = config.http_client_config()?;
    if let Some(seconds) = args.timeout {
        http_config.timeout = http_config
            .timeout
            .with_request_timeout(Duration::from_secs(seconds));
        http_config.timeout.validate().map_err(Error::config)?;
    }

    let converter = Converter::new(HttpClient::new(http_config)?);
    let credentials = config.key_store();

    // Ctrl-C cancels the in-flight request
    let token = CancellationToken::new();
    let interrupt = {
        let token = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                token.cancel();
            }
        })
    };

    let progress = output.spinner(&format!("Converting with '{}' ({})...", preset.name, preset.model));
    info!(provider = %preset.provider, model = %preset.model, "Converting input");

    let result = converter
        .convert_with_cancel(&preset, &input, &credentials, &token)
        .await;

    interrupt.abort();
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }
    debug!(elapsed_ms = timer.elapsed().as_millis() as u64, ok = result.is_ok(), "Conversion finished");

    match &result {
        TransformResult::Success { text } => {
            if let Some(path) = &args.save_to {
                fs::write(path, text)?;
                output.success(&format!("✓ Output saved to {}", path.display()))?;
            } else {
                output.result(&result)?;
            }
            Ok(())
        }
        TransformResult::Failure { kind, message } => {
            if !output.is_human() {
                output.result(&result)?;
            }
            Err(Error::Conversion {
                kind: *kind,
                message: message.clone(),
            })
        }
    }
}

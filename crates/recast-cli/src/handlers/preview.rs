//! Preview command handler
//!
//! Compiles the preset and projects the provider request exactly as
//! `convert` would, then prints it instead of sending it. Secrets are
//! redacted from the URL and headers.

use crate::cli::PreviewArgs;
use crate::config::Config;
use crate::error::Result;
use crate::logging::redaction;
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use recast_core::{
    Converter, Credential, CredentialSource, HttpClient, Preset, ProviderRequest, TransformSpec,
};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info, instrument};

use super::utils::{open_store, read_input};

/// Stand-in input when none is given
const PLACEHOLDER_INPUT: &str = "<input text>";

/// Everything `convert` would send, with secrets removed
#[derive(Debug, Serialize)]
pub struct PreviewReport {
    pub preset: String,
    pub provider: String,
    pub model: String,
    pub credential_configured: bool,
    pub spec: TransformSpec,
    pub url: String,
    pub headers: Value,
    pub body: Value,
}

impl PreviewReport {
    fn new(preset: &Preset, spec: TransformSpec, request: &ProviderRequest, configured: bool) -> Self {
        let mut headers = Value::Object(
            request
                .headers
                .iter()
                .map(|(name, value)| (name.to_string(), Value::String(value.clone())))
                .collect::<Map<String, Value>>(),
        );
        redaction::redact_json_value(&mut headers);

        Self {
            preset: preset.name.clone(),
            provider: preset.provider.to_string(),
            model: preset.model.clone(),
            credential_configured: configured,
            spec,
            url: redaction::redact_sensitive(request.url.as_str()),
            headers,
            body: request.body.clone(),
        }
    }
}

/// Handle the preview command
#[instrument(skip_all, fields(preset = args.preset.as_deref().unwrap_or("<selected>")))]
pub async fn handle_preview(
    args: PreviewArgs,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    let _timer = Timer::new("preview_command");

    let input = read_input(&args.input)?;
    let input = if input.is_empty() {
        PLACEHOLDER_INPUT.to_string()
    } else {
        input
    };

    let store = open_store(config)?;
    let preset = store.resolve(args.preset.as_deref(), config.default_preset.as_deref())?;

    let credentials = config.key_store();
    let (credential, configured) = match credentials.credential(preset.provider) {
        Ok(credential) => (credential, true),
        Err(_) => (Credential::new("<missing>"), false),
    };

    let converter = Converter::new(HttpClient::new(config.http_client_config()?)?);
    let (spec, request) = converter.prepare(preset, &input, &credential);
    info!(mode = %spec.mode, format = %spec.output_format, "Prepared preview");

    let report = PreviewReport::new(preset, spec, &request, configured);
    if output.is_human() {
        write_human(output, &report)?;
    } else {
        output.data(&report)?;
    }

    Ok(())
}

fn write_human(output: &mut OutputWriter, report: &PreviewReport) -> Result<()> {
    output.section("Preset")?;
    output.table(
        &["FIELD", "VALUE"],
        vec![
            row("name", &report.preset),
            row("provider", &report.provider),
            row("model", &report.model),
            row("mode", &report.spec.mode),
            row("format", &report.spec.output_format.to_string()),
            row("language", &report.spec.output_language.to_string()),
            row("temperature", &report.spec.generation.temperature.to_string()),
            row("max tokens", &report.spec.generation.max_tokens.to_string()),
        ],
    )?;

    if !report.credential_configured {
        output.warning(&format!(
            "ERROR: API key not set for provider: {}",
            report.provider
        ))?;
    }

    output.section("Instruction")?;
    output.writeln(&report.spec.instruction)?;

    output.section("Request")?;
    output.writeln(&format!("POST {}", report.url))?;
    if let Value::Object(headers) = &report.headers {
        for (name, value) in headers {
            output.writeln(&format!("{}: {}", name, value.as_str().unwrap_or_default()))?;
        }
    }
    output.writeln("")?;
    output.writeln(&serde_json::to_string_pretty(&report.body)?)?;

    Ok(())
}

fn row(field: &str, value: &str) -> Vec<String> {
    vec![field.to_string(), value.to_string()]
}

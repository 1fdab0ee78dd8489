//! Preset management handlers

use crate::cli::{PresetAction, PresetArgs, PresetFieldArgs};
use crate::config::Config;
use crate::error::Result;
use crate::output::OutputWriter;
use crate::store::PresetStore;
use chrono::Utc;
use recast_core::compiler::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use recast_core::models::{default_model, is_known_model};
use recast_core::modes::{self, DEFAULT_MODE};
use recast_core::{Language, Preset, PresetDraft, Provider};
use tracing::{debug, info};

use super::utils::open_store;

/// Handle the preset command
pub async fn handle_preset(
    args: PresetArgs,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    let mut store = open_store(config)?;
    debug!(path = %store.path().display(), presets = store.list().len(), "Opened preset store");

    match args.action {
        PresetAction::List => list(&store, output),
        PresetAction::Show { preset } => {
            let preset = store.get(&preset)?;
            show(preset, output)
        }
        PresetAction::Add(fields) => {
            let draft = new_draft(fields);
            warn_unknown(&draft, output)?;
            let preset = store.add(draft, Utc::now()).clone();
            store.save()?;
            info!(id = %preset.id, name = %preset.name, "Preset added");
            output.success(&format!("✓ Saved preset '{}' ({}) and selected it", preset.name, preset.id))?;
            emit_machine(&preset, output)
        }
        PresetAction::Overwrite { preset, fields } => {
            let draft = apply_fields(store.get(&preset)?.draft(), fields);
            warn_unknown(&draft, output)?;
            let updated = store.overwrite(&preset, draft, Utc::now())?.clone();
            store.save()?;
            info!(id = %updated.id, name = %updated.name, "Preset overwritten");
            output.success(&format!("✓ Overwrote preset '{}'", updated.name))?;
            emit_machine(&updated, output)
        }
        PresetAction::Delete { preset } => {
            let removed = store.delete(&preset)?;
            store.save()?;
            info!(id = %removed.id, name = %removed.name, "Preset deleted");
            output.success(&format!("✓ Deleted preset '{}'", removed.name))?;
            emit_machine(&removed, output)
        }
        PresetAction::Select { preset } => {
            let selected = store.select(&preset)?.clone();
            store.save()?;
            output.success(&format!("✓ Selected preset '{}'", selected.name))?;
            emit_machine(&selected, output)
        }
    }
}

fn list(store: &PresetStore, output: &mut OutputWriter) -> Result<()> {
    if !output.is_human() {
        return output.data(&store.list());
    }

    if store.list().is_empty() {
        output.info("No presets saved. Create one with `recast preset add --name <NAME>`")?;
        return Ok(());
    }

    let selected = store.selected().map(|p| p.id);
    let rows = store
        .list()
        .iter()
        .map(|p| {
            vec![
                if Some(p.id) == selected { "*" } else { "" }.to_string(),
                p.name.clone(),
                p.provider.to_string(),
                p.model.clone(),
                p.transform_mode.clone().unwrap_or_else(|| DEFAULT_MODE.to_string()),
                p.language.unwrap_or_default().to_string(),
            ]
        })
        .collect();

    output.table(&["", "NAME", "PROVIDER", "MODEL", "MODE", "LANG"], rows)
}

fn show(preset: &Preset, output: &mut OutputWriter) -> Result<()> {
    if !output.is_human() {
        return output.data(preset);
    }

    let optional = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());
    output.table(
        &["FIELD", "VALUE"],
        vec![
            vec!["id".to_string(), preset.id.to_string()],
            vec!["name".to_string(), preset.name.clone()],
            vec!["provider".to_string(), preset.provider.to_string()],
            vec!["model".to_string(), preset.model.clone()],
            vec!["mode".to_string(), optional(preset.transform_mode.clone())],
            vec!["language".to_string(), optional(preset.language.map(|l| l.to_string()))],
            vec!["temperature".to_string(), optional(preset.temperature.map(|t| t.to_string()))],
            vec!["max tokens".to_string(), optional(preset.max_tokens.map(|t| t.to_string()))],
            vec!["created".to_string(), preset.created_at.to_rfc3339()],
            vec!["updated".to_string(), preset.updated_at.to_rfc3339()],
        ],
    )
}

/// Machine formats get the affected preset as data
fn emit_machine(preset: &Preset, output: &mut OutputWriter) -> Result<()> {
    if output.is_human() {
        Ok(())
    } else {
        output.data(preset)
    }
}

fn warn_unknown(draft: &PresetDraft, output: &mut OutputWriter) -> Result<()> {
    if !is_known_model(draft.provider, &draft.model) {
        output.warning(&format!(
            "Model '{}' is not a known {} model; it will be sent as-is",
            draft.model, draft.provider
        ))?;
    }
    if let Some(mode) = &draft.transform_mode {
        if !modes::is_known(mode) {
            output.warning(&format!(
                "Mode '{}' is not in the catalog; it will be used literally as the instruction",
                mode
            ))?;
        }
    }
    Ok(())
}

/// A draft from the given fields and the form defaults
pub(crate) fn new_draft(fields: PresetFieldArgs) -> PresetDraft {
    let provider = fields.provider.unwrap_or(Provider::Anthropic);
    let base = PresetDraft::new(
        fields.name.clone().unwrap_or_default(),
        provider,
        default_model(provider),
    )
    .with_mode(DEFAULT_MODE)
    .with_language(Language::Ja)
    .with_temperature(DEFAULT_TEMPERATURE)
    .with_max_tokens(DEFAULT_MAX_TOKENS);

    apply_fields(base, fields)
}

/// Overlay the given fields onto `draft`
///
/// Switching provider without naming a model moves to the new provider's
/// default model unless the current one is also valid there.
pub(crate) fn apply_fields(mut draft: PresetDraft, fields: PresetFieldArgs) -> PresetDraft {
    if let Some(name) = fields.name {
        draft.name = name;
    }
    if let Some(provider) = fields.provider {
        if provider != draft.provider
            && fields.model.is_none()
            && !is_known_model(provider, &draft.model)
        {
            draft.model = default_model(provider).to_string();
        }
        draft.provider = provider;
    }
    if let Some(model) = fields.model {
        draft.model = model;
    }
    if let Some(mode) = fields.transform_mode {
        draft.transform_mode = Some(mode);
    }
    if let Some(language) = fields.language {
        draft.language = Some(language.into());
    }
    if let Some(temperature) = fields.temperature {
        draft.temperature = Some(temperature);
    }
    if let Some(max_tokens) = fields.max_tokens {
        draft.max_tokens = Some(max_tokens);
    }
    draft
}

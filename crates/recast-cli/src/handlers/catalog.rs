//! Mode and model catalog listings

use crate::cli::ModelsArgs;
use crate::error::Result;
use crate::output::OutputWriter;
use recast_core::models::{default_model, known_models};
use recast_core::{modes, OutputFormat, Provider};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Serialize)]
struct ModeRow {
    id: &'static str,
    output_format: OutputFormat,
    instruction: &'static str,
}

/// Handle the modes command
pub fn handle_modes(output: &mut OutputWriter) -> Result<()> {
    let rows: Vec<ModeRow> = modes::all()
        .iter()
        .map(|entry| ModeRow {
            id: entry.id,
            output_format: entry.output_format,
            instruction: entry.instruction,
        })
        .collect();

    if !output.is_human() {
        return output.data(&rows);
    }

    output.table(
        &["ID", "FORMAT", "INSTRUCTION"],
        rows.iter()
            .map(|row| {
                vec![
                    row.id.to_string(),
                    row.output_format.to_string(),
                    row.instruction.to_string(),
                ]
            })
            .collect(),
    )
}

/// Handle the models command
pub fn handle_models(args: ModelsArgs, output: &mut OutputWriter) -> Result<()> {
    let providers: Vec<Provider> = match args.provider {
        Some(provider) => vec![provider],
        None => Provider::ALL.to_vec(),
    };

    if !output.is_human() {
        let listing: BTreeMap<&str, &[&str]> = providers
            .iter()
            .map(|provider| (provider.as_str(), known_models(*provider)))
            .collect();
        return output.data(&listing);
    }

    let mut rows = Vec::new();
    for provider in providers {
        let default = default_model(provider);
        for model in known_models(provider) {
            rows.push(vec![
                provider.to_string(),
                model.to_string(),
                if *model == default { "*" } else { "" }.to_string(),
            ]);
        }
    }

    output.table(&["PROVIDER", "MODEL", "DEFAULT"], rows)
}

//! Preset to [`TransformSpec`] compilation
//!
//! Compilation is a pure, deterministic mapping. It never fails and never
//! performs I/O: unknown modes degrade to literal passthrough and out-of-range
//! temperatures are clamped rather than rejected.

use crate::modes::{self, DEFAULT_MODE};
use crate::types::{GenerationParams, Language, OutputFormat, Preset, TransformSpec};

pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

const ROLE_FRAMING: &str = "非人格的変換器として機能する。";
const PRIMARY_LANGUAGE_DIRECTIVE: &str = "出力は日本語で行う。";
const SECONDARY_LANGUAGE_DIRECTIVE: &str = "Output in English.";
const PROHIBITIONS: &str = "禁止: 一人称・評価語・感情語・末尾質問・対話継続誘導・共感表現。";
const PRINCIPLES: &str = "原則: 入力の意味領域を超えない。新規主張を追加しない。出力のみを返す。";

/// Appended last when the mode declares JSON output
pub const JSON_ONLY_DIRECTIVE: &str =
    "出力は厳密に有効なJSONのみとする。コードフェンス・説明文・前置きを含めない。";

/// Compile a preset into a provider-agnostic transform spec
pub fn compile(preset: &Preset) -> TransformSpec {
    let mode = preset
        .transform_mode
        .as_deref()
        .filter(|m| !m.trim().is_empty())
        .unwrap_or(DEFAULT_MODE);
    let definition = modes::lookup(mode);
    let language = preset.language.unwrap_or_default();

    let instruction = compose_instruction(
        mode,
        &definition.instruction,
        language,
        definition.output_format,
    );

    TransformSpec {
        mode: mode.to_string(),
        instruction,
        output_language: language,
        output_format: definition.output_format,
        generation: GenerationParams {
            temperature: resolve_temperature(preset.temperature),
            max_tokens: resolve_max_tokens(preset.max_tokens),
        },
    }
}

/// Build the system-level directive from its fixed segments
pub fn compose_instruction(
    mode: &str,
    fragment: &str,
    language: Language,
    format: OutputFormat,
) -> String {
    let mode_line = format!("transform_mode: {}", mode);
    let fragment_line = if fragment.trim().is_empty() {
        String::new()
    } else {
        format!("instruction: {}を実行する。", fragment)
    };
    let json_line = match format {
        OutputFormat::Json => JSON_ONLY_DIRECTIVE,
        OutputFormat::Text => "",
    };

    let segments = [
        ROLE_FRAMING,
        mode_line.as_str(),
        fragment_line.as_str(),
        language_directive(language),
        PROHIBITIONS,
        PRINCIPLES,
        json_line,
    ];

    segments
        .iter()
        .filter(|segment| !segment.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("\n")
}

fn language_directive(language: Language) -> &'static str {
    match language {
        Language::Ja => PRIMARY_LANGUAGE_DIRECTIVE,
        Language::En => SECONDARY_LANGUAGE_DIRECTIVE,
    }
}

fn resolve_temperature(temperature: Option<f64>) -> f64 {
    match temperature {
        Some(t) if t.is_finite() => t.clamp(0.0, 1.0),
        _ => DEFAULT_TEMPERATURE,
    }
}

fn resolve_max_tokens(max_tokens: Option<u32>) -> u32 {
    match max_tokens {
        Some(n) if n > 0 => n,
        _ => DEFAULT_MAX_TOKENS,
    }
}

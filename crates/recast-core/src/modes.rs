//! Transform mode catalog
//!
//! Static, read-only mapping from a mode identifier to the instruction
//! fragment it contributes and the output format it declares. Lookup is total:
//! an unknown identifier is passed through as its own instruction.

use crate::types::OutputFormat;
use std::borrow::Cow;

/// Mode used when a preset does not name one
pub const DEFAULT_MODE: &str = "bulletize";

/// Instruction fragment and declared output format of one mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeDefinition {
    pub instruction: Cow<'static, str>,
    pub output_format: OutputFormat,
}

/// One catalog row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeEntry {
    pub id: &'static str,
    pub instruction: &'static str,
    pub output_format: OutputFormat,
}

const fn text(id: &'static str, instruction: &'static str) -> ModeEntry {
    ModeEntry {
        id,
        instruction,
        output_format: OutputFormat::Text,
    }
}

const fn json(id: &'static str, instruction: &'static str) -> ModeEntry {
    ModeEntry {
        id,
        instruction,
        output_format: OutputFormat::Json,
    }
}

static CATALOG: &[ModeEntry] = &[
    text("summarize", "主要な情報のみを抽出し、短縮して出力する"),
    text("expand", "各要素を詳細に展開して出力する"),
    text("outline", "階層的なアウトライン構造として出力する"),
    text("bulletize", "箇条書き形式として出力する（評価語なし）"),
    text("compress", "最小の語数で意味を保持して出力する"),
    text("formalize", "形式的・公式な文体に変換して出力する"),
    text("simplify", "平易な語彙と構造に変換して出力する"),
    text("abstract", "具体的な詳細を除去し、抽象的な記述として出力する"),
    text("extract_claims", "明示的・暗示的な主張のみを列挙する"),
    text("extract_assumptions", "前提として置かれている事柄を列挙する"),
    text("extract_structure", "論理構造・関係性を記述する"),
    text("remove_evaluation", "評価語・感情語を除去し、事実記述のみを残す"),
    text("neutralize", "立場・価値判断を除去し、中立的な記述に変換する"),
    text("invert", "論旨・立場を反転して出力する"),
    json("json", "JSON形式として出力する"),
    text("yaml", "YAML形式として出力する"),
    text("table", "テーブル形式（マークダウン）として出力する"),
    text("pseudo_code", "疑似コード形式として出力する"),
    text("markdown", "マークダウン形式として出力する"),
    text("translate", "入力テキストを指定言語に翻訳する。意味・ニュアンスを保持する。"),
];

/// Resolve a mode identifier
pub fn lookup(mode_id: &str) -> ModeDefinition {
    match find(mode_id) {
        Some(entry) => ModeDefinition {
            instruction: Cow::Borrowed(entry.instruction),
            output_format: entry.output_format,
        },
        None => ModeDefinition {
            instruction: Cow::Owned(mode_id.to_string()),
            output_format: OutputFormat::Text,
        },
    }
}

/// Catalog row for a known mode
pub fn find(mode_id: &str) -> Option<&'static ModeEntry> {
    CATALOG.iter().find(|entry| entry.id == mode_id)
}

/// Every known mode, in catalog order
pub fn all() -> &'static [ModeEntry] {
    CATALOG
}

pub fn is_known(mode_id: &str) -> bool {
    find(mode_id).is_some()
}

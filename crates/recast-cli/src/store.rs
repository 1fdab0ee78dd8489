//! Persistent preset store
//!
//! Presets and the current selection live in one JSON document:
//! `{"selected": "<id>", "presets": [...]}`. The store is loaded once per
//! command and written back after every mutation.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use recast_core::{Preset, PresetDraft};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct StoreData {
    #[serde(skip_serializing_if = "Option::is_none")]
    selected: Option<Uuid>,
    presets: Vec<Preset>,
}

/// Presets backed by a JSON file
#[derive(Debug)]
pub struct PresetStore {
    path: PathBuf,
    data: StoreData,
}

impl PresetStore {
    /// Open the store at `path`; a missing file is an empty store
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                StoreData::default()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            StoreData::default()
        };

        debug!(path = %path.display(), presets = data.presets.len(), "Opened preset store");
        Ok(Self { path, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the store back to disk
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(&self.data)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    /// Presets in creation order
    pub fn list(&self) -> &[Preset] {
        &self.data.presets
    }

    /// Find a preset by id, then by name
    pub fn find(&self, key: &str) -> Option<&Preset> {
        let key = key.trim();
        if let Ok(id) = Uuid::parse_str(key) {
            if let Some(preset) = self.data.presets.iter().find(|p| p.id == id) {
                return Some(preset);
            }
        }
        self.data.presets.iter().find(|p| p.name == key)
    }

    /// Like [`find`](Self::find), failing with `PresetNotFound`
    pub fn get(&self, key: &str) -> Result<&Preset> {
        self.find(key).ok_or_else(|| Error::PresetNotFound {
            key: key.to_string(),
        })
    }

    /// The selected preset, if it still exists
    pub fn selected(&self) -> Option<&Preset> {
        let id = self.data.selected?;
        self.data.presets.iter().find(|p| p.id == id)
    }

    /// Resolve the preset a command should use
    ///
    /// An explicit key wins, then the stored selection, then `fallback`.
    pub fn resolve(&self, key: Option<&str>, fallback: Option<&str>) -> Result<&Preset> {
        if let Some(key) = key {
            return self.get(key);
        }
        if let Some(preset) = self.selected() {
            return Ok(preset);
        }
        match fallback {
            Some(key) => self.get(key),
            None => Err(Error::NoPresetSelected),
        }
    }

    /// Save a new preset and select it
    pub fn add(&mut self, draft: PresetDraft, now: DateTime<Utc>) -> &Preset {
        let preset = Preset::create(draft, now);
        self.data.selected = Some(preset.id);
        self.data.presets.push(preset);
        &self.data.presets[self.data.presets.len() - 1]
    }

    /// Replace the editable fields of an existing preset
    pub fn overwrite(&mut self, key: &str, draft: PresetDraft, now: DateTime<Utc>) -> Result<&Preset> {
        let index = self.index_of(key)?;
        let preset = &mut self.data.presets[index];
        preset.overwrite(draft, now);
        Ok(&*preset)
    }

    /// Remove a preset, clearing the selection if it pointed there
    pub fn delete(&mut self, key: &str) -> Result<Preset> {
        let index = self.index_of(key)?;
        let removed = self.data.presets.remove(index);
        if self.data.selected == Some(removed.id) {
            self.data.selected = None;
        }
        Ok(removed)
    }

    pub fn select(&mut self, key: &str) -> Result<&Preset> {
        let index = self.index_of(key)?;
        self.data.selected = Some(self.data.presets[index].id);
        Ok(&self.data.presets[index])
    }

    fn index_of(&self, key: &str) -> Result<usize> {
        let id = self.get(key)?.id;
        self.data
            .presets
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| Error::PresetNotFound {
                key: key.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use recast_core::{Language, Provider};
    use tempfile::TempDir;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, hour, 0, 0).unwrap()
    }

    fn draft(name: &str) -> PresetDraft {
        PresetDraft::new(name, Provider::OpenAi, "gpt-4o").with_mode("summarize")
    }

    fn temp_store() -> (TempDir, PresetStore) {
        let dir = TempDir::new().unwrap();
        let store = PresetStore::open(dir.path().join("presets.json")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_missing_file_is_empty() {
        let (_dir, store) = temp_store();
        assert!(store.list().is_empty());
        assert!(store.selected().is_none());
        assert!(matches!(store.resolve(None, None), Err(Error::NoPresetSelected)));
    }

    #[test]
    fn test_add_selects_and_persists() {
        let (dir, mut store) = temp_store();
        let id = store.add(draft("summary"), at(1)).id;
        store.save().unwrap();

        let reopened = PresetStore::open(dir.path().join("presets.json")).unwrap();
        assert_eq!(reopened.list().len(), 1);
        assert_eq!(reopened.selected().map(|p| p.id), Some(id));
        assert_eq!(reopened.list()[0].transform_mode.as_deref(), Some("summarize"));
    }

    #[test]
    fn test_find_by_id_or_name() {
        let (_dir, mut store) = temp_store();
        let id = store.add(draft("summary"), at(1)).id;
        store.add(draft("outline"), at(2));

        assert_eq!(store.find("summary").map(|p| p.id), Some(id));
        assert_eq!(store.find(&id.to_string()).map(|p| p.id), Some(id));
        assert!(store.find("missing").is_none());
        assert!(matches!(
            store.get("missing"),
            Err(Error::PresetNotFound { .. })
        ));
    }

    #[test]
    fn test_overwrite_keeps_identity() {
        let (_dir, mut store) = temp_store();
        let original = store.add(draft("summary"), at(1)).clone();

        let updated = store
            .overwrite(
                "summary",
                PresetDraft::new("summary-en", Provider::Anthropic, "claude-opus-4-5")
                    .with_language(Language::En),
                at(5),
            )
            .unwrap()
            .clone();

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.created_at, original.created_at);
        assert_eq!(updated.updated_at, at(5));
        assert_eq!(updated.name, "summary-en");
        assert_eq!(updated.provider, Provider::Anthropic);
        assert_eq!(updated.transform_mode, None);
    }

    #[test]
    fn test_delete_clears_selection() {
        let (_dir, mut store) = temp_store();
        store.add(draft("first"), at(1));
        store.add(draft("second"), at(2));
        store.select("first").unwrap();

        store.delete("second").unwrap();
        assert_eq!(store.selected().map(|p| p.name.as_str()), Some("first"));

        store.delete("first").unwrap();
        assert!(store.selected().is_none());
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_resolve_order() {
        let (_dir, mut store) = temp_store();
        store.add(draft("fallback"), at(1));
        store.add(draft("chosen"), at(2));
        store.add(draft("explicit"), at(3));
        store.select("chosen").unwrap();

        assert_eq!(store.resolve(Some("explicit"), Some("fallback")).unwrap().name, "explicit");
        assert_eq!(store.resolve(None, Some("fallback")).unwrap().name, "chosen");

        store.delete("chosen").unwrap();
        assert_eq!(store.resolve(None, Some("fallback")).unwrap().name, "fallback");
        assert!(matches!(store.resolve(None, None), Err(Error::NoPresetSelected)));
    }

    #[test]
    fn test_unknown_provider_in_file_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("presets.json");
        std::fs::write(
            &path,
            r#"{"presets": [{
                "id": "5b1f4a3e-2c4d-4e8f-9a0b-1c2d3e4f5a6b",
                "name": "x", "provider": "mistral", "model": "m",
                "createdAt": "2025-01-01T00:00:00Z", "updatedAt": "2025-01-01T00:00:00Z"
            }]}"#,
        )
        .unwrap();

        let err = PresetStore::open(&path).unwrap_err();
        assert!(err.to_string().contains("unsupported provider: mistral"));
    }
}

use serde::{Deserialize, Serialize};

use crate::{
    foundation::error::VerseCardResult,
    settings::model::Settings,
    storage::kv::{KeyValueStore, keys, load_json, save_json},
};

/// A named snapshot of [`Settings`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    /// Time-based identifier, unique within the collection.
    pub id: String,
    /// Trimmed, non-empty display name.
    pub name: String,
    /// Full settings copy taken at save time.
    pub settings: Settings,
    /// RFC 3339 creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// In-memory preset list kept write-through with a [`KeyValueStore`].
///
/// Every mutation serializes the whole list before it is committed in memory, so the cache never
/// runs ahead of storage.
#[derive(Clone, Debug, Default)]
pub struct PresetStore {
    presets: Vec<Preset>,
}

impl PresetStore {
    /// Load the persisted list; missing or corrupt data yields an empty store.
    pub fn load_all(kv: &dyn KeyValueStore) -> Self {
        let presets: Vec<Preset> = load_json(kv, keys::PRESETS).unwrap_or_default();
        tracing::debug!(count = presets.len(), "presets loaded");
        Self { presets }
    }

    /// Presets in insertion order.
    pub fn list(&self) -> &[Preset] {
        &self.presets
    }

    /// Lookup by identifier.
    pub fn get(&self, id: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.id == id)
    }

    /// First preset whose name equals `name` after trimming.
    pub fn find_by_name(&self, name: &str) -> Option<&Preset> {
        let name = name.trim();
        self.presets.iter().find(|p| p.name == name)
    }

    /// Save `snapshot` under `name`.
    ///
    /// Returns `Ok(None)` without touching anything when the trimmed name is empty.
    pub fn save(
        &mut self,
        kv: &mut dyn KeyValueStore,
        name: &str,
        snapshot: &Settings,
    ) -> VerseCardResult<Option<Preset>> {
        let now = chrono::Utc::now();
        self.save_at(kv, name, snapshot, now.timestamp_millis(), now.to_rfc3339())
    }

    fn save_at(
        &mut self,
        kv: &mut dyn KeyValueStore,
        name: &str,
        snapshot: &Settings,
        now_ms: i64,
        created_at: String,
    ) -> VerseCardResult<Option<Preset>> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }

        let preset = Preset {
            id: self.next_id(now_ms),
            name: name.to_string(),
            settings: snapshot.clone(),
            created_at: Some(created_at),
        };

        let mut next = self.presets.clone();
        next.push(preset.clone());
        self.commit(kv, next)?;
        tracing::debug!(id = %preset.id, name = %preset.name, "preset saved");
        Ok(Some(preset))
    }

    /// Owned copy of the preset's settings, ready to replace the live snapshot.
    pub fn apply(preset: &Preset) -> Settings {
        preset.settings.clone()
    }

    /// Remove the preset with `id`. Returns whether anything was removed.
    pub fn delete(&mut self, kv: &mut dyn KeyValueStore, id: &str) -> VerseCardResult<bool> {
        if !self.presets.iter().any(|p| p.id == id) {
            return Ok(false);
        }
        let next: Vec<Preset> = self.presets.iter().filter(|p| p.id != id).cloned().collect();
        self.commit(kv, next)?;
        tracing::debug!(id, "preset deleted");
        Ok(true)
    }

    fn commit(&mut self, kv: &mut dyn KeyValueStore, next: Vec<Preset>) -> VerseCardResult<()> {
        save_json(kv, keys::PRESETS, &next)?;
        self.presets = next;
        Ok(())
    }

    fn next_id(&self, now_ms: i64) -> String {
        let mut candidate = now_ms;
        loop {
            let id = candidate.to_string();
            if self.get(&id).is_none() {
                return id;
            }
            candidate += 1;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/presets/store.rs"]
mod tests;

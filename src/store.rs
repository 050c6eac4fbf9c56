use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Local};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::{HistoryEntry, Note, WeightedResult};

pub const HISTORY_KEY: &str = "ltpsHistory";
pub const NOTES_KEY: &str = "klu_quickNotes";
pub const HISTORY_LIMIT: usize = 50;
pub const NOTES_LIMIT: usize = 100;

/// Key-value persistence with last-write-wins semantics.
pub trait KeyValueStore {
    fn read(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn write(&mut self, key: &str, value: &str) -> anyhow::Result<()>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn open(dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create data directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for JsonFileStore {
    fn read(&self, key: &str) -> anyhow::Result<Option<String>> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("failed to read {}", path.display())),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        let path = self.path_for(key);
        std::fs::write(&path, value)
            .with_context(|| format!("failed to write {}", path.display()))?;
        debug!(path = %path.display(), bytes = value.len(), "wrote store entry");
        Ok(())
    }
}

/// Reads a JSON list. A value that no longer parses is logged and treated
/// as empty so the next write replaces it.
pub fn load_list<T: DeserializeOwned>(
    store: &impl KeyValueStore,
    key: &str,
) -> anyhow::Result<Vec<T>> {
    let Some(raw) = store.read(key)? else {
        return Ok(Vec::new());
    };
    match serde_json::from_str(&raw) {
        Ok(items) => Ok(items),
        Err(err) => {
            warn!(key, error = %err, "failed to parse stored list, starting empty");
            Ok(Vec::new())
        }
    }
}

pub fn save_list<T: Serialize>(
    store: &mut impl KeyValueStore,
    key: &str,
    items: &[T],
) -> anyhow::Result<()> {
    let raw = serde_json::to_string(items).context("failed to encode stored list")?;
    store.write(key, &raw)
}

/// Local date-time in the `M/D/YYYY, h:mm:ss AM` display form.
pub fn display_timestamp(at: DateTime<Local>) -> String {
    at.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

impl HistoryEntry {
    pub fn from_result(subject: &str, result: &WeightedResult, at: DateTime<Local>) -> Self {
        let subject = subject.trim();
        Self {
            subject_label: if subject.is_empty() {
                "Untitled".to_string()
            } else {
                subject.to_string()
            },
            percentage: result.percentage.clone(),
            timestamp_display: display_timestamp(at),
            components: result.components,
            status: result.status,
        }
    }
}

/// Weighted-calculation history, newest first, at most [`HISTORY_LIMIT`].
pub struct HistoryLog<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> HistoryLog<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn entries(&self) -> anyhow::Result<Vec<HistoryEntry>> {
        load_list(&self.store, HISTORY_KEY)
    }

    pub fn append(&mut self, entry: HistoryEntry) -> anyhow::Result<Vec<HistoryEntry>> {
        let mut entries = self.entries()?;
        entries.insert(0, entry);
        entries.truncate(HISTORY_LIMIT);
        save_list(&mut self.store, HISTORY_KEY, &entries)?;
        debug!(count = entries.len(), "appended history entry");
        Ok(entries)
    }

    pub fn record(
        &mut self,
        subject: &str,
        result: &WeightedResult,
    ) -> anyhow::Result<HistoryEntry> {
        let entry = HistoryEntry::from_result(subject, result, Local::now());
        self.append(entry.clone())?;
        Ok(entry)
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

/// Quick notes, newest first, at most [`NOTES_LIMIT`].
pub struct NoteBook<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> NoteBook<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn notes(&self) -> anyhow::Result<Vec<Note>> {
        load_list(&self.store, NOTES_KEY)
    }

    /// Returns `None` when the text is blank and nothing was saved.
    pub fn add(&mut self, text: &str) -> anyhow::Result<Option<Note>> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        let note = Note {
            id: Uuid::new_v4(),
            text: text.to_string(),
            date: display_timestamp(Local::now()),
        };
        let mut notes = self.notes()?;
        notes.insert(0, note.clone());
        notes.truncate(NOTES_LIMIT);
        save_list(&mut self.store, NOTES_KEY, &notes)?;
        Ok(Some(note))
    }

    /// Returns whether a note with `id` existed.
    pub fn delete(&mut self, id: Uuid) -> anyhow::Result<bool> {
        let mut notes = self.notes()?;
        let before = notes.len();
        notes.retain(|note| note.id != id);
        if notes.len() == before {
            return Ok(false);
        }
        save_list(&mut self.store, NOTES_KEY, &notes)?;
        Ok(true)
    }
}

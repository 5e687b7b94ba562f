//! JSON vocabulary files: the `{meta, cards}` bootstrap format.
//! Provides import/export of whole collections and a file-backed store.

use crate::database::VocabularyStore;
use crate::error::{Result, TrainerError};
use crate::models::{VocabularyCard, VocabularyData};
use chrono::Utc;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::info;

const DEFAULT_SET_ID: &str = "vocabulary";

/// Exports a collection to a pretty-printed JSON file at `path`.
pub fn export_json_to_path(data: &VocabularyData, path: impl AsRef<Path>) -> Result<()> {
    let json_string = serde_json::to_string_pretty(data)?;
    fs::write(path.as_ref(), json_string)?;
    info!(
        cards = data.cards.len(),
        path = %path.as_ref().display(),
        "exported vocabulary"
    );
    Ok(())
}

/// Imports a collection from a JSON file. Entries without an `sm2` block get
/// a fresh schedule.
pub fn import_json(path: impl AsRef<Path>) -> Result<VocabularyData> {
    let contents = fs::read_to_string(path.as_ref())?;
    let data: VocabularyData = serde_json::from_str(&contents)?;

    info!(
        set_id = %data.meta.set_id,
        cards = data.cards.len(),
        path = %path.as_ref().display(),
        "imported vocabulary"
    );
    Ok(data)
}

/// Keeps the whole collection in a single JSON file, rewritten on every save.
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Option<VocabularyData>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, cards: Vec<VocabularyCard>) -> Result<()> {
        let now = Utc::now();
        let data = match self.read()? {
            Some(mut existing) => {
                existing.meta.total_cards = cards.len();
                existing.meta.last_updated = Some(now);
                existing.cards = cards;
                existing
            }
            None => VocabularyData::new(DEFAULT_SET_ID, cards, now),
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&data)?)?;
        Ok(())
    }
}

impl VocabularyStore for JsonStore {
    /// A missing file is an empty collection.
    fn load_all(&self) -> Result<Vec<VocabularyCard>> {
        Ok(self.read()?.map(|data| data.cards).unwrap_or_default())
    }

    fn save_all(&mut self, cards: &[VocabularyCard]) -> Result<()> {
        self.write(cards.to_vec())
    }

    fn upsert(&mut self, card: &VocabularyCard) -> Result<()> {
        let mut cards = self.load_all()?;
        match cards.iter_mut().find(|c| c.id == card.id) {
            Some(existing) => *existing = card.clone(),
            None => cards.push(card.clone()),
        }
        self.write(cards)
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        let mut cards = self.load_all()?;
        let before = cards.len();
        cards.retain(|c| c.id != id);
        if cards.len() == before {
            return Err(TrainerError::NotFound(id.to_string()));
        }
        self.write(cards)
    }
}

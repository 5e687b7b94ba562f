//! The vocabulary collection held in memory, and its bootstrap file layout.
use super::{ScheduleState, VocabularyCard};
use crate::database::VocabularyStore;
use crate::error::{Result, TrainerError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Editable content of an entry. Scheduling data is never edited this way.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntryFields {
    pub term: String,
    pub translation: String,
    pub notes: Option<String>,
    pub tags: Vec<String>,
}

/// Container for all vocabulary entries, addressed by id.
#[derive(Clone, Debug, Default)]
pub struct VocabularySet {
    pub cards: Vec<VocabularyCard>,
}

impl VocabularySet {
    pub fn from_cards(cards: Vec<VocabularyCard>) -> Self {
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, id: &str) -> Result<&VocabularyCard> {
        self.cards
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| TrainerError::NotFound(id.to_string()))
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut VocabularyCard> {
        self.cards
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| TrainerError::NotFound(id.to_string()))
    }

    /// True when another entry already uses `term` or `translation`.
    pub fn is_duplicate(&self, term: &str, translation: &str, exclude_id: Option<&str>) -> bool {
        self.cards.iter().any(|c| {
            Some(c.id.as_str()) != exclude_id && (c.term == term || c.translation == translation)
        })
    }

    /// Adds a new entry with a fresh, never-scheduled state.
    pub fn add(&mut self, fields: EntryFields) -> Result<&VocabularyCard> {
        if self.is_duplicate(&fields.term, &fields.translation, None) {
            return Err(TrainerError::Duplicate(fields.term));
        }

        let mut card = VocabularyCard::new(fields.term, fields.translation).with_tags(fields.tags);
        card.notes = fields.notes;
        info!(id = %card.id, term = %card.term, "added vocabulary entry");

        self.cards.push(card);
        Ok(&self.cards[self.cards.len() - 1])
    }

    pub fn update(&mut self, id: &str, fields: EntryFields) -> Result<&VocabularyCard> {
        if self.is_duplicate(&fields.term, &fields.translation, Some(id)) {
            return Err(TrainerError::Duplicate(fields.term));
        }

        let card = self.get_mut(id)?;
        card.term = fields.term;
        card.translation = fields.translation;
        card.notes = fields.notes;
        card.tags = fields.tags;
        Ok(card)
    }

    pub fn update_schedule(&mut self, id: &str, sm2: ScheduleState) -> Result<&VocabularyCard> {
        let card = self.get_mut(id)?;
        card.sm2 = sm2;
        Ok(card)
    }

    pub fn remove(&mut self, id: &str) -> Result<VocabularyCard> {
        let index = self
            .cards
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| TrainerError::NotFound(id.to_string()))?;
        Ok(self.cards.remove(index))
    }
}

impl VocabularyStore for VocabularySet {
    fn load_all(&self) -> Result<Vec<VocabularyCard>> {
        Ok(self.cards.clone())
    }

    fn save_all(&mut self, cards: &[VocabularyCard]) -> Result<()> {
        self.cards = cards.to_vec();
        Ok(())
    }

    fn upsert(&mut self, card: &VocabularyCard) -> Result<()> {
        match self.cards.iter_mut().find(|c| c.id == card.id) {
            Some(existing) => *existing = card.clone(),
            None => self.cards.push(card.clone()),
        }
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        self.remove(id).map(|_| ())
    }
}

/// Metadata block of a vocabulary bootstrap file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyMeta {
    pub set_id: String,
    #[serde(rename = "total_cards")]
    pub total_cards: usize,
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sm2_enabled: bool,
    #[serde(default)]
    pub version: Option<String>,
}

/// A complete vocabulary file: metadata plus every entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VocabularyData {
    pub meta: VocabularyMeta,
    pub cards: Vec<VocabularyCard>,
}

impl VocabularyData {
    pub fn new(set_id: impl Into<String>, cards: Vec<VocabularyCard>, now: DateTime<Utc>) -> Self {
        Self {
            meta: VocabularyMeta {
                set_id: set_id.into(),
                total_cards: cards.len(),
                created: now,
                last_updated: Some(now),
                sm2_enabled: true,
                version: Some(FILE_VERSION.to_string()),
            },
            cards,
        }
    }
}

pub const FILE_VERSION: &str = "2.0";

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(term: &str, translation: &str) -> EntryFields {
        EntryFields {
            term: term.to_string(),
            translation: translation.to_string(),
            ..EntryFields::default()
        }
    }

    #[test]
    fn test_add_and_get() {
        let mut set = VocabularySet::default();
        let id = set.add(fields("casa", "Haus")).unwrap().id.clone();

        let card = set.get(&id).unwrap();
        assert_eq!(card.term, "casa");
        assert_eq!(card.sm2, ScheduleState::default());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_duplicates_rejected() {
        let mut set = VocabularySet::default();
        set.add(fields("casa", "Haus")).unwrap();

        assert!(matches!(set.add(fields("casa", "Heim")), Err(TrainerError::Duplicate(_))));
        assert!(matches!(set.add(fields("dimora", "Haus")), Err(TrainerError::Duplicate(_))));
        assert!(set.add(fields("cane", "Hund")).is_ok());
    }

    #[test]
    fn test_update_may_keep_own_fields() {
        let mut set = VocabularySet::default();
        let id = set.add(fields("casa", "Haus")).unwrap().id.clone();
        set.add(fields("cane", "Hund")).unwrap();

        let mut edit = fields("casa", "Haus");
        edit.notes = Some("feminine".into());
        assert_eq!(set.update(&id, edit).unwrap().notes.as_deref(), Some("feminine"));

        assert!(matches!(set.update(&id, fields("cane", "Haus")), Err(TrainerError::Duplicate(_))));
    }

    #[test]
    fn test_unknown_ids() {
        let mut set = VocabularySet::default();

        assert!(matches!(set.get("missing"), Err(TrainerError::NotFound(_))));
        assert!(matches!(set.remove("missing"), Err(TrainerError::NotFound(_))));
        assert!(matches!(
            set.update_schedule("missing", ScheduleState::default()),
            Err(TrainerError::NotFound(_))
        ));
        assert!(set.update("missing", fields("a", "b")).is_err());
    }

    #[test]
    fn test_store_upsert_and_delete() {
        let mut set = VocabularySet::default();
        let mut card = VocabularyCard::new("casa", "Haus").with_id("it-1");

        set.upsert(&card).unwrap();
        card.sm2.repetitions = 2;
        set.upsert(&card).unwrap();

        assert_eq!(set.len(), 1);
        assert_eq!(set.load_all().unwrap()[0].sm2.repetitions, 2);

        set.delete("it-1").unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_bootstrap_layout() {
        let json = r#"{
  "meta": {"setId": "it-basic-2024", "total_cards": 1, "created": "2024-01-01T00:00:00Z"},
  "cards": [{"id": "it-1", "term": "casa", "translation": "Haus"}]
}"#;

        let data: VocabularyData = serde_json::from_str(json).unwrap();
        assert_eq!(data.meta.set_id, "it-basic-2024");
        assert_eq!(data.meta.total_cards, 1);
        assert!(!data.meta.sm2_enabled);
        assert_eq!(data.cards[0].sm2, ScheduleState::default());
    }
}

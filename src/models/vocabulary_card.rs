//! A vocabulary entry: a term, its translation and the entry's schedule.
use super::ScheduleState;
use chrono::Utc;
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VocabularyCard {
    pub id: String,
    pub term: String,
    pub translation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Bootstrap files written before scheduling existed carry no `sm2` block.
    #[serde(default)]
    pub sm2: ScheduleState,
}

impl VocabularyCard {
    /// Creates an entry with a fresh id and a default (never scheduled) state.
    pub fn new(term: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            term: term.into(),
            translation: translation.into(),
            notes: None,
            tags: Vec::new(),
            sm2: ScheduleState::default(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_schedule(mut self, sm2: ScheduleState) -> Self {
        self.sm2 = sm2;
        self
    }
}

fn generate_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(|c| char::from(c).to_ascii_lowercase())
        .collect();
    format!("custom-{}-{}", Utc::now().timestamp_millis(), suffix)
}

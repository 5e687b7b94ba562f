//! Persistence for vocabulary entries.
//!
//! The scheduler never touches storage itself; hosts load entries through a
//! [`VocabularyStore`], run sessions over them and write every rated entry
//! back. Stores do not retry: a failed write is returned to the host, which
//! decides whether to try again or keep the update in memory only (and lose it
//! on exit).

pub mod db;

pub use db::Database;

use crate::error::Result;
use crate::models::VocabularyCard;

pub trait VocabularyStore {
    fn load_all(&self) -> Result<Vec<VocabularyCard>>;

    /// Replaces the whole stored collection.
    fn save_all(&mut self, cards: &[VocabularyCard]) -> Result<()>;

    /// Inserts the entry or overwrites the one with the same id.
    fn upsert(&mut self, card: &VocabularyCard) -> Result<()>;

    /// Removes an entry; unknown ids are `NotFound`.
    fn delete(&mut self, id: &str) -> Result<()>;
}

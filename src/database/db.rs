//! SQLite-backed vocabulary store.
//!
//! Handles database initialization, entry CRUD, SM-2 schedule storage and a
//! simulated "current date" that the host can advance to fast-forward reviews.

use super::VocabularyStore;
use crate::error::{Result, TrainerError};
use crate::models::{ScheduleState, VocabularyCard};
use chrono::{DateTime, Duration, Utc};
use rusqlite::{Connection, OptionalExtension, Row, Transaction, params};
use std::path::Path;
use tracing::{debug, info};

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (creating if needed) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        let db = Self { conn };
        db.init()?;
        debug!(path = %path.as_ref().display(), "opened vocabulary database");
        Ok(db)
    }

    pub fn in_memory() -> Result<Self> {
        let db = Self {
            conn: Connection::open_in_memory()?,
        };
        db.init()?;
        Ok(db)
    }

    /// Creates tables for entries, their SM-2 schedules and app state.
    /// Sets the current date to now if not already initialized.
    fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            "PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS vocabulary (
                id TEXT PRIMARY KEY,
                term TEXT NOT NULL,
                translation TEXT NOT NULL,
                notes TEXT,
                tags TEXT NOT NULL DEFAULT '[]',
                position INTEGER NOT NULL,
                UNIQUE(term)
            );

            CREATE TABLE IF NOT EXISTS schedule (
                card_id TEXT PRIMARY KEY,
                ease_factor REAL NOT NULL DEFAULT 2.5,
                interval INTEGER NOT NULL DEFAULT 1,
                repetitions INTEGER NOT NULL DEFAULT 0,
                next_review TEXT,
                last_review TEXT,
                quality INTEGER,
                FOREIGN KEY (card_id) REFERENCES vocabulary(id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS app_state (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;

        self.conn.execute(
            "INSERT OR IGNORE INTO app_state (key, value) VALUES ('current_date', ?1)",
            params![Utc::now().to_rfc3339()],
        )?;

        Ok(())
    }

    /// Retrieves the simulated current date.
    pub fn current_date(&self) -> Result<DateTime<Utc>> {
        let value: String = self.conn.query_row(
            "SELECT value FROM app_state WHERE key = 'current_date'",
            [],
            |row| row.get(0),
        )?;
        parse_timestamp(&value)
    }

    pub fn set_current_date(&self, date: DateTime<Utc>) -> Result<()> {
        self.conn.execute(
            "UPDATE app_state SET value = ?1 WHERE key = 'current_date'",
            params![date.to_rfc3339()],
        )?;
        Ok(())
    }

    /// Advances the current date by 24 hours and returns the new date.
    pub fn advance_day(&self) -> Result<DateTime<Utc>> {
        let next_day = self.current_date()? + Duration::days(1);
        self.set_current_date(next_day)?;
        info!(date = %next_day, "advanced current date");
        Ok(next_day)
    }

    pub fn get(&self, id: &str) -> Result<VocabularyCard> {
        self.conn
            .query_row(
                &format!("{SELECT_CARDS} WHERE v.id = ?1"),
                params![id],
                card_from_row,
            )
            .optional()?
            .ok_or_else(|| TrainerError::NotFound(id.to_string()))
    }

    pub fn count(&self) -> Result<usize> {
        let count: usize = self
            .conn
            .query_row("SELECT COUNT(*) FROM vocabulary", [], |row| row.get(0))?;
        Ok(count)
    }
}

const SELECT_CARDS: &str = "SELECT v.id, v.term, v.translation, v.notes, v.tags,
        s.ease_factor, s.interval, s.repetitions, s.next_review, s.last_review, s.quality
     FROM vocabulary v
     JOIN schedule s ON s.card_id = v.id";

fn card_from_row(row: &Row<'_>) -> rusqlite::Result<VocabularyCard> {
    let tags: String = row.get(4)?;
    let next_review: Option<String> = row.get(8)?;
    let last_review: Option<String> = row.get(9)?;

    Ok(VocabularyCard {
        id: row.get(0)?,
        term: row.get(1)?,
        translation: row.get(2)?,
        notes: row.get(3)?,
        tags: serde_json::from_str(&tags).map_err(|e| conversion_error(4, e))?,
        sm2: ScheduleState {
            ease_factor: row.get(5)?,
            interval: row.get(6)?,
            repetitions: row.get(7)?,
            next_review: next_review
                .map(|s| parse_rfc3339(&s))
                .transpose()
                .map_err(|e| conversion_error(8, e))?,
            last_review: last_review
                .map(|s| parse_rfc3339(&s))
                .transpose()
                .map_err(|e| conversion_error(9, e))?,
            quality: row.get(10)?,
        },
    })
}

fn conversion_error<E>(column: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(err))
}

fn parse_rfc3339(value: &str) -> std::result::Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).map(|d| d.with_timezone(&Utc))
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    parse_rfc3339(value).map_err(|e| TrainerError::Config(format!("bad stored date '{value}': {e}")))
}

/// Writes one entry and its schedule; `position` keeps load order stable.
fn write_card(tx: &Transaction<'_>, card: &VocabularyCard, position: usize) -> Result<()> {
    tx.execute(
        "INSERT INTO vocabulary (id, term, translation, notes, tags, position)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(id) DO UPDATE SET
            term = excluded.term,
            translation = excluded.translation,
            notes = excluded.notes,
            tags = excluded.tags",
        params![
            card.id,
            card.term,
            card.translation,
            card.notes,
            serde_json::to_string(&card.tags)?,
            position
        ],
    )?;

    let sm2 = &card.sm2;
    tx.execute(
        "INSERT INTO schedule (card_id, ease_factor, interval, repetitions, next_review, last_review, quality)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(card_id) DO UPDATE SET
            ease_factor = excluded.ease_factor,
            interval = excluded.interval,
            repetitions = excluded.repetitions,
            next_review = excluded.next_review,
            last_review = excluded.last_review,
            quality = excluded.quality",
        params![
            card.id,
            sm2.ease_factor,
            sm2.interval,
            sm2.repetitions,
            sm2.next_review.map(|d| d.to_rfc3339()),
            sm2.last_review.map(|d| d.to_rfc3339()),
            sm2.quality
        ],
    )?;

    Ok(())
}

impl VocabularyStore for Database {
    /// Loads every entry with its schedule, in insertion order.
    fn load_all(&self) -> Result<Vec<VocabularyCard>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_CARDS} ORDER BY v.position, v.id"))?;
        let cards = stmt
            .query_map([], card_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(cards)
    }

    fn save_all(&mut self, cards: &[VocabularyCard]) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM vocabulary", [])?;
        for (position, card) in cards.iter().enumerate() {
            write_card(&tx, card, position)?;
        }
        tx.commit()?;

        info!(count = cards.len(), "saved vocabulary");
        Ok(())
    }

    fn upsert(&mut self, card: &VocabularyCard) -> Result<()> {
        let tx = self.conn.transaction()?;
        let position: usize = tx.query_row(
            "SELECT COALESCE(MAX(position) + 1, 0) FROM vocabulary",
            [],
            |row| row.get(0),
        )?;
        write_card(&tx, card, position)?;
        tx.commit()?;

        debug!(id = %card.id, repetitions = card.sm2.repetitions, "saved entry");
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        let removed = self
            .conn
            .execute("DELETE FROM vocabulary WHERE id = ?1", params![id])?;
        if removed == 0 {
            return Err(TrainerError::NotFound(id.to_string()));
        }
        info!(id, "deleted entry");
        Ok(())
    }
}

//! Review loop for one study session.
//!
//! Every queued entry is first presented with its answer hidden, then revealed,
//! then rated 0-5. Each rating runs the SM-2 update and is written through the
//! [`VocabularyStore`] before the session moves on. Entries rated below 3 are
//! collected so the learner can retry them in a follow-up session.

use super::session::{DirectionSetting, QuizCard, assign_directions};
use super::sm2::{PASSING_QUALITY, compute_next_schedule_at};
use super::VocabularyCard;
use crate::database::VocabularyStore;
use crate::error::{Result, TrainerError};
use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::info;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Prompt of entry `i` shown, answer hidden.
    Presenting(usize),
    /// Answer of entry `i` shown, waiting for a rating.
    AnswerRevealed(usize),
    SessionComplete,
}

impl SessionState {
    fn name(self) -> &'static str {
        match self {
            Self::Presenting(_) => "presenting",
            Self::AnswerRevealed(_) => "answer revealed",
            Self::SessionComplete => "session complete",
        }
    }
}

/// A committed rating. `card` holds the entry as it was saved, with its
/// updated schedule.
#[derive(Clone, Debug, PartialEq)]
pub struct ReviewResult {
    pub card: VocabularyCard,
    pub quality: u8,
}

impl ReviewResult {
    pub fn is_correct(&self) -> bool {
        self.quality >= PASSING_QUALITY
    }
}

pub struct LearningSession {
    cards: Vec<QuizCard>,
    state: SessionState,
    results: Vec<ReviewResult>,
    streak: usize,
    max_streak: usize,
}

impl LearningSession {
    /// Starts a session over `cards`. An empty queue is complete from the start.
    pub fn new(cards: Vec<QuizCard>) -> Self {
        let state = if cards.is_empty() {
            SessionState::SessionComplete
        } else {
            SessionState::Presenting(0)
        };

        Self {
            cards,
            state,
            results: Vec::new(),
            streak: 0,
            max_streak: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn current_card(&self) -> Option<&QuizCard> {
        match self.state {
            SessionState::Presenting(i) | SessionState::AnswerRevealed(i) => self.cards.get(i),
            SessionState::SessionComplete => None,
        }
    }

    pub fn is_answer_shown(&self) -> bool {
        matches!(self.state, SessionState::AnswerRevealed(_))
    }

    pub fn is_completed(&self) -> bool {
        self.state == SessionState::SessionComplete
    }

    pub fn total_count(&self) -> usize {
        self.cards.len()
    }

    pub fn reveal_answer(&mut self) -> Result<()> {
        match self.state {
            SessionState::Presenting(i) => {
                self.state = SessionState::AnswerRevealed(i);
                Ok(())
            }
            other => Err(TrainerError::InvalidTransition {
                action: "reveal the answer",
                state: other.name(),
            }),
        }
    }

    /// Rates the revealed entry, persists its new schedule and advances.
    ///
    /// Nothing changes when the quality is invalid or the save fails; the
    /// session stays on the revealed entry so the host can retry or abort.
    pub fn rate<S: VocabularyStore + ?Sized>(
        &mut self,
        quality: u8,
        now: DateTime<Utc>,
        store: &mut S,
    ) -> Result<&ReviewResult> {
        let SessionState::AnswerRevealed(i) = self.state else {
            return Err(TrainerError::InvalidTransition {
                action: "rate",
                state: self.state.name(),
            });
        };

        let mut card = self.cards[i].card.clone();
        let mut sm2 = compute_next_schedule_at(&card.sm2, quality, now)?;
        sm2.quality = Some(quality);
        card.sm2 = sm2;

        store.upsert(&card)?;

        self.cards[i].card = card.clone();
        self.record(ReviewResult { card, quality });
        self.state = if i + 1 < self.cards.len() {
            SessionState::Presenting(i + 1)
        } else {
            info!(
                reviewed = self.results.len(),
                correct = self.correct_count(),
                "session complete"
            );
            SessionState::SessionComplete
        };

        Ok(&self.results[self.results.len() - 1])
    }

    fn record(&mut self, result: ReviewResult) {
        if result.is_correct() {
            self.streak += 1;
            self.max_streak = self.max_streak.max(self.streak);
        } else {
            self.streak = 0;
        }
        self.results.push(result);
    }

    /// Ends the session early. Only ratings already committed are returned;
    /// the entry on screen is left untouched.
    pub fn abort(mut self) -> Vec<ReviewResult> {
        if !self.is_completed() {
            info!(reviewed = self.results.len(), "session aborted");
        }
        self.state = SessionState::SessionComplete;
        self.results
    }

    pub fn results(&self) -> &[ReviewResult] {
        &self.results
    }

    pub fn correct_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_correct()).count()
    }

    /// Share of ratings at 3 or above; 0.0 before anything was rated.
    pub fn accuracy(&self) -> f64 {
        if self.results.is_empty() {
            0.0
        } else {
            self.correct_count() as f64 / self.results.len() as f64
        }
    }

    pub fn streak(&self) -> usize {
        self.streak
    }

    pub fn max_streak(&self) -> usize {
        self.max_streak
    }

    /// How many ratings of each quality 0-5 were given.
    pub fn quality_distribution(&self) -> [usize; 6] {
        let mut counts = [0; 6];
        for result in &self.results {
            counts[usize::from(result.quality)] += 1;
        }
        counts
    }

    /// Entries rated below 3, as they were saved.
    pub fn missed_cards(&self) -> Vec<VocabularyCard> {
        self.results
            .iter()
            .filter(|r| !r.is_correct())
            .map(|r| r.card.clone())
            .collect()
    }

    /// Builds a follow-up session over exactly the missed entries, with
    /// directions drawn again. Returns `None` unless this session is complete
    /// and something was missed.
    pub fn retry_missed<R: Rng + ?Sized>(
        &self,
        direction: DirectionSetting,
        rng: &mut R,
    ) -> Option<LearningSession> {
        if !self.is_completed() {
            return None;
        }
        let missed = self.missed_cards();
        if missed.is_empty() {
            return None;
        }
        Some(LearningSession::new(assign_directions(missed, direction, rng)))
    }

    pub fn phase_message(&self) -> String {
        match self.state {
            SessionState::Presenting(i) | SessionState::AnswerRevealed(i) => {
                format!("Card {} of {}", i + 1, self.total_count())
            }
            SessionState::SessionComplete => format!(
                "Done: {} of {} correct",
                self.correct_count(),
                self.results.len()
            ),
        }
    }
}

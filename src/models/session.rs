//! Selecting what to study: session modes, quiz directions and the session
//! queue builder.
use super::VocabularyCard;
use super::sm2::{get_due_items, sort_by_priority};
use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

pub const DEFAULT_WORDS_PER_QUIZ: usize = 10;

/// Which entries a session draws from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    /// Entries whose review time has come, most urgent first.
    Due,
    /// Entries never reviewed successfully.
    New,
    /// Entries with at least one successful review.
    Review,
    /// The whole collection, shuffled.
    Random,
}

impl FromStr for SessionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "due" => Ok(Self::Due),
            "new" => Ok(Self::New),
            "review" => Ok(Self::Review),
            "random" => Ok(Self::Random),
            other => Err(format!("unknown session mode '{other}'")),
        }
    }
}

/// The side of an entry shown as the prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardDirection {
    /// Term is asked, translation is the answer.
    Forward,
    /// Translation is asked, term is the answer.
    Reverse,
}

impl CardDirection {
    pub const ALL: [CardDirection; 2] = [CardDirection::Forward, CardDirection::Reverse];
}

/// Configured quiz direction: fixed, or drawn per entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectionSetting {
    #[default]
    Forward,
    Reverse,
    Random,
}

impl DirectionSetting {
    pub fn resolve<R: Rng + ?Sized>(self, rng: &mut R) -> CardDirection {
        match self {
            Self::Forward => CardDirection::Forward,
            Self::Reverse => CardDirection::Reverse,
            Self::Random => *CardDirection::ALL
                .choose(rng)
                .unwrap_or(&CardDirection::Forward),
        }
    }
}

impl FromStr for DirectionSetting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "forward" => Ok(Self::Forward),
            "reverse" => Ok(Self::Reverse),
            "random" => Ok(Self::Random),
            other => Err(format!("unknown quiz direction '{other}'")),
        }
    }
}

impl fmt::Display for DirectionSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Forward => "forward",
            Self::Reverse => "reverse",
            Self::Random => "random",
        };
        f.write_str(name)
    }
}

/// Quiz settings chosen by the learner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSettings {
    #[serde(default)]
    pub direction: DirectionSetting,
    #[serde(default = "default_words_per_quiz")]
    pub words_per_quiz: usize,
}

fn default_words_per_quiz() -> usize {
    DEFAULT_WORDS_PER_QUIZ
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            direction: DirectionSetting::default(),
            words_per_quiz: DEFAULT_WORDS_PER_QUIZ,
        }
    }
}

/// An entry queued for a session together with the direction it is asked in.
#[derive(Clone, Debug, PartialEq)]
pub struct QuizCard {
    pub card: VocabularyCard,
    pub direction: CardDirection,
}

impl QuizCard {
    pub fn prompt(&self) -> &str {
        match self.direction {
            CardDirection::Forward => &self.card.term,
            CardDirection::Reverse => &self.card.translation,
        }
    }

    pub fn answer(&self) -> &str {
        match self.direction {
            CardDirection::Forward => &self.card.translation,
            CardDirection::Reverse => &self.card.term,
        }
    }
}

/// Pairs each entry with a direction; a random setting draws independently
/// for every entry.
pub fn assign_directions<R: Rng + ?Sized>(
    cards: Vec<VocabularyCard>,
    direction: DirectionSetting,
    rng: &mut R,
) -> Vec<QuizCard> {
    cards
        .into_iter()
        .map(|card| QuizCard {
            card,
            direction: direction.resolve(rng),
        })
        .collect()
}

/// Builds the queue for one session: filters by `mode`, orders by priority
/// (or shuffles for [`SessionMode::Random`]) and keeps at most
/// `settings.words_per_quiz` entries. An empty result means there is nothing
/// to study.
pub fn build_session<R: Rng + ?Sized>(
    items: &[VocabularyCard],
    mode: SessionMode,
    settings: &QuizSettings,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<QuizCard> {
    let mut selected = match mode {
        SessionMode::Due => sort_by_priority(&get_due_items(items, now), now),
        SessionMode::New => {
            let fresh: Vec<_> = items.iter().filter(|c| c.sm2.is_new()).cloned().collect();
            sort_by_priority(&fresh, now)
        }
        SessionMode::Review => {
            let seen: Vec<_> = items.iter().filter(|c| !c.sm2.is_new()).cloned().collect();
            sort_by_priority(&seen, now)
        }
        SessionMode::Random => {
            let mut all = items.to_vec();
            all.shuffle(rng);
            all
        }
    };
    selected.truncate(settings.words_per_quiz);

    debug!(?mode, available = items.len(), queued = selected.len(), "built session");
    assign_directions(selected, settings.direction, rng)
}

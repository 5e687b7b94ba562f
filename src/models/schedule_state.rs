//! Per-entry SM-2 scheduling record.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_EASE_FACTOR: f64 = 2.5;
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Scheduling data embedded in every vocabulary entry.
///
/// `next_review == None` marks an entry that has never been scheduled; such an
/// entry is due immediately.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleState {
    pub ease_factor: f64,
    pub interval: u32,
    pub repetitions: u32,
    pub next_review: Option<DateTime<Utc>>,
    pub last_review: Option<DateTime<Utc>>,
    /// Last rating given. Kept for display, never read by the scheduler.
    pub quality: Option<u8>,
}

impl Default for ScheduleState {
    fn default() -> Self {
        Self {
            ease_factor: DEFAULT_EASE_FACTOR,
            interval: 1,
            repetitions: 0,
            next_review: None,
            last_review: None,
            quality: None,
        }
    }
}

impl ScheduleState {
    pub fn is_new(&self) -> bool {
        self.repetitions == 0
    }
}

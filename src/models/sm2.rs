//! SM-2 (SuperMemo 2) spaced repetition scheduling.
//!
//! The SM-2 algorithm calculates review intervals based on recall quality:
//! - Each entry has an ease factor (EF) describing how easy it is to remember
//! - Quality grades 0-2: repetitions and interval reset, EF is left alone
//! - Quality grades 3-5: interval grows progressively (1 day → 6 days → interval × EF)
//! - EF is adjusted after each successful review and never falls below 1.3
//!
//! Everything here is a pure function of its inputs; persisting the result is
//! the caller's job.

use super::{MIN_EASE_FACTOR, ScheduleState, VocabularyCard};
use crate::error::{Result, TrainerError};
use chrono::{DateTime, Duration, Utc};
use std::cmp::Ordering;
use tracing::debug;

pub const MAX_QUALITY: u8 = 5;
/// Ratings at or above this count as a successful recall.
pub const PASSING_QUALITY: u8 = 3;
/// Longest interval ever scheduled, about a hundred years.
pub const MAX_INTERVAL_DAYS: u32 = 36_500;

/// Computes the schedule that follows a review rated `quality`, reviewed now.
pub fn compute_next_schedule(state: &ScheduleState, quality: u8) -> Result<ScheduleState> {
    compute_next_schedule_at(state, quality, Utc::now())
}

/// Computes the schedule that follows a review rated `quality` at `now`.
///
/// quality: 0-5 (0 = complete blackout, 5 = perfect response). The returned
/// state carries the input's `quality` field; recording the rating is left to
/// the caller.
pub fn compute_next_schedule_at(
    state: &ScheduleState,
    quality: u8,
    now: DateTime<Utc>,
) -> Result<ScheduleState> {
    if quality > MAX_QUALITY {
        return Err(TrainerError::InvalidQuality(quality));
    }

    let mut ease_factor = state.ease_factor;

    let (interval, repetitions) = if quality < PASSING_QUALITY {
        (1, 0)
    } else {
        let repetitions = state.repetitions.saturating_add(1);
        let interval = match repetitions {
            1 => 1,
            2 => 6,
            // Uses the previous interval and the EF from before this review.
            _ => grow_interval(state.interval, ease_factor),
        };

        let q = f64::from(quality);
        ease_factor += 0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02);
        (interval.max(1), repetitions)
    };

    let ease_factor = round_to_hundredths(ease_factor.max(MIN_EASE_FACTOR));

    Ok(ScheduleState {
        ease_factor,
        interval,
        repetitions,
        next_review: Some(
            now.checked_add_signed(Duration::days(i64::from(interval)))
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        ),
        last_review: Some(now),
        quality: state.quality,
    })
}

fn grow_interval(previous: u32, ease_factor: f64) -> u32 {
    let grown = (f64::from(previous) * ease_factor).round();
    // clamped first, so the cast is exact
    grown.clamp(1.0, f64::from(MAX_INTERVAL_DAYS)) as u32
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// An entry is due when it was never scheduled or its review time has come.
pub fn is_due(state: &ScheduleState, now: DateTime<Utc>) -> bool {
    state.next_review.is_none_or(|next| next <= now)
}

/// Keeps the entries that are due at `now`, in input order.
pub fn get_due_items(items: &[VocabularyCard], now: DateTime<Utc>) -> Vec<VocabularyCard> {
    let due: Vec<VocabularyCard> = items
        .iter()
        .filter(|card| is_due(&card.sm2, now))
        .cloned()
        .collect();

    debug!(total = items.len(), due = due.len(), "filtered due entries");
    due
}

/// How far past its review time an entry is. Unscheduled entries count from
/// the Unix epoch so they sort ahead of everything else.
fn overdue_by(state: &ScheduleState, now: DateTime<Utc>) -> Duration {
    now - state.next_review.unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

fn priority_order(a: &ScheduleState, b: &ScheduleState, now: DateTime<Utc>) -> Ordering {
    overdue_by(b, now)
        .cmp(&overdue_by(a, now))
        .then_with(|| a.ease_factor.total_cmp(&b.ease_factor))
}

/// Returns a copy of `items` sorted most-overdue first; among equally overdue
/// entries the harder ones (lower EF) come first. The sort is stable.
pub fn sort_by_priority(items: &[VocabularyCard], now: DateTime<Utc>) -> Vec<VocabularyCard> {
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| priority_order(&a.sm2, &b.sm2, now));
    sorted
}

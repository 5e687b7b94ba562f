//! Learning progress statistics over a vocabulary collection.
use super::VocabularyCard;
use super::sm2::is_due;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

const MASTERED_REPETITIONS: u32 = 5;
const MASTERED_EASE_FACTOR: f64 = 2.5;

/// Counts per learning bucket.
///
/// `new`, `learning`, `review` and `mastered` partition the collection.
/// `due` and `overdue` cut across them: a new entry is normally also due.
/// `overdue` means due and more than one day past `next_review`, whatever the
/// bucket, so an entry reset to zero repetitions can be overdue as well.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LearningStats {
    pub total: usize,
    pub new: usize,
    pub learning: usize,
    pub review: usize,
    pub mastered: usize,
    pub due: usize,
    pub overdue: usize,
}

/// Coarse progress figures shown on the overview screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct VocabularyOverview {
    pub total: usize,
    /// Entries reviewed successfully at least once since their last lapse.
    pub learned: usize,
    /// Scheduled entries whose review time has come. Never-scheduled entries
    /// are not included.
    pub to_review: usize,
    pub available: usize,
}

pub fn get_learning_stats(items: &[VocabularyCard], now: DateTime<Utc>) -> LearningStats {
    let mut stats = LearningStats {
        total: items.len(),
        ..LearningStats::default()
    };

    for card in items {
        let sm2 = &card.sm2;

        match sm2.repetitions {
            0 => stats.new += 1,
            1..=2 => stats.learning += 1,
            r if r >= MASTERED_REPETITIONS && sm2.ease_factor >= MASTERED_EASE_FACTOR => {
                stats.mastered += 1
            }
            _ => stats.review += 1,
        }

        if is_due(sm2, now) {
            stats.due += 1;
            if sm2
                .next_review
                .is_some_and(|next| now - next > Duration::days(1))
            {
                stats.overdue += 1;
            }
        }
    }

    stats
}

pub fn vocabulary_overview(items: &[VocabularyCard], now: DateTime<Utc>) -> VocabularyOverview {
    let learned = items.iter().filter(|c| c.sm2.repetitions > 0).count();
    let to_review = items
        .iter()
        .filter(|c| c.sm2.next_review.is_some_and(|next| next <= now))
        .count();

    VocabularyOverview {
        total: items.len(),
        learned,
        to_review,
        available: items.len() - learned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScheduleState;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn entry(repetitions: u32, ease_factor: f64, next_review: Option<DateTime<Utc>>) -> VocabularyCard {
        VocabularyCard::new("t", "d").with_schedule(ScheduleState {
            repetitions,
            ease_factor,
            next_review,
            ..ScheduleState::default()
        })
    }

    #[test]
    fn test_empty_collection() {
        assert_eq!(get_learning_stats(&[], now()), LearningStats::default());
    }

    #[test]
    fn test_buckets() {
        let future = Some(now() + Duration::days(3));
        let items = vec![
            entry(0, 2.5, None),
            entry(1, 2.5, future),
            entry(2, 2.3, future),
            entry(3, 2.5, future),
            entry(6, 2.2, future),
            entry(5, 2.5, future),
            entry(9, 2.9, future),
        ];

        let stats = get_learning_stats(&items, now());
        assert_eq!(stats.total, 7);
        assert_eq!(stats.new, 1);
        assert_eq!(stats.learning, 2);
        assert_eq!(stats.review, 2);
        assert_eq!(stats.mastered, 2);
        assert_eq!(stats.due, 1);
        assert_eq!(stats.overdue, 0);
    }

    #[test]
    fn test_due_and_overdue_overlap_buckets() {
        let items = vec![
            entry(0, 2.5, None),
            entry(1, 2.5, Some(now())),
            entry(3, 2.1, Some(now() - Duration::days(1))),
            entry(4, 2.1, Some(now() - Duration::days(3))),
            entry(0, 2.5, Some(now() - Duration::days(2))),
        ];

        let stats = get_learning_stats(&items, now());
        assert_eq!(stats.new, 2);
        assert_eq!(stats.due, 5);
        // exactly one day late is not overdue yet
        assert_eq!(stats.overdue, 2);
    }

    #[test]
    fn test_reset_entry_late_counts_as_overdue() {
        let items = vec![entry(0, 1.8, Some(now() - Duration::days(2)))];

        let stats = get_learning_stats(&items, now());
        assert_eq!(stats.new, 1);
        assert_eq!(stats.due, 1);
        assert_eq!(stats.overdue, 1);
    }

    #[test]
    fn test_partition_covers_total() {
        let items: Vec<_> = (0..12)
            .map(|r| entry(r, 1.3 + f64::from(r) * 0.15, None))
            .collect();

        let stats = get_learning_stats(&items, now());
        assert_eq!(stats.new + stats.learning + stats.review + stats.mastered, stats.total);
    }

    #[test]
    fn test_overview() {
        let items = vec![
            entry(0, 2.5, None),
            entry(0, 2.5, Some(now() - Duration::days(1))),
            entry(2, 2.5, Some(now() - Duration::days(1))),
            entry(4, 2.5, Some(now() + Duration::days(1))),
        ];

        let overview = vocabulary_overview(&items, now());
        assert_eq!(
            overview,
            VocabularyOverview {
                total: 4,
                learned: 2,
                to_review: 2,
                available: 2,
            }
        );
    }
}

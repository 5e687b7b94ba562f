pub mod learning_session;
pub mod schedule_state;
pub mod session;
pub mod sm2;
pub mod stats;
pub mod vocabulary_card;
pub mod vocabulary_set;

pub use learning_session::{LearningSession, ReviewResult, SessionState};
pub use schedule_state::{DEFAULT_EASE_FACTOR, MIN_EASE_FACTOR, ScheduleState};
pub use session::{
    CardDirection, DirectionSetting, QuizCard, QuizSettings, SessionMode, build_session,
};
pub use sm2::{compute_next_schedule, compute_next_schedule_at, get_due_items, is_due, sort_by_priority};
pub use stats::{LearningStats, VocabularyOverview, get_learning_stats, vocabulary_overview};
pub use vocabulary_card::VocabularyCard;
pub use vocabulary_set::{EntryFields, VocabularyData, VocabularyMeta, VocabularySet};

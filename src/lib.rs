pub mod app;
pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod models;

pub use config::Config;
pub use database::{Database, VocabularyStore};
pub use error::{Result, TrainerError};
pub use models::{
    CardDirection, DirectionSetting, LearningSession, LearningStats, QuizCard, QuizSettings,
    ScheduleState, SessionMode, VocabularyCard, VocabularySet, build_session,
    compute_next_schedule, compute_next_schedule_at, get_due_items, get_learning_stats, is_due,
    sort_by_priority,
};

//! Error type shared by the scheduler, the session loop and the stores.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrainerError {
    /// Quality ratings run from 0 (blackout) to 5 (perfect recall).
    #[error("quality must be between 0 and 5, got {0}")]
    InvalidQuality(u8),

    /// A session action was attempted from a state that does not allow it.
    #[error("cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },

    #[error("vocabulary entry not found: {0}")]
    NotFound(String),

    #[error("duplicate vocabulary entry: {0}")]
    Duplicate(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, TrainerError>;

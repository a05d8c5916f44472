use thiserror::Error;

/// Invalid engine configuration. Fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be within [0, 1], got {value}")]
    ThresholdOutOfRange { name: &'static str, value: f32 },

    #[error("safety_score_len must be at least 2, got {0}")]
    SafetyScoreLen(usize),

    #[error("blocked keyword #{index} is empty")]
    EmptyKeyword { index: usize },

    #[error("blocked keyword {0:?} must be lowercase with no surrounding whitespace")]
    KeywordNotNormalized(String),

    #[error("blocked keyword {0:?} is listed more than once")]
    DuplicateKeyword(String),

    #[error("category {0} has an empty display name")]
    EmptyCategoryName(u32),

    #[error("config file not found: {0}")]
    NotFound(std::path::PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

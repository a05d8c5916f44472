use thiserror::Error;

/// A signal bundle that breaks its contract with the upstream classifiers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("safety_scores must have {expected} entries, got {actual}")]
    SafetyScoresLength { expected: usize, actual: usize },

    #[error("safety_scores needs at least safe and nsfw entries, got {actual}")]
    MissingSafetyAxes { actual: usize },

    #[error("{field} must be within [0, 1], got {value}")]
    OutOfRange { field: String, value: f32 },

    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    #[error("unknown risk level: {0:?}")]
    UnknownRiskLevel(String),
}

impl ValidationError {
    /// Name of the bundle field that failed validation.
    pub fn field(&self) -> &str {
        match self {
            Self::SafetyScoresLength { .. } | Self::MissingSafetyAxes { .. } => "safety_scores",
            Self::OutOfRange { field, .. } | Self::NotFinite { field } => field,
            Self::UnknownRiskLevel(_) => "risk_level",
        }
    }
}

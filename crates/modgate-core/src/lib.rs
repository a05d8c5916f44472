pub mod bundle;
mod error;
pub mod verdict;

pub use bundle::{RiskLevel, SafetyScores, SignalBundle};
pub use error::ValidationError;
pub use verdict::{
    Decision, DecisionFactors, Factor, FactorResult, FactorVerdict, ModerationVerdict,
    ProcessingMetadata, safety_assessment,
};

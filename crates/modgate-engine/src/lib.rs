//! Moderation decision engine: per-factor checks fused into one verdict.

pub mod categories;
mod config;
mod engine;
mod error;

pub use config::{DEFAULT_SAFETY_SCORE_LEN, ModerationConfig};
pub use engine::{ENGINE_VERSION, ModerationEngine, NSFW_REVIEW_CUTOFF, fuse};
pub use error::ConfigError;

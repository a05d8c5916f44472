//! Engine configuration: thresholds and lookup tables.
//!
//! Built once at startup and read-only afterwards. Every field has a
//! default, so a JSON file only needs the values it overrides:
//!
//! ```json
//! { "content_confidence_threshold": 0.8, "blocked_keywords": ["gore"] }
//! ```

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;
use crate::categories;

/// Number of axes the shipped safety classifier emits:
/// safe, nsfw, violence, hate, drugs.
pub const DEFAULT_SAFETY_SCORE_LEN: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModerationConfig {
    /// Exposed for tuning; the shipped safety rule keys off risk level and
    /// the nsfw cutoff instead of this value.
    pub safety_threshold: f32,
    pub content_confidence_threshold: f32,
    pub text_confidence_threshold: f32,
    pub safety_score_len: usize,
    pub sensitive_category_ids: BTreeSet<u32>,
    pub blocked_keywords: Vec<String>,
    pub category_names: BTreeMap<u32, String>,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            safety_threshold: 0.85,
            content_confidence_threshold: 0.7,
            text_confidence_threshold: 0.6,
            safety_score_len: DEFAULT_SAFETY_SCORE_LEN,
            sensitive_category_ids: categories::default_sensitive_categories(),
            blocked_keywords: categories::default_blocked_keywords(),
            category_names: categories::default_category_names(),
        }
    }
}

impl ModerationConfig {
    /// Parse and validate a JSON config. Missing fields take defaults; unknown
    /// fields are an error.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ConfigError::NotFound(path.to_path_buf()),
            _ => ConfigError::Io(e),
        })?;
        Self::from_json_str(&raw)
    }

    /// Reject thresholds outside `[0, 1]` and malformed tables.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_threshold("safety_threshold", self.safety_threshold)?;
        check_threshold(
            "content_confidence_threshold",
            self.content_confidence_threshold,
        )?;
        check_threshold("text_confidence_threshold", self.text_confidence_threshold)?;

        if self.safety_score_len < 2 {
            return Err(ConfigError::SafetyScoreLen(self.safety_score_len));
        }

        let mut seen = HashSet::with_capacity(self.blocked_keywords.len());
        for (index, kw) in self.blocked_keywords.iter().enumerate() {
            if kw.trim().is_empty() {
                return Err(ConfigError::EmptyKeyword { index });
            }
            if kw.trim() != kw || kw.to_lowercase() != *kw {
                return Err(ConfigError::KeywordNotNormalized(kw.clone()));
            }
            if !seen.insert(kw.as_str()) {
                return Err(ConfigError::DuplicateKeyword(kw.clone()));
            }
        }

        for (&id, name) in &self.category_names {
            if name.trim().is_empty() {
                return Err(ConfigError::EmptyCategoryName(id));
            }
        }

        Ok(())
    }
}

fn check_threshold(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ThresholdOutOfRange { name, value })
    }
}

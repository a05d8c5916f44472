//! Per-image classifier signals handed to the decision engine.
//!
//! A [`SignalBundle`] is built by the collaborator once per image from three
//! independent classifier outputs: content category, safety risk and OCR.
//! It is read-only input; [`SignalBundle::validate`] checks it against the
//! classifier contract before any decision is made.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Index of the "safe" probability in the safety classifier output.
pub const SAFE_INDEX: usize = 0;
/// Index of the "nsfw" probability in the safety classifier output.
pub const NSFW_INDEX: usize = 1;

/// Coarse severity reported by the safety classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOW" => Ok(Self::Low),
            "MEDIUM" => Ok(Self::Medium),
            "HIGH" => Ok(Self::High),
            other => Err(ValidationError::UnknownRiskLevel(other.to_string())),
        }
    }
}

impl TryFrom<String> for RiskLevel {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Safety classifier scores: `[safe, nsfw, ...other risk axes]`.
///
/// Always carries at least the safe and nsfw entries, so [`safe`](Self::safe)
/// and [`nsfw`](Self::nsfw) never index out of bounds. The full length is a
/// contract with the classifier and is checked by [`SignalBundle::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f32>", into = "Vec<f32>")]
pub struct SafetyScores(Vec<f32>);

impl SafetyScores {
    pub fn new(scores: Vec<f32>) -> Result<Self, ValidationError> {
        if scores.len() <= NSFW_INDEX {
            return Err(ValidationError::MissingSafetyAxes {
                actual: scores.len(),
            });
        }
        Ok(Self(scores))
    }

    pub fn safe(&self) -> f32 {
        self.0[SAFE_INDEX]
    }

    pub fn nsfw(&self) -> f32 {
        self.0[NSFW_INDEX]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

impl TryFrom<Vec<f32>> for SafetyScores {
    type Error = ValidationError;

    fn try_from(value: Vec<f32>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SafetyScores> for Vec<f32> {
    fn from(value: SafetyScores) -> Self {
        value.0
    }
}

/// Classifier outputs for a single image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalBundle {
    pub content_class_id: u32,
    pub content_confidence: f32,
    pub safety_scores: SafetyScores,
    pub is_safe: bool,
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub ocr_texts: Vec<String>,
    #[serde(default)]
    pub text_confidences: Vec<f32>,
    /// Language tag reported by OCR. Carried into verdict metadata only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_language: Option<String>,
}

impl SignalBundle {
    /// Check the bundle against the classifier contract.
    ///
    /// `safety_score_len` is the exact number of safety axes the upstream
    /// classifier emits. Every confidence and score must be finite and within
    /// `[0, 1]`. Empty `ocr_texts` and `text_confidences` are valid.
    pub fn validate(&self, safety_score_len: usize) -> Result<(), ValidationError> {
        if self.safety_scores.len() != safety_score_len {
            return Err(ValidationError::SafetyScoresLength {
                expected: safety_score_len,
                actual: self.safety_scores.len(),
            });
        }

        check_unit("content_confidence", self.content_confidence)?;

        for (i, &score) in self.safety_scores.as_slice().iter().enumerate() {
            check_unit(&format!("safety_scores[{i}]"), score)?;
        }

        for (i, &conf) in self.text_confidences.iter().enumerate() {
            check_unit(&format!("text_confidences[{i}]"), conf)?;
        }

        Ok(())
    }
}

fn check_unit(field: &str, value: f32) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }
    if !(0.0..=1.0).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle() -> SignalBundle {
        SignalBundle {
            content_class_id: 281,
            content_confidence: 0.8,
            safety_scores: SafetyScores::new(vec![0.9, 0.05, 0.01, 0.01, 0.01]).unwrap(),
            is_safe: true,
            risk_level: RiskLevel::Low,
            ocr_texts: vec![],
            text_confidences: vec![],
            detected_language: None,
        }
    }

    #[test]
    fn valid_bundle_passes() {
        assert_eq!(bundle().validate(5), Ok(()));
    }

    #[test]
    fn wrong_safety_length_is_rejected() {
        let err = bundle().validate(3).unwrap_err();
        assert_eq!(
            err,
            ValidationError::SafetyScoresLength {
                expected: 3,
                actual: 5
            }
        );
        assert_eq!(err.field(), "safety_scores");
    }

    #[test]
    fn safety_scores_need_safe_and_nsfw() {
        let err = SafetyScores::new(vec![0.9]).unwrap_err();
        assert_eq!(err, ValidationError::MissingSafetyAxes { actual: 1 });
    }

    #[test]
    fn out_of_range_content_confidence_names_field() {
        let mut b = bundle();
        b.content_confidence = 1.2;
        let err = b.validate(5).unwrap_err();
        assert_eq!(err.field(), "content_confidence");
    }

    #[test]
    fn out_of_range_safety_score_names_index() {
        let mut b = bundle();
        b.safety_scores = SafetyScores::new(vec![0.9, 0.05, -0.1, 0.0, 0.0]).unwrap();
        let err = b.validate(5).unwrap_err();
        assert_eq!(err.field(), "safety_scores[2]");
    }

    #[test]
    fn nan_text_confidence_is_not_finite() {
        let mut b = bundle();
        b.text_confidences = vec![0.8, f32::NAN];
        let err = b.validate(5).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NotFinite {
                field: "text_confidences[1]".into()
            }
        );
    }

    #[test]
    fn empty_text_is_valid() {
        let mut b = bundle();
        b.ocr_texts = vec![];
        b.text_confidences = vec![];
        assert!(b.validate(5).is_ok());
    }

    #[test]
    fn risk_level_parses_upper_case_only() {
        assert_eq!("HIGH".parse::<RiskLevel>(), Ok(RiskLevel::High));
        assert_eq!(
            "high".parse::<RiskLevel>(),
            Err(ValidationError::UnknownRiskLevel("high".into()))
        );
    }

    #[test]
    fn bundle_from_json_defaults_optional_fields() {
        let json = r#"{
            "content_class_id": 285,
            "content_confidence": 0.75,
            "safety_scores": [0.8, 0.1, 0.05, 0.03, 0.02],
            "is_safe": true,
            "risk_level": "MEDIUM"
        }"#;
        let parsed: SignalBundle = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.risk_level, RiskLevel::Medium);
        assert!(parsed.ocr_texts.is_empty());
        assert!(parsed.text_confidences.is_empty());
        assert!(parsed.detected_language.is_none());
    }

    #[test]
    fn bundle_json_rejects_unknown_risk_level() {
        let json = r#"{
            "content_class_id": 1,
            "content_confidence": 0.9,
            "safety_scores": [0.9, 0.1, 0.0, 0.0, 0.0],
            "is_safe": true,
            "risk_level": "SEVERE"
        }"#;
        let err = serde_json::from_str::<SignalBundle>(json).unwrap_err();
        assert!(err.to_string().contains("SEVERE"), "got: {err}");
    }

    #[test]
    fn bundle_json_missing_field_is_named() {
        let json = r#"{
            "content_class_id": 1,
            "safety_scores": [0.9, 0.1, 0.0, 0.0, 0.0],
            "is_safe": true,
            "risk_level": "LOW"
        }"#;
        let err = serde_json::from_str::<SignalBundle>(json).unwrap_err();
        assert!(err.to_string().contains("content_confidence"), "got: {err}");
    }

    #[test]
    fn bundle_json_rejects_single_safety_score() {
        let json = r#"{
            "content_class_id": 1,
            "content_confidence": 0.9,
            "safety_scores": [0.9],
            "is_safe": true,
            "risk_level": "LOW"
        }"#;
        assert!(serde_json::from_str::<SignalBundle>(json).is_err());
    }
}

//! Moderation verdicts and the per-factor audit trail behind them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::RiskLevel;

/// Outcome of a single factor check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FactorResult {
    Approve,
    Review,
    Reject,
}

impl FactorResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "APPROVE",
            Self::Review => "REVIEW",
            Self::Reject => "REJECT",
        }
    }
}

impl fmt::Display for FactorResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result, confidence and explanation for one factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorVerdict {
    pub result: FactorResult,
    pub confidence: f32,
    /// Human-readable explanation. Diagnostic only, never parsed.
    pub reason: String,
}

impl FactorVerdict {
    pub fn approve(confidence: f32, reason: impl Into<String>) -> Self {
        Self {
            result: FactorResult::Approve,
            confidence,
            reason: reason.into(),
        }
    }

    pub fn review(confidence: f32, reason: impl Into<String>) -> Self {
        Self {
            result: FactorResult::Review,
            confidence,
            reason: reason.into(),
        }
    }

    pub fn reject(confidence: f32, reason: impl Into<String>) -> Self {
        Self {
            result: FactorResult::Reject,
            confidence,
            reason: reason.into(),
        }
    }
}

/// The three independent checks that feed fusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Factor {
    Safety,
    Content,
    Text,
}

impl Factor {
    pub const ALL: [Factor; 3] = [Factor::Safety, Factor::Content, Factor::Text];

    /// Key used for this factor in the audit map.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Safety => "safety_check",
            Self::Content => "content_check",
            Self::Text => "text_check",
        }
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audit map from factor name to its verdict.
///
/// Serializes as an object keyed `safety_check`, `content_check`,
/// `text_check`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionFactors {
    pub safety_check: FactorVerdict,
    pub content_check: FactorVerdict,
    pub text_check: FactorVerdict,
}

impl DecisionFactors {
    pub fn get(&self, factor: Factor) -> &FactorVerdict {
        match factor {
            Factor::Safety => &self.safety_check,
            Factor::Content => &self.content_check,
            Factor::Text => &self.text_check,
        }
    }

    /// Factors in fixed order: safety, content, text.
    pub fn iter(&self) -> impl Iterator<Item = (Factor, &FactorVerdict)> {
        Factor::ALL.into_iter().map(move |f| (f, self.get(f)))
    }
}

/// Final moderation outcome for one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Approved,
    ReviewRequired,
    Rejected,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "APPROVED",
            Self::ReviewRequired => "REVIEW_REQUIRED",
            Self::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs echoed back alongside a verdict for observability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingMetadata {
    pub engine_version: String,
    pub content_class_id: u32,
    pub safety_scores: Vec<f32>,
    pub risk_level: RiskLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_language: Option<String>,
}

/// Authoritative verdict with its audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerationVerdict {
    pub decision: Decision,
    pub confidence: f32,
    pub content_category: String,
    pub safety_assessment: String,
    pub extracted_text: Vec<String>,
    pub decision_factors: DecisionFactors,
    pub metadata: ProcessingMetadata,
}

/// Format the safety summary line, e.g. `Risk: LOW, Safe: True`.
///
/// Booleans are capitalised to keep the wording downstream consumers
/// already match on.
pub fn safety_assessment(risk_level: RiskLevel, is_safe: bool) -> String {
    let safe = if is_safe { "True" } else { "False" };
    format!("Risk: {risk_level}, Safe: {safe}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factors() -> DecisionFactors {
        DecisionFactors {
            safety_check: FactorVerdict::approve(0.9, "Content appears safe"),
            content_check: FactorVerdict::review(0.5, "Low classification confidence"),
            text_check: FactorVerdict::reject(0.9, "Blocked keyword: hate"),
        }
    }

    #[test]
    fn factors_iterate_in_fixed_order() {
        let f = factors();
        let names: Vec<&str> = f.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, ["safety_check", "content_check", "text_check"]);
        assert_eq!(f.get(Factor::Text).result, FactorResult::Reject);
    }

    #[test]
    fn decision_factors_serialize_as_named_map() {
        let json = serde_json::to_value(factors()).unwrap();
        assert_eq!(json["safety_check"]["result"], "APPROVE");
        assert_eq!(json["content_check"]["result"], "REVIEW");
        assert_eq!(json["text_check"]["reason"], "Blocked keyword: hate");
    }

    #[test]
    fn decision_wire_names() {
        assert_eq!(
            serde_json::to_string(&Decision::ReviewRequired).unwrap(),
            "\"REVIEW_REQUIRED\""
        );
        assert_eq!(Decision::Approved.to_string(), "APPROVED");
        let parsed: Decision = serde_json::from_str("\"REJECTED\"").unwrap();
        assert_eq!(parsed, Decision::Rejected);
    }

    #[test]
    fn safety_assessment_format() {
        assert_eq!(
            safety_assessment(RiskLevel::High, false),
            "Risk: HIGH, Safe: False"
        );
        assert_eq!(
            safety_assessment(RiskLevel::Low, true),
            "Risk: LOW, Safe: True"
        );
    }

    #[test]
    fn metadata_omits_missing_language() {
        let meta = ProcessingMetadata {
            engine_version: "v2.1.0".into(),
            content_class_id: 281,
            safety_scores: vec![0.9, 0.05],
            risk_level: RiskLevel::Low,
            detected_language: None,
        };
        let json = serde_json::to_value(&meta).unwrap();
        assert!(json.get("detected_language").is_none());
        assert_eq!(json["risk_level"], "LOW");
    }
}

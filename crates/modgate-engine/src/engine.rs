//! Decision fusion over classifier signals.
//!
//! Each image is judged by three independent factor checks (safety, content
//! category, OCR text). Fusion is fixed-priority: any REJECT rejects, else any
//! REVIEW requires review, else the image is approved.

use modgate_core::{
    Decision, DecisionFactors, FactorResult, FactorVerdict, ModerationVerdict, ProcessingMetadata,
    RiskLevel, SafetyScores, SignalBundle, ValidationError, safety_assessment,
};
use tracing::{debug, info};

use crate::categories::{category_name, first_blocked_keyword};
use crate::{ConfigError, ModerationConfig};

/// Version stamped into every verdict's metadata.
pub const ENGINE_VERSION: &str = "v2.1.0";

/// nsfw score above which an otherwise low-risk image goes to review.
pub const NSFW_REVIEW_CUTOFF: f32 = 0.3;

const SAFETY_REJECT_CONFIDENCE: f32 = 0.95;
const SAFETY_REVIEW_CONFIDENCE: f32 = 0.7;
const KEYWORD_REJECT_CONFIDENCE: f32 = 0.9;
const NO_TEXT_CONFIDENCE: f32 = 1.0;

/// Stateless moderation engine.
///
/// Holds only a validated, read-only [`ModerationConfig`], so one instance
/// can be shared across threads and called concurrently without locking.
#[derive(Debug, Clone)]
pub struct ModerationEngine {
    config: ModerationConfig,
}

impl ModerationEngine {
    /// Build an engine, refusing configurations that fail validation.
    pub fn new(config: ModerationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        info!(
            safety_threshold = config.safety_threshold,
            content_threshold = config.content_confidence_threshold,
            text_threshold = config.text_confidence_threshold,
            sensitive = config.sensitive_category_ids.len(),
            keywords = config.blocked_keywords.len(),
            categories = config.category_names.len(),
            "moderation engine initialised"
        );
        Ok(Self { config })
    }

    /// Evaluate one bundle into a verdict.
    ///
    /// Fails fast with [`ValidationError`] when the bundle breaks the
    /// classifier contract. Identical input always yields an identical
    /// verdict.
    pub fn evaluate(&self, bundle: &SignalBundle) -> Result<ModerationVerdict, ValidationError> {
        bundle.validate(self.config.safety_score_len)?;

        let factors = DecisionFactors {
            safety_check: self.evaluate_safety(
                &bundle.safety_scores,
                bundle.is_safe,
                bundle.risk_level,
            ),
            content_check: self
                .evaluate_content(bundle.content_class_id, bundle.content_confidence),
            text_check: self.evaluate_text(&bundle.ocr_texts, &bundle.text_confidences),
        };

        let (decision, confidence) = fuse(&factors);

        debug!(
            class_id = bundle.content_class_id,
            safety = %factors.safety_check.result,
            content = %factors.content_check.result,
            text = %factors.text_check.result,
            decision = %decision,
            confidence,
            "verdict reached"
        );

        Ok(ModerationVerdict {
            decision,
            confidence,
            content_category: self.category_name(bundle.content_class_id),
            safety_assessment: safety_assessment(bundle.risk_level, bundle.is_safe),
            extracted_text: bundle.ocr_texts.clone(),
            decision_factors: factors,
            metadata: ProcessingMetadata {
                engine_version: ENGINE_VERSION.to_string(),
                content_class_id: bundle.content_class_id,
                safety_scores: bundle.safety_scores.as_slice().to_vec(),
                risk_level: bundle.risk_level,
                detected_language: bundle.detected_language.clone(),
            },
        })
    }

    /// Evaluate bundles independently. Output `i` belongs to input `i`.
    pub fn evaluate_batch(
        &self,
        bundles: &[SignalBundle],
    ) -> Vec<Result<ModerationVerdict, ValidationError>> {
        bundles.iter().map(|b| self.evaluate(b)).collect()
    }

    /// Safety factor: classifier flag and risk level first, then nsfw score.
    pub fn evaluate_safety(
        &self,
        scores: &SafetyScores,
        is_safe: bool,
        risk_level: RiskLevel,
    ) -> FactorVerdict {
        if !is_safe || risk_level == RiskLevel::High {
            FactorVerdict::reject(SAFETY_REJECT_CONFIDENCE, "Safety violation")
        } else if risk_level == RiskLevel::Medium || scores.nsfw() > NSFW_REVIEW_CUTOFF {
            FactorVerdict::review(SAFETY_REVIEW_CONFIDENCE, "Moderate risk detected")
        } else {
            FactorVerdict::approve(scores.safe(), "Content appears safe")
        }
    }

    /// Content factor: sensitive classes reject, low confidence reviews.
    pub fn evaluate_content(&self, class_id: u32, confidence: f32) -> FactorVerdict {
        if self.config.sensitive_category_ids.contains(&class_id) {
            FactorVerdict::reject(confidence, "Sensitive category")
        } else if confidence < self.config.content_confidence_threshold {
            FactorVerdict::review(confidence, "Low classification confidence")
        } else {
            FactorVerdict::approve(confidence, "Appropriate content category")
        }
    }

    /// Text factor over OCR output.
    ///
    /// No text approves outright. Otherwise the first blocked keyword in
    /// configured order rejects, and a low mean OCR confidence reviews.
    pub fn evaluate_text(&self, ocr_texts: &[String], text_confidences: &[f32]) -> FactorVerdict {
        let text = ocr_texts.join(" ").to_lowercase();
        if text.trim().is_empty() {
            return FactorVerdict::approve(NO_TEXT_CONFIDENCE, "No text detected");
        }

        if let Some(kw) = first_blocked_keyword(&self.config.blocked_keywords, &text) {
            return FactorVerdict::reject(KEYWORD_REJECT_CONFIDENCE, format!("Blocked keyword: {kw}"));
        }

        let avg = mean(text_confidences);
        if avg < self.config.text_confidence_threshold {
            FactorVerdict::review(avg, "Low OCR confidence")
        } else {
            FactorVerdict::approve(avg, "Text content acceptable")
        }
    }

    /// Display name for a class id, `class_{id}` when unknown.
    pub fn category_name(&self, class_id: u32) -> String {
        category_name(&self.config.category_names, class_id).into_owned()
    }
}

/// Fuse factor verdicts into a decision and confidence.
///
/// REJECTED carries the highest reject confidence; the other outcomes carry
/// the unweighted mean of all three factor confidences.
pub fn fuse(factors: &DecisionFactors) -> (Decision, f32) {
    let mut any_review = false;
    let mut reject_confidence: Option<f32> = None;
    let mut total = 0.0f32;

    for (_, verdict) in factors.iter() {
        total += verdict.confidence;
        match verdict.result {
            FactorResult::Reject => {
                reject_confidence = Some(
                    reject_confidence.map_or(verdict.confidence, |c| c.max(verdict.confidence)),
                );
            }
            FactorResult::Review => any_review = true,
            FactorResult::Approve => {}
        }
    }

    let mean_confidence = total / 3.0;
    match reject_confidence {
        Some(c) => (Decision::Rejected, c),
        None if any_review => (Decision::ReviewRequired, mean_confidence),
        None => (Decision::Approved, mean_confidence),
    }
}

fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f32>() / values.len() as f32
}

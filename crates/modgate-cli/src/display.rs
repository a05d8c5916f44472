//! Vertical card display for moderation verdicts.
//!
//! Renders a verdict as a grouped, human-readable card: the decision up top,
//! then sections for the image, its extracted text and the factor audit.

use std::fmt;

use modgate_core::ModerationVerdict;

const MAX_TEXT_ITEMS: usize = 10;
const MAX_TEXT_WIDTH: usize = 60;

/// A verdict rendered as a multi-line card.
pub struct VerdictCard<'a>(pub &'a ModerationVerdict);

impl fmt::Display for VerdictCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.0;
        writeln!(f, "=== {} ({:.3}) ===", v.decision, v.confidence)?;
        writeln!(f)?;

        writeln!(f, "Image")?;
        writeln!(f, "  {:<26} {}", "content_category", v.content_category)?;
        writeln!(f, "  {:<26} {}", "class_id", v.metadata.content_class_id)?;
        writeln!(f, "  {:<26} {}", "safety_assessment", v.safety_assessment)?;
        let scores: Vec<String> = v
            .metadata
            .safety_scores
            .iter()
            .map(|s| format!("{s:.3}"))
            .collect();
        writeln!(f, "  {:<26} {}", "safety_scores", scores.join(", "))?;
        if let Some(lang) = &v.metadata.detected_language {
            writeln!(f, "  {:<26} {}", "detected_language", lang)?;
        }
        writeln!(f)?;

        if !v.extracted_text.is_empty() {
            writeln!(f, "Extracted Text ({}):", v.extracted_text.len())?;
            for text in v.extracted_text.iter().take(MAX_TEXT_ITEMS) {
                writeln!(f, "    {}", truncate(text))?;
            }
            if v.extracted_text.len() > MAX_TEXT_ITEMS {
                writeln!(f, "    ... and {} more", v.extracted_text.len() - MAX_TEXT_ITEMS)?;
            }
            writeln!(f)?;
        }

        writeln!(f, "Decision Factors")?;
        for (factor, fv) in v.decision_factors.iter() {
            writeln!(
                f,
                "  {:<26} {:<8} {:.3}  {}",
                factor.as_str(),
                fv.result.as_str(),
                fv.confidence,
                fv.reason
            )?;
        }
        writeln!(f)?;

        writeln!(f, "  {:<26} {}", "engine_version", v.metadata.engine_version)
    }
}

/// Print a verdict card to stdout.
pub fn print_verdict_card(verdict: &ModerationVerdict) {
    print!("{}", VerdictCard(verdict));
}

fn truncate(text: &str) -> String {
    if text.chars().count() > MAX_TEXT_WIDTH {
        let short: String = text.chars().take(MAX_TEXT_WIDTH - 3).collect();
        format!("{short}...")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modgate_core::{RiskLevel, SafetyScores, SignalBundle};
    use modgate_engine::{ModerationConfig, ModerationEngine};

    fn verdict(ocr_texts: Vec<String>) -> ModerationVerdict {
        let engine = ModerationEngine::new(ModerationConfig::default()).unwrap();
        let confidences = vec![0.9; ocr_texts.len()];
        let bundle = SignalBundle {
            content_class_id: 281,
            content_confidence: 0.8,
            safety_scores: SafetyScores::new(vec![0.9, 0.05, 0.0, 0.0, 0.0]).unwrap(),
            is_safe: true,
            risk_level: RiskLevel::Low,
            ocr_texts,
            text_confidences: confidences,
            detected_language: Some("en".into()),
        };
        engine.evaluate(&bundle).unwrap()
    }

    #[test]
    fn card_shows_decision_and_factors() {
        let card = VerdictCard(&verdict(vec![])).to_string();
        assert!(card.starts_with("=== APPROVED (0.900) ==="), "{card}");
        assert!(card.contains("tabby_cat"));
        assert!(card.contains("safety_check"));
        assert!(card.contains("content_check"));
        assert!(card.contains("text_check"));
        assert!(card.contains("No text detected"));
        assert!(card.contains("detected_language"));
        assert!(!card.contains("Extracted Text"));
    }

    #[test]
    fn card_lists_extracted_text() {
        let card = VerdictCard(&verdict(vec!["open daily".into()])).to_string();
        assert!(card.contains("Extracted Text (1):"));
        assert!(card.contains("    open daily"));
    }

    #[test]
    fn long_text_is_truncated() {
        let long = "a".repeat(100);
        let line = truncate(&long);
        assert_eq!(line.chars().count(), MAX_TEXT_WIDTH);
        assert!(line.ends_with("..."));
    }

    #[test]
    fn many_fragments_are_capped() {
        let texts: Vec<String> = (0..12).map(|i| format!("line {i}")).collect();
        let card = VerdictCard(&verdict(texts)).to_string();
        assert!(card.contains("... and 2 more"));
        assert!(!card.contains("line 11"));
    }
}

use serde::Deserialize;
use tracing::warn;

use crate::models::{EmergencyAssessment, EmergencyLevel, Transcript};
use crate::remote::{
    RemoteError, RemoteModel, build_classification_prompt, classification_params, parse_embedded,
};

/// Emergency terms for the deterministic fallback classifier, spanning
/// direct distress, medical, safety-threat, and time-sensitivity groups.
/// Matched as case-insensitive substrings.
const EMERGENCY_TERMS: &[&str] = &[
    // direct distress
    "help",
    "please",
    "sos",
    "emergency",
    "urgent",
    "danger",
    "rescue",
    "save",
    "assistance",
    "aid",
    "stranded",
    "trapped",
    "stuck",
    "lost",
    "injured",
    "hurt",
    "pain",
    "bleeding",
    // medical
    "heart attack",
    "stroke",
    "seizure",
    "unconscious",
    "not breathing",
    "choking",
    "drowning",
    "overdose",
    // safety threats
    "fire",
    "smoke",
    "explosion",
    "gas leak",
    "intruder",
    "robbery",
    "assault",
    "attack",
    "violence",
    "accident",
    // time sensitivity
    "right now",
    "asap",
    "quickly",
    "immediate assistance",
    "need help now",
    "urgent help",
];

/// Words that add the urgency bonus in the fallback scorer
const URGENCY_TERMS: &[&str] = &["now", "immediate", "urgent", "critical", "asap"];

/// Minimum fallback confidence to call a transcript an emergency
const EMERGENCY_CONFIDENCE_FLOOR: u8 = 20;

/// Classify a transcript as emergency / not emergency.
///
/// The remote reasoning model is asked first; on transport or parse failure
/// the deterministic keyword scorer decides instead. Never fails.
pub async fn classify<M: RemoteModel>(model: &M, transcript: &Transcript) -> EmergencyAssessment {
    match classify_remote(model, transcript).await {
        Ok(assessment) => assessment,
        Err(err) => {
            warn!("remote classification failed ({}), using keyword fallback", err);
            classify_fallback(&transcript.text)
        }
    }
}

async fn classify_remote<M: RemoteModel>(
    model: &M,
    transcript: &Transcript,
) -> Result<EmergencyAssessment, RemoteError> {
    let prompt = build_classification_prompt(&transcript.text);
    let raw = model.generate(&prompt, &classification_params()).await?;
    let verdict: ClassifierVerdict = parse_embedded(&raw)?;
    Ok(verdict.into_assessment())
}

/// JSON shape requested from the reasoning model
#[derive(Debug, Deserialize)]
struct ClassifierVerdict {
    #[serde(default)]
    is_emergency: bool,
    #[serde(default)]
    confidence: f64,
    #[serde(default)]
    emergency_level: String,
    #[serde(default)]
    reasoning: String,
    #[serde(default)]
    keywords_found: Vec<String>,
    #[serde(default)]
    recommended_action: String,
}

impl ClassifierVerdict {
    fn into_assessment(self) -> EmergencyAssessment {
        let confidence_pct = self.confidence.clamp(0.0, 100.0).round() as u8;
        EmergencyAssessment {
            is_emergency: self.is_emergency,
            confidence_pct,
            level: EmergencyLevel::parse(&self.emergency_level, confidence_pct),
            keywords_found: self.keywords_found,
            rationale: self.reasoning,
            recommended_action: self.recommended_action,
        }
    }
}

/// Deterministic keyword scorer.
///
/// confidence = min(100, 25 per matched term), +10 at two matches, +15 at
/// three, +20 when any urgency word is present, clamped to 100.
pub fn classify_fallback(text: &str) -> EmergencyAssessment {
    let lower = text.to_lowercase();

    let found: Vec<String> = EMERGENCY_TERMS
        .iter()
        .filter(|term| lower.contains(*term))
        .map(|term| term.to_string())
        .collect();

    let mut confidence: u32 = 0;
    if !found.is_empty() {
        confidence = (found.len() as u32 * 25).min(100);
        if found.len() >= 2 {
            confidence += 10;
        }
        if found.len() >= 3 {
            confidence += 15;
        }
        if URGENCY_TERMS.iter().any(|word| lower.contains(word)) {
            confidence += 20;
        }
    }
    let confidence_pct = confidence.min(100) as u8;

    let is_emergency = confidence_pct >= EMERGENCY_CONFIDENCE_FLOOR;

    EmergencyAssessment {
        is_emergency,
        confidence_pct,
        level: EmergencyLevel::from_confidence(confidence_pct),
        rationale: format!("Keyword-based analysis: found {} emergency terms", found.len()),
        keywords_found: found,
        recommended_action: if is_emergency {
            "Immediate attention required".to_string()
        } else {
            "No immediate action needed".to_string()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::GenerationParams;

    struct CannedModel(&'static str);

    impl RemoteModel for CannedModel {
        async fn transcribe(&self, _audio: &[u8]) -> Result<String, RemoteError> {
            unimplemented!("not used by classifier tests")
        }

        async fn generate(
            &self,
            _prompt: &str,
            _params: &GenerationParams,
        ) -> Result<String, RemoteError> {
            Ok(self.0.to_string())
        }
    }

    struct FailingModel;

    impl RemoteModel for FailingModel {
        async fn transcribe(&self, _audio: &[u8]) -> Result<String, RemoteError> {
            unimplemented!("not used by classifier tests")
        }

        async fn generate(
            &self,
            _prompt: &str,
            _params: &GenerationParams,
        ) -> Result<String, RemoteError> {
            Err(RemoteError::Transport("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn test_remote_verdict_parsed() {
        let model = CannedModel(
            r#"Here is the analysis:
{"is_emergency": true, "confidence": 88, "emergency_level": "critical",
 "reasoning": "explicit plea for help", "keywords_found": ["help"],
 "recommended_action": "dispatch"}"#,
        );
        let assessment = classify(&model, &Transcript::primary("help me please")).await;
        assert!(assessment.is_emergency);
        assert_eq!(assessment.confidence_pct, 88);
        assert_eq!(assessment.level, EmergencyLevel::Critical);
        assert_eq!(assessment.keywords_found, vec!["help"]);
    }

    #[tokio::test]
    async fn test_unparseable_response_falls_back() {
        let model = CannedModel("I could not produce structured output, sorry.");
        let assessment = classify(&model, &Transcript::primary("help me please")).await;
        // fallback classifier decided
        assert!(assessment.is_emergency);
        assert!(assessment.rationale.starts_with("Keyword-based"));
    }

    #[tokio::test]
    async fn test_transport_failure_falls_back() {
        let assessment = classify(&FailingModel, &Transcript::primary("nice weather today")).await;
        assert!(!assessment.is_emergency);
        assert_eq!(assessment.confidence_pct, 0);
    }

    #[test]
    fn test_help_me_please_scores_high() {
        let assessment = classify_fallback("help me please");
        assert!(assessment.is_emergency);
        assert!(assessment.confidence_pct >= 45);
    }

    #[test]
    fn test_three_keywords_with_urgency_is_critical() {
        let assessment = classify_fallback("help, there is a fire, i am trapped, come now");
        assert!(assessment.is_emergency);
        assert_eq!(assessment.confidence_pct, 100);
        assert!(matches!(
            assessment.level,
            EmergencyLevel::High | EmergencyLevel::Critical
        ));
    }

    #[test]
    fn test_benign_text_is_not_emergency() {
        let assessment = classify_fallback("the meeting moved to three o'clock");
        assert!(!assessment.is_emergency);
        assert_eq!(assessment.confidence_pct, 0);
        assert!(assessment.keywords_found.is_empty());
        assert_eq!(assessment.level, EmergencyLevel::Low);
    }

    #[test]
    fn test_single_keyword_is_borderline_emergency() {
        let assessment = classify_fallback("there was an accident");
        assert_eq!(assessment.confidence_pct, 25);
        assert!(assessment.is_emergency);
        assert_eq!(assessment.level, EmergencyLevel::Low);
    }

    #[test]
    fn test_empty_text() {
        let assessment = classify_fallback("");
        assert!(!assessment.is_emergency);
        assert_eq!(assessment.confidence_pct, 0);
    }
}

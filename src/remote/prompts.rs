use crate::models::VoiceSample;

use super::GenerationParams;

/// Sampling preset for emergency classification
pub fn classification_params() -> GenerationParams {
    GenerationParams {
        max_new_tokens: 500,
        temperature: 0.3,
        top_p: 0.9,
    }
}

/// Sampling preset for semantic voice comparison
pub fn semantic_params() -> GenerationParams {
    GenerationParams {
        max_new_tokens: 400,
        temperature: 0.1,
        top_p: 0.9,
    }
}

/// Build the emergency-classification prompt for a transcript
pub fn build_classification_prompt(transcript: &str) -> String {
    format!(
        r#"Analyze the following message and determine if it's an emergency SOS message.

Message: "{transcript}"

Please provide your analysis in the following JSON format:
{{
  "is_emergency": true/false,
  "confidence": 0-100,
  "emergency_level": "low/medium/high/critical",
  "reasoning": "explanation of your analysis",
  "keywords_found": ["list", "of", "emergency", "keywords"],
  "recommended_action": "what should be done"
}}

Consider factors like:
- Urgency indicators (help, emergency, urgent, now, etc.)
- Medical emergencies (injury, pain, unconscious, etc.)
- Safety threats (fire, accident, violence, etc.)
- Distress indicators (stranded, trapped, lost, etc.)
- Time sensitivity (immediate, asap, right now, etc.)"#
    )
}

/// Build the semantic-comparison prompt covering all candidate samples
pub fn build_semantic_prompt(transcript: &str, candidates: &[&VoiceSample]) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "Analyze the semantic similarity and voice characteristics between the current SOS message and the provided voice samples.\n\n",
    );
    prompt.push_str(&format!("Current SOS Message: \"{}\"\n\n", transcript));

    prompt.push_str("Voice Samples for Comparison:\n");
    for sample in candidates {
        let text = sample.transcript.as_ref().map(|t| t.text.as_str()).unwrap_or("");
        prompt.push_str(&format!("Sample {}: \"{}\"\n", sample.id, text));
    }

    prompt.push_str(
        r#"
Please provide your analysis in the following JSON format:
{
  "semantic_analysis": {
    "best_match": "id of the most similar voice sample",
    "semantic_score": 0-100,
    "reasoning": "explanation of semantic similarity",
    "voice_characteristics": ["list", "of", "characteristics"],
    "speech_patterns": ["list", "of", "patterns"]
  }
}

Focus on:
- Semantic similarity in vocabulary and phrasing
- Speaking style and tone patterns
- Emotional expression similarities
- Language complexity and structure
- Context and intent matching"#,
    );

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Transcript;

    #[test]
    fn test_classification_prompt_embeds_transcript() {
        let prompt = build_classification_prompt("help me please");
        assert!(prompt.contains("\"help me please\""));
        assert!(prompt.contains("is_emergency"));
    }

    #[test]
    fn test_semantic_prompt_lists_candidates() {
        let mut a = VoiceSample::new("a.mp3", "https://x/a.mp3");
        a.transcript = Some(Transcript::primary("this is a sample"));
        let mut b = VoiceSample::new("b.mp3", "https://x/b.mp3");
        b.transcript = Some(Transcript::primary("another sample"));

        let prompt = build_semantic_prompt("i need help now", &[&a, &b]);
        assert!(prompt.contains("Sample a.mp3: \"this is a sample\""));
        assert!(prompt.contains("Sample b.mp3: \"another sample\""));
        assert!(prompt.contains("semantic_analysis"));
    }
}

use serde::{Deserialize, Serialize};

use super::Location;

/// Per-sample output of the speaker-recognition scorer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeakerScoreResult {
    pub sample_id: String,
    /// Speaker-similarity score, 0-100
    pub score: f64,
}

/// Output of one semantic-comparison session over all candidate samples
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticScoreResult {
    /// Candidate the engine considers most similar, if any
    pub best_sample_id: Option<String>,
    /// Semantic-similarity score for the best candidate, 0-100
    pub score: f64,
    pub rationale: String,
    /// Voice characteristics the engine reported
    pub characteristics: Vec<String>,
    /// Speech patterns the engine reported
    pub patterns: Vec<String>,
    /// Last-known location of the best candidate, when registered
    pub location: Option<Location>,
}

impl SemanticScoreResult {
    /// Result for a session with no usable candidates
    pub fn empty(rationale: impl Into<String>) -> Self {
        Self {
            best_sample_id: None,
            score: 0.0,
            rationale: rationale.into(),
            characteristics: Vec::new(),
            patterns: Vec::new(),
            location: None,
        }
    }
}

/// Final speaker-attribution decision after fusing both score sources.
/// Derived per invocation, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FusedMatch {
    pub match_found: bool,
    /// Combined confidence, 0-100
    pub confidence_pct: u8,
    pub matched_sample_id: Option<String>,
    pub matched_audio_url: Option<String>,
    pub location: Option<Location>,
    pub rationale: String,
    pub recommended_action: String,
}

impl FusedMatch {
    /// Negative decision with an explanatory rationale
    pub fn no_match(rationale: impl Into<String>) -> Self {
        Self {
            match_found: false,
            confidence_pct: 0,
            matched_sample_id: None,
            matched_audio_url: None,
            location: None,
            rationale: rationale.into(),
            recommended_action: "No voice match detected".to_string(),
        }
    }
}

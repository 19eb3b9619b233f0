use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Location;

/// Phrase embedded in every manual-review sentinel transcript
pub const MANUAL_REVIEW_MARKER: &str = "manual review required";

/// Which path produced a transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptSource {
    /// Remote speech-to-text model
    PrimaryModel,
    /// Filename-heuristic or sentinel fallback
    ManualFallback,
}

/// A produced transcript. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub text: String,
    pub source: TranscriptSource,
    pub produced_at: DateTime<Utc>,
}

impl Transcript {
    /// Transcript returned by the remote model
    pub fn primary(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: TranscriptSource::PrimaryModel,
            produced_at: Utc::now(),
        }
    }

    /// Transcript derived from the manual fallback chain
    pub fn fallback(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: TranscriptSource::ManualFallback,
            produced_at: Utc::now(),
        }
    }

    /// Sentinel transcript meaning "could not be automatically transcribed"
    pub fn manual_review(audio_url: &str) -> Self {
        Self::fallback(format!(
            "[Manual Review Required] Please listen to the audio and provide a transcription. Audio URL: {}",
            audio_url
        ))
    }

    /// Whether this transcript is the manual-review sentinel
    pub fn needs_manual_review(&self) -> bool {
        self.text.to_lowercase().contains(MANUAL_REVIEW_MARKER)
    }

    pub fn is_fallback(&self) -> bool {
        self.source == TranscriptSource::ManualFallback
    }
}

/// A pre-recorded enrollment clip with a known identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceSample {
    /// Stable identity, the object name in the store
    pub id: String,
    /// Resolvable URL of the enrollment audio
    pub audio_url: String,
    /// Lazily memoized transcript; None until the sample first participates
    /// in matching, and cleared again on explicit invalidation
    pub transcript: Option<Transcript>,
    /// Static last-known location for this identity, if registered
    pub last_known_location: Option<Location>,
}

impl VoiceSample {
    pub fn new(id: impl Into<String>, audio_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            audio_url: audio_url.into(),
            transcript: None,
            last_known_location: None,
        }
    }

    pub fn with_location(mut self, location: Option<Location>) -> Self {
        self.last_known_location = location;
        self
    }

    /// Whether this sample can participate in semantic comparison:
    /// it has a transcript and that transcript is not the sentinel
    pub fn has_usable_transcript(&self) -> bool {
        self.transcript
            .as_ref()
            .is_some_and(|t| !t.needs_manual_review())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_review_sentinel() {
        let t = Transcript::manual_review("https://x/a.mp3");
        assert!(t.needs_manual_review());
        assert!(t.is_fallback());
        assert!(t.text.contains("https://x/a.mp3"));
    }

    #[test]
    fn test_primary_not_sentinel() {
        let t = Transcript::primary("help me please");
        assert!(!t.needs_manual_review());
        assert!(!t.is_fallback());
    }

    #[test]
    fn test_usable_transcript() {
        let mut sample = VoiceSample::new("a.mp3", "https://x/a.mp3");
        assert!(!sample.has_usable_transcript());

        sample.transcript = Some(Transcript::manual_review("https://x/a.mp3"));
        assert!(!sample.has_usable_transcript());

        sample.transcript = Some(Transcript::primary("this is a sample"));
        assert!(sample.has_usable_transcript());
    }
}

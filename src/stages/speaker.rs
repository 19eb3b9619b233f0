use rand::Rng;
use tracing::debug;

use crate::models::{SpeakerScoreResult, Transcript, VoiceSample};

/// Acoustic speaker-similarity scoring over one enrollment sample.
///
/// Implementations compare the current utterance against the sample and
/// return a 0-100 similarity score. The shipping implementation is
/// [`SimulatedSpeakerScorer`]; tests inject fixed-score fakes.
pub trait SpeakerScoreProvider {
    fn score(&self, transcript: &Transcript, sample: &VoiceSample) -> SpeakerScoreResult;
}

/// Stand-in scorer that draws a uniform random score per sample.
///
/// This is a placeholder for a real embedding-distance comparison against an
/// acoustic speaker-recognition model; its output carries no signal and is
/// only useful for exercising the fusion path end to end. Replace before any
/// real deployment.
#[derive(Debug, Default)]
pub struct SimulatedSpeakerScorer;

impl SpeakerScoreProvider for SimulatedSpeakerScorer {
    fn score(&self, _transcript: &Transcript, sample: &VoiceSample) -> SpeakerScoreResult {
        let score = rand::thread_rng().gen_range(0.0..100.0);
        debug!("simulated speaker score for {}: {:.1}", sample.id, score);
        SpeakerScoreResult {
            sample_id: sample.id.clone(),
            score,
        }
    }
}

/// Score every sample against the current transcript
pub fn score_samples<P: SpeakerScoreProvider>(
    provider: &P,
    transcript: &Transcript,
    samples: &[VoiceSample],
) -> Vec<SpeakerScoreResult> {
    samples
        .iter()
        .map(|sample| provider.score(transcript, sample))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_scores_in_range() {
        let scorer = SimulatedSpeakerScorer;
        let transcript = Transcript::primary("help me please");
        let sample = VoiceSample::new("a.mp3", "https://x/a.mp3");

        for _ in 0..100 {
            let result = scorer.score(&transcript, &sample);
            assert_eq!(result.sample_id, "a.mp3");
            assert!((0.0..100.0).contains(&result.score));
        }
    }

    #[test]
    fn test_score_samples_covers_all() {
        let scorer = SimulatedSpeakerScorer;
        let transcript = Transcript::primary("help me please");
        let samples = vec![
            VoiceSample::new("a.mp3", "https://x/a.mp3"),
            VoiceSample::new("b.mp3", "https://x/b.mp3"),
        ];

        let results = score_samples(&scorer, &transcript, &samples);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].sample_id, "a.mp3");
        assert_eq!(results[1].sample_id, "b.mp3");
    }
}

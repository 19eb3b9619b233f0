use tracing::{debug, info};

use crate::models::{FusedMatch, SemanticScoreResult, SpeakerScoreResult, Transcript, VoiceSample};

use super::semantic::{lexical_score, usable_transcript};

/// Weights and thresholds for combining the two score sources.
///
/// The disagreement penalty (take the stronger side at 0.8x) is a heuristic
/// without strong theoretical grounding, so it is configuration rather than
/// a constant.
#[derive(Debug, Clone)]
pub struct FusionConfig {
    /// Speaker-score weight when both sources agree on a sample
    pub agreement_speaker_weight: f64,
    /// Semantic-score weight when both sources agree on a sample
    pub agreement_semantic_weight: f64,
    /// Multiplier applied to the stronger side when the sources disagree
    pub disagreement_penalty: f64,
    /// Combined score above which a match is declared
    pub match_threshold: f64,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            agreement_speaker_weight: 0.6,
            agreement_semantic_weight: 0.4,
            disagreement_penalty: 0.8,
            match_threshold: 60.0,
        }
    }
}

/// Combine speaker-recognition and semantic scores into one decision.
///
/// Agreement on the same sample blends the scores at full weight; on
/// disagreement the stronger side wins but is penalized. Location comes from
/// the winning sample's static record, or from the semantic result when the
/// fusion resolved to the semantic side.
pub fn fuse(
    speaker_results: &[SpeakerScoreResult],
    semantic: &SemanticScoreResult,
    samples: &[VoiceSample],
    config: &FusionConfig,
) -> FusedMatch {
    let Some(best_speaker) = speaker_results
        .iter()
        .max_by(|a, b| a.score.total_cmp(&b.score))
    else {
        return FusedMatch::no_match("No voice samples available for comparison");
    };

    debug!(
        "fusing: best speaker {} ({:.1}), semantic best {:?} ({:.1})",
        best_speaker.sample_id, best_speaker.score, semantic.best_sample_id, semantic.score
    );

    let agreement = semantic.best_sample_id.as_deref() == Some(best_speaker.sample_id.as_str());

    let (combined, winner_id, winner_is_semantic) = if agreement {
        let combined = config.agreement_speaker_weight * best_speaker.score
            + config.agreement_semantic_weight * semantic.score;
        (combined, Some(best_speaker.sample_id.clone()), false)
    } else if best_speaker.score >= semantic.score {
        (
            config.disagreement_penalty * best_speaker.score,
            Some(best_speaker.sample_id.clone()),
            false,
        )
    } else {
        (
            config.disagreement_penalty * semantic.score,
            semantic.best_sample_id.clone(),
            true,
        )
    };

    let match_found = combined > config.match_threshold;

    let winning_sample = winner_id
        .as_deref()
        .and_then(|id| samples.iter().find(|s| s.id == id));
    let location = winning_sample
        .and_then(|s| s.last_known_location.clone())
        .or_else(|| {
            if winner_is_semantic {
                semantic.location.clone()
            } else {
                None
            }
        });

    info!(
        "fusion: combined {:.1} ({}), match_found={}",
        combined,
        if agreement { "agreement" } else { "disagreement" },
        match_found
    );

    FusedMatch {
        match_found,
        confidence_pct: combined.clamp(0.0, 100.0).round() as u8,
        matched_sample_id: winner_id,
        matched_audio_url: winning_sample.map(|s| s.audio_url.clone()),
        location,
        rationale: if agreement {
            format!(
                "Speaker recognition and semantic analysis agree: {}",
                semantic.rationale
            )
        } else {
            format!(
                "Score sources disagree, stronger side penalized: {}",
                semantic.rationale
            )
        },
        recommended_action: if match_found {
            "Voice identity confirmed by combined speaker and semantic analysis".to_string()
        } else {
            "No reliable voice match found by hybrid analysis".to_string()
        },
    }
}

/// Thresholds for the standalone lexical matcher.
///
/// Emergency phrasing diverges lexically from normal enrollment phrases, so
/// transcripts containing SOS cue words must clear a stricter bar (70 vs 50
/// confidence, 3 vs 2 exact word matches). Whether that asymmetry is
/// intentional in the source design is unresolved; it is preserved here as
/// configuration.
#[derive(Debug, Clone)]
pub struct LexicalMatchConfig {
    pub sos_threshold: f64,
    pub sos_min_exact: usize,
    pub normal_threshold: f64,
    pub normal_min_exact: usize,
}

impl Default for LexicalMatchConfig {
    fn default() -> Self {
        Self {
            sos_threshold: 70.0,
            sos_min_exact: 3,
            normal_threshold: 50.0,
            normal_min_exact: 2,
        }
    }
}

/// Cue words that mark a transcript as SOS-like for threshold selection
const SOS_CUE_WORDS: &[&str] = &[
    "help",
    "emergency",
    "sos",
    "danger",
    "fire",
    "police",
    "ambulance",
    "rescue",
];

/// Standalone keyword/phrase matcher, used when the hybrid pipeline as a
/// whole fails. Same n-gram scoring as the semantic fallback, with the
/// stricter SOS acceptance bar described on [`LexicalMatchConfig`].
pub fn lexical_fallback_match(
    transcript: &Transcript,
    samples: &[VoiceSample],
    config: &LexicalMatchConfig,
) -> FusedMatch {
    if transcript.needs_manual_review() {
        return FusedMatch::no_match(
            "Current transcript requires manual review and cannot be compared",
        );
    }

    let lower = transcript.text.to_lowercase();
    let is_sos_like = SOS_CUE_WORDS.iter().any(|word| lower.contains(word));
    let (threshold, min_exact) = if is_sos_like {
        (config.sos_threshold, config.sos_min_exact)
    } else {
        (config.normal_threshold, config.normal_min_exact)
    };

    if is_sos_like {
        debug!("lexical fallback: SOS cue words present, applying stricter criteria");
    }

    let mut best: Option<(&VoiceSample, f64, usize, usize)> = None;
    for sample in samples {
        let Some(sample_transcript) = usable_transcript(sample) else {
            continue;
        };
        let (score, exact, bigrams) = lexical_score(&transcript.text, &sample_transcript.text);
        debug!(
            "lexical fallback: {} scored {:.1} ({} exact, {} bigrams)",
            sample.id, score, exact, bigrams
        );

        if exact >= min_exact
            && best
                .as_ref()
                .is_none_or(|(_, best_score, _, _)| score > *best_score)
        {
            best = Some((sample, score, exact, bigrams));
        }
    }

    match best {
        Some((sample, score, exact, bigrams)) if score > threshold => FusedMatch {
            match_found: true,
            confidence_pct: score.clamp(0.0, 100.0).round() as u8,
            matched_sample_id: Some(sample.id.clone()),
            matched_audio_url: Some(sample.audio_url.clone()),
            location: sample.last_known_location.clone(),
            rationale: format!(
                "Lexical analysis: {} exact word matches and {} phrase matches with {}",
                exact, bigrams, sample.id
            ),
            recommended_action: "Voice identity likely matches based on lexical analysis"
                .to_string(),
        },
        _ => FusedMatch::no_match(if is_sos_like {
            "SOS message content too different from voice samples (emergency vs normal speech)"
        } else {
            "No significant voice match found using lexical comparison"
        }),
    }
}

use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::{SemanticScoreResult, Transcript, VoiceSample};
use crate::remote::{
    RemoteError, RemoteModel, build_semantic_prompt, parse_embedded, semantic_params,
};

/// Score lexical/phrasal similarity between the current transcript and every
/// candidate voice sample, in one remote session.
///
/// Candidates are the samples with a usable (non-sentinel) transcript; a
/// sentinel current transcript disqualifies the whole comparison. On remote
/// failure the deterministic n-gram scorer decides instead. Never fails.
pub async fn match_semantically<M: RemoteModel>(
    model: &M,
    transcript: &Transcript,
    samples: &[VoiceSample],
) -> SemanticScoreResult {
    if transcript.needs_manual_review() {
        return SemanticScoreResult::empty(
            "Current transcript requires manual review and cannot be compared",
        );
    }

    let candidates: Vec<&VoiceSample> =
        samples.iter().filter(|s| s.has_usable_transcript()).collect();
    if candidates.is_empty() {
        return SemanticScoreResult::empty(
            "No valid voice sample transcripts available for comparison",
        );
    }

    match match_remote(model, transcript, &candidates).await {
        Ok(result) => result,
        Err(err) => {
            warn!("remote semantic analysis failed ({}), using n-gram fallback", err);
            ngram_fallback(transcript, samples)
        }
    }
}

async fn match_remote<M: RemoteModel>(
    model: &M,
    transcript: &Transcript,
    candidates: &[&VoiceSample],
) -> Result<SemanticScoreResult, RemoteError> {
    let prompt = build_semantic_prompt(&transcript.text, candidates);
    let raw = model.generate(&prompt, &semantic_params()).await?;
    let envelope: SemanticEnvelope = parse_embedded(&raw)?;
    let verdict = envelope.semantic_analysis;

    // A best_match naming no known candidate is hallucinated output
    let best_sample_id = match verdict.best_match {
        Some(id) => {
            if !candidates.iter().any(|s| s.id == id) {
                return Err(RemoteError::Parse(format!(
                    "best_match {:?} is not a known candidate",
                    id
                )));
            }
            Some(id)
        }
        None => None,
    };

    let location = best_sample_id
        .as_deref()
        .and_then(|id| candidates.iter().find(|s| s.id == id))
        .and_then(|s| s.last_known_location.clone());

    Ok(SemanticScoreResult {
        best_sample_id,
        score: verdict.semantic_score.clamp(0.0, 100.0),
        rationale: verdict.reasoning,
        characteristics: verdict.voice_characteristics,
        patterns: verdict.speech_patterns,
        location,
    })
}

#[derive(Debug, Deserialize)]
struct SemanticEnvelope {
    semantic_analysis: SemanticVerdict,
}

#[derive(Debug, Deserialize)]
struct SemanticVerdict {
    #[serde(default)]
    best_match: Option<String>,
    #[serde(default)]
    semantic_score: f64,
    #[serde(default)]
    reasoning: String,
    #[serde(default)]
    voice_characteristics: Vec<String>,
    #[serde(default)]
    speech_patterns: Vec<String>,
}

/// Deterministic n-gram similarity scorer over all usable candidates
pub fn ngram_fallback(transcript: &Transcript, samples: &[VoiceSample]) -> SemanticScoreResult {
    let mut best: Option<(&VoiceSample, f64, usize, usize)> = None;

    for sample in samples {
        let Some(sample_transcript) = usable_transcript(sample) else {
            continue;
        };
        let (score, exact, bigrams) = lexical_score(&transcript.text, &sample_transcript.text);
        debug!(
            "n-gram fallback: {} scored {:.1} ({} exact, {} bigrams)",
            sample.id, score, exact, bigrams
        );

        if best.as_ref().is_none_or(|(_, best_score, _, _)| score > *best_score) {
            best = Some((sample, score, exact, bigrams));
        }
    }

    match best {
        Some((sample, score, _, _)) if score > 0.0 => SemanticScoreResult {
            best_sample_id: Some(sample.id.clone()),
            score,
            rationale: format!(
                "N-gram analysis: best match is {} with {:.1}% similarity",
                sample.id, score
            ),
            characteristics: vec!["Lexical token overlap".to_string()],
            patterns: vec!["Word and phrase pattern matching".to_string()],
            location: sample.last_known_location.clone(),
        },
        _ => SemanticScoreResult::empty("No significant semantic similarity found"),
    }
}

/// Score two transcripts for lexical similarity.
///
/// Tokens of length <= 2 are dropped. Exact single-token matches and
/// matching consecutive bigrams both count, ratio-weighted 0.6/0.4, with
/// bonuses of +10 at three exact matches and +15 at one bigram match,
/// clamped to 100. Returns (score, exact matches, bigram matches).
pub(crate) fn lexical_score(current: &str, sample: &str) -> (f64, usize, usize) {
    let current_words = content_tokens(current);
    let sample_words = content_tokens(sample);

    let exact = current_words
        .iter()
        .filter(|word| sample_words.contains(*word))
        .count();

    let current_bigrams = bigrams(&current_words);
    let sample_bigrams = bigrams(&sample_words);
    let bigram_matches = current_bigrams
        .iter()
        .filter(|phrase| sample_bigrams.contains(*phrase))
        .count();

    let total_words = current_words.len().max(sample_words.len());
    if total_words == 0 {
        return (0.0, 0, 0);
    }

    let exact_ratio = exact as f64 / total_words as f64;
    let total_bigrams = current_bigrams.len().max(sample_bigrams.len());
    let bigram_ratio = if total_bigrams > 0 {
        bigram_matches as f64 / total_bigrams as f64
    } else {
        0.0
    };

    let mut score = (100.0 * (0.6 * exact_ratio + 0.4 * bigram_ratio)).min(100.0);
    if exact >= 3 {
        score += 10.0;
    }
    if bigram_matches >= 1 {
        score += 15.0;
    }

    (score.min(100.0), exact, bigram_matches)
}

/// The sample's transcript, unless it is absent or the manual-review sentinel
pub(crate) fn usable_transcript(sample: &VoiceSample) -> Option<&Transcript> {
    sample
        .transcript
        .as_ref()
        .filter(|t| !t.needs_manual_review())
}

fn content_tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .filter(|word| word.len() > 2)
        .map(|word| word.to_string())
        .collect()
}

fn bigrams(words: &[String]) -> Vec<String> {
    words.windows(2).map(|pair| pair.join(" ")).collect()
}

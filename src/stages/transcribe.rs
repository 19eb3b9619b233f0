use tracing::{debug, warn};

use crate::models::{AudioClip, Transcript, filename_from_url};
use crate::remote::{RemoteError, RemoteModel};

/// Configuration for the transcription stage
#[derive(Debug, Clone)]
pub struct TranscribeConfig {
    /// Maximum retries after the initial attempt
    pub max_retries: u32,
}

impl Default for TranscribeConfig {
    fn default() -> Self {
        Self { max_retries: 3 }
    }
}

/// Canned phrases keyed by case-insensitive filename triggers. Checked in
/// order; the first trigger contained in the filename wins.
const TRIGGER_PHRASES: &[(&str, &str)] = &[
    ("help", "help me please"),
    ("stranded", "i am stranded and need assistance"),
    ("emergency", "this is an emergency situation"),
    ("sos", "SOS emergency help needed"),
    ("udhay", "this is udhay calling for help"),
    ("priyaa", "this is priyaa in emergency"),
];

/// Transcribe an audio clip, degrading through the fallback chain.
///
/// Tries the remote model with retry/backoff first; once retries are
/// exhausted (or immediately for a rejected request) falls back to the
/// filename heuristic, and finally to the manual-review sentinel. Always
/// produces a transcript; downstream consumers distinguish fallback results
/// by their [`TranscriptSource`](crate::models::TranscriptSource) tag.
pub async fn transcribe_clip<M: RemoteModel>(
    model: &M,
    clip: &AudioClip,
    config: &TranscribeConfig,
) -> Transcript {
    match transcribe_with_retries(model, clip, config).await {
        Ok(text) => Transcript::primary(text),
        Err(err) => {
            warn!(
                "transcription of {} exhausted remote attempts ({}), using manual fallback",
                clip.filename(),
                err
            );
            manual_fallback(&clip.source_url)
        }
    }
}

async fn transcribe_with_retries<M: RemoteModel>(
    model: &M,
    clip: &AudioClip,
    config: &TranscribeConfig,
) -> Result<String, RemoteError> {
    let mut attempt = 0;

    loop {
        match model.transcribe(&clip.bytes).await {
            Ok(text) => return Ok(text),
            Err(err) if err.skips_retry() => return Err(err),
            Err(err) if attempt < config.max_retries => {
                let wait = err.backoff(attempt);
                warn!(
                    "transcription attempt {} of {} failed ({}), retrying in {:?}",
                    attempt + 1,
                    config.max_retries,
                    err,
                    wait
                );
                tokio::time::sleep(wait).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Derive a transcript from the audio filename alone.
///
/// Matches a small trigger dictionary against the filename; when nothing
/// matches, returns the manual-review sentinel embedding the source URL.
pub fn manual_fallback(audio_url: &str) -> Transcript {
    let filename = filename_from_url(audio_url).to_lowercase();

    for (trigger, phrase) in TRIGGER_PHRASES {
        if filename.contains(trigger) {
            debug!("manual fallback matched trigger {:?} in {:?}", trigger, filename);
            return Transcript::fallback(*phrase);
        }
    }

    Transcript::manual_review(audio_url)
}

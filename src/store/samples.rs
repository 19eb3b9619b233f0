use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::models::{AudioClip, Transcript, VoiceSample};
use crate::remote::RemoteModel;
use crate::stages::{TranscribeConfig, transcribe_clip};

use super::ObjectStore;

/// Voice samples keyed by id, with per-sample transcript memoization.
///
/// Transcripts are filled at most once per generation: `ensure_transcripts`
/// only touches samples whose transcript is absent, and explicit
/// invalidation clears a transcript fully before any reuse.
pub struct VoiceSampleStore {
    samples: Vec<VoiceSample>,
}

impl VoiceSampleStore {
    pub fn new(samples: Vec<VoiceSample>) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[VoiceSample] {
        &self.samples
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn get(&self, id: &str) -> Option<&VoiceSample> {
        self.samples.iter().find(|s| s.id == id)
    }

    /// Attach a transcript to a sample. No-op for unknown ids.
    pub fn set_transcript(&mut self, id: &str, transcript: Transcript) {
        if let Some(sample) = self.samples.iter_mut().find(|s| s.id == id) {
            sample.transcript = Some(transcript);
        }
    }

    /// Clear one sample's memoized transcript so the next comparison
    /// re-derives it
    pub fn invalidate(&mut self, id: &str) {
        if let Some(sample) = self.samples.iter_mut().find(|s| s.id == id) {
            sample.transcript = None;
        }
    }

    /// Clear every memoized transcript (a "fresh" comparison session)
    pub fn invalidate_all(&mut self) {
        for sample in &mut self.samples {
            sample.transcript = None;
        }
    }

    /// Fill missing transcripts sequentially, one sample at a time.
    ///
    /// Samples that already carry a transcript are left untouched. A fetch
    /// failure aborts the fill so the caller can drop to the lexical
    /// fallback over whatever transcripts already exist.
    pub async fn ensure_transcripts<M: RemoteModel, S: ObjectStore>(
        &mut self,
        model: &M,
        store: &S,
        config: &TranscribeConfig,
    ) -> Result<()> {
        for sample in &mut self.samples {
            if sample.transcript.is_some() {
                debug!("sample {} already transcribed, skipping", sample.id);
                continue;
            }

            info!("transcribing voice sample {}", sample.id);
            let bytes = store
                .fetch_bytes(&sample.audio_url)
                .await
                .with_context(|| format!("Failed to fetch voice sample {}", sample.id))?;
            let clip = AudioClip::new(sample.audio_url.clone(), bytes);
            sample.transcript = Some(transcribe_clip(model, &clip, config).await);
        }

        Ok(())
    }
}

use anyhow::{Context, Result, bail};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::models::{
    AlertOutcome, AudioClip, EmergencyAssessment, FusedMatch, SosPayload, Transcript,
};
use crate::remote::RemoteModel;
use crate::store::{ObjectStore, SOS_PREFIX, VoiceSampleStore};

use super::alerts::{AlertSender, default_senders, dispatch};
use super::classify::classify;
use super::fusion::{FusionConfig, LexicalMatchConfig, fuse, lexical_fallback_match};
use super::semantic::match_semantically;
use super::speaker::{SpeakerScoreProvider, score_samples};
use super::transcribe::{TranscribeConfig, manual_fallback, transcribe_clip};

/// Configuration for one transcribe-and-match workflow
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub transcribe: TranscribeConfig,
    pub fusion: FusionConfig,
    pub lexical: LexicalMatchConfig,
    /// Clear all memoized sample transcripts before matching, forcing a
    /// fresh comparison session
    pub fresh_match: bool,
}

/// Serializable summary of one workflow invocation
#[derive(Debug, Clone, Serialize)]
pub struct SosReport {
    pub session_id: String,
    pub clip_name: String,
    pub transcript: Transcript,
    pub assessment: EmergencyAssessment,
    pub voice_match: FusedMatch,
    pub alerts: Vec<AlertOutcome>,
}

/// The full SOS triage workflow: newest clip -> transcript -> classification
/// plus voice attribution -> alert fan-out.
///
/// One logical workflow per `run` call; concurrent invocations over the same
/// sample store are not coordinated against each other.
pub struct SosPipeline<M, S, P> {
    model: M,
    store: S,
    scorer: P,
    senders: Vec<Box<dyn AlertSender>>,
    config: PipelineConfig,
}

impl<M: RemoteModel, S: ObjectStore, P: SpeakerScoreProvider> SosPipeline<M, S, P> {
    pub fn new(model: M, store: S, scorer: P) -> Self {
        Self {
            model,
            store,
            scorer,
            senders: default_senders(),
            config: PipelineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_senders(mut self, senders: Vec<Box<dyn AlertSender>>) -> Self {
        self.senders = senders;
        self
    }

    /// Run the workflow over the newest SOS clip in the store.
    ///
    /// Transcription is total (the sentinel branch always succeeds), so the
    /// only failures that surface are an empty or unreachable clip listing.
    pub async fn run(&self, samples: &mut VoiceSampleStore) -> Result<SosReport> {
        let session_id = uuid::Uuid::new_v4().to_string();

        let mut clips = self
            .store
            .list_objects(SOS_PREFIX)
            .await
            .context("Failed to list SOS clips")?;
        if clips.is_empty() {
            bail!("no SOS clips found under {}", SOS_PREFIX);
        }
        clips.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let latest = &clips[0];

        info!(
            session = %session_id,
            "processing newest SOS clip {} (created {})",
            latest.name,
            latest.created_at
        );

        // A clip that cannot be fetched still gets a transcript via the
        // filename heuristic, so the workflow never dies here
        let transcript = match self.store.fetch_bytes(&latest.url).await {
            Ok(bytes) => {
                let clip = AudioClip::new(latest.url.clone(), bytes);
                transcribe_clip(&self.model, &clip, &self.config.transcribe).await
            }
            Err(err) => {
                warn!("failed to fetch {} ({:#}), using manual fallback", latest.name, err);
                manual_fallback(&latest.url)
            }
        };
        info!("transcript ({:?}): {}", transcript.source, transcript.text);

        if self.config.fresh_match {
            info!("fresh matching session requested, clearing memoized sample transcripts");
            samples.invalidate_all();
        }

        // Classification and voice attribution are independent reads over
        // the transcript; run them concurrently
        let (assessment, voice_match) = tokio::join!(
            classify(&self.model, &transcript),
            self.match_voice(&transcript, samples),
        );

        info!(
            "assessment: emergency={} confidence={}% level={:?}",
            assessment.is_emergency, assessment.confidence_pct, assessment.level
        );

        let alerts = if assessment.is_emergency {
            let payload = SosPayload {
                transcript_text: transcript.text.clone(),
                assessment: assessment.clone(),
                location: voice_match.location.clone(),
                clip_name: latest.name.clone(),
                raised_at: Utc::now(),
            };
            dispatch(&self.senders, &payload).await
        } else {
            info!("no emergency detected, skipping alert dispatch");
            Vec::new()
        };

        Ok(SosReport {
            session_id,
            clip_name: latest.name.clone(),
            transcript,
            assessment,
            voice_match,
            alerts,
        })
    }

    /// Hybrid voice attribution with the lexical matcher as a last resort
    async fn match_voice(
        &self,
        transcript: &Transcript,
        samples: &mut VoiceSampleStore,
    ) -> FusedMatch {
        if samples.is_empty() {
            return FusedMatch::no_match("No voice samples available for comparison");
        }

        match self.hybrid_match(transcript, samples).await {
            Ok(fused) => fused,
            Err(err) => {
                warn!("hybrid voice matching failed ({:#}), using lexical fallback", err);
                lexical_fallback_match(transcript, samples.samples(), &self.config.lexical)
            }
        }
    }

    async fn hybrid_match(
        &self,
        transcript: &Transcript,
        samples: &mut VoiceSampleStore,
    ) -> Result<FusedMatch> {
        samples
            .ensure_transcripts(&self.model, &self.store, &self.config.transcribe)
            .await?;

        // Independent reads over the same sample set
        let (semantic, speaker_results) = tokio::join!(
            match_semantically(&self.model, transcript, samples.samples()),
            async { score_samples(&self.scorer, transcript, samples.samples()) },
        );

        Ok(fuse(
            &speaker_results,
            &semantic,
            samples.samples(),
            &self.config.fusion,
        ))
    }
}

pub mod models;
pub mod remote;
pub mod stages;
pub mod store;

pub use models::{
    AlertChannel, AlertOutcome, AlertStatus, AudioClip, EmergencyAssessment, EmergencyLevel,
    FusedMatch, Location, ObjectEntry, SemanticScoreResult, SosPayload, SpeakerScoreResult,
    Transcript, TranscriptSource, VoiceSample,
};
pub use remote::{InferenceClient, InferenceConfig, RemoteError, RemoteModel};
pub use stages::{
    FusionConfig, LexicalMatchConfig, PipelineConfig, SimulatedSpeakerScorer, SosPipeline,
    SosReport, SpeakerScoreProvider, TranscribeConfig, classify_fallback, dispatch, fuse,
    lexical_fallback_match, transcribe_clip,
};
pub use store::{LocationRegistry, ManifestStore, ObjectStore, VoiceSampleStore};

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use mayday::{
    InferenceClient, InferenceConfig, LocationRegistry, ManifestStore, ObjectStore,
    PipelineConfig, SimulatedSpeakerScorer, SosPipeline, VoiceSample, VoiceSampleStore,
    classify_fallback,
};
use mayday::stages::classify;
use mayday::store::SAMPLE_PREFIX;

#[derive(Parser)]
#[command(name = "mayday")]
#[command(author, version, about = "SOS audio triage pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transcribe the newest SOS clip, classify it, and attribute the voice
    Run {
        /// Object-store manifest file (JSON)
        #[arg(short, long)]
        manifest: PathBuf,

        /// Clear memoized sample transcripts before matching
        #[arg(long)]
        fresh: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Classify a transcript directly, without audio
    Classify {
        /// Transcript text to classify
        #[arg(short, long)]
        text: String,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            manifest,
            fresh,
            verbose,
        } => {
            setup_logging(verbose);
            run_workflow(manifest, fresh).await
        }
        Commands::Classify { text, verbose } => {
            setup_logging(verbose);
            classify_text(text).await
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

async fn run_workflow(manifest: PathBuf, fresh: bool) -> Result<()> {
    info!("Loading object manifest from {:?}", manifest);
    let store = ManifestStore::from_file(&manifest).context("Failed to load manifest")?;

    let api_config = InferenceConfig::from_env()?;
    let model = InferenceClient::new(api_config);

    let mut samples = load_voice_samples(&store).await?;
    info!("{} voice samples available for matching", samples.len());

    let pipeline = SosPipeline::new(model, store, SimulatedSpeakerScorer).with_config(
        PipelineConfig {
            fresh_match: fresh,
            ..PipelineConfig::default()
        },
    );

    let report = pipeline.run(&mut samples).await?;

    info!(
        "Complete: emergency={}, voice match={}, {} alerts",
        report.assessment.is_emergency,
        report.voice_match.match_found,
        report.alerts.len()
    );
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

/// Build the enrollment roster from the store listing, attaching registered
/// last-known locations
async fn load_voice_samples(store: &ManifestStore) -> Result<VoiceSampleStore> {
    let registry = LocationRegistry::builtin();
    let entries = store
        .list_objects(SAMPLE_PREFIX)
        .await
        .context("Failed to list voice samples")?;

    let samples = entries
        .into_iter()
        .map(|entry| {
            let location = registry.lookup(&entry.name);
            VoiceSample::new(entry.name, entry.url).with_location(location)
        })
        .collect();

    Ok(VoiceSampleStore::new(samples))
}

async fn classify_text(text: String) -> Result<()> {
    let assessment = match InferenceConfig::from_env() {
        Ok(config) => {
            let model = InferenceClient::new(config);
            classify(&model, &mayday::Transcript::primary(text)).await
        }
        Err(_) => {
            info!("HF_API_TOKEN not set, using keyword fallback classifier");
            classify_fallback(&text)
        }
    };

    println!("{}", serde_json::to_string_pretty(&assessment)?);
    Ok(())
}

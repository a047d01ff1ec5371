//! Narratime CLI - narration text to a frame-accurate timeline
//!
//! Drives the narration pipeline from the command line: segment text,
//! synthesize speech through a configured provider, and write the
//! presentation payload (and optionally the frame schedule) as JSON.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use narratime::text::segmenter::fallback_segments;
use narratime::{
    timeline, ElevenLabsProvider, EngineConfig, NarrationPipeline, OpenAiProvider, Segmenter,
    SpeechProvider, VoiceId,
};

/// Speech provider channels available to the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ProviderChoice {
    Openai,
    Elevenlabs,
}

/// Narratime - audio-synchronized narration timeline engine
#[derive(Parser, Debug)]
#[command(name = "narratime")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Engine configuration file (YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a narration timeline from text
    Timeline {
        /// Narration text (inline)
        #[arg(short, long, conflicts_with = "input")]
        text: Option<String>,

        /// Read narration text from a file
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Narration voice
        #[arg(long, default_value = "nova")]
        voice: VoiceId,

        /// Speech provider channel
        #[arg(long, value_enum, default_value_t = ProviderChoice::Openai)]
        provider: ProviderChoice,

        /// Frames per second for the frame schedule
        #[arg(long)]
        fps: Option<u32>,

        /// Where to write the narration payload JSON
        #[arg(short, long, default_value = "narration.json")]
        output: PathBuf,

        /// Also write the frame schedule JSON here
        #[arg(long)]
        schedule: Option<PathBuf>,
    },

    /// Run the deterministic fallback segmenter and print the segments
    Segment {
        /// Text to segment
        text: String,
    },

    /// List available voices and their capabilities
    Voices,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Commands::Timeline {
            text,
            input,
            voice,
            provider,
            fps,
            output,
            schedule,
        } => {
            let text = match (text, input) {
                (Some(text), _) => text,
                (None, Some(path)) => tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("failed to read {}", path.display()))?,
                (None, None) => bail!("provide narration text with --text or --input"),
            };

            let provider = build_provider(provider, &config)?;
            let segmenter = Segmenter::new(&config.segmentation)?;
            let pipeline = NarrationPipeline::new(segmenter, provider, &config.pipeline);

            let bar = ProgressBar::new_spinner();
            bar.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
            bar.set_message("synthesizing narration...");
            bar.enable_steady_tick(Duration::from_millis(120));

            let result = pipeline.run(&text, voice).await;
            bar.finish_and_clear();
            let run = result?;

            let payload = narratime::pipeline::render(&run);
            tokio::fs::write(&output, serde_json::to_vec_pretty(&payload)?)
                .await
                .with_context(|| format!("failed to write {}", output.display()))?;
            println!(
                "wrote {} ({} chunks, {:.2}s total)",
                output.display(),
                payload.total_chunks,
                payload.total_duration
            );

            if let Some(path) = schedule {
                let fps = fps.unwrap_or(config.pipeline.fps);
                let windows = timeline::schedule(&run.timeline, fps);
                tokio::fs::write(&path, serde_json::to_vec_pretty(&windows)?)
                    .await
                    .with_context(|| format!("failed to write {}", path.display()))?;
                println!("wrote {} ({} windows at {fps} fps)", path.display(), windows.len());
            }
        }

        Commands::Segment { text } => {
            let segments = fallback_segments(&text)?;
            for segment in segments {
                println!("{:>3}  {}", segment.index, segment.text);
            }
        }

        Commands::Voices => {
            for voice in VoiceId::ALL {
                let caps = voice.capabilities();
                println!(
                    "{:<10} provider={:<11} gender={:<8} sample_rates={:?}",
                    voice.as_str(),
                    format!("{:?}", caps.provider).to_lowercase(),
                    format!("{:?}", caps.gender).to_lowercase(),
                    caps.sample_rates
                );
            }
        }
    }

    Ok(())
}

/// Build the selected provider channel, filling the API key from the
/// environment when the config leaves it empty.
fn build_provider(
    choice: ProviderChoice,
    config: &EngineConfig,
) -> Result<Arc<dyn SpeechProvider>> {
    match choice {
        ProviderChoice::Openai => {
            let mut provider_config = config.openai.clone();
            if provider_config.api_key.is_empty() {
                provider_config.api_key = std::env::var("OPENAI_API_KEY").unwrap_or_default();
            }
            Ok(Arc::new(OpenAiProvider::new(provider_config)?))
        }
        ProviderChoice::Elevenlabs => {
            let mut provider_config = config.elevenlabs.clone();
            if provider_config.api_key.is_empty() {
                provider_config.api_key = std::env::var("ELEVENLABS_API_KEY").unwrap_or_default();
            }
            Ok(Arc::new(ElevenLabsProvider::new(provider_config)?))
        }
    }
}

// Vision Assist command line front end
// Runs the detection and narration pipeline from a terminal

mod config;
mod console;
mod overlay;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::AppConfig;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use vassist_core::{AppContext, ProfileStore, UserProfile};
use vassist_eye::{
    DetectionAdapter, FrameRenderer, FrameSource, LatestOverlay, OverlaySink, ScriptedDetector,
    StillImageSource,
};
use vassist_pipeline::{run_profile_setup, PipelineRuntime};
use vassist_sc::{transcript_channel, VoiceListener};
use vassist_spk::{
    ConsoleSynthesizer, NarrationService, NativeSynthesizer, SpeechSynthesizer, TtsEngine,
};

#[derive(Parser)]
#[command(name = "vassist")]
#[command(about = "Vision Assist - spoken descriptions of what the camera sees", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(long, short, global = true, env = "VASSIST_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the assistant
    Run {
        /// Detection fixture (JSON) replayed by the detector
        #[arg(long)]
        fixture: Option<PathBuf>,

        /// Image used as the camera frame
        #[arg(long)]
        image: Option<PathBuf>,

        /// Write each detection overlay to this PNG file
        #[arg(long)]
        overlay_out: Option<PathBuf>,

        /// Print narration instead of speaking it
        #[arg(long)]
        console_voice: bool,
    },

    /// Inspect the stored profile
    #[command(subcommand)]
    Profile(ProfileCommands),
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Show the stored profile
    Show,
    /// Delete the stored profile so setup runs again
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Run {
            fixture,
            image,
            overlay_out,
            console_voice,
        } => run(config, fixture, image, overlay_out, console_voice).await,
        Commands::Profile(ProfileCommands::Show) => show_profile(&config),
        Commands::Profile(ProfileCommands::Reset) => reset_profile(&config),
    }
}

async fn run(
    mut config: AppConfig,
    fixture: Option<PathBuf>,
    image: Option<PathBuf>,
    overlay_out: Option<PathBuf>,
    console_voice: bool,
) -> Result<()> {
    if console_voice {
        config.speech.engine = TtsEngine::Console;
    }

    let store = config.profile_store();
    let ctx = AppContext::load(&store).context("loading profile")?;

    let narrator = Arc::new(NarrationService::new(
        build_synthesizer(&config)?,
        &config.speech,
        ctx.mute_flag(),
    )?);

    let detector = match &fixture {
        Some(path) => ScriptedDetector::from_path(path)?,
        None => {
            warn!("No detection fixture given, the detector will see nothing");
            ScriptedDetector::empty()
        }
    };
    let adapter = Arc::new(DetectionAdapter::new(Arc::new(detector), config.vision.clone())?);

    let frames: Arc<dyn FrameSource> = match &image {
        Some(path) => Arc::new(StillImageSource::open(path)?),
        None => {
            let (width, height) = config.vision.resolution;
            Arc::new(StillImageSource::blank(width, height))
        }
    };
    let sink: Arc<dyn OverlaySink> = match overlay_out {
        Some(path) => Arc::new(overlay::PngOverlayWriter::new(path)),
        None => Arc::new(LatestOverlay::new()),
    };

    let runtime = PipelineRuntime::new(
        &config.pipeline,
        adapter,
        frames,
        narrator.clone(),
        FrameRenderer::new(&config.vision),
        sink,
    )?;
    let handle = runtime.handle();

    let (transcripts, mut recognizer) = transcript_channel(64);
    let console_task = tokio::spawn(console::run_console(
        console::spawn_stdin_reader(),
        handle.clone(),
        transcripts,
    ));

    print_banner();
    if ctx.has_profile() {
        info!("Profile found, skipping setup");
    } else {
        println!("👤 Profile setup: answer each question on its own line.");
        run_profile_setup(&mut recognizer, &narrator, &ctx, &store).await?;
    }
    if let Some(profile) = ctx.profile() {
        print_profile(&profile);
    }
    console::print_help();

    let listener = VoiceListener::new(Box::new(recognizer), config.listen.clone())?;
    let runtime = runtime.with_listener(listener);
    runtime.load_model();
    handle.start_listening().await?;

    runtime.run().await?;
    console_task.abort();

    println!("\n👋 Goodbye!");
    Ok(())
}

fn build_synthesizer(config: &AppConfig) -> Result<Arc<dyn SpeechSynthesizer>> {
    let engine: Arc<dyn SpeechSynthesizer> = match config.speech.engine {
        TtsEngine::Console => Arc::new(ConsoleSynthesizer::new()),
        TtsEngine::Native => {
            let native = NativeSynthesizer::new(&config.speech)?;
            if native.is_available() {
                Arc::new(native)
            } else {
                warn!("Native speech unavailable, printing narration instead");
                Arc::new(ConsoleSynthesizer::new())
            }
        }
    };
    Ok(engine)
}

fn show_profile(config: &AppConfig) -> Result<()> {
    let store = config.profile_store();
    match store.load()? {
        Some(profile) => println!("{}", serde_json::to_string_pretty(&profile)?),
        None => println!("No profile stored at {}", store.path().display()),
    }
    Ok(())
}

fn reset_profile(config: &AppConfig) -> Result<()> {
    let store = config.profile_store();
    store.clear()?;
    println!("✅ Profile removed from {}", store.path().display());
    Ok(())
}

fn print_banner() {
    println!("\n╔═══════════════════════════════════════════════╗");
    println!("║                 Vision Assist                 ║");
    println!("╚═══════════════════════════════════════════════╝");
    println!();
}

fn print_profile(profile: &UserProfile) {
    println!("   Name:              {}", profile.name);
    println!("   Age:               {}", profile.age);
    println!("   Emergency Contact: {}", profile.emergency_contact);
    println!();
}

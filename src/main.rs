//! `flappy` command line: headless demo runs, controller evaluation and
//! settings dumps. Results go to stdout as JSON; logs go to stderr.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use flappy_core::audio::LogAudio;
use flappy_core::platform::{FrameClock, NoInput};
use flappy_core::renderer::PixelFrame;
use flappy_core::session::{Session, SessionOutcome, run_evaluation};
use flappy_core::sim::{Evaluation, LinearController, Sprites};
use flappy_core::{HighScores, Preset, Settings};

/// Pixels per character cell in the ASCII preview
const ASCII_CELL: (usize, usize) = (10, 20);

#[derive(Debug, Parser)]
#[command(name = "flappy")]
#[command(about = "Deterministic Flappy Bird kernel: demo runs and controller evaluation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Let the built-in pilot play one session
    Demo {
        #[arg(long)]
        seed: Option<u64>,
        /// Settings JSON file; falls back to the preset if unusable
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, default_value = "classic", value_parser = parse_preset)]
        preset: Preset,
        #[arg(long, default_value_t = 3600)]
        max_frames: u64,
        /// Pace frames at the configured fps instead of running flat out
        #[arg(long, default_value_t = false)]
        realtime: bool,
        /// Print an ASCII preview of the final frame to stderr
        #[arg(long, default_value_t = false)]
        ascii: bool,
        /// High score file to record the run in
        #[arg(long)]
        scores: Option<PathBuf>,
        /// Master volume (0.0 - 1.0)
        #[arg(long, default_value_t = 0.8)]
        volume: f32,
        /// Sound effect volume (0.0 - 1.0)
        #[arg(long, default_value_t = 1.0)]
        sfx_volume: f32,
        #[arg(long, default_value_t = false)]
        muted: bool,
    },
    /// Evaluate a population of random linear controllers
    Evaluate {
        #[arg(long, default_value_t = 50)]
        population: usize,
        /// Round number shown in the overlay
        #[arg(long, default_value_t = 1)]
        generation: u32,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, default_value = "evolution", value_parser = parse_preset)]
        preset: Preset,
        #[arg(long, default_value_t = 10_000)]
        max_frames: u64,
        /// Print an ASCII preview of the final frame to stderr
        #[arg(long, default_value_t = false)]
        ascii: bool,
    },
    /// Print a preset's settings as JSON
    Config {
        #[arg(long, default_value = "classic", value_parser = parse_preset)]
        preset: Preset,
    },
}

fn parse_preset(s: &str) -> std::result::Result<Preset, String> {
    Preset::from_str(s).ok_or_else(|| format!("unknown preset '{s}' (classic, evolution)"))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Demo {
            seed,
            config,
            preset,
            max_frames,
            realtime,
            ascii,
            scores,
            volume,
            sfx_volume,
            muted,
        } => {
            let settings = build_settings(config, preset, seed);
            let mut audio = LogAudio::new();
            audio.set_master_volume(volume);
            audio.set_sfx_volume(sfx_volume);
            audio.set_muted(muted);
            cmd_demo(settings, audio, max_frames, realtime, ascii, scores)
        }
        Commands::Evaluate {
            population,
            generation,
            seed,
            config,
            preset,
            max_frames,
            ascii,
        } => {
            let settings = build_settings(config, preset, seed);
            cmd_evaluate(settings, population, generation, max_frames, ascii)
        }
        Commands::Config { preset } => print_json(&Settings::from_preset(preset)),
    }
}

fn build_settings(config: Option<PathBuf>, preset: Preset, seed: Option<u64>) -> Settings {
    let mut settings = Settings::load_or(config.as_deref(), Settings::from_preset(preset));
    if let Some(seed) = seed {
        settings.seed = seed;
    }
    settings
}

#[derive(Debug, Serialize)]
struct DemoSummary {
    #[serde(flatten)]
    outcome: SessionOutcome,
    /// Leaderboard rank, when a score file was given and the run qualified
    rank: Option<usize>,
}

fn cmd_demo(
    settings: Settings,
    audio: LogAudio,
    max_frames: u64,
    realtime: bool,
    ascii: bool,
    scores: Option<PathBuf>,
) -> Result<()> {
    let clock = if realtime {
        FrameClock::new(settings.frame_cap())
    } else {
        FrameClock::unthrottled()
    };
    let frame = PixelFrame::new(
        settings.screen_width.ceil() as usize,
        settings.screen_height.ceil() as usize,
    );

    let mut session = Session::new(settings, Sprites::procedural(), NoInput, audio, frame)
        .with_autopilot(true)
        .with_max_frames(Some(max_frames))
        .with_clock(clock);
    if !realtime {
        session.state.world.settings.death_step_delay_ms = 0;
    }
    let outcome = session.run();

    if ascii {
        eprint!("{}", session.renderer.to_ascii(ASCII_CELL.0, ASCII_CELL.1));
    }

    let rank = match scores {
        Some(path) => {
            let mut board = HighScores::load(&path)?;
            let rank = board.add_score(outcome.score, outcome.frames, outcome.seed);
            if rank.is_some() {
                board.save(&path)?;
            }
            if let Some(best) = board.best() {
                log::info!(
                    "best run: {} gates in {} frames (seed {})",
                    best.score,
                    best.frames,
                    best.seed
                );
            }
            rank
        }
        None => None,
    };

    print_json(&DemoSummary { outcome, rank })
}

fn cmd_evaluate(
    settings: Settings,
    population: usize,
    generation: u32,
    max_frames: u64,
    ascii: bool,
) -> Result<()> {
    // Controllers get their own stream so gate placement stays tied to the seed alone
    let mut rng = Pcg32::seed_from_u64(settings.seed.wrapping_add(1));
    let controllers: Vec<LinearController> = (0..population)
        .map(|_| LinearController::random(&mut rng))
        .collect();

    let mut frame = PixelFrame::new(
        settings.screen_width.ceil() as usize,
        settings.screen_height.ceil() as usize,
    );
    let eval = Evaluation::new(settings, Sprites::procedural(), controllers)
        .with_max_frames(Some(max_frames));
    let report = run_evaluation(
        eval,
        generation,
        &mut NoInput,
        &mut frame,
        &mut |i: usize, f: f32| log::debug!("controller {i}: fitness {f:.2}"),
    );

    if ascii {
        eprint!("{}", frame.to_ascii(ASCII_CELL.0, ASCII_CELL.1));
    }
    if let Some(best) = report.best() {
        log::info!("best controller {} with fitness {:.1}", best.index, best.fitness);
    }
    print_json(&report)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

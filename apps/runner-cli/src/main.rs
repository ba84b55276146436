use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use runner_common::PlayerId;
use runner_input::{Autopilot, InputEvent, dispatch};
use runner_kernel::{FixedTimestep, GameEvent, GameSession, GameSettings, RunPhase};
use runner_persist::{
    HighScoreStore, InstallIdentity, JsonFileStore, PersistenceWorker, StaticIdentity,
    WorkerConfig,
};
use runner_render::{
    DebugTextRenderer, RenderFrame, RenderView, Renderer, ScoreboardWatcher, TextScoreDisplay,
};
use tracing_subscriber::EnvFilter;

const FLUSH_TIMEOUT: Duration = Duration::from_secs(5);
const MAX_FPS: i64 = 1000;

#[derive(Parser)]
#[command(name = "runner", about = "Headless endless runner")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Play one run in simulated time
    Play {
        /// RNG seed for obstacle kinds and scenery layout
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Stop after this much simulated time even if the run goes on
        #[arg(long, default_value = "120")]
        max_seconds: u64,
        /// Display refresh rate to simulate
        #[arg(
            long,
            default_value = "60",
            value_parser = clap::value_parser!(u32).range(1..=MAX_FPS)
        )]
        fps: u32,
        /// Directory for high scores and the player id; omit to keep scores in memory
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Player id to file scores under instead of the installation id
        #[arg(long)]
        player: Option<String>,
        /// Settings JSON file; missing fields take their defaults
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print a debug frame every N simulation steps (0 = never)
        #[arg(long, default_value = "0")]
        render_every: u64,
        /// Never jump; the run ends at the first obstacle
        #[arg(long)]
        no_autopilot: bool,
    },
    /// Show stored high scores
    Highscores {
        #[arg(long, default_value = "runner-data")]
        data_dir: PathBuf,
        /// Only show this player
        #[arg(long)]
        player: Option<String>,
    },
    /// Print the default settings as JSON
    Settings,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Info => {
            println!("runner v{}", env!("CARGO_PKG_VERSION"));
            let settings = GameSettings::default();
            println!(
                "kernel: base_speed={} max_speed={} airtime={:.3}s",
                settings.base_speed,
                settings.max_speed,
                settings.airtime()
            );
            println!("persist: {}", JsonFileStore::FILE_NAME);
            println!(
                "input: jump={:?}",
                runner_input::KeyMap::default().keys_for(InputEvent::JumpPressed)
            );
        }
        Commands::Play {
            seed,
            max_seconds,
            fps,
            data_dir,
            player,
            config,
            render_every,
            no_autopilot,
        } => {
            let settings = match config {
                Some(path) => GameSettings::load(&path)
                    .with_context(|| format!("loading settings from {}", path.display()))?,
                None => GameSettings::default(),
            };
            let options = PlayOptions {
                seed,
                max_time: Duration::from_secs(max_seconds),
                fps,
                render_every,
                autopilot: !no_autopilot,
            };
            play(settings, data_dir.as_deref(), player, &options)?;
        }
        Commands::Highscores { data_dir, player } => {
            let mut store = JsonFileStore::open(&data_dir)
                .with_context(|| format!("opening {}", data_dir.display()))?;
            match player {
                Some(id) => {
                    let id = PlayerId::new(id);
                    match store.load(&id)? {
                        Some(r) => println!("{id}: score={} distance={}", r.score, r.distance),
                        None => println!("{id}: no record"),
                    }
                }
                None => {
                    let entries = store.entries()?;
                    if entries.is_empty() {
                        println!("no high scores in {}", store.path().display());
                    }
                    for (id, r) in entries {
                        println!("{id}: score={} distance={}", r.score, r.distance);
                    }
                }
            }
        }
        Commands::Settings => {
            println!("{}", GameSettings::default().to_json_pretty()?);
        }
    }

    Ok(())
}

struct PlayOptions {
    seed: u64,
    max_time: Duration,
    fps: u32,
    render_every: u64,
    autopilot: bool,
}

fn play(
    settings: GameSettings,
    data_dir: Option<&Path>,
    player: Option<String>,
    options: &PlayOptions,
) -> anyhow::Result<()> {
    settings.validate()?;
    let mut session = GameSession::with_seed(settings.clone(), options.seed);
    if let Some(dir) = data_dir {
        let store = JsonFileStore::open(dir)?;
        let config = WorkerConfig::default();
        let worker = match player {
            Some(id) => PersistenceWorker::spawn(store, StaticIdentity::new(id), config)?,
            None => PersistenceWorker::spawn(store, InstallIdentity::in_dir(dir), config)?,
        };
        session = session.with_persistence(Box::new(worker));
    }

    let frame_dt = Duration::from_secs(1) / options.fps;
    let mut timestep = FixedTimestep::sixty_hz();
    let mut autopilot = Autopilot::new();
    let mut scores = ScoreboardWatcher::new(TextScoreDisplay::new());
    let renderer = DebugTextRenderer::new();
    let view = RenderView::chase(&settings);
    let mut steps: u64 = 0;

    dispatch(&mut session, InputEvent::JumpPressed);
    tracing::info!(seed = options.seed, fps = options.fps, "playing");

    'frames: while session.run_time() < options.max_time {
        for _ in 0..timestep.advance(frame_dt) {
            if options.autopilot {
                if let Some(event) = autopilot.decide(&session) {
                    dispatch(&mut session, event);
                }
            }
            let report = session.update(timestep.step());
            steps += 1;
            if scores.observe_report(&report) {
                tracing::debug!("{}", scores.display().line());
            }
            for event in session.drain_events() {
                log_event(&event);
            }
            if options.render_every > 0 && steps % options.render_every == 0 {
                print!("{}", renderer.render(&RenderFrame::capture(&session), &view));
            }
            if report.phase == RunPhase::Over {
                break 'frames;
            }
        }
    }

    if session.phase() == RunPhase::Running {
        tracing::info!(seconds = options.max_time.as_secs(), "time limit reached");
    }
    print!("{}", renderer.render(&RenderFrame::capture(&session), &view));
    println!("{}", TextScoreDisplay::format(&session.scoreboard()));
    println!(
        "steps={} simulated={:.2}s autopilot_jumps={}",
        steps,
        session.run_time().as_secs_f32(),
        autopilot.jumps()
    );

    if !session.flush_persistence(FLUSH_TIMEOUT) {
        tracing::warn!("exiting with high score writes still pending");
    }
    Ok(())
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::RunOver {
            score,
            distance,
            new_record,
        } => {
            println!("run over: score={score} distance={distance} new_record={new_record}");
        }
        GameEvent::HighScoresLoaded { record } => {
            tracing::info!(score = record.score, distance = record.distance, "loaded high scores");
        }
        other => tracing::trace!(?other, "event"),
    }
}

use anyhow::{Context, Result};
use clap::Parser;
use pocketcraft::{
    config::Config,
    game::{self, Game},
    surface::PixelBuf,
    terminal::{HOLD_WINDOW, KeyTracker, Session, Signal},
};
use std::{
    fs::File,
    path::{Path, PathBuf},
    sync::Mutex,
    time::{Duration, Instant},
};
use tracing_subscriber::EnvFilter;

const SPLASH_DELAY: Duration = Duration::from_secs(3);

#[derive(Parser, Debug)]
#[command(version, about = "2D block sandbox in your terminal")]
struct Cli {
    /// Terrain seed (defaults to the config value, then a random one)
    #[arg(long)]
    seed: Option<u64>,

    /// Config file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long)]
    log: Option<PathBuf>,
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Some(path) = &cli.log {
        init_logging(path)?;
    }

    let config = Config::load(cli.config.as_deref()).context("loading config")?;
    let seed = cli.seed.or(config.seed).unwrap_or_else(rand::random);
    tracing::info!(seed, version = game::LAUNCHER_VERSION, "starting");

    let world = &config.world;
    let mut buf = PixelBuf::new(world.screen_width as usize, world.screen_height as usize);
    let mut session = Session::start(&buf).context("setting up terminal")?;

    if let Err(err) = game::check_assets() {
        tracing::error!(%err, "refusing to start");
        game::draw_splash(&mut buf, &err, world.screen_width, world.screen_height);
        session.present(&buf)?;
        std::thread::sleep(SPLASH_DELAY);
        return Ok(());
    }

    let frame_dur = Duration::from_millis(config.frame_ms);
    let mut game = Game::new(config, seed)?;
    let hold = if session.reports_releases() {
        Duration::MAX
    } else {
        HOLD_WINDOW
    };
    let mut keys = KeyTracker::new(hold);

    game.draw_all(&mut buf);
    session.present(&buf)?;

    loop {
        let frame_start = Instant::now();

        // Input
        for signal in keys.poll()? {
            match signal {
                Signal::Quit => {
                    tracing::info!(frames = game.frame(), "quit");
                    return Ok(());
                }
                Signal::Resize(cols, rows) => {
                    session.resize(&buf, cols, rows)?;
                    session.present(&buf)?;
                }
            }
        }

        // Update and render
        if game.tick(&keys, &mut buf) {
            session.present(&buf)?;
        }

        // Frame pacing
        let elapsed = frame_start.elapsed();
        if elapsed < frame_dur {
            std::thread::sleep(frame_dur - elapsed);
        }
    }
}

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;

use clap::Parser;
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use simplelog::{Config, LevelFilter, WriteLogger};
use toroid_snake::audio::notifier_for;
use toroid_snake::clock::{Clock, FramePacer, MonotonicClock};
use toroid_snake::config::{ConfigError, GameConfig, SoundMode, THEME_CLASSIC, default_log_path};
use toroid_snake::game::{Flow, RoundController};
use toroid_snake::input::InputHandler;
use toroid_snake::renderer;
use toroid_snake::terminal_runtime::{TerminalSession, install_panic_hook};

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// JSON config file; defaults to the per-user config when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for a reproducible round sequence.
    #[arg(long)]
    seed: Option<u64>,

    /// Grid width in cells.
    #[arg(long)]
    width: Option<u16>,

    /// Grid height in cells.
    #[arg(long)]
    height: Option<u16>,

    /// Disable the terminal bell on eat and crash.
    #[arg(long = "no-sound")]
    no_sound: bool,

    /// Where to write the log file.
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    /// Log per-step detail such as food placement.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("{error}");
            return ExitCode::from(2);
        }
    };

    let log_path = cli.log_file.clone().unwrap_or_else(default_log_path);
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if let Err(error) = init_logging(&log_path, level) {
        eprintln!("Logging disabled, cannot open {}: {error}", log_path.display());
    }

    install_panic_hook();

    match run(config, cli.seed) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Terminal error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn resolve_config(cli: &Cli) -> Result<GameConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::load_or_default()?,
    };

    if let Some(width) = cli.width {
        config.grid_width = width;
    }
    if let Some(height) = cli.height {
        config.grid_height = height;
    }
    if cli.no_sound {
        config.sound = SoundMode::Off;
    }

    config.validate()?;
    Ok(config)
}

fn init_logging(path: &Path, level: LevelFilter) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    WriteLogger::init(level, Config::default(), File::create(path)?).map_err(io::Error::other)
}

fn run(config: GameConfig, seed: Option<u64>) -> io::Result<()> {
    let clock = MonotonicClock::start();
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut session = TerminalSession::enter()?;
    let mut notifier = notifier_for(config.sound);
    let mut input = InputHandler::new();
    let mut round = RoundController::new(config, rng, clock.now());
    let mut pacer = FramePacer::new(clock.now());

    loop {
        let mut flow = Flow::Continue;
        for command in input.drain_commands()? {
            flow = round.handle_input(command, clock.now());
            if flow == Flow::Quit {
                break;
            }
        }

        if let Some(event) = round.advance(clock.now()) {
            notifier.notify(event);
        }

        session
            .terminal_mut()
            .draw(|frame| renderer::render(frame, &round.snapshot(), &THEME_CLASSIC))?;

        if flow == Flow::Quit {
            info!("shutting down");
            break;
        }

        thread::sleep(pacer.wait_for_next_frame(clock.now(), round.speed()));
    }

    Ok(())
}

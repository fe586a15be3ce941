//! Binary entrypoint for Trumpet Shop.
//!
//! Commands:
//! - `play` (default) - open the shop in the terminal
//! - `init` - write a starter `trumpet-shop.toml`
//! - `export-cues --out <dir>` - render the sound cues to WAV files
use std::io::{self, Stdout, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use crossterm::event::{self, Event as CEvent};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use trumpet_shop::app::App;
use trumpet_shop::audio::AudioUnit;
use trumpet_shop::config::{AudioConfig, Config};
use trumpet_shop::game::{GameState, PlayerState};
use trumpet_shop::tutorial::{TutorialController, TutorialStore};
use trumpet_shop::ui::draw;

const TICK_RATE: Duration = Duration::from_millis(100);

#[derive(Parser)]
#[command(name = "trumpet-shop")]
#[command(about = "Craft, tune and deliver trumpets")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, default_value = "trumpet-shop.toml", global = true)]
    config: PathBuf,

    /// Verbose logging (-v, -vv for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Enable the F12 debug view
    #[arg(long, global = true)]
    debug: bool,

    /// Run without opening an audio device
    #[arg(long, global = true)]
    mute: bool,

    /// Seed for order generation and melodies
    #[arg(long, global = true)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the shop (default)
    Play,
    /// Write a default configuration file
    Init,
    /// Render the sound cues to WAV files
    ExportCues {
        /// Output directory
        #[arg(short, long, default_value = "cues")]
        out: PathBuf,
    },
}

enum Event<I> {
    Input(I),
    Tick,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Init) => {
            init_logging(None, cli.verbose, false);
            init_config(&cli.config)
        }
        Some(Commands::ExportCues { out }) => {
            let config = Config::load_or_default(&cli.config)?;
            init_logging(Some(&config), cli.verbose, false);
            export_cues(&config, out)
        }
        Some(Commands::Play) | None => {
            let config = Config::load_or_default(&cli.config)?;
            init_logging(Some(&config), cli.verbose, true);
            play(&cli, &config)
        }
    }
}

fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("{} already exists", path.display());
    }
    Config::create_default(path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn export_cues(config: &Config, out: &Path) -> Result<()> {
    std::fs::create_dir_all(out)
        .with_context(|| format!("Failed to create {}", out.display()))?;
    let mut audio = AudioUnit::silent(config.audio.sample_rate);
    audio.set_master_volume(config.audio.master_volume);
    for file in audio.export_cues(out)? {
        println!("{}", file);
    }
    Ok(())
}

fn play(cli: &Cli, config: &Config) -> Result<()> {
    let mut app = build_app(cli, config);
    info!("shop open ({} orders)", app.game.orders.len());
    let mut terminal = setup_terminal()?;
    let res = run_app(&mut terminal, &mut app);
    restore_terminal(&mut terminal)?;
    info!("shop closed");
    res
}

fn build_app(cli: &Cli, config: &Config) -> App {
    let rng = match cli.seed.or(config.game.seed) {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let player = PlayerState::new(config.game.starting_money, config.game.starting_reputation);
    let game = GameState::new(player, rng);

    let audio = build_audio(cli.mute, &config.audio);
    let tutorial = TutorialController::new(TutorialStore::new(&config.storage.tutorial_flag));
    App::new(game, audio, tutorial, cli.debug)
}

/// Muting or disabling audio swaps in the silent backend. Only a device that
/// fails to open leaves the unit uninitialised.
fn build_audio(mute: bool, config: &AudioConfig) -> AudioUnit {
    let mut audio = if mute || !config.enabled {
        AudioUnit::silent(config.sample_rate)
    } else {
        AudioUnit::with_device(config.sample_rate)
    };
    audio.set_master_volume(config.master_volume);
    audio
}

/// Sets up `env_logger`. While the game owns the terminal, records go to the
/// configured file only; with no file configured, play mode stays silent.
fn init_logging(config: Option<&Config>, verbosity: u8, to_file: bool) {
    let base_level = match verbosity {
        0 => config
            .map(|c| c.logging.level_filter())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    let mut builder = env_logger::Builder::new();
    builder.filter_level(base_level);
    builder.format(|fmt, record| {
        let ts = chrono::Local::now().format("%Y-%m-%dT%H:%M:%S");
        writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
    });

    if to_file {
        let Some(file) = config.and_then(|c| c.logging.file.as_deref()) else {
            return;
        };
        match std::fs::OpenOptions::new().create(true).append(true).open(file) {
            Ok(f) => {
                builder.target(env_logger::Target::Pipe(Box::new(f)));
            }
            Err(e) => {
                eprintln!("Failed to open log file {}: {}", file, e);
                return;
            }
        }
    }
    let _ = builder.try_init();
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    let (tx, rx) = mpsc::channel();

    let input_tx = tx.clone();
    thread::spawn(move || {
        loop {
            if !event::poll(Duration::from_millis(250)).unwrap_or(false) {
                continue;
            }
            if let Ok(CEvent::Key(key)) = event::read() {
                if input_tx.send(Event::Input(key)).is_err() {
                    break;
                }
            }
        }
    });

    thread::spawn(move || {
        loop {
            if tx.send(Event::Tick).is_err() {
                break;
            }
            thread::sleep(TICK_RATE);
        }
    });

    loop {
        terminal.draw(|f| draw(f, app))?;

        match rx.recv()? {
            Event::Input(key) => app.on_key(key),
            Event::Tick => app.on_tick(TICK_RATE),
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_flags_parse_after_the_subcommand() {
        let cli = Cli::try_parse_from([
            "trumpet-shop", "play", "--mute", "--debug", "--seed", "5", "-c", "x.toml",
        ])
        .unwrap();
        assert!(cli.mute);
        assert!(cli.debug);
        assert_eq!(cli.seed, Some(5));
        assert_eq!(cli.config, PathBuf::from("x.toml"));
        assert!(matches!(cli.command, Some(Commands::Play)));

        let cli = Cli::try_parse_from(["trumpet-shop", "--seed", "9", "export-cues"]).unwrap();
        assert_eq!(cli.seed, Some(9));
    }

    #[test]
    fn disabled_audio_uses_the_silent_backend() {
        let config = AudioConfig {
            enabled: false,
            master_volume: 0.5,
            ..AudioConfig::default()
        };
        let audio = build_audio(false, &config);
        assert!(audio.is_initialised());
        assert_eq!(audio.master_volume(), 0.5);
        assert!(build_audio(true, &AudioConfig::default()).is_initialised());
    }
}

use std::{path::PathBuf, time::Duration};

use anyhow::Context as _;

use crate::{command::config_arg::GameConfigArg, record::RecordingGame, tui::Tui};

use self::app::PlayApp;

mod app;

const DEFAULT_CYCLE_MS: u64 = 800;
const DEFAULT_FPS: f64 = 60.0;
const DEFAULT_RECORD_DIR: &str = "./data/recordings/";
const DEFAULT_HISTORY_SIZE: usize = 10_000;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    #[clap(flatten)]
    game: GameConfigArg,
    /// Milliseconds between two gravity steps
    #[clap(long, default_value_t = DEFAULT_CYCLE_MS)]
    cycle_ms: u64,
    /// Frames per second for input handling and rendering
    #[clap(long, default_value_t = DEFAULT_FPS)]
    fps: f64,
    /// Save the game recording to a file when the session ends
    #[clap(long)]
    save_recording: bool,
    /// Directory to save recording files
    #[clap(long, default_value = DEFAULT_RECORD_DIR)]
    record_dir: PathBuf,
    /// Maximum number of cycle records to keep in memory (oldest are discarded)
    #[clap(long, default_value_t = DEFAULT_HISTORY_SIZE)]
    history_size: usize,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            game: GameConfigArg::default(),
            cycle_ms: DEFAULT_CYCLE_MS,
            fps: DEFAULT_FPS,
            save_recording: false,
            record_dir: PathBuf::from(DEFAULT_RECORD_DIR),
            history_size: DEFAULT_HISTORY_SIZE,
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        game,
        cycle_ms,
        fps,
        save_recording,
        record_dir,
        history_size,
    } = arg;

    anyhow::ensure!(*cycle_ms > 0, "--cycle-ms must be positive");
    let frame_interval = frame_interval(*fps)?;

    let game = RecordingGame::new(game.to_config()?, game.seed(), *history_size);
    let mut app = PlayApp::new(game, frame_interval, Duration::from_millis(*cycle_ms));

    Tui::new().run(&mut app)?;

    if *save_recording {
        let path = app.into_history().save(record_dir)?;
        println!("Recording saved to {}", path.display());
    }

    Ok(())
}

fn frame_interval(fps: f64) -> anyhow::Result<Duration> {
    anyhow::ensure!(
        fps.is_finite() && fps > 0.0,
        "--fps must be a positive number, got {fps}"
    );
    Duration::try_from_secs_f64(1.0 / fps)
        .with_context(|| format!("--fps {fps} is too low"))
}

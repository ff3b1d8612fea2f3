use std::path::PathBuf;

use blockfall_engine::{Button, Controls, Game, GameConfig, GameSeed, GameStats};
use rand::{Rng, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::{command::config_arg::GameConfigArg, util::Output};

/// Chance that a button is held during a simulated frame.
const PRESS_PROBABILITY: f64 = 0.2;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    #[clap(flatten)]
    game: GameConfigArg,
    /// Number of cycles to run
    #[clap(long, default_value_t = 10_000)]
    cycles: u64,
    /// Output file path (stdout if omitted)
    #[clap(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
struct SimulationSummary {
    seed: GameSeed,
    config: GameConfig,
    cycles: u64,
    games_finished: u64,
    faulted_games: u64,
    total_absorbed_pieces: u64,
    total_cleared_rows: u64,
    best_score: u64,
    current_game: GameStats,
}

impl SimulationSummary {
    fn record_finished(&mut self, stats: &GameStats) {
        self.games_finished += 1;
        self.total_absorbed_pieces += stats.absorbed_pieces();
        self.total_cleared_rows += stats.cleared_rows();
        self.best_score = self.best_score.max(stats.score());
    }
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        game,
        cycles,
        output,
    } = arg;

    let config = game.to_config()?;
    let seed = game.seed().unwrap_or_else(|| rand::rng().random());
    let summary = simulate(config, seed, *cycles);

    eprintln!(
        "Simulated {} cycles: {} games finished, {} rows cleared",
        summary.cycles, summary.games_finished, summary.total_cleared_rows
    );
    Output::save_json(&summary, output.clone())?;
    Ok(())
}

/// Runs `cycles` cycles with random input, one frame of input per cycle.
///
/// Finished games are restarted right away. A cycle that fails to merge the
/// stuck piece (possible when rotations skip the collision check) ends the
/// game and is counted in `faulted_games`.
fn simulate(config: GameConfig, seed: GameSeed, cycles: u64) -> SimulationSummary {
    let mut game = Game::with_seed(config.clone(), seed);
    let mut input_rng = Pcg32::from_seed(seed.to_bytes());

    let mut summary = SimulationSummary {
        seed,
        config,
        cycles,
        games_finished: 0,
        faulted_games: 0,
        total_absorbed_pieces: 0,
        total_cleared_rows: 0,
        best_score: 0,
        current_game: GameStats::new(),
    };

    for _ in 0..cycles {
        if game.status().is_stopped() {
            game.play();
        }

        game.apply_controls(&random_controls(&mut input_rng));

        match game.cycle() {
            Ok(Some(report)) => {
                if report.game_over {
                    if let Some(stats) = game.last_game_stats() {
                        summary.record_finished(stats);
                    }
                } else {
                    game.add_score(report.cleared_rows.len() as u64);
                }
            }
            Ok(None) => {}
            Err(_) => {
                summary.faulted_games += 1;
                game.stop();
                if let Some(stats) = game.last_game_stats() {
                    summary.record_finished(stats);
                }
            }
        }
    }

    summary.current_game = game.stats().clone();
    summary
}

fn random_controls<R>(rng: &mut R) -> Controls
where
    R: Rng + ?Sized,
{
    let mut controls = Controls::new();
    for button in [Button::Left, Button::Right, Button::Down, Button::Rotate] {
        if rng.random_bool(PRESS_PROBABILITY) {
            controls.press(button);
        }
    }
    controls
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{BoardSize, RotationCheck};

    use super::*;

    const SEED: GameSeed = GameSeed::from_bytes([5; 16]);

    #[test]
    fn test_simulation_is_reproducible() {
        let first = simulate(GameConfig::default(), SEED, 2_000);
        let second = simulate(GameConfig::default(), SEED, 2_000);
        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
    }

    #[test]
    fn test_small_board_finishes_games() {
        let config = GameConfig {
            board_size: BoardSize::new(6, 8).unwrap(),
            rotation_check: RotationCheck::BoundsAndCollision,
            ..GameConfig::default()
        };
        let summary = simulate(config, SEED, 3_000);
        assert!(summary.games_finished > 0);
        assert_eq!(summary.faulted_games, 0);
        assert!(summary.total_absorbed_pieces > 0);
        assert_eq!(summary.cycles, 3_000);
    }

    #[test]
    fn test_summary_json_fields() {
        let summary = simulate(GameConfig::default(), SEED, 10);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["cycles"], 10);
        assert_eq!(json["seed"], SEED.to_string());
        assert_eq!(json["current_game"]["cycles"], 10);
    }
}

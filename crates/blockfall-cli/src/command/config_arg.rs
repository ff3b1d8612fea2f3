use blockfall_engine::{BoardSize, ColorTheme, GameConfig, GameSeed, RotationCheck};

/// Rotation legality as spelled on the command line.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub(crate) enum RotationCheckArg {
    /// Only the board edges are checked
    #[default]
    Bounds,
    /// Edges and settled cells are checked
    Collision,
}

impl From<RotationCheckArg> for RotationCheck {
    fn from(arg: RotationCheckArg) -> Self {
        match arg {
            RotationCheckArg::Bounds => Self::BoundsOnly,
            RotationCheckArg::Collision => Self::BoundsAndCollision,
        }
    }
}

/// Game settings shared by every subcommand.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct GameConfigArg {
    /// Board width in cells (at least 4)
    #[clap(long, default_value_t = 12)]
    width: u16,
    /// Board height in cells (at least 4)
    #[clap(long, default_value_t = 22)]
    height: u16,
    /// Rotation check: `bounds` (edges only) or `collision` (edges and settled cells)
    #[clap(long, default_value = "bounds")]
    rotation_check: RotationCheckArg,
    /// Seed for the piece sequence (32 hex digits); random if omitted
    #[clap(long)]
    seed: Option<GameSeed>,
}

impl Default for GameConfigArg {
    fn default() -> Self {
        Self {
            width: 12,
            height: 22,
            rotation_check: RotationCheckArg::default(),
            seed: None,
        }
    }
}

impl GameConfigArg {
    pub(crate) fn to_config(&self) -> anyhow::Result<GameConfig> {
        Ok(GameConfig {
            board_size: BoardSize::new(self.width, self.height)?,
            theme: ColorTheme::DEFAULT,
            rotation_check: self.rotation_check.into(),
        })
    }

    pub(crate) fn seed(&self) -> Option<GameSeed> {
        self.seed
    }
}

use serde::{Deserialize, Serialize};

use crate::{BoardSize, ColorTheme, RotationCheck};

/// Settings fixed for the lifetime of a [`Game`](super::Game).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct GameConfig {
    pub board_size: BoardSize,
    pub theme: ColorTheme,
    pub rotation_check: RotationCheck,
}

use std::{
    f64::consts::{FRAC_PI_2, PI},
    fmt,
    str::FromStr,
};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Color, ColorTheme, ParseSeedError, Point, Tetromino, TetrominoKind};

/// Orientations a freshly spawned piece may start in.
pub const SPAWN_ROTATIONS: [f64; 4] = [0.0, FRAC_PI_2, PI, -FRAC_PI_2];

/// Seed for a reproducible game.
///
/// Two games created with the same seed and configuration draw the same
/// sequence of pieces. Serialized as a 32 character hex string.
///
/// # Example
///
/// ```
/// use blockfall_engine::GameSeed;
/// use rand::Rng as _;
///
/// let seed: GameSeed = rand::rng().random();
/// let parsed: GameSeed = seed.to_string().parse().unwrap();
/// assert_eq!(seed, parsed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSeed([u8; 16]);

impl GameSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }
}

impl fmt::Display for GameSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for GameSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseSeedError);
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| ParseSeedError)?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for GameSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GameSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str
            .parse()
            .map_err(|e| serde::de::Error::custom(format!("{e}: {hex_str}")))
    }
}

impl Distribution<GameSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> GameSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        GameSeed(seed)
    }
}

/// What the generator picked for the next piece.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieceDraw {
    pub kind: TetrominoKind,
    pub rotation: f64,
    pub color: Color,
}

impl PieceDraw {
    /// Builds the piece around `pivot`.
    #[must_use]
    pub fn spawn_at(self, pivot: Point) -> Tetromino {
        Tetromino::new(self.kind, pivot, self.rotation, self.color)
    }
}

/// Random source for new pieces.
///
/// Shape, spawn rotation and color are each drawn uniformly and independently.
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    rng: Pcg32,
}

impl Default for PieceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceGenerator {
    /// Creates a generator seeded from the thread RNG.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(seed: GameSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
        }
    }

    pub fn draw(&mut self, theme: &ColorTheme) -> PieceDraw {
        let kind = self.rng.random();
        let rotation = SPAWN_ROTATIONS[self.rng.random_range(0..SPAWN_ROTATIONS.len())];
        let color = theme.tetrominos[self.rng.random_range(0..theme.tetrominos.len())];
        PieceDraw {
            kind,
            rotation,
            color,
        }
    }
}

use serde::{Deserialize, Serialize};

use crate::board::Side;
use crate::rules::CapturePolicy;

/// Who controls the two sides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Near is human, Far is played by the heuristic.
    #[default]
    SinglePlayer,
    /// Both sides are human.
    TwoPlayer,
}

/// Rules fixed for the lifetime of one game.
///
/// Deserializes from a partial object; missing fields take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub mode: Mode,
    pub capture: CapturePolicy,
    pub first_mover: Side,
    /// Seed for the heuristic's tie-breaking noise. `None` plays deterministically.
    pub noise_seed: Option<u64>,
}

impl GameConfig {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn with_capture(mut self, capture: CapturePolicy) -> Self {
        self.capture = capture;
        self
    }

    pub fn with_first_mover(mut self, side: Side) -> Self {
        self.first_mover = side;
        self
    }

    pub fn with_noise_seed(mut self, seed: u64) -> Self {
        self.noise_seed = Some(seed);
        self
    }

    /// The side the heuristic plays, if any.
    pub fn automated_side(&self) -> Option<Side> {
        match self.mode {
            Mode::SinglePlayer => Some(Side::Far),
            Mode::TwoPlayer => None,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            mode: Mode::SinglePlayer,
            capture: CapturePolicy::Capture,
            first_mover: Side::Near,
            noise_seed: None,
        }
    }
}

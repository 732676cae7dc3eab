use wasm_bindgen::prelude::*;

pub mod ai;
pub mod bindings;
pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod rules;
pub mod types;

pub use board::{Board, Side, Square};
pub use config::{GameConfig, Mode};
pub use error::EngineError;
pub use game::{GameState, MoveSelector};
pub use rules::CapturePolicy;
pub use types::{GameEvent, GameView, Move, MoveOutcome, Position, Reply};

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}

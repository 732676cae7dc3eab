//! Browser-facing wrapper. Each `WasmGame` owns its own `GameState`.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;
use web_time::{SystemTime, UNIX_EPOCH};

use crate::board::{Side, Square};
use crate::config::GameConfig;
use crate::error::EngineError;
use crate::game::GameState;
use crate::types::Position;

/// Options accepted by the `WasmGame` constructor.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BrowserConfig {
    #[serde(flatten)]
    rules: GameConfig,
    /// Seed the heuristic's noise from the clock when no seed is given.
    random: bool,
}

impl BrowserConfig {
    fn into_game_config(self) -> GameConfig {
        match (self.random, self.rules.noise_seed) {
            (true, None) => self.rules.with_noise_seed(clock_seed()),
            _ => self.rules,
        }
    }
}

#[wasm_bindgen]
pub struct WasmGame {
    state: GameState,
}

#[wasm_bindgen]
impl WasmGame {
    /// `config` may be `undefined`, `null` or a partial options object.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<WasmGame, JsValue> {
        let config = if config.is_undefined() || config.is_null() {
            BrowserConfig::default()
        } else {
            serde_wasm_bindgen::from_value::<BrowserConfig>(config)?
        };
        Ok(Self {
            state: GameState::new_game(config.into_game_config()),
        })
    }

    pub fn attempt_move(
        &mut self,
        from_row: i32,
        from_col: i32,
        to_row: i32,
        to_col: i32,
    ) -> Result<JsValue, JsValue> {
        let from = Position::try_from((from_row, from_col)).map_err(to_js_error)?;
        let to = Position::try_from((to_row, to_col)).map_err(to_js_error)?;
        to_js(self.state.attempt_move(from, to))
    }

    /// Returns the new selection, or `undefined` when nothing is selected.
    pub fn select(&mut self, row: i32, col: i32) -> Result<JsValue, JsValue> {
        to_js(self.state.toggle_selection(row, col))
    }

    pub fn move_selected(&mut self, row: i32, col: i32) -> Result<JsValue, JsValue> {
        to_js(self.state.move_selection_to(row, col))
    }

    pub fn pass(&mut self) -> Result<JsValue, JsValue> {
        to_js(self.state.pass())
    }

    pub fn restart(&mut self) {
        self.state.restart();
    }

    pub fn state(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.state.view())?)
    }

    /// 0=empty, 1=near, 2=far.
    pub fn square(&self, row: i32, col: i32) -> Result<u8, JsValue> {
        let pos = Position::try_from((row, col)).map_err(to_js_error)?;
        Ok(match self.state.board().square(pos) {
            Square::Empty => 0,
            Square::Occupied(Side::Near) => 1,
            Square::Occupied(Side::Far) => 2,
        })
    }

    pub fn current_turn(&self) -> String {
        self.state.current_turn().name().to_string()
    }

    pub fn winner(&self) -> Option<String> {
        self.state.is_game_over().map(|side| side.name().into())
    }

    pub fn legal_destinations(&self, row: i32, col: i32) -> Result<JsValue, JsValue> {
        let from = Position::try_from((row, col)).map_err(to_js_error)?;
        let destinations = self.state.legal_destinations(from);
        Ok(serde_wasm_bindgen::to_value(&destinations)?)
    }
}

fn to_js<T: Serialize>(result: Result<T, EngineError>) -> Result<JsValue, JsValue> {
    let value = result.map_err(to_js_error)?;
    Ok(serde_wasm_bindgen::to_value(&value)?)
}

fn to_js_error(err: EngineError) -> JsValue {
    JsError::from(err).into()
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}

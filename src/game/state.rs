//! Global engine slot.
//!
//! Uses `thread_local!` + `RefCell` for safe mutable access in single-threaded
//! WASM. The Web Worker keeps the WASM module alive, so the game survives
//! across `handle_request` calls for the whole browser session (and no
//! longer: nothing is persisted).

use serde::Serialize;
use std::cell::RefCell;

use crate::game::engine::GameEngine;
use crate::game::model::{GameState, Player, Team};

thread_local! {
    static ENGINE: RefCell<GameEngine> = RefCell::new(GameEngine::default());
}

/// Execute a closure with read access to the engine.
pub fn with_engine<F, R>(f: F) -> R
where
    F: FnOnce(&GameEngine) -> R,
{
    ENGINE.with(|e| f(&e.borrow()))
}

/// Execute a closure with mutable access to the engine.
pub fn with_engine_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut GameEngine) -> R,
{
    ENGINE.with(|e| f(&mut e.borrow_mut()))
}

/// Replace the whole engine (tests, config-driven rebuilds).
pub fn replace_engine(engine: GameEngine) {
    ENGINE.with(|e| {
        *e.borrow_mut() = engine;
    });
}

/// Fresh engine with default rules and an empty roster.
pub fn reset_engine() {
    replace_engine(GameEngine::default());
}

/// What the page renders after every request: the raw snapshot plus the
/// current thrower and winner already resolved.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateView<'a> {
    pub state: &'a GameState,
    pub can_undo: bool,
    pub current_team: Option<&'a Team>,
    pub current_player: Option<&'a Player>,
    pub winner: Option<&'a Team>,
}

impl<'a> StateView<'a> {
    pub fn of(engine: &'a GameEngine) -> Self {
        let state = engine.state();
        Self {
            state,
            can_undo: engine.can_undo(),
            current_team: state.current_team(),
            current_player: state.current_player(),
            winner: state.winner_team(),
        }
    }
}

/// Export the current view as JSON.
pub fn export_view_json() -> String {
    with_engine(|engine| {
        serde_json::to_string(&StateView::of(engine)).unwrap_or_else(|_| "{}".to_string())
    })
}

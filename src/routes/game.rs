//! `/api/game/*` routes: game flow, throws, undo, stats and rules.
//!
//! Every mutating route answers with the state view JSON so the page can
//! re-render from a single response.

use crate::config::RulesConfig;
use crate::error::RequestError;
use crate::game::model::GameStatus;
use crate::game::rules::Throw;
use crate::game::state::{self, with_engine, with_engine_mut};
use crate::routes::util::{get_param, parse_form_body, require_number, respond};

fn require_status(expected: GameStatus) -> Result<(), RequestError> {
    let status = with_engine(|e| e.state().game_status);
    if status == expected {
        return Ok(());
    }
    Err(RequestError::WrongPhase(match status {
        GameStatus::Setup => "in setup",
        GameStatus::Playing => "playing",
        GameStatus::Paused => "paused",
        GameStatus::Finished => "finished",
    }))
}

// ── GET /api/game/state ────────────────────────────────────────────

pub fn handle_state_get(_query: &str) -> String {
    state::export_view_json()
}

// ── GET /api/game/stats ────────────────────────────────────────────

pub fn handle_stats_get(_query: &str) -> String {
    with_engine(|e| serde_json::to_string(&e.stats()).unwrap_or_else(|_| "{}".to_string()))
}

// ── GET/POST /api/game/config ──────────────────────────────────────

pub fn handle_config_get(_query: &str) -> String {
    with_engine(|e| serde_json::to_string(e.rules()).unwrap_or_else(|_| "{}".to_string()))
}

/// Handle POST /api/game/config
/// Body is a JSON object with any subset of the rule fields. Only allowed
/// during setup. Returns the rules now in effect.
pub fn handle_config_post(body: &str) -> String {
    respond(config_post(body))
}

fn config_post(body: &str) -> Result<String, RequestError> {
    require_status(GameStatus::Setup)?;
    let rules = RulesConfig::from_json(body)?;
    tracing::info!(?rules, "rules updated");
    with_engine_mut(|e| e.set_rules(rules));
    Ok(handle_config_get(""))
}

// ── POST /api/game/start ───────────────────────────────────────────

pub fn handle_start_post(_body: &str) -> String {
    respond(start_post())
}

fn start_post() -> Result<String, RequestError> {
    require_status(GameStatus::Setup)?;
    let ready = with_engine(|e| {
        let teams = &e.state().teams;
        teams.len() >= 2 && teams.iter().all(|t| !t.players.is_empty())
    });
    if !ready {
        return Err(RequestError::RosterIncomplete);
    }
    with_engine_mut(|e| e.start_game());
    Ok(state::export_view_json())
}

// ── POST /api/game/reset ───────────────────────────────────────────

pub fn handle_reset_post(_body: &str) -> String {
    with_engine_mut(|e| e.reset_game());
    state::export_view_json()
}

// ── POST /api/game/undo ────────────────────────────────────────────

pub fn handle_undo_post(_body: &str) -> String {
    with_engine_mut(|e| e.undo_last_action());
    state::export_view_json()
}

// ── POST /api/game/skip ────────────────────────────────────────────

pub fn handle_skip_post(_body: &str) -> String {
    respond(require_status(GameStatus::Playing).map(|()| {
        with_engine_mut(|e| e.next_turn());
        state::export_view_json()
    }))
}

// ── POST /api/game/score ───────────────────────────────────────────

/// Handle POST /api/game/score
/// Body params:
///   - kind=single&pin={n}        → one pin knocked, scores its number
///   - kind=multi&count={n}       → n pins knocked, scores n
///   - kind=miss                  → nothing knocked
///   - points={n}[&pins={m}]      → raw points, for pages with their own pad
///
/// A tap arriving while the previous throw is still settling is dropped
/// silently; the response is the unchanged state.
pub fn handle_score_post(body: &str) -> String {
    respond(score_post(body))
}

fn score_post(body: &str) -> Result<String, RequestError> {
    let params = parse_form_body(body);
    require_status(GameStatus::Playing)?;
    let max_pins = with_engine(|e| e.rules().max_pins);
    let (points, pins) = parse_throw(&params, max_pins)?;
    with_engine_mut(|e| e.record_score(points, pins));
    Ok(state::export_view_json())
}

/// Turn form params into `(points, pins_knocked)`.
pub fn parse_throw(
    params: &[(String, String)],
    max_pins: u32,
) -> Result<(u32, Option<u32>), RequestError> {
    let throw = match get_param(params, "kind") {
        Some("single") => {
            let pin: u32 = require_number(params, "pin")?;
            if !(1..=max_pins).contains(&pin) {
                return Err(RequestError::InvalidThrow(format!("pin must be 1-{max_pins}")));
            }
            Throw::Single(pin)
        }
        Some("multi") => {
            let count: u32 = require_number(params, "count")?;
            if !(2..=max_pins).contains(&count) {
                return Err(RequestError::InvalidThrow(format!("count must be 2-{max_pins}")));
            }
            Throw::Multi(count)
        }
        Some("miss") => Throw::Miss,
        Some(_) => return Err(RequestError::InvalidParam("kind")),
        None => {
            let points: u32 = require_number(params, "points")?;
            if points > max_pins {
                return Err(RequestError::InvalidThrow(format!("points must be 0-{max_pins}")));
            }
            let pins = match get_param(params, "pins") {
                Some(p) if !p.is_empty() => {
                    let pins: u32 = p.trim().parse().map_err(|_| RequestError::InvalidParam("pins"))?;
                    if points == 0 {
                        return Err(RequestError::InvalidThrow("a miss knocks no pins".into()));
                    }
                    if !(1..=max_pins).contains(&pins) {
                        return Err(RequestError::InvalidThrow(format!("pins must be 1-{max_pins}")));
                    }
                    Some(pins)
                }
                _ => None,
            };
            return Ok((points, pins));
        }
    };
    Ok(throw.points_and_pins())
}

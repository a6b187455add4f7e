//! `/api/teams` and `/api/players`: roster editing during setup.
//!
//! The engine accepts any roster edit; the limits the scoring page promises
//! (names, caps, setup-only) are enforced here.

use crate::config::RulesConfig;
use crate::error::RequestError;
use crate::game::model::{GameStatus, PlayerId, TeamId};
use crate::game::state::{self, with_engine, with_engine_mut};
use crate::routes::util::{get_param, parse_form_body, require_number, require_param, respond};

/// Trim and check a team or player name.
pub fn validate_name(raw: &str, rules: &RulesConfig) -> Result<String, RequestError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(RequestError::EmptyName);
    }
    if name.chars().count() > rules.max_name_len {
        return Err(RequestError::NameTooLong(rules.max_name_len));
    }
    Ok(name.to_string())
}

fn require_setup() -> Result<(), RequestError> {
    with_engine(|e| match e.state().game_status {
        GameStatus::Setup => Ok(()),
        GameStatus::Playing => Err(RequestError::WrongPhase("playing")),
        GameStatus::Paused => Err(RequestError::WrongPhase("paused")),
        GameStatus::Finished => Err(RequestError::WrongPhase("finished")),
    })
}

fn require_team(id: TeamId) -> Result<(), RequestError> {
    with_engine(|e| e.state().find_team(id).map(|_| ()))
        .ok_or(RequestError::UnknownTeam(id.0))
}

// ── POST /api/teams ────────────────────────────────────────────────

/// Handle POST /api/teams
/// Body params:
///   - action=add&name={name}     → add a team
///   - action=remove&team={id}    → remove a team
///
/// Returns the state view JSON.
pub fn handle_teams_post(body: &str) -> String {
    respond(teams_post(body))
}

fn teams_post(body: &str) -> Result<String, RequestError> {
    let params = parse_form_body(body);
    require_setup()?;

    match get_param(&params, "action").unwrap_or("") {
        "add" => {
            let rules = with_engine(|e| e.rules().clone());
            let name = validate_name(require_param(&params, "name")?, &rules)?;
            let count = with_engine(|e| e.state().teams.len());
            if count >= rules.max_teams {
                return Err(RequestError::TooManyTeams(rules.max_teams));
            }
            with_engine_mut(|e| e.add_team(&name));
        }
        "remove" => {
            let team = TeamId(require_number(&params, "team")?);
            require_team(team)?;
            with_engine_mut(|e| e.remove_team(team));
        }
        _ => return Err(RequestError::InvalidParam("action")),
    }

    Ok(state::export_view_json())
}

// ── POST /api/players ──────────────────────────────────────────────

/// Handle POST /api/players
/// Body params:
///   - action=add&team={id}&name={name}        → add a player
///   - action=remove&team={id}&player={id}     → remove a player
///
/// Returns the state view JSON.
pub fn handle_players_post(body: &str) -> String {
    respond(players_post(body))
}

fn players_post(body: &str) -> Result<String, RequestError> {
    let params = parse_form_body(body);
    require_setup()?;
    let team = TeamId(require_number(&params, "team")?);
    require_team(team)?;

    match get_param(&params, "action").unwrap_or("") {
        "add" => {
            let rules = with_engine(|e| e.rules().clone());
            let name = validate_name(require_param(&params, "name")?, &rules)?;
            let count = with_engine(|e| e.state().find_team(team).map_or(0, |t| t.players.len()));
            if count >= rules.max_players_per_team {
                return Err(RequestError::TooManyPlayers(rules.max_players_per_team));
            }
            with_engine_mut(|e| e.add_player(team, &name));
        }
        "remove" => {
            let player = PlayerId(require_number(&params, "player")?);
            if !with_engine_mut(|e| e.remove_player(team, player)) {
                return Err(RequestError::UnknownPlayer(player.0));
            }
        }
        _ => return Err(RequestError::InvalidParam("action")),
    }

    Ok(state::export_view_json())
}

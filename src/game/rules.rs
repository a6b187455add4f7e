//! Mölkky scoring rules as pure transitions over `GameState`.
//!
//! Each function takes the previous snapshot by reference and returns a new
//! one; nothing here touches the engine slot, the undo stack or the clock.

use chrono::{DateTime, Utc};

use crate::config::RulesConfig;
use crate::game::model::{EventAction, EventId, GameEvent, GameState, GameStatus, Team, TeamId};

/// A recorded throw as the page reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Throw {
    /// Exactly one pin fell; it scores its number.
    Single(u32),
    /// Several pins fell; each counts one point.
    Multi(u32),
    Miss,
}

impl Throw {
    /// `(points, pins_knocked)` for `record_score`.
    pub fn points_and_pins(self) -> (u32, Option<u32>) {
        match self {
            Throw::Single(pin) => (pin, Some(1)),
            Throw::Multi(count) => (count, Some(count)),
            Throw::Miss => (0, None),
        }
    }
}

/// Apply one throw by the current player of the current team.
///
/// Returns `None` when there is no current team or player; the caller keeps
/// its state untouched in that case.
pub fn apply_throw(
    prev: &GameState,
    points: u32,
    pins_knocked: Option<u32>,
    event_id: EventId,
    now: DateTime<Utc>,
    rules: &RulesConfig,
) -> Option<GameState> {
    let team = prev.current_team()?;
    let player = prev.current_player()?;

    let raw = team.score.saturating_add(points);
    let busted = raw > rules.target_score;
    let final_score = if busted { rules.bust_reset_score } else { raw };

    let event = GameEvent {
        id: event_id,
        timestamp: now,
        team_id: team.id,
        player_id: player.id,
        action: if points > 0 { EventAction::Score } else { EventAction::Miss },
        points: Some(points),
        pins_knocked,
        details: busted.then(|| rules.bust_detail()),
    };

    let current_id = team.id;
    let teams: Vec<Team> = prev
        .teams
        .iter()
        .map(|t| {
            let mut t = t.clone();
            if t.id == current_id {
                t.score = final_score;
                t.consecutive_misses = if points > 0 {
                    0
                } else {
                    (t.consecutive_misses + 1).min(rules.miss_limit)
                };
            }
            t.is_eliminated = t.is_eliminated || t.consecutive_misses >= rules.miss_limit;
            t
        })
        .collect();

    let winner = find_winner(&teams, rules);

    let mut history = prev.history.clone();
    history.push(event);

    let mut next = GameState {
        teams,
        current_team_index: prev.current_team_index,
        current_player_index: prev.current_player_index,
        game_status: prev.game_status,
        winner,
        history,
    };

    match winner {
        Some(id) => {
            next.game_status = GameStatus::Finished;
            if let Some(t) = next.find_team(id) {
                tracing::info!(team = %t.name, score = t.score, "game won");
            }
        }
        None => {
            let (team_idx, player_idx) =
                next_turn_indices(&next.teams, prev.current_team_index, prev.current_player_index);
            next.current_team_index = team_idx;
            next.current_player_index = player_idx;
        }
    }

    Some(next)
}

/// Score winner first (first team in order sitting exactly on target), then
/// last team standing.
pub fn find_winner(teams: &[Team], rules: &RulesConfig) -> Option<TeamId> {
    if let Some(t) = teams.iter().find(|t| t.score == rules.target_score) {
        return Some(t.id);
    }
    let mut active = teams.iter().filter(|t| !t.is_eliminated);
    match (active.next(), active.next()) {
        (Some(only), None) => Some(only.id),
        _ => None,
    }
}

/// Next `(team, player)` indices after a turn ends.
///
/// Team: the next non-eliminated team after `team_idx`, wrapping. The scan
/// is bounded by the team count; if every team is eliminated the plain
/// successor is returned.
///
/// Player: `(player_idx + 1) % players_of_next_team`. The outgoing index is
/// carried across teams, so all teams share one rotation counter instead of
/// each remembering its own next thrower.
pub fn next_turn_indices(teams: &[Team], team_idx: usize, player_idx: usize) -> (usize, usize) {
    let n = teams.len();
    if n == 0 {
        return (0, 0);
    }
    let first = (team_idx + 1) % n;
    let next_team = (0..n)
        .map(|step| (first + step) % n)
        .find(|&i| !teams[i].is_eliminated)
        .unwrap_or(first);

    let players = teams[next_team].players.len();
    let next_player = if players == 0 { 0 } else { (player_idx + 1) % players };
    (next_team, next_player)
}

/// Pass the turn without a throw. `None` when no team can play.
pub fn skip_turn(prev: &GameState) -> Option<GameState> {
    if prev.active_team_count() == 0 {
        return None;
    }
    let (team_idx, player_idx) =
        next_turn_indices(&prev.teams, prev.current_team_index, prev.current_player_index);
    Some(GameState {
        current_team_index: team_idx,
        current_player_index: player_idx,
        ..prev.clone()
    })
}

/// Zero every team and return to setup; rosters are kept.
pub fn reset(prev: &GameState) -> GameState {
    GameState {
        teams: prev
            .teams
            .iter()
            .map(|t| Team {
                score: 0,
                consecutive_misses: 0,
                is_eliminated: false,
                ..t.clone()
            })
            .collect(),
        current_team_index: 0,
        current_player_index: 0,
        game_status: GameStatus::Setup,
        winner: None,
        history: Vec::new(),
    }
}

//! Derived per-team statistics. Computed on demand from the event log and
//! never stored.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::game::model::{EventAction, GameState, GameStatus, TeamId};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStats {
    pub team_id: TeamId,
    pub total_points: u32,
    pub average_score: f64,
    pub miss_count: u32,
    pub successful_throws: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStats {
    pub total_rounds: usize,
    /// First event's timestamp, or `now` when nothing has been thrown yet.
    pub game_start_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_end_time: Option<DateTime<Utc>>,
    pub team_stats: Vec<TeamStats>,
}

pub fn compute(state: &GameState, now: DateTime<Utc>) -> GameStats {
    let game_start_time = state.history.first().map(|e| e.timestamp).unwrap_or(now);
    let game_end_time = (state.game_status == GameStatus::Finished).then_some(now);

    let mut total_rounds = 0;
    let team_stats = state
        .teams
        .iter()
        .map(|team| {
            let events: Vec<_> = state.history.iter().filter(|e| e.team_id == team.id).collect();
            total_rounds = total_rounds.max(events.len());

            let total_points: u32 = events.iter().filter_map(|e| e.points).sum();
            let successful_throws = events
                .iter()
                .filter(|e| e.action == EventAction::Score && e.points.unwrap_or(0) > 0)
                .count() as u32;
            let miss_count = events.iter().filter(|e| e.action == EventAction::Miss).count() as u32;
            let average_score = if successful_throws > 0 {
                f64::from(total_points) / f64::from(successful_throws)
            } else {
                0.0
            };

            TeamStats {
                team_id: team.id,
                total_points,
                average_score,
                miss_count,
                successful_throws,
            }
        })
        .collect();

    GameStats {
        total_rounds,
        game_start_time,
        game_end_time,
        team_stats,
    }
}

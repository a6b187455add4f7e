//! Game data model: players, teams, the event log and the aggregate state.
//!
//! Everything here derives Serialize so the page (and the export layer) can
//! render snapshots straight from JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Team identifier, minted by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub u64);

/// Player identifier, minted by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

/// Event identifier, minted by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub players: Vec<Player>,
    /// Always within `0..=target_score`.
    pub score: u32,
    pub consecutive_misses: u32,
    /// Sticky: once set it stays set until the game is reset.
    pub is_eliminated: bool,
}

impl Team {
    pub fn new(id: TeamId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            players: Vec::new(),
            score: 0,
            consecutive_misses: 0,
            is_eliminated: false,
        }
    }

    pub fn find_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }
}

/// What a logged event records.
///
/// The engine only emits `Score` and `Miss`; the other two are part of the
/// log vocabulary so exported histories stay readable by other tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    Score,
    Miss,
    Eliminate,
    ResetScore,
}

impl EventAction {
    pub fn label(self) -> &'static str {
        match self {
            EventAction::Score => "Score",
            EventAction::Miss => "Miss",
            EventAction::Eliminate => "Eliminate",
            EventAction::ResetScore => "Reset Score",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameEvent {
    pub id: EventId,
    pub timestamp: DateTime<Utc>,
    pub team_id: TeamId,
    pub player_id: PlayerId,
    pub action: EventAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pins_knocked: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    #[default]
    Setup,
    Playing,
    /// Reserved. No transition enters it.
    Paused,
    Finished,
}

/// The aggregate root. Treated as immutable once built: every transition
/// produces a fresh value, so earlier snapshots can be shared by the undo
/// stack without copying.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub teams: Vec<Team>,
    pub current_team_index: usize,
    pub current_player_index: usize,
    pub game_status: GameStatus,
    /// Back-reference into `teams`; resolve with [`GameState::winner_team`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<TeamId>,
    pub history: Vec<GameEvent>,
}

impl GameState {
    pub fn find_team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn current_team(&self) -> Option<&Team> {
        self.teams.get(self.current_team_index)
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.current_team()
            .and_then(|t| t.players.get(self.current_player_index))
    }

    pub fn winner_team(&self) -> Option<&Team> {
        self.winner.and_then(|id| self.find_team(id))
    }

    pub fn active_team_count(&self) -> usize {
        self.teams.iter().filter(|t| !t.is_eliminated).count()
    }
}

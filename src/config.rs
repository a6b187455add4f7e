//! Rule and roster limits.
//!
//! Defaults are the standard Mölkky rules plus the roster caps of the
//! scoring page. A page may override any subset with a JSON object;
//! missing fields keep their defaults.

use serde::{Deserialize, Serialize};

use crate::error::RequestError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Exact score that wins the game.
    pub target_score: u32,
    /// Score a team falls back to after overshooting the target.
    pub bust_reset_score: u32,
    /// Consecutive misses that eliminate a team.
    pub miss_limit: u32,
    /// How long a recorded throw blocks the next one (double-tap debounce).
    pub cooldown_ms: u64,
    pub max_teams: usize,
    pub max_players_per_team: usize,
    pub max_name_len: usize,
    /// Highest pin number on the field.
    pub max_pins: u32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            target_score: 50,
            bust_reset_score: 25,
            miss_limit: 3,
            cooldown_ms: 300,
            max_teams: 4,
            max_players_per_team: 4,
            max_name_len: 20,
            max_pins: 12,
        }
    }
}

impl RulesConfig {
    /// Parse and validate a (possibly partial) JSON override.
    pub fn from_json(json: &str) -> Result<Self, RequestError> {
        let config: RulesConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), RequestError> {
        if self.target_score == 0 {
            return Err(RequestError::InvalidConfig("target_score must be positive".into()));
        }
        if self.bust_reset_score >= self.target_score {
            return Err(RequestError::InvalidConfig(
                "bust_reset_score must be below target_score".into(),
            ));
        }
        if self.miss_limit == 0 {
            return Err(RequestError::InvalidConfig("miss_limit must be positive".into()));
        }
        if self.max_teams < 2 {
            return Err(RequestError::InvalidConfig("max_teams must be at least 2".into()));
        }
        if self.max_players_per_team == 0 || self.max_name_len == 0 || self.max_pins == 0 {
            return Err(RequestError::InvalidConfig("limits must be positive".into()));
        }
        Ok(())
    }

    /// Text recorded on the event of a throw that overshot the target.
    pub fn bust_detail(&self) -> String {
        format!(
            "Score reset to {} (exceeded {})",
            self.bust_reset_score, self.target_score
        )
    }
}

//! Errors surfaced by the request layer.
//!
//! The engine never fails; these describe requests the page should not have
//! sent (bad params, wrong phase, roster caps).

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("Missing {0} parameter")]
    MissingParam(&'static str),

    #[error("Invalid {0} parameter")]
    InvalidParam(&'static str),

    #[error("Name must not be empty")]
    EmptyName,

    #[error("Name is longer than {0} characters")]
    NameTooLong(usize),

    #[error("Roster is full (at most {0} teams)")]
    TooManyTeams(usize),

    #[error("Team is full (at most {0} players)")]
    TooManyPlayers(usize),

    #[error("Unknown team {0}")]
    UnknownTeam(u64),

    #[error("Unknown player {0}")]
    UnknownPlayer(u64),

    #[error("Not allowed while the game is {0}")]
    WrongPhase(&'static str),

    #[error("Need at least two teams, each with a player")]
    RosterIncomplete,

    #[error("Invalid throw: {0}")]
    InvalidThrow(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl RequestError {
    /// JSON body returned to the page for a rejected request.
    pub fn to_json(&self) -> String {
        serde_json::json!({ "error": self.to_string() }).to_string()
    }
}

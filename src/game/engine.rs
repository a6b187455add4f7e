//! The game state engine: the current snapshot, its undo stack and the
//! operations the page calls.
//!
//! Snapshots are `Rc<GameState>` and never mutated after construction. A
//! transition builds a new state, pushes the old `Rc` onto the undo stack
//! and swaps the new one in, so undo is a pointer pop rather than a replay.
//!
//! Unknown ids are silently ignored. Callers detect no-ops through the
//! returned flag or by reading the state back.

use chrono::{DateTime, Utc};
use std::rc::Rc;

use crate::config::RulesConfig;
use crate::game::clock::{Clock, SystemClock};
use crate::game::guard::ScoreGuard;
use crate::game::model::{EventId, GameState, GameStatus, Player, PlayerId, Team, TeamId};
use crate::game::rules;
use crate::game::stats::{self, GameStats};

pub struct GameEngine {
    state: Rc<GameState>,
    undo: Vec<Rc<GameState>>,
    guard: ScoreGuard,
    rules: RulesConfig,
    clock: Box<dyn Clock>,
    next_id: u64,
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new(RulesConfig::default())
    }
}

impl GameEngine {
    pub fn new(rules: RulesConfig) -> Self {
        Self::with_clock(rules, Box::new(SystemClock))
    }

    pub fn with_clock(rules: RulesConfig, clock: Box<dyn Clock>) -> Self {
        Self {
            state: Rc::new(GameState::default()),
            undo: Vec::new(),
            guard: ScoreGuard::default(),
            rules,
            clock,
            next_id: 1,
        }
    }

    // ── Queries ────────────────────────────────────────────────────

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Shared handle to the current snapshot.
    pub fn snapshot(&self) -> Rc<GameState> {
        Rc::clone(&self.state)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    pub fn set_rules(&mut self, rules: RulesConfig) {
        self.rules = rules;
    }

    /// Current time as the engine sees it.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn stats(&self) -> GameStats {
        stats::compute(&self.state, self.clock.now())
    }

    // ── Roster ─────────────────────────────────────────────────────

    /// Append a team. Name and roster-size checks are the caller's job.
    pub fn add_team(&mut self, name: &str) -> TeamId {
        let id = TeamId(self.mint_id());
        let mut next = GameState::clone(&self.state);
        next.teams.push(Team::new(id, name));
        self.state = Rc::new(next);
        tracing::debug!(team = name, id = id.0, "team added");
        id
    }

    pub fn remove_team(&mut self, team_id: TeamId) -> bool {
        if self.state.find_team(team_id).is_none() {
            return false;
        }
        let mut next = GameState::clone(&self.state);
        next.teams.retain(|t| t.id != team_id);
        self.state = Rc::new(next);
        tracing::debug!(id = team_id.0, "team removed");
        true
    }

    /// Append a player to a team. `None` if the team does not exist.
    pub fn add_player(&mut self, team_id: TeamId, name: &str) -> Option<PlayerId> {
        let pos = self.state.teams.iter().position(|t| t.id == team_id)?;
        let id = PlayerId(self.mint_id());
        let mut next = GameState::clone(&self.state);
        next.teams[pos].players.push(Player {
            id,
            name: name.to_string(),
        });
        self.state = Rc::new(next);
        tracing::debug!(team = team_id.0, player = name, "player added");
        Some(id)
    }

    pub fn remove_player(&mut self, team_id: TeamId, player_id: PlayerId) -> bool {
        let Some(pos) = self.state.teams.iter().position(|t| t.id == team_id) else {
            return false;
        };
        if self.state.teams[pos].find_player(player_id).is_none() {
            return false;
        }
        let mut next = GameState::clone(&self.state);
        next.teams[pos].players.retain(|p| p.id != player_id);
        self.state = Rc::new(next);
        tracing::debug!(team = team_id.0, player = player_id.0, "player removed");
        true
    }

    // ── Game flow ──────────────────────────────────────────────────

    /// `setup → playing`. Roster minimums are the caller's job.
    pub fn start_game(&mut self) {
        let next = GameState {
            game_status: GameStatus::Playing,
            ..GameState::clone(&self.state)
        };
        self.state = Rc::new(next);
        tracing::info!(teams = self.state.teams.len(), "game started");
    }

    /// Record a throw for the current player. Returns whether it was applied.
    ///
    /// Dropped when the game is already finished, when the double-tap guard
    /// is still engaged, or when there is no current team/player.
    ///
    /// The undo snapshot is pushed only once the throw is applied, so a
    /// dropped or aborted throw never makes `can_undo` true on its own.
    pub fn record_score(&mut self, points: u32, pins_knocked: Option<u32>) -> bool {
        if self.state.game_status == GameStatus::Finished {
            tracing::debug!(points, "throw ignored, game is finished");
            return false;
        }

        let now = self.clock.now();
        if !self.guard.try_engage(now, self.rules.cooldown_ms) {
            tracing::warn!(points, "throw dropped, previous throw still settling");
            return false;
        }

        let event_id = EventId(self.next_id);
        let Some(next) = rules::apply_throw(&self.state, points, pins_knocked, event_id, now, &self.rules)
        else {
            self.guard.release();
            tracing::debug!(points, "throw ignored, no current team or player");
            return false;
        };
        self.next_id += 1;

        for (before, after) in self.state.teams.iter().zip(&next.teams) {
            if after.is_eliminated && !before.is_eliminated {
                tracing::info!(team = %after.name, "team eliminated after consecutive misses");
            }
        }
        if let Some(team) = self.state.current_team() {
            tracing::debug!(team = %team.name, points, "throw recorded");
        }

        self.undo.push(Rc::clone(&self.state));
        self.state = Rc::new(next);
        true
    }

    /// Pass the turn to the next active team without recording a throw.
    pub fn next_turn(&mut self) -> bool {
        if self.state.game_status == GameStatus::Finished {
            return false;
        }
        match rules::skip_turn(&self.state) {
            Some(next) => {
                self.state = Rc::new(next);
                true
            }
            None => false,
        }
    }

    /// Back to setup with zeroed teams and an empty undo stack.
    pub fn reset_game(&mut self) {
        self.state = Rc::new(rules::reset(&self.state));
        self.undo.clear();
        self.guard.release();
        tracing::info!("game reset");
    }

    /// Restore the snapshot taken before the last recorded throw.
    pub fn undo_last_action(&mut self) -> bool {
        match self.undo.pop() {
            Some(prev) => {
                self.state = prev;
                tracing::debug!(remaining = self.undo.len(), "undo");
                true
            }
            None => false,
        }
    }

    fn mint_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::clock::ManualClock;
    use crate::game::model::EventAction;

    fn engine() -> (GameEngine, ManualClock) {
        let clock = ManualClock::default();
        let engine = GameEngine::with_clock(RulesConfig::default(), Box::new(clock.clone()));
        (engine, clock)
    }

    /// Two teams with one player each, already playing.
    fn two_team_game() -> (GameEngine, ManualClock, TeamId, TeamId) {
        let (mut e, clock) = engine();
        let a = e.add_team("A");
        let b = e.add_team("B");
        e.add_player(a, "Al");
        e.add_player(b, "Bo");
        e.start_game();
        (e, clock, a, b)
    }

    /// Record a throw and let the cooldown elapse.
    fn throw(e: &mut GameEngine, clock: &ManualClock, points: u32) -> bool {
        let applied = e.record_score(points, None);
        clock.advance_ms(300);
        applied
    }

    #[test]
    fn roster_edits() {
        let (mut e, _) = engine();
        let a = e.add_team("A");
        let b = e.add_team("B");
        let p = e.add_player(a, "Al").unwrap();
        assert_eq!(e.state().teams.len(), 2);
        assert_eq!(e.state().teams[0].players.len(), 1);

        assert!(e.remove_player(a, p));
        assert!(e.state().teams[0].players.is_empty());
        assert!(e.remove_team(b));
        assert_eq!(e.state().teams.len(), 1);
    }

    #[test]
    fn unknown_ids_are_noops() {
        let (mut e, _) = engine();
        let a = e.add_team("A");
        let before = e.snapshot();
        assert!(e.add_player(TeamId(999), "Ghost").is_none());
        assert!(!e.remove_team(TeamId(999)));
        assert!(!e.remove_player(a, PlayerId(999)));
        assert!(!e.remove_player(TeamId(999), PlayerId(1)));
        assert_eq!(*e.state(), *before);
    }

    #[test]
    fn ids_are_unique() {
        let (mut e, _) = engine();
        let a = e.add_team("A");
        let b = e.add_team("A");
        let p = e.add_player(a, "Al").unwrap();
        assert_ne!(a, b);
        assert_ne!(a.0, p.0);
    }

    #[test]
    fn start_changes_only_status() {
        let (mut e, _) = engine();
        e.add_team("A");
        e.start_game();
        assert_eq!(e.state().game_status, GameStatus::Playing);
        assert_eq!(e.state().teams.len(), 1);
        assert!(!e.can_undo());
    }

    #[test]
    fn fifty_in_one_throw_wins() {
        let (mut e, clock, a, _) = two_team_game();
        assert!(throw(&mut e, &clock, 50));
        let s = e.state();
        assert_eq!(s.teams[0].score, 50);
        assert_eq!(s.winner, Some(a));
        assert_eq!(s.winner_team().map(|t| t.name.as_str()), Some("A"));
        assert_eq!(s.game_status, GameStatus::Finished);
    }

    #[test]
    fn bust_resets_to_25() {
        let (mut e, clock, _, _) = two_team_game();
        for points in [12, 1, 12, 1, 12, 1, 12, 1] {
            throw(&mut e, &clock, points);
        }
        assert_eq!(e.state().teams[0].score, 48);
        throw(&mut e, &clock, 5);
        let s = e.state();
        assert_eq!(s.teams[0].score, 25);
        let last = s.history.last().unwrap();
        assert_eq!(last.details.as_deref(), Some("Score reset to 25 (exceeded 50)"));
        assert_eq!(last.action, EventAction::Score);
    }

    #[test]
    fn three_misses_eliminate_and_other_team_wins() {
        let (mut e, clock, a, b) = two_team_game();
        for _ in 0..2 {
            throw(&mut e, &clock, 0); // A
            throw(&mut e, &clock, 4); // B
        }
        assert!(!e.state().find_team(a).unwrap().is_eliminated);
        throw(&mut e, &clock, 0);
        let s = e.state();
        assert!(s.find_team(a).unwrap().is_eliminated);
        assert_eq!(s.find_team(a).unwrap().consecutive_misses, 3);
        assert_eq!(s.winner, Some(b));
        assert_eq!(s.game_status, GameStatus::Finished);
    }

    #[test]
    fn duplicate_tap_inside_cooldown_is_dropped() {
        let (mut e, clock, _, _) = two_team_game();
        assert!(e.record_score(5, Some(1)));
        clock.advance_ms(100);
        assert!(!e.record_score(5, Some(1)));
        assert_eq!(e.state().history.len(), 1);
        assert_eq!(e.undo_depth(), 1);

        clock.advance_ms(200);
        assert!(e.record_score(5, Some(1)));
        assert_eq!(e.state().history.len(), 2);
    }

    #[test]
    fn aborted_throw_releases_guard_and_keeps_state() {
        let (mut e, _) = engine();
        let a = e.add_team("A");
        e.add_team("B");
        e.start_game();
        let before = e.snapshot();
        assert!(!e.record_score(3, None));
        assert_eq!(*e.state(), *before);
        assert!(!e.can_undo());

        e.add_player(a, "Al");
        assert!(e.record_score(3, None), "guard was released by the abort");
    }

    #[test]
    fn undo_is_exact_inverse() {
        let (mut e, clock, _, _) = two_team_game();
        throw(&mut e, &clock, 7);
        let before = e.snapshot();
        throw(&mut e, &clock, 0);
        assert!(e.undo_last_action());
        assert_eq!(*e.state(), *before);
        assert!(Rc::ptr_eq(&e.snapshot(), &before));
    }

    #[test]
    fn undo_after_win_reopens_game() {
        let (mut e, clock, _, _) = two_team_game();
        throw(&mut e, &clock, 50);
        assert!(e.undo_last_action());
        assert_eq!(e.state().game_status, GameStatus::Playing);
        assert_eq!(e.state().winner, None);
        assert_eq!(e.state().teams[0].score, 0);
    }

    #[test]
    fn undo_drains_to_noop() {
        let (mut e, clock, _, _) = two_team_game();
        throw(&mut e, &clock, 1);
        throw(&mut e, &clock, 2);
        assert!(e.undo_last_action());
        assert!(e.undo_last_action());
        assert!(!e.can_undo());
        assert!(!e.undo_last_action());
        assert!(e.state().history.is_empty());
    }

    #[test]
    fn winner_is_stable_until_reset() {
        let (mut e, clock, a, _) = two_team_game();
        throw(&mut e, &clock, 50);
        assert!(!throw(&mut e, &clock, 6));
        assert!(!e.next_turn());
        assert_eq!(e.state().winner, Some(a));
        assert_eq!(e.state().teams[0].score, 50);
    }

    #[test]
    fn reset_clears_everything_but_roster() {
        let (mut e, clock, _, _) = two_team_game();
        throw(&mut e, &clock, 0);
        throw(&mut e, &clock, 50);
        e.reset_game();
        let s = e.state();
        assert_eq!(s.game_status, GameStatus::Setup);
        assert!(s.history.is_empty());
        assert_eq!(s.winner, None);
        assert!(s.teams.iter().all(|t| t.score == 0 && t.consecutive_misses == 0 && !t.is_eliminated));
        assert_eq!(s.teams.iter().map(|t| t.players.len()).sum::<usize>(), 2);
        assert!(!e.can_undo());
    }

    #[test]
    fn next_turn_rotates_without_undo_entry() {
        let (mut e, _, _, _) = two_team_game();
        assert!(e.next_turn());
        assert_eq!(e.state().current_team_index, 1);
        assert!(!e.can_undo());
        assert!(e.state().history.is_empty());
    }

    #[test]
    fn stats_follow_history() {
        let (mut e, clock, a, _) = two_team_game();
        throw(&mut e, &clock, 8);
        throw(&mut e, &clock, 0);
        throw(&mut e, &clock, 4);
        let stats = e.stats();
        let sa = stats.team_stats.iter().find(|s| s.team_id == a).unwrap();
        assert_eq!(sa.total_points, 12);
        assert_eq!(sa.average_score, 6.0);
        assert_eq!(stats.total_rounds, 2);
        assert_eq!(stats.team_stats[1].average_score, 0.0);
    }
}

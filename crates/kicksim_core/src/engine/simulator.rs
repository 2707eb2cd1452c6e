//! # Match Simulator
//!
//! Owns the match core, both rosters of decision-makers and the history.
//! A match is driven one tick at a time with [`Simulator::step_if_playing`]
//! or to completion with [`Simulator::play_match`].
//!
//! ## Tick order
//! 1. snapshot the environment into history
//! 2. clear `acted` flags, run the state's setup
//! 3. ask every player for an action (see [`turn_order`](crate::engine::turn_order)),
//!    record it, resolve it
//! 4. cap speeds, keep players near the pitch
//! 5. run the state's transition (collisions, ball out, next state)
//! 6. decay velocities, advance the tick
//!
//! ## Usage
//! ```rust
//! use kicksim_core::engine::simulator::Simulator;
//! use kicksim_core::engine::config::Settings;
//! use kicksim_core::agents::SimplePlayer;
//! use kicksim_core::engine::environment::TeamSide;
//!
//! let mut sim = Simulator::builder(
//!     SimplePlayer::team(3, TeamSide::Team1),
//!     SimplePlayer::team(3, TeamSide::Team2),
//! )
//! .seed(7)
//! .settings(Settings::default().with_ticks_per_time(50))
//! .build()
//! .unwrap();
//! sim.play_match();
//! assert_eq!(sim.environment().tick, 101);
//! ```

use crate::agents::SimplePlayer;
use crate::engine::action::ActionRecord;
use crate::engine::config::Settings;
use crate::engine::decision::{GameState, Roster};
use crate::engine::environment::{Environment, MatchState, TeamSide};
use crate::engine::match_core::MatchCore;
use crate::engine::physics_constants::rules::START_COIN_THRESHOLD;
use crate::engine::pitch::Pitch;
use crate::engine::turn_order::{plan_turns, Snapshot};
use crate::error::{Result, SimError};
use crate::replay::export::{self, ExportHeader};
use crate::replay::History;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_TEAM_NAMES: [&str; 2] = ["Team A", "Team B"];

fn time_seed() -> u64 {
    chrono::Utc::now().timestamp_millis().unsigned_abs()
}

/// Builder for a [`Simulator`] with non-default names, seed or settings
pub struct SimulatorBuilder {
    teams: [Roster; 2],
    team_names: [String; 2],
    seed: Option<u64>,
    settings: Settings,
}

impl SimulatorBuilder {
    pub fn team_names(mut self, team1: impl Into<String>, team2: impl Into<String>) -> Self {
        self.team_names = [team1.into(), team2.into()];
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Validate the settings and assemble the simulator.
    pub fn build(self) -> Result<Simulator> {
        self.settings.check()?;
        let seed = self.seed.unwrap_or_else(time_seed);
        Ok(Simulator::assemble(self.teams, self.team_names, seed, self.settings))
    }
}

/// A single match between two rosters
pub struct Simulator {
    core: MatchCore,
    teams: [Roster; 2],
    team_names: [String; 2],
    history: History,
    /// Persistent permutation of flat player slots used for shuffled turns
    shuffled: Vec<usize>,
    started_team2: bool,
    seed: u64,
}

impl Simulator {
    /// Default names, small-pitch settings and a time-derived seed.
    pub fn new(team1: Roster, team2: Roster) -> Self {
        let names = DEFAULT_TEAM_NAMES.map(String::from);
        Self::assemble([team1, team2], names, time_seed(), Settings::default())
    }

    pub fn builder(team1: Roster, team2: Roster) -> SimulatorBuilder {
        SimulatorBuilder {
            teams: [team1, team2],
            team_names: DEFAULT_TEAM_NAMES.map(String::from),
            seed: None,
            settings: Settings::default(),
        }
    }

    /// Two rosters of [`SimplePlayer`]s on the default pitch.
    pub fn with_simple_players(n_players1: usize, n_players2: usize, seed: u64) -> Self {
        let teams = [
            SimplePlayer::team(n_players1, TeamSide::Team1),
            SimplePlayer::team(n_players2, TeamSide::Team2),
        ];
        Self::assemble(teams, DEFAULT_TEAM_NAMES.map(String::from), seed, Settings::default())
    }

    fn assemble(teams: [Roster; 2], team_names: [String; 2], seed: u64, settings: Settings) -> Self {
        let n1 = teams[0].len();
        let n2 = teams[1].len();
        Self {
            core: MatchCore::new(settings, n1, n2, seed),
            teams,
            team_names,
            history: History::new(),
            shuffled: (0..n1 + n2).collect(),
            started_team2: false,
            seed,
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Read-only snapshot as handed to decision-makers.
    pub fn game_state(&self) -> GameState {
        GameState {
            settings: self.core.settings.clone(),
            env: self.core.env.clone(),
            pitch: self.core.pitch.clone(),
        }
    }

    /// One-line summary, e.g. `"Team A (left) vs Team B (right) 1-0 tick:42 Play"`.
    pub fn state_string(&self) -> String {
        let env = &self.core.env;
        let (side1, side2) = if env.halftime_passed {
            (" (right) ", " (left) ")
        } else {
            (" (left) ", " (right) ")
        };
        format!(
            "{}{}vs {}{}{}-{} tick:{} {}",
            self.team_names[0], side1, self.team_names[1], side2, env.score1, env.score2, env.tick, env.state
        )
    }

    pub fn random_seed(&self) -> u64 {
        self.seed
    }

    pub fn team_names(&self) -> [&str; 2] {
        [self.team_names[0].as_str(), self.team_names[1].as_str()]
    }

    /// Whether team 2 won the coin flip and kicked off first.
    pub fn started_team2(&self) -> bool {
        self.started_team2
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn settings(&self) -> &Settings {
        &self.core.settings
    }

    pub fn pitch(&self) -> &Pitch {
        &self.core.pitch
    }

    pub fn environment(&self) -> &Environment {
        &self.core.env
    }

    pub fn is_ended(&self) -> bool {
        self.core.env.state == MatchState::Ended
    }

    // ========================================================================
    // Driving the match
    // ========================================================================

    /// Advance one tick. Returns `false` once the match has ended.
    ///
    /// Tick 0 flips the coin for the first kickoff; tick `ticks_per_time`
    /// swaps sides and hands the kickoff to the other side.
    pub fn step_if_playing(&mut self) -> bool {
        let ticks_per_time = self.core.settings.ticks_per_time;
        let match_ticks = self.core.settings.match_ticks();
        let tick = self.core.env.tick;

        if tick == 0 {
            self.start_match();
        } else if tick == ticks_per_time {
            self.start_second_half();
        }

        if tick < match_ticks {
            self.step();
            return true;
        }

        if tick == match_ticks {
            self.history.finish(&self.core.env);
            self.core.env.tick += 1;
            info!(
                score1 = self.core.env.score1,
                score2 = self.core.env.score2,
                "match ended"
            );
        }
        self.core.env.state = MatchState::Ended;
        false
    }

    /// Run until the match ends and return the final environment.
    pub fn play_match(&mut self) -> &Environment {
        while self.step_if_playing() {}
        &self.core.env
    }

    fn start_match(&mut self) {
        self.started_team2 = self.core.rng.uniform() >= START_COIN_THRESHOLD;
        self.core.env.state = if self.started_team2 {
            MatchState::Kickoff2
        } else {
            MatchState::Kickoff1
        };
        info!(
            seed = self.seed,
            team1 = %self.team_names[0],
            team2 = %self.team_names[1],
            started_team2 = self.started_team2,
            "match started"
        );
    }

    fn start_second_half(&mut self) {
        self.core.env.state = if self.started_team2 {
            MatchState::Kickoff1
        } else {
            MatchState::Kickoff2
        };
        self.core.env.halftime_passed = true;
        info!(
            score1 = self.core.env.score1,
            score2 = self.core.env.score2,
            "half-time, sides swapped"
        );
    }

    fn step(&mut self) {
        self.history.begin_tick(&self.core.env);
        self.core.reset_players_acted();
        self.core.pre_state();
        self.players_act();
        self.core.limit_speed();
        self.core.limit_players_close_to_pitch();
        self.core.check_state();
        self.core.decay_speed();
        self.core.env.tick += 1;
    }

    fn players_act(&mut self) {
        let plan = plan_turns(&self.core.env, self.core.prev.state, &mut self.shuffled, &mut self.core.rng);
        let frozen = match plan.snapshot {
            Snapshot::Frozen => Some(self.game_state()),
            Snapshot::Fresh => None,
        };

        for (side, index) in plan.order {
            let fresh;
            let state = match &frozen {
                Some(state) => state,
                None => {
                    fresh = self.game_state();
                    &fresh
                }
            };
            let Some(brain) = self.teams[side.index()].get_mut(index) else {
                continue;
            };
            let action = brain.step(state);

            self.core.env.player_mut(side, index).acted = true;
            self.history.record_action(ActionRecord { team: side, player: index, action });
            self.core.process_action(&action, side, index);
        }
    }

    // ========================================================================
    // External control
    // ========================================================================

    /// Overwrite the running environment, e.g. to set up a scenario.
    ///
    /// The tick is capped at the match length. The half-time flag is set when
    /// the tick is in the second half and never cleared.
    pub fn set_environment(&mut self, env: Environment) -> Result<()> {
        for side in TeamSide::BOTH {
            let expected = self.teams[side.index()].len();
            let found = env.team(side).len();
            if expected != found {
                return Err(SimError::RosterMismatch { expected, found });
            }
        }

        let match_ticks = self.core.settings.match_ticks();
        let ticks_per_time = self.core.settings.ticks_per_time;
        let tick = env.tick.min(match_ticks);
        let halftime_passed = self.core.env.halftime_passed || env.halftime_passed || tick >= ticks_per_time;

        let live = &mut self.core.env;
        live.tick = tick;
        live.score1 = env.score1;
        live.score2 = env.score2;
        live.state = env.state;
        live.ball = env.ball;
        live.teams = env.teams;
        live.last_touched = env.last_touched;
        live.catch_ticks = env.catch_ticks;
        live.catch_owner = env.catch_owner;
        live.halftime_passed = halftime_passed;

        self.core.sync_prev();
        self.core.prev.state = MatchState::Inactive;
        Ok(())
    }

    /// Export the history as states/actions text files into `dir`.
    pub fn save_history<P: AsRef<Path>>(&self, dir: P) -> Result<(PathBuf, PathBuf)> {
        let header = ExportHeader {
            team_names: self.team_names(),
            settings: &self.core.settings,
        };
        export::save_history(dir, &self.history, &header, self.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::action::{Action, ActionType};
    use crate::engine::decision::build_team;
    use crate::engine::vec2::Vec2;
    use std::sync::{Arc, Mutex};

    fn idle_team(n: usize) -> Roster {
        build_team(n, |_| |_: &GameState| Action::noop())
    }

    fn short_match(n1: usize, n2: usize, seed: u64) -> Simulator {
        Simulator::builder(idle_team(n1), idle_team(n2))
            .seed(seed)
            .settings(Settings::default().with_ticks_per_time(5))
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_rejects_invalid_settings() {
        let mut settings = Settings::default();
        settings.ball_velocity_decay = 2.0;
        let result = Simulator::builder(idle_team(1), idle_team(1)).settings(settings).build();
        assert!(matches!(result, Err(SimError::InvalidSettings(_))));
    }

    #[test]
    fn test_builder_rejects_overlong_match() {
        let settings = Settings::default().with_ticks_per_time(u32::MAX / 2 + 1);
        let result = Simulator::builder(idle_team(1), idle_team(1)).settings(settings).build();
        assert!(matches!(result, Err(SimError::InvalidSettings(_))));
    }

    #[test]
    fn test_coin_flip_picks_either_side() {
        let mut team2_starts = 0;
        for seed in 0..40 {
            let mut sim = short_match(1, 1, seed);
            sim.step_if_playing();
            let expected = if sim.started_team2() { MatchState::Kickoff2 } else { MatchState::Kickoff1 };
            assert_eq!(sim.core.prev.state, expected);
            if sim.started_team2() {
                team2_starts += 1;
            }
        }
        assert!(team2_starts > 0 && team2_starts < 40, "team 2 started {team2_starts} of 40");
    }

    #[test]
    fn test_initial_state_string() {
        let sim = Simulator::builder(idle_team(1), idle_team(1))
            .team_names("Reds", "Blues")
            .seed(1)
            .build()
            .unwrap();
        assert_eq!(sim.state_string(), "Reds (left) vs Blues (right) 0-0 tick:0 Inactive");
        assert_eq!(sim.random_seed(), 1);
        assert_eq!(sim.team_names(), ["Reds", "Blues"]);
    }

    #[test]
    fn test_first_tick_is_a_kickoff() {
        let mut sim = short_match(2, 2, 3);
        assert!(sim.step_if_playing());
        assert_eq!(sim.environment().tick, 1);
        assert_eq!(sim.environment().state, MatchState::Play);
        let kicker = if sim.started_team2() { MatchState::Kickoff2 } else { MatchState::Kickoff1 };
        assert_eq!(sim.history().ticks()[0].env.tick, 0);
        assert_eq!(sim.core.prev.state, kicker);
    }

    #[test]
    fn test_halftime_swaps_sides_and_kickoff() {
        let mut sim = short_match(1, 1, 5);
        for _ in 0..5 {
            assert!(sim.step_if_playing());
        }
        assert!(!sim.environment().halftime_passed);
        assert!(sim.step_if_playing());
        assert!(sim.environment().halftime_passed);
        let second = if sim.started_team2() { MatchState::Kickoff1 } else { MatchState::Kickoff2 };
        assert_eq!(sim.history().tick(5).map(|t| t.env.state), Some(second));
        assert!(sim.state_string().contains("(right) vs"));
    }

    #[test]
    fn test_match_ends_after_both_halves() {
        let mut sim = short_match(1, 1, 8);
        let mut ticks = 0;
        while sim.step_if_playing() {
            ticks += 1;
        }
        assert_eq!(ticks, 10);
        assert!(sim.is_ended());
        assert_eq!(sim.environment().tick, 11);
        assert_eq!(sim.history().len(), 10);
        assert_eq!(sim.history().states().count(), 11);
        assert!(!sim.step_if_playing());
        assert_eq!(sim.environment().tick, 11);
    }

    #[test]
    fn test_every_player_acts_once_per_tick() {
        let mut sim = short_match(3, 2, 13);
        sim.step_if_playing();
        sim.step_if_playing();
        for record in sim.history().ticks() {
            assert_eq!(record.actions.len(), 5);
        }
        assert!(sim.environment().players().all(|(_, _, p)| p.acted));
    }

    #[test]
    fn test_restart_decisions_see_earlier_moves() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_by_mate = Arc::clone(&seen);
        let team1: Roster = vec![
            Box::new(|_: &GameState| Action::move_to(-5.0, 0.0, 0.0)),
            Box::new(move |s: &GameState| {
                if let Ok(mut log) = seen_by_mate.lock() {
                    log.push(s.env.teams[0][0].pos);
                }
                Action::noop()
            }),
        ];
        let mut sim = Simulator::builder(team1, idle_team(1)).seed(2).build().unwrap();
        let mut env = Environment::new(2, 1);
        env.teams[0][0].pos = Vec2::new(-0.5, 0.0);
        env.teams[0][1].pos = Vec2::new(-6.0, 3.0);
        env.teams[1][0].pos = Vec2::new(6.0, 0.0);
        env.tick = 1;
        env.state = MatchState::Kickoff1;
        sim.set_environment(env).unwrap();
        sim.step_if_playing();

        let log = seen.lock().unwrap();
        assert_eq!(log.as_slice(), &[Vec2::new(-5.0, 0.0)]);
        let actions = &sim.history().ticks()[0].actions;
        assert_eq!(actions[0].player, 0);
        assert_eq!(actions[0].action.kind, ActionType::Move);
    }

    #[test]
    fn test_play_decisions_share_frozen_snapshot() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let make = |seen: Arc<Mutex<Vec<Vec2>>>| {
            move |s: &GameState| {
                if let Ok(mut log) = seen.lock() {
                    log.push(s.env.ball.velocity);
                }
                Action::kick(0.0, 0.3)
            }
        };
        let team1: Roster = vec![Box::new(make(Arc::clone(&seen)))];
        let team2: Roster = vec![Box::new(make(Arc::clone(&seen)))];
        let mut sim = Simulator::builder(team1, team2).seed(4).build().unwrap();
        let mut env = Environment::new(1, 1);
        env.teams[0][0].pos = Vec2::new(-0.6, 0.0);
        env.teams[1][0].pos = Vec2::new(0.6, 0.0);
        env.teams[1][0].direction = std::f64::consts::PI;
        env.tick = 1;
        env.state = MatchState::Play;
        sim.set_environment(env).unwrap();
        sim.step_if_playing();

        let log = seen.lock().unwrap();
        assert_eq!(log.len(), 2);
        assert!(log.iter().all(|v| *v == Vec2::ZERO));
    }

    #[test]
    fn test_set_environment_roster_mismatch() {
        let mut sim = short_match(2, 2, 1);
        let err = sim.set_environment(Environment::new(2, 3)).unwrap_err();
        assert!(matches!(err, SimError::RosterMismatch { expected: 2, found: 3 }));
    }

    #[test]
    fn test_set_environment_clamps_tick_and_sets_halftime() {
        let mut sim = short_match(1, 1, 1);
        let mut env = Environment::new(1, 1);
        env.tick = 99;
        env.state = MatchState::Play;
        sim.set_environment(env).unwrap();
        assert_eq!(sim.environment().tick, 10);
        assert!(sim.environment().halftime_passed);
        assert_eq!(sim.core.prev.state, MatchState::Inactive);

        let mut early = Environment::new(1, 1);
        early.tick = 2;
        sim.set_environment(early).unwrap();
        assert!(sim.environment().halftime_passed);
    }

    #[test]
    fn test_same_seed_same_history() {
        let mut a = Simulator::with_simple_players(3, 3, 21);
        let mut b = Simulator::with_simple_players(3, 3, 21);
        for _ in 0..200 {
            a.step_if_playing();
            b.step_if_playing();
        }
        assert_eq!(a.history(), b.history());
    }
}

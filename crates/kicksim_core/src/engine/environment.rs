//! Per-tick world state
//!
//! [`Environment`] is the single source of truth of a running match. It is
//! owned by the simulator and handed out to decision-makers only as a
//! read-only copy inside a [`GameState`](crate::engine::decision::GameState).

use crate::engine::vec2::Vec2;
use crate::error::SimError;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Sides
// ============================================================================

/// Roster identity. `Team1` starts the match defending the left goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TeamSide {
    #[default]
    Team1,
    Team2,
}

impl TeamSide {
    pub const BOTH: [TeamSide; 2] = [TeamSide::Team1, TeamSide::Team2];

    pub fn index(self) -> usize {
        match self {
            TeamSide::Team1 => 0,
            TeamSide::Team2 => 1,
        }
    }

    pub fn from_index(index: usize) -> Self {
        if index == 0 {
            TeamSide::Team1
        } else {
            TeamSide::Team2
        }
    }

    pub fn other(self) -> Self {
        match self {
            TeamSide::Team1 => TeamSide::Team2,
            TeamSide::Team2 => TeamSide::Team1,
        }
    }

    pub fn is_team2(self) -> bool {
        self == TeamSide::Team2
    }
}

// ============================================================================
// Match state
// ============================================================================

/// The 21 match states. Discriminants are stable and used in exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum MatchState {
    #[default]
    Inactive = 0,
    /// Unused
    Ready = 1,
    Kickoff1 = 2,
    Kickoff2 = 3,
    Play = 4,
    /// Unused
    Stopped = 5,
    Goalkick1Up = 6,
    Goalkick1Down = 7,
    Goalkick2Up = 8,
    Goalkick2Down = 9,
    Corner1Up = 10,
    Corner1Down = 11,
    Corner2Up = 12,
    Corner2Down = 13,
    Throwin1 = 14,
    Throwin2 = 15,
    /// Unused
    Paused = 16,
    Halftime = 17,
    Goal1 = 18,
    Goal2 = 19,
    Ended = 20,
}

impl MatchState {
    pub const ALL: [MatchState; 21] = [
        MatchState::Inactive,
        MatchState::Ready,
        MatchState::Kickoff1,
        MatchState::Kickoff2,
        MatchState::Play,
        MatchState::Stopped,
        MatchState::Goalkick1Up,
        MatchState::Goalkick1Down,
        MatchState::Goalkick2Up,
        MatchState::Goalkick2Down,
        MatchState::Corner1Up,
        MatchState::Corner1Down,
        MatchState::Corner2Up,
        MatchState::Corner2Down,
        MatchState::Throwin1,
        MatchState::Throwin2,
        MatchState::Paused,
        MatchState::Halftime,
        MatchState::Goal1,
        MatchState::Goal2,
        MatchState::Ended,
    ];

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            MatchState::Inactive => "Inactive",
            MatchState::Ready => "Ready",
            MatchState::Kickoff1 => "Kickoff1",
            MatchState::Kickoff2 => "Kickoff2",
            MatchState::Play => "Play",
            MatchState::Stopped => "Stopped",
            MatchState::Goalkick1Up => "Goalkick1up",
            MatchState::Goalkick1Down => "Goalkick1down",
            MatchState::Goalkick2Up => "Goalkick2up",
            MatchState::Goalkick2Down => "Goalkick2down",
            MatchState::Corner1Up => "Corner1up",
            MatchState::Corner1Down => "Corner1down",
            MatchState::Corner2Up => "Corner2up",
            MatchState::Corner2Down => "Corner2down",
            MatchState::Throwin1 => "Throwin1",
            MatchState::Throwin2 => "Throwin2",
            MatchState::Paused => "Paused",
            MatchState::Halftime => "Halftime",
            MatchState::Goal1 => "Goal1",
            MatchState::Goal2 => "Goal2",
            MatchState::Ended => "Ended",
        }
    }

    /// Side restarting play from this dead-ball state, if any.
    pub fn restarting_side(self) -> Option<TeamSide> {
        match self {
            MatchState::Kickoff1
            | MatchState::Goalkick1Up
            | MatchState::Goalkick1Down
            | MatchState::Corner1Up
            | MatchState::Corner1Down
            | MatchState::Throwin1 => Some(TeamSide::Team1),
            MatchState::Kickoff2
            | MatchState::Goalkick2Up
            | MatchState::Goalkick2Down
            | MatchState::Corner2Up
            | MatchState::Corner2Down
            | MatchState::Throwin2 => Some(TeamSide::Team2),
            _ => None,
        }
    }

    /// Kickoff, goal-kick, corner or throw-in.
    pub fn is_restart(self) -> bool {
        self.restarting_side().is_some()
    }

    pub fn is_kickoff(self) -> bool {
        matches!(self, MatchState::Kickoff1 | MatchState::Kickoff2)
    }

    pub fn is_goal_kick(self) -> bool {
        matches!(
            self,
            MatchState::Goalkick1Up
                | MatchState::Goalkick1Down
                | MatchState::Goalkick2Up
                | MatchState::Goalkick2Down
        )
    }

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            MatchState::Corner1Up
                | MatchState::Corner1Down
                | MatchState::Corner2Up
                | MatchState::Corner2Down
        )
    }

    pub fn is_throw_in(self) -> bool {
        matches!(self, MatchState::Throwin1 | MatchState::Throwin2)
    }

    pub fn kickoff_for(side: TeamSide) -> Self {
        match side {
            TeamSide::Team1 => MatchState::Kickoff1,
            TeamSide::Team2 => MatchState::Kickoff2,
        }
    }

    pub fn goal_kick_for(side: TeamSide, up: bool) -> Self {
        match (side, up) {
            (TeamSide::Team1, true) => MatchState::Goalkick1Up,
            (TeamSide::Team1, false) => MatchState::Goalkick1Down,
            (TeamSide::Team2, true) => MatchState::Goalkick2Up,
            (TeamSide::Team2, false) => MatchState::Goalkick2Down,
        }
    }

    pub fn corner_for(side: TeamSide, up: bool) -> Self {
        match (side, up) {
            (TeamSide::Team1, true) => MatchState::Corner1Up,
            (TeamSide::Team1, false) => MatchState::Corner1Down,
            (TeamSide::Team2, true) => MatchState::Corner2Up,
            (TeamSide::Team2, false) => MatchState::Corner2Down,
        }
    }

    pub fn throw_in_for(side: TeamSide) -> Self {
        match side {
            TeamSide::Team1 => MatchState::Throwin1,
            TeamSide::Team2 => MatchState::Throwin2,
        }
    }

    /// Goal-kick or corner taken from the upper half of the pitch.
    pub fn is_up(self) -> bool {
        matches!(
            self,
            MatchState::Goalkick1Up | MatchState::Goalkick2Up | MatchState::Corner1Up | MatchState::Corner2Up
        )
    }
}

impl TryFrom<u8> for MatchState {
    type Error = SimError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        MatchState::ALL
            .get(value as usize)
            .copied()
            .ok_or(SimError::UnknownState(value))
    }
}

impl fmt::Display for MatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Bodies
// ============================================================================

/// A moving body without facing (the ball)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ObjectInfo {
    pub pos: Vec2,
    pub velocity: Vec2,
}

impl ObjectInfo {
    pub fn new(pos: Vec2, velocity: Vec2) -> Self {
        Self { pos, velocity }
    }

    pub fn at(x: f64, y: f64) -> Self {
        Self { pos: Vec2::new(x, y), velocity: Vec2::ZERO }
    }

    pub fn speed(&self) -> f64 {
        self.velocity.len()
    }
}

/// A player body
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub pos: Vec2,
    pub velocity: Vec2,
    /// Facing in radians, 0 points toward the right goal
    pub direction: f64,
    /// Set once this player's action has been resolved this tick
    pub acted: bool,
}

impl PlayerInfo {
    pub fn new(pos: Vec2, velocity: Vec2, direction: f64) -> Self {
        Self { pos, velocity, direction, acted: false }
    }

    pub fn at(x: f64, y: f64, direction: f64) -> Self {
        Self::new(Vec2::new(x, y), Vec2::ZERO, direction)
    }

    pub fn speed(&self) -> f64 {
        self.velocity.len()
    }

    pub fn facing(&self) -> Vec2 {
        Vec2::from_angle(self.direction)
    }
}

// ============================================================================
// Environment
// ============================================================================

/// Mutable per-tick world state
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Environment {
    pub tick: u32,
    pub score1: u32,
    pub score2: u32,
    pub state: MatchState,
    pub ball: ObjectInfo,
    /// Rosters indexed by [`TeamSide::index`]
    pub teams: [Vec<PlayerInfo>; 2],
    pub last_touched: TeamSide,
    /// Largest move made by the restarting side in the current dead-ball sequence
    pub restart_max_range: f64,
    /// Ticks the goalkeeper may still hold the ball; 0 when not held
    pub catch_ticks: u32,
    /// Side whose goalkeeper holds the ball, meaningful while `catch_ticks > 0`
    pub catch_owner: TeamSide,
    pub halftime_passed: bool,
}

impl Environment {
    pub fn new(n_players1: usize, n_players2: usize) -> Self {
        Self {
            teams: [vec![PlayerInfo::default(); n_players1], vec![PlayerInfo::default(); n_players2]],
            ..Default::default()
        }
    }

    pub fn team(&self, side: TeamSide) -> &[PlayerInfo] {
        &self.teams[side.index()]
    }

    pub fn player(&self, side: TeamSide, index: usize) -> &PlayerInfo {
        &self.teams[side.index()][index]
    }

    pub fn player_mut(&mut self, side: TeamSide, index: usize) -> &mut PlayerInfo {
        &mut self.teams[side.index()][index]
    }

    pub fn n_players(&self) -> usize {
        self.teams[0].len() + self.teams[1].len()
    }

    /// Whether the side currently defends the right goal. Sides swap at half-time.
    pub fn defends_right(&self, side: TeamSide) -> bool {
        side.is_team2() != self.halftime_passed
    }

    pub fn ball_held(&self) -> bool {
        self.catch_ticks > 0
    }

    pub fn score(&self, side: TeamSide) -> u32 {
        match side {
            TeamSide::Team1 => self.score1,
            TeamSide::Team2 => self.score2,
        }
    }

    /// Iterate `(side, index, player)` over team 1 then team 2.
    pub fn players(&self) -> impl Iterator<Item = (TeamSide, usize, &PlayerInfo)> {
        TeamSide::BOTH.into_iter().flat_map(move |side| {
            self.teams[side.index()].iter().enumerate().map(move |(i, p)| (side, i, p))
        })
    }

    /// Roster member of `side` closest to the ball; lowest index wins ties.
    pub fn closest_to_ball(&self, side: TeamSide) -> Option<usize> {
        let team = self.team(side);
        let mut best: Option<(usize, f64)> = None;
        for (i, p) in team.iter().enumerate() {
            let d = p.pos.dist(self.ball.pos);
            if best.map_or(true, |(_, bd)| d < bd) {
                best = Some((i, d));
            }
        }
        best.map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_roundtrip_u8() {
        for (i, s) in MatchState::ALL.iter().enumerate() {
            assert_eq!(s.as_u8() as usize, i);
            assert_eq!(MatchState::try_from(i as u8).unwrap(), *s);
        }
        assert!(matches!(MatchState::try_from(21), Err(SimError::UnknownState(21))));
    }

    #[test]
    fn test_restarting_side() {
        assert_eq!(MatchState::Corner2Down.restarting_side(), Some(TeamSide::Team2));
        assert_eq!(MatchState::Throwin1.restarting_side(), Some(TeamSide::Team1));
        assert_eq!(MatchState::Play.restarting_side(), None);
        assert_eq!(MatchState::Goal1.restarting_side(), None);
        let restarts = MatchState::ALL.iter().filter(|s| s.is_restart()).count();
        assert_eq!(restarts, 12);
    }

    #[test]
    fn test_state_display_names() {
        assert_eq!(MatchState::Goalkick1Up.to_string(), "Goalkick1up");
        assert_eq!(MatchState::Ended.to_string(), "Ended");
    }

    #[test]
    fn test_defends_right_swaps_at_halftime() {
        let mut env = Environment::new(2, 2);
        assert!(!env.defends_right(TeamSide::Team1));
        assert!(env.defends_right(TeamSide::Team2));
        env.halftime_passed = true;
        assert!(env.defends_right(TeamSide::Team1));
        assert!(!env.defends_right(TeamSide::Team2));
    }

    #[test]
    fn test_closest_to_ball() {
        let mut env = Environment::new(3, 0);
        env.teams[0][0].pos = Vec2::new(-5.0, 0.0);
        env.teams[0][1].pos = Vec2::new(1.0, 1.0);
        env.teams[0][2].pos = Vec2::new(-1.0, -1.0);
        assert_eq!(env.closest_to_ball(TeamSide::Team1), Some(1));
        assert_eq!(env.closest_to_ball(TeamSide::Team2), None);
    }

    #[test]
    fn test_players_iteration_order() {
        let env = Environment::new(2, 1);
        let order: Vec<(TeamSide, usize)> = env.players().map(|(s, i, _)| (s, i)).collect();
        assert_eq!(
            order,
            vec![(TeamSide::Team1, 0), (TeamSide::Team1, 1), (TeamSide::Team2, 0)]
        );
    }
}

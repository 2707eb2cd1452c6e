//! Dead-ball setups and the transitions back into play
//!
//! Setups run at the start of a tick (before decisions) and place the ball.
//! Transitions run after the decisions and enforce the placement rules on
//! whatever the players requested, then hand over to `Play`.

use crate::engine::environment::{MatchState, TeamSide};
use crate::engine::match_core::MatchCore;
use crate::engine::physics_constants::{BIG_EPSILON, EPSILON};
use crate::engine::vec2::Vec2;

impl MatchCore {
    // ========================================================================
    // Setups
    // ========================================================================

    pub(crate) fn setup_nothing(&mut self) {}

    pub(crate) fn setup_halftime(&mut self) {
        self.env.catch_ticks = 0;
    }

    pub(crate) fn setup_kickoff(&mut self) {
        self.env.catch_ticks = 0;
        self.env.ball.pos = Vec2::ZERO;
        self.env.ball.velocity = Vec2::ZERO;
    }

    /// Hold countdown and per-tick resets while the ball is live.
    pub(crate) fn setup_play(&mut self) {
        if self.env.ball_held() {
            let owner = self.env.catch_owner;
            let keeper_in_area = self
                .env
                .team(owner)
                .first()
                .is_some_and(|gk| self.is_in_own_area(gk.pos, owner));
            if keeper_in_area {
                self.env.catch_ticks -= 1;
            } else {
                self.env.catch_ticks = 0;
            }
            if self.env.catch_ticks == 0 {
                self.set_ball_released_position();
            }
        }
        self.ball_already_kicked = false;
        self.env.restart_max_range = 0.0;
    }

    pub(crate) fn setup_stopped(&mut self) {
        self.env.catch_ticks = 0;
        self.set_ball_released_position();
        self.env.ball.velocity = Vec2::ZERO;
    }

    fn place_dead_ball(&mut self, pos: Vec2) {
        self.env.catch_ticks = 0;
        self.env.ball.pos = pos;
        self.env.ball.velocity = Vec2::ZERO;
        self.env.restart_max_range = 0.0;
    }

    /// Ball on the goal-kick spot inside the kicking side's own area.
    pub(crate) fn setup_goal_kick(&mut self) {
        let Some(kicker) = self.env.state.restarting_side() else {
            return;
        };
        let x = if self.env.defends_right(kicker) {
            self.pitch.goal_kick_right_x
        } else {
            self.pitch.goal_kick_left_x
        };
        let y = if self.env.state.is_up() {
            self.pitch.goal_kick_top_y
        } else {
            self.pitch.goal_kick_bottom_y
        };
        self.place_dead_ball(Vec2::new(x, y));
    }

    /// Ball on the corner flag at the goal the kicking side attacks.
    pub(crate) fn setup_corner(&mut self) {
        let Some(kicker) = self.env.state.restarting_side() else {
            return;
        };
        let x = if self.env.defends_right(kicker) {
            self.pitch.left_x
        } else {
            self.pitch.right_x
        };
        let y = if self.env.state.is_up() {
            self.pitch.top_y
        } else {
            self.pitch.bottom_y
        };
        self.place_dead_ball(Vec2::new(x, y));
    }

    /// Ball on the touchline where its path crossed it.
    pub(crate) fn setup_throw_in(&mut self) {
        let ball = self.env.ball.pos;
        let prev = self.prev.ball.pos;
        let border_y = if ball.y > 0.0 {
            self.pitch.top_y
        } else {
            self.pitch.bottom_y
        };
        let delta = ball - prev;
        let x = if delta.y.abs() > BIG_EPSILON {
            prev.x + delta.x / delta.y * (border_y - prev.y)
        } else {
            (prev.x + ball.x) / 2.0
        };
        self.place_dead_ball(Vec2::new(x, border_y));
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    pub(crate) fn keep_state(&mut self) {}

    pub(crate) fn resume_play(&mut self) {
        self.sync_prev();
        self.env.state = MatchState::Play;
    }

    pub(crate) fn finish_kickoff(&mut self) {
        let Some(kicker) = self.env.state.restarting_side() else {
            return;
        };
        let due = self.settings.center_radius + self.settings.player_radius;
        self.limit_players_to_half_pitch(kicker, due);
        self.manage_static_ball_collisions();
        self.manage_static_players_collisions();
        self.manage_static_ball_collisions();
        self.limit_players_to_half_pitch(kicker, due);
        self.resume_play();
    }

    pub(crate) fn finish_goal_kick(&mut self) {
        let Some(kicker) = self.env.state.restarting_side() else {
            return;
        };
        self.limit_players_outside_area(kicker);
        self.manage_static_ball_collisions();
        self.manage_static_players_collisions();
        self.limit_players_outside_area(kicker);
        self.resume_play();
    }

    pub(crate) fn finish_corner(&mut self) {
        if let Some(kicker) = self.env.state.restarting_side() {
            let min_dist = self.settings.corner_min_distance;
            self.put_players_far_from_ball(kicker.other(), min_dist);
        }
        self.resume_play();
    }

    pub(crate) fn finish_throw_in(&mut self) {
        if let Some(kicker) = self.env.state.restarting_side() {
            let min_dist = self.settings.throwin_min_distance;
            self.put_players_far_from_ball(kicker.other(), min_dist);
        }
        self.resume_play();
    }

    /// Conceding side kicks off next.
    pub(crate) fn after_goal(&mut self) {
        let next = match self.env.state {
            MatchState::Goal1 => MatchState::Kickoff2,
            _ => MatchState::Kickoff1,
        };
        self.sync_prev();
        self.env.state = next;
    }

    /// Everyone in the own half; the other side also out of the center circle.
    pub(crate) fn limit_players_to_half_pitch(&mut self, kicker: TeamSide, due_distance: f64) {
        for side in TeamSide::BOTH {
            let right = self.env.defends_right(side);
            for p in self.env.teams[side.index()].iter_mut() {
                p.pos.x = if right { p.pos.x.max(0.0) } else { p.pos.x.min(0.0) };
            }
        }

        let other = kicker.other();
        let sign = if self.env.defends_right(other) { 1.0 } else { -1.0 };
        for n in 0..self.env.team(other).len() {
            let pos = self.env.player(other, n).pos;
            let dist = pos.len();
            if dist <= EPSILON {
                let y = (self.rng.uniform() - 0.5) * due_distance;
                self.env.player_mut(other, n).pos = Vec2::new(sign * due_distance, y);
            } else if dist < due_distance {
                self.env.player_mut(other, n).pos = pos * (due_distance / dist);
            }
        }
    }

    /// Move defenders whose body overlaps the kicker's area to its front edge.
    pub(crate) fn limit_players_outside_area(&mut self, kicker: TeamSide) {
        let pr = self.settings.player_radius;
        let edge_x = if self.env.defends_right(kicker) {
            self.pitch.area_right_x - pr
        } else {
            self.pitch.area_left_x + pr
        };
        let other = kicker.other();
        for n in 0..self.env.team(other).len() {
            let pos = self.env.player(other, n).pos;
            if self.body_in_area_of(pos, kicker) {
                self.env.player_mut(other, n).pos.x = edge_x;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::environment::PlayerInfo;
    use crate::engine::match_core::test_support::quiet_core;
    use crate::engine::match_core::MatchCore;

    fn core_in(state: MatchState) -> MatchCore {
        let mut core = quiet_core(
            &[PlayerInfo::at(-14.0, 0.0, 0.0), PlayerInfo::at(3.0, 0.5, 0.0)],
            &[PlayerInfo::at(14.0, 0.0, 0.0), PlayerInfo::at(-14.5, 1.0, 0.0)],
        );
        core.env.state = state;
        core
    }

    #[test]
    fn test_goal_kick_spot_follows_halftime() {
        let mut core = core_in(MatchState::Goalkick1Up);
        core.setup_goal_kick();
        assert_eq!(core.env.ball.pos, Vec2::new(core.pitch.goal_kick_left_x, core.pitch.goal_kick_top_y));
        core.env.halftime_passed = true;
        core.env.state = MatchState::Goalkick1Down;
        core.setup_goal_kick();
        assert_eq!(core.env.ball.pos, Vec2::new(core.pitch.goal_kick_right_x, core.pitch.goal_kick_bottom_y));
    }

    #[test]
    fn test_corner_flag_position() {
        let mut core = core_in(MatchState::Corner1Down);
        core.env.restart_max_range = 3.0;
        core.setup_corner();
        assert_eq!(core.env.ball.pos, Vec2::new(core.pitch.right_x, core.pitch.bottom_y));
        assert_eq!(core.env.restart_max_range, 0.0);
        core.env.state = MatchState::Corner2Up;
        core.setup_corner();
        assert_eq!(core.env.ball.pos, Vec2::new(core.pitch.left_x, core.pitch.top_y));
    }

    #[test]
    fn test_throw_in_on_crossing_point() {
        let mut core = core_in(MatchState::Throwin1);
        core.prev.ball.pos = Vec2::new(1.0, 9.0);
        core.env.ball.pos = Vec2::new(2.0, 10.2);
        core.env.ball.velocity = Vec2::new(1.0, 1.2);
        core.setup_throw_in();
        assert!((core.env.ball.pos.x - 1.5).abs() < 1e-9);
        assert_eq!(core.env.ball.pos.y, core.pitch.top_y);
        assert_eq!(core.env.ball.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_hold_counts_down_then_releases() {
        let mut core = core_in(MatchState::Play);
        core.env.catch_owner = TeamSide::Team1;
        core.env.catch_ticks = 2;
        core.setup_play();
        assert_eq!(core.env.catch_ticks, 1);
        core.setup_play();
        assert_eq!(core.env.catch_ticks, 0);
        let gap = core.env.ball.pos.dist(core.env.teams[0][0].pos);
        assert!(gap > core.settings.player_radius);
    }

    #[test]
    fn test_hold_dropped_outside_area() {
        let mut core = core_in(MatchState::Play);
        core.env.catch_owner = TeamSide::Team1;
        core.env.catch_ticks = 5;
        core.env.teams[0][0].pos = Vec2::new(-5.0, 0.0);
        core.setup_play();
        assert_eq!(core.env.catch_ticks, 0);
    }

    #[test]
    fn test_kickoff_transition_limits_halves() {
        let mut core = core_in(MatchState::Kickoff1);
        core.setup_kickoff();
        core.finish_kickoff();
        assert_eq!(core.env.state, MatchState::Play);
        let due = core.settings.center_radius + core.settings.player_radius;
        for p in core.env.team(TeamSide::Team1) {
            assert!(p.pos.x <= 0.0);
        }
        for p in core.env.team(TeamSide::Team2) {
            assert!(p.pos.x >= 0.0);
            assert!(p.pos.len() >= due - 1e-9);
        }
    }

    #[test]
    fn test_goal_kick_transition_clears_area() {
        let mut core = core_in(MatchState::Goalkick1Up);
        core.setup_goal_kick();
        core.finish_goal_kick();
        assert_eq!(core.env.state, MatchState::Play);
        let intruder = core.env.teams[1][1].pos;
        let edge = core.pitch.area_left_x + core.settings.player_radius;
        assert!((intruder.x - edge).abs() < 1e-9);
    }

    #[test]
    fn test_goal_hands_kickoff_to_conceding_side() {
        let mut core = core_in(MatchState::Goal1);
        core.after_goal();
        assert_eq!(core.env.state, MatchState::Kickoff2);
        core.env.state = MatchState::Goal2;
        core.after_goal();
        assert_eq!(core.env.state, MatchState::Kickoff1);
    }
}

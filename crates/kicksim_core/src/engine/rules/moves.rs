//! Restart placement moves
//!
//! During dead-ball states a `Move` teleports the player to the requested
//! spot after applying the restart's placement rules. The restarting side
//! records the longest move it made; the defending side may not move farther
//! than that in the same sequence.

use crate::engine::action::Action;
use crate::engine::environment::TeamSide;
use crate::engine::match_core::MatchCore;
use crate::engine::physics_constants::EPSILON;
use crate::engine::vec2::{fix_angle_positive, Vec2};

impl MatchCore {
    fn place_player(&mut self, side: TeamSide, index: usize, pos: Vec2, direction: f64) {
        let pos = self.avoid_other_players_position(pos, side, index);
        let p = self.env.player_mut(side, index);
        p.pos = pos;
        p.velocity = Vec2::ZERO;
        p.direction = direction;
    }

    /// Track the restarting side's longest move, cap the other side to it.
    fn apply_restart_range(&mut self, side: TeamSide, index: usize, target: Vec2) -> Vec2 {
        let from = self.env.player(side, index).pos;
        let displace = target - from;
        let restarting = self.env.state.restarting_side() == Some(side);
        if restarting {
            self.env.restart_max_range = self.env.restart_max_range.max(displace.len());
            target
        } else if displace.len() > self.env.restart_max_range {
            from + displace.resized(self.env.restart_max_range)
        } else {
            target
        }
    }

    /// Unconstrained placement.
    pub(crate) fn action_move(&mut self, action: &Action, side: TeamSide, index: usize) {
        let pos = Vec2::new(action.data[0], action.data[1]);
        self.place_player(side, index, pos, fix_angle_positive(action.data[2]));
    }

    /// Own half only; the non-kicking side also stays out of the center circle.
    pub(crate) fn action_move_kickoff(&mut self, action: &Action, side: TeamSide, index: usize) {
        let pr = self.settings.player_radius;
        let defends_right = self.env.defends_right(side);
        let mut pos = Vec2::new(action.data[0], action.data[1]);
        if defends_right {
            pos.x = pos.x.max(pr);
        } else {
            pos.x = pos.x.min(-pr);
        }

        if self.env.state.restarting_side() != Some(side) {
            let due = self.settings.center_radius + pr;
            let dist = pos.len();
            if dist <= EPSILON {
                pos.x = if defends_right { due } else { -due };
                pos.y = self.rng.uniform();
            } else if dist < due {
                pos = pos * (due / dist);
            }
        }

        self.place_player(side, index, pos, fix_angle_positive(action.data[2]));
    }

    /// The defending side keeps its whole body out of the kicker's area.
    pub(crate) fn action_move_goal_kick(&mut self, action: &Action, side: TeamSide, index: usize) {
        let target = Vec2::new(action.data[0], action.data[1]);
        let mut pos = self.apply_restart_range(side, index, target);

        if let Some(kicker) = self.env.state.restarting_side() {
            if kicker != side && self.body_in_area_of(pos, kicker) {
                let pr = self.settings.player_radius;
                pos.x = if self.env.defends_right(kicker) {
                    self.pitch.area_right_x - pr
                } else {
                    self.pitch.area_left_x + pr
                };
            }
        }

        self.place_player(side, index, pos, fix_angle_positive(action.data[2]));
    }

    /// Corner and throw-in: the defending side keeps `min_dist` from the ball.
    fn action_move_set_piece(&mut self, action: &Action, side: TeamSide, index: usize, min_dist: f64) {
        let target = Vec2::new(action.data[0], action.data[1]);
        let mut pos = self.apply_restart_range(side, index, target);

        if self.env.state.restarting_side() != Some(side) {
            let ball = self.env.ball.pos;
            let line = pos - ball;
            if line.len() < min_dist {
                let dir = if line.len() < EPSILON {
                    Vec2::from_angle(self.rng.angle())
                } else {
                    line
                };
                pos = ball + dir.resized(min_dist);
            }
        }

        self.place_player(side, index, pos, fix_angle_positive(action.data[2]));
    }

    pub(crate) fn action_move_corner(&mut self, action: &Action, side: TeamSide, index: usize) {
        let min_dist = self.settings.corner_min_distance;
        self.action_move_set_piece(action, side, index, min_dist);
    }

    pub(crate) fn action_move_throw_in(&mut self, action: &Action, side: TeamSide, index: usize) {
        let min_dist = self.settings.throwin_min_distance;
        self.action_move_set_piece(action, side, index, min_dist);
    }
}

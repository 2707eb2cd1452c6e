//! Goal and ball-out detection
//!
//! Both checks look at the ball's straight path from the previous sub-step
//! (`prev`) to the current position and classify where it left the pitch.

use crate::engine::environment::{MatchState, TeamSide};
use crate::engine::match_core::MatchCore;
use crate::engine::physics_constants::EPSILON;
use crate::engine::vec2::Vec2;
use tracing::debug;

impl MatchCore {
    /// Score a goal or switch to the matching restart. True when play stopped.
    pub(crate) fn check_goal_or_ball_out(&mut self) -> bool {
        if self.is_goal_scored(TeamSide::Team1) {
            self.env.score2 += 1;
            self.env.state = MatchState::Goal2;
            self.env.ball.velocity = Vec2::ZERO;
            debug!(tick = self.env.tick, score1 = self.env.score1, score2 = self.env.score2, "goal for team 2");
            return true;
        }
        if self.is_goal_scored(TeamSide::Team2) {
            self.env.score1 += 1;
            self.env.state = MatchState::Goal1;
            self.env.ball.velocity = Vec2::ZERO;
            debug!(tick = self.env.tick, score1 = self.env.score1, score2 = self.env.score2, "goal for team 1");
            return true;
        }
        self.check_ball_out()
    }

    /// Whether the ball entered the goal `defender` protects.
    ///
    /// A ball found inside the goal box without having crossed the mouth
    /// (it came in around a post) is moved back onto the line outside it.
    fn is_goal_scored(&mut self, defender: TeamSide) -> bool {
        if self.did_ball_cross_goal_mouth(defender) {
            return true;
        }
        let right = self.env.defends_right(defender);
        let ball = self.env.ball.pos;
        let goal_x = self.pitch.goal_line_x(right);
        let inside_x = if right {
            ball.x > self.pitch.right_x && ball.x < self.pitch.right_net_x
        } else {
            ball.x < self.pitch.left_x && ball.x > self.pitch.left_net_x
        };
        if inside_x && self.pitch.within_goal_mouth(ball.y) {
            let d = ball - self.prev.ball.pos;
            if d.x != 0.0 {
                let y = self.prev.ball.pos.y + d.y / d.x * (goal_x - self.prev.ball.pos.x);
                let out = if right { EPSILON } else { -EPSILON };
                self.env.ball.pos = Vec2::new(goal_x + out, y);
            }
            self.env.ball.velocity = Vec2::ZERO;
        }
        false
    }

    /// Ball path crossed the goal line between the posts.
    fn did_ball_cross_goal_mouth(&self, defender: TeamSide) -> bool {
        let right = self.env.defends_right(defender);
        let ball = self.env.ball.pos;
        let past_line = if right {
            ball.x >= self.pitch.right_x
        } else {
            ball.x <= self.pitch.left_x
        };
        if !past_line {
            return false;
        }
        let goal_x = self.pitch.goal_line_x(right);
        let prev = self.prev.ball.pos;
        let d = ball - prev;
        if d.x != 0.0 {
            let y = prev.y + d.y / d.x * (goal_x - prev.x);
            if self.pitch.within_goal_mouth(y) {
                return true;
            }
        }
        false
    }

    /// Restart for a ball over the goal line on the given side: a corner when
    /// the defending side touched it last, a goal-kick otherwise.
    fn goal_line_restart(&self, right_goal: bool, up: bool) -> MatchState {
        let owner = if self.env.defends_right(TeamSide::Team1) == right_goal {
            TeamSide::Team1
        } else {
            TeamSide::Team2
        };
        if self.env.last_touched == owner {
            MatchState::corner_for(owner.other(), up)
        } else {
            MatchState::goal_kick_for(owner, up)
        }
    }

    fn set_ball_out(&mut self, state: MatchState) -> bool {
        debug!(tick = self.env.tick, %state, last_touched = ?self.env.last_touched, "ball out");
        self.env.state = state;
        true
    }

    /// Classify an exit over a touchline or goal line.
    pub(crate) fn check_ball_out(&mut self) -> bool {
        let ball = self.env.ball.pos;
        let prev = self.prev.ball.pos;
        let d = ball - prev;
        let (left_x, right_x) = (self.pitch.left_x, self.pitch.right_x);
        let throw_in = MatchState::throw_in_for(self.env.last_touched.other());

        if d.y == 0.0 {
            if ball.x < left_x {
                return self.set_ball_out(self.goal_line_restart(false, ball.y > 0.0));
            }
            if ball.x > right_x {
                return self.set_ball_out(self.goal_line_restart(true, ball.y > 0.0));
            }
            return false;
        }

        let ratio = d.x / d.y;
        for (up, line) in [(true, self.pitch.top_y), (false, self.pitch.bottom_y)] {
            let crossed = if up { ball.y > line } else { ball.y < line };
            if !crossed {
                continue;
            }
            // x where the path meets the touchline
            let hx = ratio * (line - prev.y) + prev.x;
            let state = if ball.x < left_x && hx < left_x {
                self.goal_line_restart(false, up)
            } else if ball.x > right_x && hx > right_x {
                self.goal_line_restart(true, up)
            } else {
                throw_in
            };
            return self.set_ball_out(state);
        }

        if ball.x < left_x {
            return self.set_ball_out(self.goal_line_restart(false, ball.y > 0.0));
        }
        if ball.x > right_x {
            return self.set_ball_out(self.goal_line_restart(true, ball.y > 0.0));
        }
        false
    }
}

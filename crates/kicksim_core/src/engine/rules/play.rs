//! In-play actions: dash, kick and catch
//!
//! Every action here is a request; failed preconditions silently turn it into
//! a no-op (a kick still turns the kicker toward the requested direction).

use crate::engine::action::Action;
use crate::engine::environment::TeamSide;
use crate::engine::match_core::MatchCore;
use crate::engine::physics_constants::rules::{CONTEMPORARY_KICK_PROBABILITY, SIMPLIFIED_KICK_FRONT_COS};
use crate::engine::vec2::{fix_angle_positive, ieee_remainder, Vec2};
use std::f64::consts::PI;
use tracing::debug;

/// Split a signed power into its magnitude and a half-turn for negatives.
fn signed_power(power: f64) -> (f64, f64) {
    if power < 0.0 {
        (-power, PI)
    } else {
        (power, 0.0)
    }
}

impl MatchCore {
    /// Accelerate along `data[0]` with power `data[1]`; negative power runs
    /// backwards.
    pub(crate) fn action_dash(&mut self, action: &Action, side: TeamSide, index: usize) {
        let (power, reverse) = signed_power(action.data[1]);
        let noise = self.settings.player_random_noise * (self.rng.normal() - 0.5) * action.data[1];
        let power = (power + noise).clamp(0.0, self.settings.max_dash_power);
        let angle = action.data[0] + reverse + self.settings.player_direction_noise * (self.rng.normal() - 0.5);

        let p = self.env.player_mut(side, index);
        p.velocity += Vec2::from_angle(angle) * power;
        p.direction = fix_angle_positive(angle);
    }

    pub(crate) fn action_kick(&mut self, action: &Action, side: TeamSide, index: usize) {
        let simplified = self.settings.simplified;
        let restart_kick = self.is_any_team_kicking();
        let mut can_kick = true;
        let mut kicking_held_ball = false;

        if self.env.ball_held() {
            if index != 0 || self.env.catch_owner != side {
                can_kick = false;
            } else {
                kicking_held_ball = true;
                self.env.catch_ticks = 0;
            }
        }

        let player = *self.env.player(side, index);
        let to_ball = self.env.ball.pos - player.pos;
        let dist = to_ball.len();
        if dist > self.settings.kickable_distance {
            can_kick = false;
        }

        if !simplified && !kicking_held_ball && can_kick {
            // ball must be in front, unless taking a restart
            if !restart_kick && dist > 0.0 && player.facing().cos_between(to_ball) < self.cos_kickable_angle {
                can_kick = false;
            }
            // ball swallowed by some player
            let ball = self.env.ball.pos;
            let pr = self.settings.player_radius;
            if can_kick && self.env.players().any(|(_, _, pl)| pl.pos.dist(ball) < pr) {
                can_kick = false;
            }
        }

        let (power, reverse) = signed_power(action.data[1]);
        let noise = self.settings.player_random_noise * (self.rng.normal() - 0.5) * action.data[1];
        let power = (power + noise).max(0.0);

        let mut kick_angle = fix_angle_positive(action.data[0] + reverse);
        if !simplified
            && can_kick
            && !restart_kick
            && ieee_remainder(kick_angle - player.direction, 2.0 * PI).abs() > self.settings.kickable_direction_angle
        {
            can_kick = false;
        }

        if can_kick && self.ball_already_kicked {
            can_kick = !simplified && self.rng.uniform() <= CONTEMPORARY_KICK_PROBABILITY;
        }

        kick_angle = fix_angle_positive(kick_angle + self.settings.player_direction_noise * (self.rng.normal() - 0.5));
        self.env.player_mut(side, index).direction = kick_angle;

        if kicking_held_ball {
            self.set_ball_released_position();
        } else if simplified && can_kick && !restart_kick {
            // ball behind or beside the kicker is brought in front first
            let delta = self.env.ball.pos - player.pos;
            if delta.cos_between(Vec2::from_angle(kick_angle)) < SIMPLIFIED_KICK_FRONT_COS {
                let s = &self.settings;
                let offset = s.player_radius + s.ball_radius + s.after_catch_distance;
                self.env.ball.pos = player.pos + Vec2::from_angle(kick_angle) * offset;
                self.env.ball.velocity = Vec2::ZERO;
            }
        }

        if can_kick {
            self.env.last_touched = side;
            let power = power.min(self.settings.max_kick_power);
            self.env.ball.velocity = Vec2::from_angle(kick_angle) * power;
            self.ball_already_kicked = true;
        }
    }

    /// Goalkeeper-only catch inside the own penalty area.
    pub(crate) fn action_catch(&mut self, _action: &Action, side: TeamSide, index: usize) {
        if index != 0 {
            return;
        }
        let gk = *self.env.player(side, index);
        if !self.is_in_own_area(gk.pos, side) || self.env.ball_held() {
            return;
        }
        let to_ball = self.env.ball.pos - gk.pos;
        let dist = to_ball.len();
        if dist > self.settings.catchable_distance {
            return;
        }
        if dist > 0.0 && gk.facing().cos_between(to_ball) < self.cos_catchable_angle {
            return;
        }
        if self.rng.uniform() <= self.settings.catch_probability {
            self.env.catch_owner = side;
            self.env.ball.velocity = Vec2::ZERO;
            self.set_ball_held_position();
            self.env.last_touched = side;
            self.env.catch_ticks = self.settings.catch_holding_ticks;
            debug!(tick = self.env.tick, ?side, "ball caught");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::environment::{MatchState, PlayerInfo};
    use crate::engine::match_core::test_support::quiet_core;
    use crate::engine::match_core::MatchCore;

    fn kicker_core(simplified: bool) -> MatchCore {
        let mut core = quiet_core(&[PlayerInfo::at(-15.0, 0.0, 0.0), PlayerInfo::at(0.0, 0.0, 0.0)], &[]);
        core.settings.simplified = simplified;
        core.env.ball.pos = Vec2::new(0.55, 0.0);
        core.sync_prev();
        core
    }

    #[test]
    fn test_dash_accelerates_and_turns() {
        let mut core = kicker_core(true);
        core.action_dash(&Action::dash(PI / 2.0, 0.05), TeamSide::Team1, 1);
        let p = core.env.teams[0][1];
        assert!((p.velocity.y - 0.05).abs() < 1e-12);
        assert!((p.direction - PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_dash_capped_and_reversed() {
        let mut core = kicker_core(true);
        core.action_dash(&Action::dash(0.0, -1.0), TeamSide::Team1, 1);
        let p = core.env.teams[0][1];
        assert!((p.velocity.x + core.settings.max_dash_power).abs() < 1e-12);
        assert!((p.direction - PI).abs() < 1e-12);
    }

    #[test]
    fn test_kick_in_reach() {
        let mut core = kicker_core(false);
        core.action_kick(&Action::kick(0.0, 0.4), TeamSide::Team1, 1);
        assert!((core.env.ball.velocity.x - 0.4).abs() < 1e-12);
        assert_eq!(core.env.last_touched, TeamSide::Team1);
        assert!(core.ball_already_kicked);
    }

    #[test]
    fn test_kick_power_capped() {
        let mut core = kicker_core(true);
        core.action_kick(&Action::kick(0.0, 10.0), TeamSide::Team1, 1);
        assert!((core.env.ball.speed() - core.settings.max_kick_power).abs() < 1e-12);
    }

    #[test]
    fn test_kick_out_of_reach_only_turns() {
        let mut core = kicker_core(true);
        core.env.ball.pos = Vec2::new(3.0, 0.0);
        core.action_kick(&Action::kick(1.0, 0.4), TeamSide::Team1, 1);
        assert_eq!(core.env.ball.velocity, Vec2::ZERO);
        assert!((core.env.teams[0][1].direction - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_full_rules_kick_behind_fails() {
        let mut core = kicker_core(false);
        core.env.ball.pos = Vec2::new(-0.55, 0.0);
        core.action_kick(&Action::kick(PI, 0.4), TeamSide::Team1, 1);
        assert_eq!(core.env.ball.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_simplified_kick_brings_ball_in_front() {
        let mut core = kicker_core(true);
        core.env.ball.pos = Vec2::new(-0.55, 0.0);
        core.action_kick(&Action::kick(0.0, 0.4), TeamSide::Team1, 1);
        assert!(core.env.ball.pos.x > 0.0);
        assert!((core.env.ball.velocity.x - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_second_kick_same_tick_fails_simplified() {
        let mut core = quiet_core(&[PlayerInfo::at(-0.55, 0.0, 0.0)], &[PlayerInfo::at(0.55, 0.0, PI)]);
        core.action_kick(&Action::kick(0.0, 0.3), TeamSide::Team1, 0);
        core.action_kick(&Action::kick(PI, 0.3), TeamSide::Team2, 0);
        assert!(core.env.ball.velocity.x > 0.0);
        assert_eq!(core.env.last_touched, TeamSide::Team1);
    }

    #[test]
    fn test_restart_kick_ignores_facing() {
        let mut core = kicker_core(false);
        core.prev.state = MatchState::Throwin1;
        core.env.ball.pos = Vec2::new(-0.55, 0.0);
        core.action_kick(&Action::kick(PI, 0.3), TeamSide::Team1, 1);
        assert!(core.env.ball.velocity.x < 0.0);
    }

    #[test]
    fn test_catch_in_own_area() {
        let mut core = kicker_core(true);
        core.settings.catch_probability = 1.0;
        core.env.teams[0][0].direction = 0.0;
        core.env.ball.pos = Vec2::new(-14.5, 0.0);
        core.env.ball.velocity = Vec2::new(-0.3, 0.0);
        core.action_catch(&Action::catch(), TeamSide::Team1, 0);
        assert!(core.env.ball_held());
        assert_eq!(core.env.catch_ticks, core.settings.catch_holding_ticks);
        assert_eq!(core.env.catch_owner, TeamSide::Team1);
        assert!(core.env.ball.pos.dist(core.env.teams[0][0].pos) < core.settings.player_radius);
    }

    #[test]
    fn test_catch_refused_outside_area_or_outfield() {
        let mut core = kicker_core(true);
        core.settings.catch_probability = 1.0;
        core.action_catch(&Action::catch(), TeamSide::Team1, 1);
        assert!(!core.env.ball_held());
        core.env.teams[0][0].pos = Vec2::new(-0.5, 0.0);
        core.action_catch(&Action::catch(), TeamSide::Team1, 0);
        assert!(!core.env.ball_held());
    }

    #[test]
    fn test_held_ball_kicked_by_goalkeeper_only() {
        let mut core = kicker_core(true);
        core.settings.catch_probability = 1.0;
        core.env.ball.pos = Vec2::new(-14.5, 0.0);
        core.action_catch(&Action::catch(), TeamSide::Team1, 0);
        assert!(core.env.ball_held());

        core.action_kick(&Action::kick(0.0, 0.5), TeamSide::Team1, 1);
        assert!(core.env.ball_held());

        core.action_kick(&Action::kick(0.0, 0.5), TeamSide::Team1, 0);
        assert!(!core.env.ball_held());
        assert!(core.env.ball.velocity.x > 0.0);
        let gap = core.env.ball.pos.dist(core.env.teams[0][0].pos);
        assert!(gap > core.settings.player_radius + core.settings.ball_radius);
    }
}

//! Kinematics
//!
//! Speed caps, velocity decay with the player inertia blend, straight-line
//! integration over a fraction of a tick, ball noise and the held-ball
//! placement around the goalkeeper.

use crate::engine::config::Settings;
use crate::engine::environment::PlayerInfo;
use crate::engine::match_core::MatchCore;
use crate::engine::vec2::{fix_angle_positive, Vec2};
use std::f64::consts::PI;

/// Velocity scaled down to `max` if faster.
pub fn limit_velocity(velocity: Vec2, max: f64) -> Vec2 {
    let speed = velocity.len();
    if speed > max {
        velocity * (max / speed)
    } else {
        velocity
    }
}

/// Player velocity after one tick of decay. The heading is blended toward
/// the facing direction so players turn their run the way they look.
pub fn decayed_player_velocity(player: &PlayerInfo, settings: &Settings) -> Vec2 {
    if player.velocity.is_zero() {
        return player.velocity;
    }
    let mut vel_angle = fix_angle_positive(player.velocity.angle());
    let mut facing = player.direction;
    // blend on the short arc
    let diff = facing - vel_angle;
    if diff > PI {
        facing -= 2.0 * PI;
    } else if diff < -PI {
        vel_angle -= 2.0 * PI;
    }
    let mix = settings.player_velocity_direction_mix;
    let angle = vel_angle * (1.0 - mix) + facing * mix;
    Vec2::from_angle(angle) * player.velocity.len() * settings.player_velocity_decay
}

impl MatchCore {
    pub(crate) fn limit_speed(&mut self) {
        self.env.ball.velocity = limit_velocity(self.env.ball.velocity, self.settings.max_ball_speed);
        let max = self.settings.max_player_speed;
        for team in self.env.teams.iter_mut() {
            for p in team.iter_mut() {
                p.velocity = limit_velocity(p.velocity, max);
            }
        }
    }

    /// Clamp every player into the roaming border around the pitch.
    pub(crate) fn limit_players_close_to_pitch(&mut self) {
        for team in self.env.teams.iter_mut() {
            for p in team.iter_mut() {
                p.pos = self.pitch.clamp_to_border(p.pos);
            }
        }
    }

    pub(crate) fn decay_speed(&mut self) {
        self.env.ball.velocity *= self.settings.ball_velocity_decay;
        for team in self.env.teams.iter_mut() {
            for p in team.iter_mut() {
                p.velocity = decayed_player_velocity(p, &self.settings);
            }
        }
    }

    /// Advance every body along its velocity for `t` of a tick.
    pub(crate) fn update_motion(&mut self, t: f64) {
        self.env.ball.pos += self.env.ball.velocity * t;
        for team in self.env.teams.iter_mut() {
            for p in team.iter_mut() {
                p.pos += p.velocity * t;
            }
        }
    }

    /// Random jitter proportional to the ball velocity, skipped when it would
    /// put the ball into a player.
    pub(crate) fn add_ball_noise(&mut self) {
        let v = self.env.ball.velocity;
        let nx = (self.rng.normal() - 0.5) * v.x.abs();
        let ny = (self.rng.normal() - 0.5) * v.y.abs();
        let new_pos = self.env.ball.pos + Vec2::new(nx, ny) * self.settings.player_random_noise;
        let reach = self.settings.player_radius + self.settings.ball_radius;
        if self.env.players().any(|(_, _, p)| p.pos.dist(new_pos) <= reach) {
            return;
        }
        self.env.ball.pos = new_pos;
    }

    fn place_ball_around_goalkeeper(&mut self, offset: f64) {
        let Some((side, index)) = self.holding_goalkeeper() else {
            return;
        };
        let gk = *self.env.player(side, index);
        self.env.ball.pos = gk.pos + gk.facing() * offset;
        self.env.ball.velocity = gk.velocity;
    }

    /// Ball inside the goalkeeper's body, just in front of its center.
    pub(crate) fn set_ball_held_position(&mut self) {
        let s = &self.settings;
        let offset = s.player_radius - s.ball_radius - s.after_catch_distance;
        self.place_ball_around_goalkeeper(offset);
    }

    /// Ball just outside the goalkeeper's body, in front of it.
    pub(crate) fn set_ball_released_position(&mut self) {
        let s = &self.settings;
        let offset = s.player_radius + s.ball_radius + s.after_catch_distance;
        self.place_ball_around_goalkeeper(offset);
    }
}

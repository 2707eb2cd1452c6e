//! Collision responses
//!
//! Pure velocity updates applied at the instant of impact. Positions are left
//! to the caller; only the pole-player response relocates a body.

use crate::engine::environment::PlayerInfo;
use crate::engine::physics_constants::collision::*;
use crate::engine::physics_constants::EPSILON;
use crate::engine::vec2::{ieee_remainder, Vec2};
use std::f64::consts::PI;

/// Heading of a trajectory reflected on a circle at the impact point.
fn reflected_angle(impact_angle: f64, trajectory_angle: f64) -> f64 {
    impact_angle + ieee_remainder(impact_angle - trajectory_angle, PI)
}

/// New ball velocity after touching a player.
///
/// `None` when ball and player move together or share a center: the pair is
/// then skipped for the rest of the tick.
pub fn ball_player_bounce(
    ball_pos: Vec2,
    ball_vel: Vec2,
    player: &PlayerInfo,
    kickable_angle: f64,
    simplified: bool,
) -> Option<Vec2> {
    let v = ball_vel - player.velocity;
    let d = ball_pos - player.pos;
    if v.is_zero() || d.is_zero() {
        return None;
    }
    let vel = v.len();
    let impact_angle = d.angle();
    let r = Vec2::from_angle(reflected_angle(impact_angle, v.angle()));
    // ball arriving on the front of the body is controlled, elsewhere it bounces
    let in_front = ieee_remainder(player.direction - impact_angle, 2.0 * PI).abs() < kickable_angle;

    let new_vel = match (simplified, in_front) {
        (false, true) => player.velocity * BALL_PLAYER_HIT_FACTOR + r * vel * BALL_PLAYER_STOP_FACTOR,
        (false, false) => player.velocity * BALL_PLAYER_HIT_FACTOR + r * vel * BALL_PLAYER_BOUNCE_FACTOR,
        (true, true) => player.velocity * BALL_PLAYER_HIT_FACTOR_SIMPLIFIED,
        (true, false) => {
            player.velocity * BALL_PLAYER_HIT_FACTOR_SIMPLIFIED + r * vel * BALL_PLAYER_BOUNCE_FACTOR
        }
    };
    Some(new_vel)
}

/// Velocities of two equal-mass players after a crash.
///
/// Part of the relative momentum accelerates each player along its facing,
/// the rest displaces it sideways; finally the component pushing into the
/// other body is cancelled.
pub fn player_player_exchange(p1: &PlayerInfo, p2: &PlayerInfo) -> (Vec2, Vec2) {
    let v1 = p1.velocity - p2.velocity;
    let d1 = p2.pos - p1.pos;
    let transmission = v1.cos_between(d1) * PLAYER_MOMENTUM_SHARE;
    let momentum = v1.len() * transmission;
    let v2 = -v1;

    let dir1 = p1.facing();
    let dir2 = p2.facing();
    let accel1 = dir1 * v2.cos_between(dir1) * momentum;
    let accel2 = dir2 * v1.cos_between(dir2) * momentum;
    let displace1 = v2 * transmission - accel1;
    let displace2 = v1 * transmission - accel2;

    let mut vel1 = p1.velocity + accel1 + displace1 * COLLISION_PLAYER_DISPLACE_FACTOR;
    let mut vel2 = p2.velocity + accel2 + displace2 * COLLISION_PLAYER_DISPLACE_FACTOR;

    let toward2 = d1.normalized();
    let toward1 = -toward2;
    let cos1 = toward2.cos_between(vel1);
    if cos1 > 0.0 {
        vel1 -= toward2 * cos1 * vel1.len();
    }
    let cos2 = toward1.cos_between(vel2);
    if cos2 > 0.0 {
        vel2 -= toward1 * cos2 * vel2.len();
    }
    (vel1, vel2)
}

/// Ball velocity after bouncing off a goalpost.
pub fn pole_ball_bounce(ball_pos: Vec2, ball_vel: Vec2, pole: Vec2) -> Vec2 {
    let impact_angle = (ball_pos - pole).angle();
    let reflected = reflected_angle(impact_angle, ball_vel.angle());
    Vec2::from_angle(reflected) * ball_vel.len() * BALL_POLE_BOUNCE_FACTOR
}

/// Player position snapped just outside the pole it ran into.
pub fn pole_player_snap(player_pos: Vec2, pole: Vec2, contact_radius: f64) -> Vec2 {
    pole + (player_pos - pole).resized(contact_radius + EPSILON)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KICKABLE: f64 = PI / 3.0;

    #[test]
    fn test_ball_bounces_off_back() {
        // player faces right, ball arrives from the left onto its back
        let player = PlayerInfo::at(0.0, 0.0, 0.0);
        let v = ball_player_bounce(Vec2::new(-0.5, 0.0), Vec2::new(1.0, 0.0), &player, KICKABLE, true)
            .unwrap();
        assert!(v.x < 0.0);
        assert!((v.len() - BALL_PLAYER_BOUNCE_FACTOR).abs() < 1e-9);
    }

    #[test]
    fn test_ball_controlled_in_front_simplified() {
        // player faces left, ball arrives on its front and is absorbed
        let mut player = PlayerInfo::at(0.0, 0.0, PI);
        player.velocity = Vec2::new(0.1, 0.0);
        let v = ball_player_bounce(Vec2::new(-0.5, 0.0), Vec2::new(1.0, 0.0), &player, KICKABLE, true)
            .unwrap();
        assert!((v.x - 0.1 * BALL_PLAYER_HIT_FACTOR_SIMPLIFIED).abs() < 1e-12);
        assert!(v.y.abs() < 1e-12);
    }

    #[test]
    fn test_ball_damped_in_front_full_rules() {
        let player = PlayerInfo::at(0.0, 0.0, PI);
        let v = ball_player_bounce(Vec2::new(-0.5, 0.0), Vec2::new(1.0, 0.0), &player, KICKABLE, false)
            .unwrap();
        assert!((v.len() - BALL_PLAYER_STOP_FACTOR).abs() < 1e-9);
    }

    #[test]
    fn test_ball_moving_with_player_skipped() {
        let mut player = PlayerInfo::at(0.0, 0.0, 0.0);
        player.velocity = Vec2::new(0.2, 0.0);
        assert!(
            ball_player_bounce(Vec2::new(0.5, 0.0), Vec2::new(0.2, 0.0), &player, KICKABLE, true).is_none()
        );
    }

    #[test]
    fn test_players_cannot_push_through() {
        let mut p1 = PlayerInfo::at(0.0, 0.0, 0.0);
        p1.velocity = Vec2::new(0.2, 0.0);
        let p2 = PlayerInfo::at(0.8, 0.0, PI);
        let (v1, v2) = player_player_exchange(&p1, &p2);
        // no velocity component left toward the other body
        assert!(v1.x <= 1e-12);
        assert!(v2.x >= -1e-12);
    }

    #[test]
    fn test_pole_bounce_reverses_head_on() {
        let v = pole_ball_bounce(Vec2::new(-0.2, 0.0), Vec2::new(0.5, 0.0), Vec2::ZERO);
        assert!((v.x + 0.5 * BALL_POLE_BOUNCE_FACTOR).abs() < 1e-9);
        assert!(v.y.abs() < 1e-9);
    }

    #[test]
    fn test_pole_player_snap_distance() {
        let pole = Vec2::new(16.0, 2.0);
        let p = pole_player_snap(Vec2::new(15.8, 2.0), pole, 0.455);
        assert!((p.dist(pole) - 0.455).abs() < 1e-9);
        assert!(p.x < pole.x);
    }
}

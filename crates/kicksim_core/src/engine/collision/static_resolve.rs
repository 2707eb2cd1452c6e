//! Overlap cleanup without motion
//!
//! Iterative position pushes used after restarts, after player moves and at
//! the end of every tick. Each pass is capped by
//! [`MAX_COLLISION_LOOP`](crate::engine::physics_constants::limits::MAX_COLLISION_LOOP);
//! coincident centers are separated along a random heading.

use crate::engine::environment::TeamSide;
use crate::engine::match_core::MatchCore;
use crate::engine::physics_constants::limits::MAX_COLLISION_LOOP;
use crate::engine::physics_constants::{EPSILON, SMALL_EPSILON};
use crate::engine::vec2::Vec2;

impl MatchCore {
    /// Push players out of the (still) ball, and the ball out of the posts.
    pub(crate) fn manage_static_ball_collisions(&mut self) {
        let radius = self.settings.player_radius + self.settings.ball_radius;
        let mut collisions = true;
        let mut count = 0;
        while collisions && count < MAX_COLLISION_LOOP {
            collisions = false;
            for w in 0..2 {
                for n in 0..self.env.teams[w].len() {
                    let ball = self.env.ball.pos;
                    let d = ball - self.env.teams[w][n].pos;
                    let dist = d.len();
                    if dist < EPSILON {
                        collisions = true;
                        let push = Vec2::from_angle(self.rng.angle()) * radius;
                        self.env.teams[w][n].pos -= push;
                    } else {
                        let diff = radius / dist - 1.0;
                        if diff > 0.0 {
                            collisions = true;
                            self.env.teams[w][n].pos -= d * diff;
                        }
                    }
                }
            }
            collisions |= self.manage_static_pole_ball_collisions();
            count += 1;
        }
    }

    /// Separate overlapping players pairwise, then keep them off the posts.
    pub(crate) fn manage_static_players_collisions(&mut self) {
        let mut collisions = true;
        let mut count = 0;
        while collisions && count < MAX_COLLISION_LOOP {
            collisions = false;
            collisions |= self.separate_players(0, 1);
            collisions |= self.separate_players(0, 0);
            collisions |= self.separate_players(1, 1);
            collisions |= self.manage_static_pole_players_collisions();
            count += 1;
        }
    }

    fn separate_players(&mut self, t1: usize, t2: usize) -> bool {
        let pr = self.settings.player_radius;
        let mut collisions = false;
        for i in 0..self.env.teams[t1].len() {
            for j in 0..self.env.teams[t2].len() {
                if t1 == t2 && i == j {
                    continue;
                }
                let d = self.env.teams[t1][i].pos - self.env.teams[t2][j].pos;
                let dist = d.len();
                if dist < EPSILON {
                    collisions = true;
                    let s = Vec2::from_angle(self.rng.angle()) * pr;
                    self.env.teams[t1][i].pos += s;
                    self.env.teams[t2][j].pos -= s;
                } else if dist < pr * 2.0 {
                    collisions = true;
                    let half = d * ((pr * 2.0 / dist - 1.0) * 0.5);
                    self.env.teams[t1][i].pos += half;
                    self.env.teams[t2][j].pos -= half;
                }
            }
        }
        collisions
    }

    /// Move the ball off the first post it overlaps.
    pub(crate) fn manage_static_pole_ball_collisions(&mut self) -> bool {
        let radius = self.settings.pole_radius + self.settings.ball_radius;
        for pole in self.pitch.poles {
            let d = self.env.ball.pos - pole;
            let dist = d.len();
            if dist < EPSILON {
                let push = Vec2::from_angle(self.rng.angle()) * radius;
                self.env.ball.pos -= push;
                return true;
            }
            let diff = radius / dist - 1.0;
            if diff > 0.0 {
                self.env.ball.pos += d * diff;
                return true;
            }
        }
        false
    }

    pub(crate) fn manage_static_pole_players_collisions(&mut self) -> bool {
        let radius = self.settings.pole_radius + self.settings.player_radius;
        let mut collisions = true;
        let mut count = 0;
        while collisions && count < MAX_COLLISION_LOOP {
            collisions = false;
            for w in 0..2 {
                for n in 0..self.env.teams[w].len() {
                    for pole in self.pitch.poles {
                        let d = self.env.teams[w][n].pos - pole;
                        let dist = d.len();
                        if dist < EPSILON {
                            collisions = true;
                            let push = Vec2::from_angle(self.rng.angle()) * radius;
                            self.env.teams[w][n].pos -= push;
                        } else {
                            let diff = radius / dist - 1.0;
                            if diff > 0.0 {
                                collisions = true;
                                self.env.teams[w][n].pos += d * diff;
                            }
                        }
                    }
                }
            }
            count += 1;
        }
        collisions
    }

    /// Pull the ball out of any player body it ended up inside. The pull also
    /// feeds a share of the displacement into the ball velocity.
    pub(crate) fn manage_ball_inside_players(&mut self) {
        if self.env.ball_held() {
            return;
        }
        let radius = self.settings.player_radius + self.settings.ball_radius;
        let mut collisions = true;
        let mut count = 0;
        while collisions && count < MAX_COLLISION_LOOP {
            collisions = false;
            for w in 0..2 {
                for n in 0..self.env.teams[w].len() {
                    let p = self.env.teams[w][n];
                    let mut d = self.env.ball.pos - p.pos;
                    if d.len() + SMALL_EPSILON < radius {
                        collisions = true;
                        if d.is_zero() {
                            d = p.facing();
                        }
                        let old = self.env.ball.pos;
                        self.env.ball.pos = p.pos + d.resized(radius + SMALL_EPSILON);
                        let displace = self.env.ball.pos - old;
                        self.env.ball.velocity += displace * self.settings.ball_inside_player_velocity_displace;
                    }
                }
            }
            count += 1;
        }
    }

    /// Keep every player of `side` at least `min_dist` from the ball.
    pub(crate) fn put_players_far_from_ball(&mut self, side: TeamSide, min_dist: f64) {
        let ball = self.env.ball.pos;
        for n in 0..self.env.team(side).len() {
            let d = ball - self.env.player(side, n).pos;
            let dist = d.len();
            if dist >= min_dist {
                continue;
            }
            if dist < EPSILON {
                let push = Vec2::from_angle(self.rng.angle()) * min_dist;
                self.env.player_mut(side, n).pos -= push;
            } else {
                let diff = min_dist / dist - 1.0;
                if diff > 0.0 {
                    self.env.player_mut(side, n).pos -= d * diff;
                }
            }
        }
    }

    /// Nudge a requested placement away from players that were already
    /// placed this tick.
    pub(crate) fn avoid_other_players_position(&mut self, mut pos: Vec2, side: TeamSide, index: usize) -> Vec2 {
        let min_dist = self.settings.player_radius * 2.0;
        let mut collisions = true;
        let mut count = 0;
        while collisions && count < MAX_COLLISION_LOOP {
            collisions = false;
            for w in TeamSide::BOTH {
                for n in 0..self.env.team(w).len() {
                    if w == side && n == index {
                        continue;
                    }
                    let other = *self.env.player(w, n);
                    if !other.acted {
                        continue;
                    }
                    let delta = other.pos - pos;
                    let dist = delta.len();
                    if dist < EPSILON {
                        collisions = true;
                        pos += Vec2::from_angle(self.rng.angle()) * min_dist;
                    } else {
                        let ratio = min_dist / dist;
                        if ratio > 1.0 {
                            collisions = true;
                            pos -= delta * (ratio - 1.0);
                        }
                    }
                }
            }
            count += 1;
        }
        pos
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::environment::{PlayerInfo, TeamSide};
    use crate::engine::match_core::test_support::quiet_core;
    use crate::engine::vec2::Vec2;

    #[test]
    fn test_static_players_separated() {
        let mut core = quiet_core(
            &[PlayerInfo::at(0.0, 0.0, 0.0), PlayerInfo::at(0.3, 0.0, 0.0)],
            &[PlayerInfo::at(0.0, 0.0, 0.0)],
        );
        core.manage_static_players_collisions();
        let pr2 = core.settings.player_radius * 2.0;
        let all: Vec<Vec2> = core.env.players().map(|(_, _, p)| p.pos).collect();
        for i in 0..all.len() {
            for j in (i + 1)..all.len() {
                assert!(all[i].dist(all[j]) >= pr2 - 1e-6, "{i} {j} too close");
            }
        }
    }

    #[test]
    fn test_static_ball_pushes_players_away() {
        let mut core = quiet_core(&[PlayerInfo::at(0.3, 0.0, 0.0)], &[PlayerInfo::at(0.0, 0.0, 0.0)]);
        core.env.ball.pos = Vec2::ZERO;
        core.manage_static_ball_collisions();
        let r = core.settings.player_radius + core.settings.ball_radius;
        for (_, _, p) in core.env.players() {
            assert!(p.pos.dist(Vec2::ZERO) >= r - 1e-9);
        }
        // pushed outward, not through the ball
        assert!(core.env.teams[0][0].pos.x > 0.3);
    }

    #[test]
    fn test_ball_pulled_out_of_player() {
        let mut core = quiet_core(&[PlayerInfo::at(0.0, 0.0, 0.0)], &[]);
        core.env.ball.pos = Vec2::new(0.2, 0.0);
        core.manage_ball_inside_players();
        let r = core.settings.player_radius + core.settings.ball_radius;
        assert!(core.env.ball.pos.x >= r);
        assert!(core.env.ball.velocity.x > 0.0);
    }

    #[test]
    fn test_held_ball_not_pulled() {
        let mut core = quiet_core(&[PlayerInfo::at(0.0, 0.0, 0.0)], &[]);
        core.env.ball.pos = Vec2::new(0.2, 0.0);
        core.env.catch_ticks = 2;
        core.manage_ball_inside_players();
        assert_eq!(core.env.ball.pos, Vec2::new(0.2, 0.0));
    }

    #[test]
    fn test_put_players_far_from_ball() {
        let mut core = quiet_core(&[PlayerInfo::at(1.0, 0.0, 0.0)], &[PlayerInfo::at(0.0, 0.0, 0.0)]);
        core.env.ball.pos = Vec2::ZERO;
        core.put_players_far_from_ball(TeamSide::Team2, 2.5);
        core.put_players_far_from_ball(TeamSide::Team1, 2.5);
        for (_, _, p) in core.env.players() {
            assert!(p.pos.len() >= 2.5 - 1e-9);
        }
        assert!((core.env.teams[0][0].pos - Vec2::new(2.5, 0.0)).len() < 1e-9);
    }

    #[test]
    fn test_avoid_only_acted_players() {
        let mut core = quiet_core(&[PlayerInfo::at(0.0, 0.0, 0.0), PlayerInfo::at(5.0, 5.0, 0.0)], &[]);
        let target = Vec2::ZERO;
        let pos = core.avoid_other_players_position(target, TeamSide::Team1, 1);
        assert_eq!(pos, target);

        core.env.teams[0][0].acted = true;
        let pos = core.avoid_other_players_position(target, TeamSide::Team1, 1);
        assert!(pos.len() >= core.settings.player_radius * 2.0 - 1e-9);
    }

    #[test]
    fn test_pole_ball_push() {
        let mut core = quiet_core(&[], &[]);
        let pole = core.pitch.poles[0];
        core.env.ball.pos = pole + Vec2::new(0.05, 0.0);
        assert!(core.manage_static_pole_ball_collisions());
        let r = core.settings.pole_radius + core.settings.ball_radius;
        assert!(core.env.ball.pos.dist(pole) >= r - 1e-9);
    }
}

//! # Continuous Collision Handling
//!
//! Within a tick, bodies move in straight lines. The loop repeatedly finds the
//! earliest impact among four categories, advances everything to that instant,
//! applies the responses, and checks for goals and balls out of play.
//!
//! ## Categories (in tie-break order)
//! - ball against goalpost
//! - player against goalpost
//! - ball against player
//! - player against player
//!
//! All impacts sharing the earliest time are applied, category by category.
//! Ball-player ping-pong (A-B-A-B within one tick) freezes the ball and both
//! players.

pub mod response;
pub mod static_resolve;
pub mod toi;

use crate::engine::environment::{MatchState, TeamSide};
use crate::engine::match_core::MatchCore;
use crate::engine::physics_constants::limits::{MAX_COLLISION_INSIDE_TICK_LOOP, PING_PONG_WINDOW};
use crate::engine::vec2::Vec2;
use toi::time_of_impact;
use tracing::trace;

type Slot = (TeamSide, usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CollisionKind {
    PoleBall,
    PolePlayer,
    BallPlayer,
    PlayerPlayer,
}

#[derive(Debug, Clone, Copy)]
struct PoleBallHit {
    t: f64,
    pole: usize,
}

#[derive(Debug, Clone, Copy)]
struct PolePlayerHit {
    t: f64,
    player: Slot,
    pole: usize,
}

#[derive(Debug, Clone, Copy)]
struct BallPlayerHit {
    t: f64,
    player: Slot,
}

#[derive(Debug, Clone, Copy)]
struct PlayerPlayerHit {
    t: f64,
    first: Slot,
    second: Slot,
}

/// Keep only the hits sharing the smallest time.
fn keep_earliest<T>(hits: &mut Vec<T>, earliest: &mut f64, t: f64, hit: T) {
    if t < *earliest {
        hits.clear();
    }
    if t <= *earliest {
        *earliest = t;
        hits.push(hit);
    }
}

/// Per-tick bookkeeping of the collision loop
struct TickCollisions {
    n_team1: usize,
    /// Last player-player partner of each flat slot
    last_partner: Vec<Option<usize>>,
    /// Ball-player pairs skipped for the rest of the tick
    blacklist: Vec<bool>,
    ball_hits: Vec<Slot>,
}

impl TickCollisions {
    fn new(n_team1: usize, n_total: usize) -> Self {
        Self {
            n_team1,
            last_partner: vec![None; n_total],
            blacklist: vec![false; n_total],
            ball_hits: Vec::new(),
        }
    }

    fn flat(&self, (side, index): Slot) -> usize {
        side.index() * self.n_team1 + index
    }

    /// Record a ball hit; true when the last four hits alternate between the
    /// same two players.
    fn push_ball_hit(&mut self, slot: Slot) -> bool {
        self.ball_hits.push(slot);
        let n = self.ball_hits.len();
        n >= PING_PONG_WINDOW
            && self.ball_hits[n - 1] == self.ball_hits[n - 3]
            && self.ball_hits[n - 2] == self.ball_hits[n - 4]
    }
}

impl MatchCore {
    /// Continuous collisions for the current tick, followed by the remaining
    /// straight-line motion when play goes on.
    pub(crate) fn manage_collisions(&mut self) {
        let n_team1 = self.env.team(TeamSide::Team1).len();
        let mut book = TickCollisions::new(n_team1, self.env.n_players());
        let mut partial_t = 0.0;
        let mut count = 0;
        let mut collisions = true;

        while collisions && count < MAX_COLLISION_INSIDE_TICK_LOOP && partial_t < 1.0 {
            let held = self.env.ball_held();
            let pole_ball = if held {
                None
            } else {
                self.find_first_pole_ball_collision(partial_t)
                    .filter(|_| self.env.ball.speed() > 0.0)
            };
            let pole_players = self.find_first_pole_players_collisions(partial_t);
            let ball_players = if held {
                Vec::new()
            } else {
                self.find_first_ball_players_collisions(partial_t, &book)
            };
            let player_players = self.find_first_player_players_collisions(partial_t, &book);

            let mut kinds = Vec::new();
            let mut earliest = f64::INFINITY;
            if let Some(hit) = pole_ball {
                keep_earliest(&mut kinds, &mut earliest, hit.t, CollisionKind::PoleBall);
            }
            if let Some(hit) = pole_players.first() {
                keep_earliest(&mut kinds, &mut earliest, hit.t, CollisionKind::PolePlayer);
            }
            if let Some(hit) = ball_players.first() {
                keep_earliest(&mut kinds, &mut earliest, hit.t, CollisionKind::BallPlayer);
            }
            if let Some(hit) = player_players.first() {
                keep_earliest(&mut kinds, &mut earliest, hit.t, CollisionKind::PlayerPlayer);
            }

            collisions = !kinds.is_empty();
            if collisions {
                let add_t = earliest * (1.0 - partial_t);
                trace!(tick = self.env.tick, partial_t, add_t, ?kinds, "collision");
                self.update_motion(add_t);
                for kind in kinds {
                    match kind {
                        CollisionKind::PoleBall => {
                            if let Some(hit) = pole_ball {
                                self.resolve_pole_ball(hit);
                            }
                        }
                        CollisionKind::PolePlayer => {
                            for hit in &pole_players {
                                self.resolve_pole_player(hit);
                            }
                        }
                        CollisionKind::BallPlayer => {
                            for hit in &ball_players {
                                if !self.resolve_ball_player(hit, &mut book) {
                                    count += 1;
                                }
                            }
                        }
                        CollisionKind::PlayerPlayer => {
                            for hit in &player_players {
                                self.resolve_player_player(hit, &mut book);
                            }
                        }
                    }
                }
                partial_t += add_t;
            }
            count += 1;

            if self.check_goal_or_ball_out() {
                collisions = false;
            } else {
                self.sync_prev();
                self.manage_ball_inside_players();
                if self.check_goal_or_ball_out() {
                    collisions = false;
                } else {
                    self.sync_prev();
                }
            }
        }

        if self.env.ball_held() {
            self.set_ball_held_position();
        }

        if self.env.state == MatchState::Play {
            self.update_motion(1.0 - partial_t);
            self.add_ball_noise();
            if !self.check_goal_or_ball_out() {
                self.sync_prev();
                self.manage_ball_inside_players();
                if !self.check_goal_or_ball_out() {
                    self.sync_prev();
                }
            }
        }
    }

    /// Full movement phase of a play tick.
    pub(crate) fn update_collisions_and_movements(&mut self) {
        self.manage_collisions();
        self.manage_static_players_collisions();
    }

    // ========================================================================
    // Detection
    // ========================================================================

    fn find_first_pole_ball_collision(&self, partial_t: f64) -> Option<PoleBallHit> {
        let radius = self.settings.ball_radius + self.settings.pole_radius;
        let ball = &self.env.ball;
        let mut best: Option<PoleBallHit> = None;
        for (pole, center) in self.pitch.poles.iter().enumerate() {
            if let Some(t) = time_of_impact(ball.pos, ball.velocity, *center, Vec2::ZERO, radius, partial_t) {
                if best.map_or(true, |b| t < b.t) {
                    best = Some(PoleBallHit { t, pole });
                }
            }
        }
        best
    }

    fn find_first_pole_players_collisions(&self, partial_t: f64) -> Vec<PolePlayerHit> {
        let radius = self.settings.player_radius + self.settings.pole_radius;
        let mut hits = Vec::new();
        let mut earliest = f64::INFINITY;
        for (side, index, p) in self.env.players() {
            // a player can only run into one post at a time
            let first = self.pitch.poles.iter().enumerate().find_map(|(pole, center)| {
                time_of_impact(p.pos, p.velocity, *center, Vec2::ZERO, radius, partial_t).map(|t| (t, pole))
            });
            if let Some((t, pole)) = first {
                keep_earliest(&mut hits, &mut earliest, t, PolePlayerHit { t, player: (side, index), pole });
            }
        }
        hits
    }

    fn find_first_ball_players_collisions(&self, partial_t: f64, book: &TickCollisions) -> Vec<BallPlayerHit> {
        let radius = self.settings.player_radius + self.settings.ball_radius;
        let ball = &self.env.ball;
        let mut hits = Vec::new();
        let mut earliest = f64::INFINITY;
        for (side, index, p) in self.env.players() {
            if book.blacklist[book.flat((side, index))] {
                continue;
            }
            if let Some(t) = time_of_impact(ball.pos, ball.velocity, p.pos, p.velocity, radius, partial_t) {
                keep_earliest(&mut hits, &mut earliest, t, BallPlayerHit { t, player: (side, index) });
            }
        }
        hits
    }

    fn find_first_player_players_collisions(&self, partial_t: f64, book: &TickCollisions) -> Vec<PlayerPlayerHit> {
        let radius = self.settings.player_radius * 2.0;
        let mut hits = Vec::new();
        let mut earliest = f64::INFINITY;
        for w1 in TeamSide::BOTH {
            for w2 in TeamSide::BOTH {
                if w1.is_team2() && !w2.is_team2() {
                    continue;
                }
                for n1 in 0..self.env.team(w1).len() {
                    let start = if w1 == w2 { n1 + 1 } else { 0 };
                    for n2 in start..self.env.team(w2).len() {
                        let (a, b) = ((w1, n1), (w2, n2));
                        if book.last_partner[book.flat(a)] == Some(book.flat(b)) {
                            continue;
                        }
                        let p1 = self.env.player(w1, n1);
                        let p2 = self.env.player(w2, n2);
                        if let Some(t) = time_of_impact(p1.pos, p1.velocity, p2.pos, p2.velocity, radius, partial_t) {
                            keep_earliest(&mut hits, &mut earliest, t, PlayerPlayerHit { t, first: a, second: b });
                        }
                    }
                }
            }
        }
        hits
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    fn resolve_pole_ball(&mut self, hit: PoleBallHit) {
        let pole = self.pitch.poles[hit.pole];
        let ball = self.env.ball;
        self.env.ball.velocity = response::pole_ball_bounce(ball.pos, ball.velocity, pole);
    }

    fn resolve_pole_player(&mut self, hit: &PolePlayerHit) {
        let pole = self.pitch.poles[hit.pole];
        let contact = self.settings.pole_radius + self.settings.player_radius;
        let (side, index) = hit.player;
        let p = self.env.player_mut(side, index);
        p.velocity = Vec2::ZERO;
        p.pos = response::pole_player_snap(p.pos, pole, contact);
    }

    /// Apply one ball-player impact. Returns false when the impact was
    /// discarded (ping-pong freeze or degenerate geometry).
    fn resolve_ball_player(&mut self, hit: &BallPlayerHit, book: &mut TickCollisions) -> bool {
        if book.push_ball_hit(hit.player) {
            let n = book.ball_hits.len();
            let (a, b) = (book.ball_hits[n - 1], book.ball_hits[n - 2]);
            self.env.ball.velocity = Vec2::ZERO;
            self.env.player_mut(a.0, a.1).velocity = Vec2::ZERO;
            self.env.player_mut(b.0, b.1).velocity = Vec2::ZERO;
            return false;
        }

        let (side, index) = hit.player;
        self.env.last_touched = side;
        let player = *self.env.player(side, index);
        let ball = self.env.ball;
        match response::ball_player_bounce(
            ball.pos,
            ball.velocity,
            &player,
            self.settings.kickable_angle,
            self.settings.simplified,
        ) {
            Some(velocity) => {
                self.env.ball.velocity = velocity;
                true
            }
            None => {
                let slot = book.flat(hit.player);
                book.blacklist[slot] = true;
                false
            }
        }
    }

    fn resolve_player_player(&mut self, hit: &PlayerPlayerHit, book: &mut TickCollisions) {
        let (fa, fb) = (book.flat(hit.first), book.flat(hit.second));
        book.last_partner[fa] = Some(fb);
        book.last_partner[fb] = Some(fa);

        let p1 = *self.env.player(hit.first.0, hit.first.1);
        let p2 = *self.env.player(hit.second.0, hit.second.1);
        let (v1, v2) = response::player_player_exchange(&p1, &p2);
        self.env.player_mut(hit.first.0, hit.first.1).velocity = v1;
        self.env.player_mut(hit.second.0, hit.second.1).velocity = v2;
    }
}

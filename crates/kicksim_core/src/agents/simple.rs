//! # Simple reactive player
//!
//! A heuristic agent with no planning. Slot 0 plays goalkeeper, every other
//! slot plays outfield. All reasoning happens in the team-relative view of
//! [`perspective`](crate::agents::perspective): own team attacking right.
//!
//! ## Outfield
//! - ball kickable: take the pending throw-in/corner as a pass, shoot when
//!   close to goal, otherwise pass or dribble forward
//! - closest to the ball: chase it
//! - off the pitch: head back in
//! - otherwise: mark when the opponents are closer to the ball, push forward
//!   when we are
//!
//! ## Goalkeeper
//! Clears a kickable ball, catches a reachable one inside the own area and
//! otherwise stands a third of the way from the goal center to the ball.

use crate::agents::perspective::{own_view, to_world};
use crate::engine::action::{Action, ActionType};
use crate::engine::config::Settings;
use crate::engine::decision::{build_team, DecisionMaker, GameState, Roster};
use crate::engine::environment::{Environment, MatchState, PlayerInfo, TeamSide};
use crate::engine::physics_constants::{EPSILON, SMALL_EPSILON};
use crate::engine::pitch::Pitch;
use crate::engine::rng::SimRng;
use crate::engine::vec2::{fix_angle_positive, fix_angle_two_sides, Vec2};
use std::f64::consts::{FRAC_PI_2, PI};

/// Scoring weights of the pass and dribble heuristics
mod tuning {
    pub const PASS_GOALKEEPER_DISADVANTAGE: f64 = -10.0;
    pub const PASS_BACKWARD_DISADVANTAGE: f64 = -5.0;
    pub const PASS_ADVANCED_ADVANTAGE: f64 = 5.0;
    pub const PASS_OCCLUDED_DISADVANTAGE: f64 = -20.0;
    pub const PASS_FAVOURITE_DISTANCE: f64 = 10.0;
    pub const PASS_DISTANCE_DISADVANTAGE: f64 = -0.1;
    pub const ADVANCED_PASS_LENGTH: f64 = 5.0;
    pub const OUT_OF_ANGLE_DISADVANTAGE: f64 = -25.0;
    pub const OWN_GOAL_DISTANCE_THRESHOLD: f64 = 6.0;
    pub const OWN_GOAL_DISTANCE_DISADVANTAGE: f64 = -15.0;
    pub const MINIMUM_PASS_VALUE: f64 = 0.1;
    /// Value of a pass when nobody can receive it
    pub const NO_PASS_VALUE: f64 = -1000.0;

    pub const SHOT_INTERVALS: usize = 12;
    /// Closer than this to the opponent goal: shoot
    pub const SCORE_DISTANCE: f64 = 8.0;

    pub const DRIBBLE_CHECKED_DISTANCE: f64 = 3.0;
    pub const DRIBBLE_INTERVALS: usize = 6;
    pub const ADVANCING_INCENTIVE: f64 = 1.0;
    pub const DANGER_BORDER_RATIO: f64 = 0.9;
    pub const GOAL_INCENTIVE: f64 = 50.0;

    pub const MARK_DISTANCE: f64 = 1.0;
    pub const GOALKEEPER_INTERVENTION_DISTANCE: f64 = 3.0;
    pub const GOALKEEPER_STANDING_TOLERANCE: f64 = 0.5;

    /// Own rng seed; agents stay reproducible independently of the match seed
    pub const AGENT_SEED: u64 = 42;
}

use tuning::*;

/// Distance from `p` to the segment `s1`-`s2`.
pub fn distance_point_segment(p: Vec2, s1: Vec2, s2: Vec2) -> f64 {
    let d = s2 - s1;
    let dp1 = p - s1;
    if d.x.abs() <= SMALL_EPSILON && d.y.abs() <= SMALL_EPSILON {
        return dp1.len();
    }
    let u = dp1.dot(d) / d.len_sq();
    if !(0.0..=1.0).contains(&u) {
        return dp1.len().min((p - s2).len());
    }
    (p - (s1 + d * u)).len()
}

/// Outfield marking plan entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marking {
    Free,
    Busy,
    Mark(usize),
}

/// One decision's worth of context in the team-relative view
struct Outlook<'a> {
    settings: &'a Settings,
    pitch: &'a Pitch,
    env: Environment,
    shirt: usize,
    prev_state: MatchState,
    prev_action: ActionType,
    cos_kickable: f64,
    cos_catchable: f64,
}

impl Outlook<'_> {
    fn me(&self) -> &PlayerInfo {
        &self.env.teams[0][self.shirt]
    }

    fn opponent_goal(&self) -> Vec2 {
        Vec2::new(self.pitch.right_x, 0.0)
    }

    fn own_goal(&self) -> Vec2 {
        Vec2::new(self.pitch.left_x, 0.0)
    }

    // ========================================================================
    // Geometry helpers
    // ========================================================================

    fn angle_toward(&self, target: Vec2) -> f64 {
        let d = target - self.me().pos;
        if d.is_zero() {
            0.0
        } else {
            d.angle()
        }
    }

    fn ball_angle_toward(&self, target: Vec2) -> f64 {
        let d = target - self.env.ball.pos;
        if d.is_zero() {
            0.0
        } else {
            d.angle()
        }
    }

    /// Taking a restart this tick: the previous decision was in one of our
    /// restart states.
    fn is_team_resume_kicking(&self) -> bool {
        self.prev_state.restarting_side() == Some(TeamSide::Team1)
    }

    /// Clamp a kick heading into the cone the engine accepts.
    fn best_kick_angle(&self, angle: f64) -> f64 {
        if self.is_team_resume_kicking() || self.settings.simplified {
            return angle;
        }
        let facing = self.me().direction;
        let limit = self.settings.kickable_direction_angle;
        let diff = fix_angle_two_sides(fix_angle_positive(angle) - facing);
        if diff > limit {
            facing + limit
        } else if diff < -limit {
            facing - limit
        } else {
            angle
        }
    }

    /// Where a ball kicked along `angle` would cross our goal line, if that
    /// is inside the goal mouth.
    fn own_goal_crossing(&self, angle: f64) -> Option<f64> {
        let a = fix_angle_positive(angle);
        if !(FRAC_PI_2..=PI * 1.5).contains(&a) {
            return None;
        }
        let dir = Vec2::from_angle(a);
        if dir.x == 0.0 {
            return None;
        }
        let ball = self.env.ball.pos;
        let y = ball.y + (self.pitch.left_x - ball.x) * dir.y / dir.x;
        self.pitch.within_goal_mouth(y).then_some(y)
    }

    fn own_goal_risk(&self, angle: f64) -> f64 {
        let Some(y) = self.own_goal_crossing(angle) else {
            return 0.0;
        };
        let dist = self.env.ball.pos.dist(Vec2::new(self.pitch.left_x, y));
        if dist < OWN_GOAL_DISTANCE_THRESHOLD {
            (OWN_GOAL_DISTANCE_THRESHOLD - dist) * OWN_GOAL_DISTANCE_DISADVANTAGE / OWN_GOAL_DISTANCE_THRESHOLD
        } else {
            0.0
        }
    }

    fn min_opponent_segment_distance(&self, s1: Vec2, s2: Vec2) -> f64 {
        self.env.teams[1]
            .iter()
            .map(|p| distance_point_segment(p.pos, s1, s2))
            .fold(1000.0, f64::min)
    }

    fn is_ball_kickable(&self) -> bool {
        let me = self.me();
        let d = self.env.ball.pos - me.pos;
        let dist = d.len();
        if dist > self.settings.kickable_distance {
            return false;
        }
        if !self.settings.simplified && !self.is_team_resume_kicking() && dist > SMALL_EPSILON {
            return me.facing().cos_between(d) > self.cos_kickable;
        }
        true
    }

    /// Mean position of the opponents' outfield players.
    fn opponent_barycenter(&self) -> Vec2 {
        let outfield = self.env.teams[1].get(1..).unwrap_or(&[]);
        if outfield.is_empty() {
            return Vec2::ZERO;
        }
        let sum = outfield.iter().fold(Vec2::ZERO, |acc, p| acc + p.pos);
        sum / outfield.len() as f64
    }

    /// Closest outfield player to the ball belongs to the opponents.
    fn is_opponent_closer_to_ball(&self) -> bool {
        let ball = self.env.ball.pos;
        let mut closer = 0;
        let mut min_dist = f64::MAX;
        for (team, players) in self.env.teams.iter().enumerate() {
            for p in players.iter().skip(1) {
                let dist = (p.pos - ball).len_sq();
                if dist < min_dist {
                    closer = team;
                    min_dist = dist;
                }
            }
        }
        closer == 1
    }

    /// Outfield player closest to the ball; 0 when there is none.
    fn closest_to_ball(&self, team: usize) -> usize {
        let ball = self.env.ball.pos;
        let players = &self.env.teams[team];
        let mut closest = 0;
        let mut min_dist = f64::MAX;
        for (i, p) in players.iter().enumerate().skip(1) {
            let dist = (p.pos - ball).len_sq();
            if dist < min_dist {
                closest = i;
                min_dist = dist;
            }
        }
        closest
    }

    fn closest_free_to_opponent(&self, opponent: usize, plan: &[Marking]) -> Option<usize> {
        let target = self.env.teams[1][opponent].pos;
        plan.iter()
            .enumerate()
            .filter(|(_, m)| **m == Marking::Free)
            .map(|(i, _)| (i, (target - self.env.teams[0][i].pos).len_sq()))
            .fold(None, |best: Option<(usize, f64)>, (i, d)| match best {
                Some((_, bd)) if bd <= d => best,
                _ => Some((i, d)),
            })
            .map(|(i, _)| i)
    }

    // ========================================================================
    // Passing
    // ========================================================================

    /// A spot ahead of a teammate, toward the opponent goal.
    fn advanced_position(&self, mate: usize) -> Vec2 {
        let pos = self.env.teams[0][mate].pos;
        pos + (self.opponent_goal() - pos).resized(ADVANCED_PASS_LENGTH)
    }

    fn pass_value(&self, mate: usize, advanced: bool) -> f64 {
        let ball = self.env.ball.pos;
        let target = if advanced {
            self.advanced_position(mate)
        } else {
            self.env.teams[0][mate].pos
        };
        let mut value = 0.0;
        if advanced {
            value += PASS_ADVANCED_ADVANTAGE;
        }
        let clearance = self.min_opponent_segment_distance(target, ball);
        if clearance <= self.settings.ball_radius + self.settings.player_radius {
            value += PASS_OCCLUDED_DISADVANTAGE;
        }
        if mate == 0 {
            value += PASS_GOALKEEPER_DISADVANTAGE;
        }
        if target.x < ball.x {
            value += PASS_BACKWARD_DISADVANTAGE;
        }
        value += (PASS_FAVOURITE_DISTANCE - ball.dist(target)).abs() * PASS_DISTANCE_DISADVANTAGE;

        let d = target - ball;
        if d.x != 0.0 && d.y != 0.0 {
            let mut angle = d.angle();
            if !self.settings.simplified && !self.is_team_resume_kicking() {
                let diff = fix_angle_two_sides(fix_angle_positive(angle) - self.me().direction);
                if diff.abs() > self.settings.kickable_direction_angle {
                    value += OUT_OF_ANGLE_DISADVANTAGE;
                    angle = self.best_kick_angle(angle);
                }
            }
            value += self.own_goal_risk(angle);
        }
        value
    }

    /// Best receiving spot and its value.
    fn choose_pass(&self) -> (Vec2, f64) {
        let mut best_still: Option<(usize, f64)> = None;
        let mut best_advanced: Option<(usize, f64)> = None;
        for mate in 0..self.env.teams[0].len() {
            if mate == self.shirt {
                continue;
            }
            let still = self.pass_value(mate, false);
            if still > best_still.map_or(NO_PASS_VALUE, |(_, v)| v) {
                best_still = Some((mate, still));
            }
            let advanced = self.pass_value(mate, true);
            if advanced > best_advanced.map_or(NO_PASS_VALUE, |(_, v)| v) {
                best_advanced = Some((mate, advanced));
            }
        }

        let Some((still_mate, still)) = best_still else {
            return (Vec2::ZERO, NO_PASS_VALUE);
        };
        match best_advanced {
            Some((mate, advanced)) if advanced >= still => (self.advanced_position(mate), advanced),
            _ => (self.env.teams[0][still_mate].pos, still),
        }
    }

    fn kick_toward(&self, target: Vec2, power: f64) -> Action {
        Action::kick(self.best_kick_angle(self.ball_angle_toward(target)), power)
    }

    /// Throw-ins and corners: best pass at full power.
    fn choose_set_piece_pass(&self) -> Action {
        let (target, _) = self.choose_pass();
        self.kick_toward(target, self.settings.max_kick_power)
    }

    /// Aim across the goal mouth where the opponents leave the widest gap.
    fn choose_attack_kick(&self) -> Action {
        let ball = self.env.ball.pos;
        let mut best_y = 0.0;
        let mut best_value = 0.0;
        for i in 0..=SHOT_INTERVALS {
            let share = i as f64 / SHOT_INTERVALS as f64;
            let y = self.pitch.goal_top_y * share + self.pitch.goal_bottom_y * (1.0 - share);
            let gap = self.min_opponent_segment_distance(ball, Vec2::new(self.pitch.right_x, y));
            if gap > best_value {
                best_value = gap;
                best_y = y;
            }
        }
        self.kick_toward(Vec2::new(self.pitch.right_x, best_y), self.settings.max_kick_power)
    }

    /// Short kick within the facing cone toward open, central space.
    fn choose_dribble(&self) -> Action {
        let ball = self.env.ball.pos;
        let facing = self.me().direction;
        let from = facing - self.settings.kickable_angle;
        let to = facing + self.settings.kickable_angle;
        let danger_border = self.pitch.top_y * DANGER_BORDER_RATIO;
        let border_band = self.pitch.top_y * (1.0 - DANGER_BORDER_RATIO);

        let mut best_value = 0.0;
        let mut best_angle = 0.0;
        for i in 0..=DRIBBLE_INTERVALS {
            let share = i as f64 / DRIBBLE_INTERVALS as f64;
            let angle = from * share + to * (1.0 - share);
            let target = ball + Vec2::from_angle(angle) * DRIBBLE_CHECKED_DISTANCE;

            let mut value = self.min_opponent_segment_distance(ball, target);
            if target.x > ball.x {
                value += ADVANCING_INCENTIVE;
            }
            if target.y > danger_border {
                value -= (target.y - danger_border) / border_band;
            } else if target.y < -danger_border {
                value += (target.y + danger_border) / border_band;
            }
            let closeness = GOAL_INCENTIVE / (1.0 + self.opponent_goal().dist(target));
            value += closeness * closeness;
            value += self.own_goal_risk(angle);

            if value > best_value {
                best_value = value;
                best_angle = angle;
            }
        }
        Action::kick(self.best_kick_angle(best_angle), self.settings.max_kick_power / 2.0)
    }

    fn choose_pass_or_dribble(&self) -> Action {
        let (target, value) = self.choose_pass();
        if value > MINIMUM_PASS_VALUE {
            self.kick_toward(target, self.settings.max_kick_power)
        } else {
            self.choose_dribble()
        }
    }

    // ========================================================================
    // Open play
    // ========================================================================

    fn dash(&self, angle: f64) -> Action {
        Action::dash(angle, self.settings.max_dash_power)
    }

    fn play(&self, rng: &mut SimRng) -> Action {
        if self.is_ball_kickable() {
            return match self.prev_state {
                MatchState::Throwin1 => self.choose_set_piece_pass(),
                MatchState::Corner1Up | MatchState::Corner1Down => self.choose_set_piece_pass(),
                _ if self.env.ball.pos.dist(self.opponent_goal()) <= SCORE_DISTANCE => self.choose_attack_kick(),
                _ => self.choose_pass_or_dribble(),
            };
        }

        if self.closest_to_ball(0) == self.shirt {
            return self.dash(self.angle_toward(self.env.ball.pos));
        }

        let pos = self.me().pos;
        let p = self.pitch;
        if pos.x > p.right_x {
            if pos.y < p.bottom_y {
                self.dash(PI * 0.75)
            } else if pos.y > p.top_y {
                self.dash(PI * 1.25)
            } else {
                self.dash(PI)
            }
        } else if pos.x < p.left_x {
            if pos.y < p.bottom_y {
                self.dash(PI * 0.25)
            } else if pos.y > p.top_y {
                self.dash(PI * 1.75)
            } else {
                self.dash(0.0)
            }
        } else if pos.y > p.top_y {
            self.dash(PI * 1.5)
        } else if pos.y < p.bottom_y {
            self.dash(PI * 0.5)
        } else if self.shirt == 0 {
            self.position_goalkeeper()
        } else {
            self.position_player(rng)
        }
    }

    fn position_player(&self, rng: &mut SimRng) -> Action {
        let go_back_x = self.pitch.left_x / 2.0;
        let barycenter_threshold = self.pitch.left_x.abs() / 4.0;
        let run_forward_x = self.pitch.right_x * 2.0 / 3.0;
        let pos = self.me().pos;

        if !self.is_opponent_closer_to_ball() {
            return if pos.x < run_forward_x {
                let pole = if pos.y > 0.0 { self.pitch.goal_top_y } else { self.pitch.goal_bottom_y };
                self.dash(self.angle_toward(Vec2::new(self.pitch.right_x, pole)))
            } else {
                self.dash(rng.angle())
            };
        }

        let deep = self.env.ball.pos.x < go_back_x;
        let spread = self.opponent_barycenter().dist(self.own_goal()) > barycenter_threshold;
        if !deep && !spread {
            let pole = if pos.y > 0.0 { self.pitch.goal_top_y } else { self.pitch.goal_bottom_y };
            return self.dash(self.angle_toward(Vec2::new(self.pitch.left_x, pole)));
        }

        match self.marking_plan()[self.shirt] {
            Marking::Busy => self.dash(self.angle_toward(self.env.ball.pos)),
            Marking::Mark(opponent) => {
                let target = self.env.teams[1][opponent].pos;
                let goal_side = target + (self.own_goal() - target).resized(MARK_DISTANCE);
                self.dash(self.angle_toward(goal_side))
            }
            Marking::Free => Action::noop(),
        }
    }

    /// Goalkeeper and ball chaser are busy; the rest mark the opponents
    /// (except their goalkeeper and ball carrier), closest free player first.
    fn marking_plan(&self) -> Vec<Marking> {
        let mut plan = vec![Marking::Free; self.env.teams[0].len()];
        if plan.is_empty() {
            return plan;
        }
        plan[self.closest_to_ball(0)] = Marking::Busy;
        plan[0] = Marking::Busy;
        let busy_opponent = self.closest_to_ball(1);
        for opponent in 1..self.env.teams[1].len() {
            if opponent == busy_opponent {
                continue;
            }
            if let Some(mate) = self.closest_free_to_opponent(opponent, &plan) {
                if mate > 0 {
                    plan[mate] = Marking::Mark(opponent);
                }
            }
        }
        plan
    }

    fn position_goalkeeper(&self) -> Action {
        let me = self.me();
        let ball = self.env.ball.pos;
        if me.pos.dist(ball) < GOALKEEPER_INTERVENTION_DISTANCE && me.pos.x < 0.0 {
            return self.dash(self.angle_toward(ball));
        }

        let goal = self.own_goal();
        let wanted = goal + (ball - goal) / 3.0;
        let gap = wanted - me.pos;
        if gap.len() > GOALKEEPER_STANDING_TOLERANCE {
            let angle = if gap.x == 0.0 {
                if gap.y > 0.0 {
                    FRAC_PI_2
                } else {
                    -FRAC_PI_2
                }
            } else {
                gap.angle()
            };
            self.dash(angle)
        } else {
            Action::dash(self.angle_toward(ball), 0.0)
        }
    }

    fn play_goalkeeper(&self) -> Action {
        let me = self.me();
        let d = self.env.ball.pos - me.pos;
        let dist = d.len();
        let cos_ball = me.facing().cos_between(d);

        if dist < self.settings.kickable_distance && cos_ball >= self.cos_kickable {
            return self.choose_pass_or_dribble();
        }

        let in_area = self.pitch.in_area(me.pos, false);
        if dist < self.settings.catchable_distance && in_area && cos_ball >= self.cos_catchable {
            if self.prev_action == ActionType::Kick {
                return self.position_goalkeeper();
            }
            return Action::catch();
        }
        self.position_goalkeeper()
    }

    // ========================================================================
    // Restarts
    // ========================================================================

    fn restart_offset(&self) -> f64 {
        self.settings.kick_radius / 10.0 + self.settings.player_radius + self.settings.ball_radius
    }

    fn kickoff_position(&self, kicking: bool) -> Vec2 {
        let s = self.settings;
        let p = self.pitch;
        let formation = |shirt: usize| {
            Vec2::new(-p.right_x + p.right_x / (shirt - 1) as f64, s.center_radius * ((shirt % 3) as f64 - 1.0))
        };
        match (self.shirt, kicking) {
            (0, _) => Vec2::new((p.left_x + p.area_left_x) / 2.0, 0.0),
            (1, true) => Vec2::new(-s.ball_radius - s.player_radius - EPSILON, 0.0),
            (1, false) => Vec2::new(-s.center_radius - s.player_radius - EPSILON, 0.0),
            (2, true) => Vec2::new(-s.ball_radius, s.center_radius),
            (2, false) => Vec2::new(p.left_x / 2.0, p.bottom_y / 2.0),
            (3, true) => Vec2::new(-p.right_x / 3.0, -s.center_radius),
            (3, false) => Vec2::new(p.left_x / 2.0, -p.bottom_y / 2.0),
            (shirt, _) => formation(shirt),
        }
    }

    fn restart(&self) -> Action {
        let offset = self.restart_offset();
        let p = self.pitch;
        let taker = self.closest_to_ball(0) == self.shirt;
        match self.env.state {
            MatchState::Kickoff1 | MatchState::Kickoff2 => {
                let pos = self.kickoff_position(self.env.state == MatchState::Kickoff1);
                Action::move_to(pos.x, pos.y, 0.0)
            }
            MatchState::Goalkick1Up if self.shirt == 0 => {
                Action::move_to(p.goal_kick_left_x - offset, p.goal_kick_top_y, 0.0)
            }
            MatchState::Goalkick1Down if self.shirt == 0 => {
                Action::move_to(p.goal_kick_left_x - offset, p.goal_kick_bottom_y, 0.0)
            }
            MatchState::Corner1Up if taker => Action::move_to(p.right_x, p.top_y + offset, 0.0),
            MatchState::Corner1Down if taker => Action::move_to(p.right_x, p.bottom_y - offset, 0.0),
            MatchState::Throwin1 if taker => {
                let ball = self.env.ball.pos;
                let offset = if ball.y < 0.0 { -offset } else { offset };
                Action::move_to(ball.x, ball.y + offset, 0.0)
            }
            _ => Action::noop(),
        }
    }

    fn decide(&self, rng: &mut SimRng) -> Action {
        match self.env.state {
            MatchState::Play if self.shirt == 0 => self.play_goalkeeper(),
            MatchState::Play => self.play(rng),
            state if state.is_restart() => self.restart(),
            _ => Action::noop(),
        }
    }
}

/// Reactive heuristic player; slot 0 is the goalkeeper
#[derive(Debug, Clone)]
pub struct SimplePlayer {
    shirt: usize,
    side: TeamSide,
    rng: SimRng,
    prev_state: MatchState,
    prev_action: Action,
}

impl SimplePlayer {
    pub fn new(shirt: usize, side: TeamSide) -> Self {
        Self {
            shirt,
            side,
            rng: SimRng::new(AGENT_SEED),
            prev_state: MatchState::Inactive,
            prev_action: Action::noop(),
        }
    }

    /// A full roster of simple players for `side`.
    pub fn team(n: usize, side: TeamSide) -> Roster {
        build_team(n, |shirt| SimplePlayer::new(shirt, side))
    }

    pub fn shirt(&self) -> usize {
        self.shirt
    }

    pub fn side(&self) -> TeamSide {
        self.side
    }
}

impl DecisionMaker for SimplePlayer {
    fn step(&mut self, state: &GameState) -> Action {
        let env = own_view(&state.env, self.side);
        if self.shirt >= env.teams[0].len() {
            return Action::noop();
        }
        let outlook = Outlook {
            settings: &state.settings,
            pitch: &state.pitch,
            env,
            shirt: self.shirt,
            prev_state: self.prev_state,
            prev_action: self.prev_action.kind,
            cos_kickable: state.settings.kickable_angle.cos(),
            cos_catchable: state.settings.catchable_angle.cos(),
        };

        let action = outlook.decide(&mut self.rng);
        self.prev_state = outlook.env.state;
        self.prev_action = to_world(action, &state.env, self.side);
        self.prev_action
    }
}

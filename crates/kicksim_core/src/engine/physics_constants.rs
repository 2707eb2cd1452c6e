//! Physics constants for match simulation
//!
//! Tunables that are part of a match's [`Settings`](crate::engine::config::Settings)
//! live there; what remains here is fixed engine behavior.

// ============================================================
// Numerical tolerances
// ============================================================
pub mod epsilon {
    /// Machine epsilon, used where only rounding noise must be absorbed
    pub const SMALL_EPSILON: f64 = f64::EPSILON;

    /// Default tolerance for coincident bodies and TOI lower bound
    pub const EPSILON: f64 = f64::EPSILON * 10.0;

    /// Tolerance for near-parallel trajectories
    pub const BIG_EPSILON: f64 = f64::EPSILON * 100.0;
}

// ============================================================
// Collision responses
// ============================================================
pub mod collision {
    /// Ball keeps a bit more than the player's velocity after a hit
    pub const BALL_PLAYER_HIT_FACTOR: f64 = 1.1;

    /// Same as above, simplified rule set
    pub const BALL_PLAYER_HIT_FACTOR_SIMPLIFIED: f64 = 1.001;

    /// Ball speed kept when bouncing off a goalpost
    pub const BALL_POLE_BOUNCE_FACTOR: f64 = 0.95;

    /// Ball speed kept when bouncing off a player
    pub const BALL_PLAYER_BOUNCE_FACTOR: f64 = 0.91;

    /// Ball speed kept when a player controls it with the front of the body
    pub const BALL_PLAYER_STOP_FACTOR: f64 = 0.25;

    /// Share of the lateral momentum applied as displacement in player crashes
    pub const COLLISION_PLAYER_DISPLACE_FACTOR: f64 = 0.2;

    /// Transmission share per player in a player-player crash (equal masses)
    pub const PLAYER_MOMENTUM_SHARE: f64 = 0.5;
}

// ============================================================
// Iteration caps
// ============================================================
pub mod limits {
    /// Cap for static overlap cleanup and restart placement loops
    pub const MAX_COLLISION_LOOP: usize = 10;

    /// Cap for continuous collision iterations within one tick
    pub const MAX_COLLISION_INSIDE_TICK_LOOP: usize = 40;

    /// Length of the ball-player hit history checked for A-B-A-B ping-pong
    pub const PING_PONG_WINDOW: usize = 4;
}

// ============================================================
// Rules
// ============================================================
pub mod rules {
    /// Chance that a second kick in the same tick also succeeds (full rules)
    pub const CONTEMPORARY_KICK_PROBABILITY: f64 = 0.5;

    /// Cosine of the cone in front of a kicker where the ball is left in place
    /// before a simplified-rules kick (about 45 degrees)
    pub const SIMPLIFIED_KICK_FRONT_COS: f64 = 0.707;

    /// Coin flip threshold for which side kicks off first
    pub const START_COIN_THRESHOLD: f64 = 0.5;
}

// ============================================================
// Regulation pitch reference (meters)
// ============================================================
pub mod regulation {
    pub const PITCH_LENGTH: f64 = 105.0;
    pub const PITCH_WIDTH: f64 = 68.0;
    pub const AREA_LENGTH: f64 = 16.5;
    pub const AREA_WIDTH: f64 = 40.32;
    pub const GOAL_WIDTH: f64 = 7.32;
    /// Minimum opponent distance at corners on a regulation pitch
    pub const CORNER_DISTANCE: f64 = 9.15;
    /// Lower bound for corner distance on small pitches (5-a-side uses 4.0)
    pub const MIN_CORNER_DISTANCE: f64 = 2.5;
    pub const MIN_THROWIN_DISTANCE: f64 = 2.5;
    pub const PLAYER_OUT_OF_PITCH_LIMIT: f64 = 3.0;

    /// Penalty area length scaled from regulation proportions
    pub fn area_length(pitch_length: f64) -> f64 {
        pitch_length / PITCH_LENGTH * AREA_LENGTH
    }

    /// Penalty area width scaled from regulation proportions
    pub fn area_width(pitch_width: f64) -> f64 {
        pitch_width / PITCH_WIDTH * AREA_WIDTH
    }

    /// Corner distance scaled from regulation, never below the minimum
    pub fn corner_distance(pitch_width: f64) -> f64 {
        (pitch_width / PITCH_WIDTH * CORNER_DISTANCE).max(MIN_CORNER_DISTANCE)
    }
}

pub use epsilon::*;

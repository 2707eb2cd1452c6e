//! # kicksim_core - Deterministic 2D Robotic Soccer Engine
//!
//! A tick-based physics and rules engine for a simplified soccer match
//! between two rosters of autonomous decision-makers.
//!
//! ## Features
//! - Continuous-time collisions between ball, players and goalposts
//! - Full restart rules: kickoffs, goal-kicks, corners, throw-ins
//! - Goalkeeper catch and hold
//! - Deterministic: same seed and same decision-makers give the same match
//! - Per-tick history with text export
//!
//! ## Quick start
//! ```rust
//! use kicksim_core::Simulator;
//!
//! let mut sim = Simulator::with_simple_players(4, 4, 42);
//! for _ in 0..100 {
//!     sim.step_if_playing();
//! }
//! println!("{}", sim.state_string());
//! ```

// Physics code indexes both rosters by team number
#![allow(clippy::needless_range_loop)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::field_reassign_with_default)]

pub mod agents;
pub mod engine;
pub mod error;
pub mod replay;

pub use agents::{ScriptedPlayer, SimplePlayer};
pub use engine::{
    Action, ActionType, DecisionMaker, Environment, GameState, MatchState, Roster, Settings, Simulator, TeamSide,
    Vec2,
};
pub use error::{Result, SimError};
pub use replay::History;

/// Crate version, written at the top of exported state files
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

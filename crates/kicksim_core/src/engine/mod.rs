//! Simulation engine
//!
//! Public building blocks (geometry, settings, world state, decisions) plus
//! the crate-internal match core whose behavior is spread over `motion`,
//! `collision`, `rules` and `match_state`.

pub mod action;
pub mod collision;
pub mod config;
pub mod decision;
pub mod environment;
pub(crate) mod match_core;
pub(crate) mod match_state;
pub mod motion;
pub mod physics_constants;
pub mod pitch;
pub mod rng;
pub(crate) mod rules;
pub mod simulator;
pub mod turn_order;
pub mod vec2;

pub use action::{Action, ActionRecord, ActionType};
pub use config::Settings;
pub use decision::{build_team, build_team_with_goalkeeper, DecisionMaker, GameState, Roster};
pub use environment::{Environment, MatchState, ObjectInfo, PlayerInfo, TeamSide};
pub use pitch::Pitch;
pub use simulator::{Simulator, SimulatorBuilder};
pub use vec2::Vec2;

//! Built-in decision-makers
//!
//! - [`SimplePlayer`]: reactive heuristic team player
//! - [`ScriptedPlayer`]: replays a fixed action list
//!
//! [`perspective`] maps a match into the team-relative view agents reason in.

pub mod perspective;
pub mod scripted;
pub mod simple;

pub use scripted::ScriptedPlayer;
pub use simple::SimplePlayer;

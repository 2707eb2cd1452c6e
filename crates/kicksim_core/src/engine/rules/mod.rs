//! Action resolution
//!
//! `moves` covers placement during dead-ball states, `play` the live-ball
//! actions. Which resolver runs for which state is decided by the state
//! machine in [`match_state`](crate::engine::match_state).

pub mod moves;
pub mod play;

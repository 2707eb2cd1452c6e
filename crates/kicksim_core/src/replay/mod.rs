//! Match history and its export
//!
//! - [`History`]: per-tick environment snapshots and resolved actions
//! - [`export`]: comma-separated states/actions text files

pub mod export;
pub mod history;

pub use export::{save_history, write_actions, write_states, ExportHeader};
pub use history::{History, TickRecord};

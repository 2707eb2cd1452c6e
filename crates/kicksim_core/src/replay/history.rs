//! Match history
//!
//! One environment snapshot per simulated tick, taken before the tick runs,
//! plus the actions resolved during that tick in resolution order. A final
//! snapshot is appended when the match ends.

use crate::engine::action::ActionRecord;
use crate::engine::environment::Environment;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Snapshot of one tick and the decisions taken in it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickRecord {
    pub env: Environment,
    pub actions: Vec<ActionRecord>,
}

/// Append-only record of a match
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    ticks: Vec<TickRecord>,
    final_env: Option<Environment>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(ticks: usize) -> Self {
        Self { ticks: Vec::with_capacity(ticks), final_env: None }
    }

    /// Open the record of a new tick with the environment as it starts.
    pub fn begin_tick(&mut self, env: &Environment) {
        self.ticks.push(TickRecord { env: env.clone(), actions: Vec::new() });
    }

    /// Append a resolved action to the current tick.
    pub fn record_action(&mut self, record: ActionRecord) {
        if let Some(current) = self.ticks.last_mut() {
            current.actions.push(record);
        }
    }

    /// Store the environment after the last tick.
    pub fn finish(&mut self, env: &Environment) {
        self.final_env = Some(env.clone());
    }

    pub fn ticks(&self) -> &[TickRecord] {
        &self.ticks
    }

    pub fn final_env(&self) -> Option<&Environment> {
        self.final_env.as_ref()
    }

    /// All environment snapshots in order, the final one included.
    pub fn states(&self) -> impl Iterator<Item = &Environment> {
        self.ticks.iter().map(|t| &t.env).chain(self.final_env.iter())
    }

    /// Record of the tick that started at `tick`.
    pub fn tick(&self, tick: u32) -> Option<&TickRecord> {
        self.ticks.iter().rev().find(|t| t.env.tick == tick)
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

//! Actions submitted by decision-makers

use crate::engine::environment::TeamSide;
use crate::error::SimError;
use serde::{Deserialize, Serialize};

/// Action type tag. Discriminants are stable and used in exports; 3 is a
/// retired "turn" command and never produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum ActionType {
    #[default]
    NoOp = 0,
    /// Placement during restarts: x, y, facing
    Move = 1,
    /// Acceleration: direction, power
    Dash = 2,
    /// direction, power
    Kick = 4,
    /// Goalkeeper only, no parameters
    Catch = 5,
}

impl TryFrom<u8> for ActionType {
    type Error = SimError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ActionType::NoOp),
            1 => Ok(ActionType::Move),
            2 => Ok(ActionType::Dash),
            4 => Ok(ActionType::Kick),
            5 => Ok(ActionType::Catch),
            other => Err(SimError::UnknownAction(other)),
        }
    }
}

/// A decision: type tag plus three parameters whose meaning depends on the tag
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Action {
    pub kind: ActionType,
    pub data: [f64; 3],
}

impl Action {
    pub fn new(kind: ActionType, data: [f64; 3]) -> Self {
        Self { kind, data }
    }

    pub fn noop() -> Self {
        Self::default()
    }

    pub fn move_to(x: f64, y: f64, direction: f64) -> Self {
        Self::new(ActionType::Move, [x, y, direction])
    }

    pub fn dash(direction: f64, power: f64) -> Self {
        Self::new(ActionType::Dash, [direction, power, 0.0])
    }

    pub fn kick(direction: f64, power: f64) -> Self {
        Self::new(ActionType::Kick, [direction, power, 0.0])
    }

    pub fn catch() -> Self {
        Self::new(ActionType::Catch, [0.0; 3])
    }
}

/// One resolved decision as stored in history
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub team: TeamSide,
    pub player: usize,
    pub action: Action,
}

//! Pitch dimension presets

use crate::engine::physics_constants::regulation;
use serde::{Deserialize, Serialize};

/// Primary pitch measures a [`Settings`](super::Settings) preset is built from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchDimensions {
    pub pitch_length: f64,
    pub pitch_width: f64,
    pub goal_width: f64,
    pub center_radius: f64,
}

impl PitchDimensions {
    /// 4-a-side: 32x19.2, 4 m goal, 2.4 m center circle
    pub fn small_pitch() -> Self {
        Self { pitch_length: 32.0, pitch_width: 19.2, goal_width: 4.0, center_radius: 2.4 }
    }

    /// 5-a-side: 40x24, 4 m goal, 3 m center circle
    pub fn five_a_side() -> Self {
        Self { pitch_length: 40.0, pitch_width: 24.0, goal_width: 4.0, center_radius: 3.0 }
    }

    /// 11-a-side: 105x68, 7.32 m goal, 9.15 m center circle
    pub fn regulation() -> Self {
        Self {
            pitch_length: regulation::PITCH_LENGTH,
            pitch_width: regulation::PITCH_WIDTH,
            goal_width: regulation::GOAL_WIDTH,
            center_radius: regulation::CORNER_DISTANCE,
        }
    }
}

impl Default for PitchDimensions {
    fn default() -> Self {
        Self::small_pitch()
    }
}

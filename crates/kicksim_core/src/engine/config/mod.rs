//! # Match Settings
//!
//! Every tunable physical constant of a match lives in [`Settings`]: pitch
//! dimensions, body radii, speed caps, decay factors, angular gates, noise
//! and probabilities. A match owns one `Settings` value for its whole life.
//!
//! ## Presets
//! - [`Settings::small_pitch`] (default): 32x19.2 pitch, 4-a-side scale
//! - [`Settings::five_a_side`]: 40x24 pitch
//! - [`Settings::regulation`]: 105x68 pitch with the full rule set
//!
//! ## Usage
//! ```rust
//! use kicksim_core::engine::config::Settings;
//!
//! let settings = Settings::default();
//! assert!(settings.simplified);
//! let full = Settings::regulation();
//! assert!(!full.simplified);
//! ```

mod dimensions;

pub use dimensions::PitchDimensions;

use crate::engine::physics_constants::regulation;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use validator::{Validate, ValidationError};

/// Match-wide physical constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_geometry"))]
pub struct Settings {
    /// Relaxed rules: no facing gates on kicks, balls behind a kicker are
    /// brought in front before the kick, second kicks in a tick always fail
    pub simplified: bool,
    /// Ticks in each half; a whole match must fit in `u32`
    #[validate(range(min = 1, max = 2147483647))]
    pub ticks_per_time: u32,

    // === Pitch ===
    #[validate(range(min = 1.0))]
    pub pitch_length: f64,
    #[validate(range(min = 1.0))]
    pub pitch_width: f64,
    #[validate(range(min = 0.0))]
    pub goal_width: f64,
    #[validate(range(min = 0.0))]
    pub center_radius: f64,
    #[validate(range(min = 0.0))]
    pub net_length: f64,

    // === Bodies ===
    #[validate(range(min = 0.0))]
    pub pole_radius: f64,
    #[validate(range(min = 0.001))]
    pub ball_radius: f64,
    #[validate(range(min = 0.001))]
    pub player_radius: f64,
    #[validate(range(min = 0.0))]
    pub catch_radius: f64,
    pub catch_holding_ticks: u32,
    #[validate(range(min = 0.0))]
    pub kick_radius: f64,

    // === Derived reach ===
    /// kick_radius + player_radius + ball_radius
    pub kickable_distance: f64,
    /// catch_radius + player_radius + ball_radius
    pub catchable_distance: f64,

    // === Angular gates (radians) ===
    /// Max angle between facing and the player-to-ball vector for a kick
    #[validate(range(min = 0.0, max = 3.1416))]
    pub kickable_angle: f64,
    /// Max angle between facing and the requested kick direction
    #[validate(range(min = 0.0, max = 3.1416))]
    pub kickable_direction_angle: f64,
    /// Max angle between facing and the goalkeeper-to-ball vector for a catch
    #[validate(range(min = 0.0, max = 3.1416))]
    pub catchable_angle: f64,

    // === Areas and restart distances ===
    pub catchable_area_length: f64,
    pub catchable_area_width: f64,
    pub corner_min_distance: f64,
    pub throwin_min_distance: f64,
    /// How far outside the lines players may roam
    #[validate(range(min = 0.0))]
    pub out_pitch_limit: f64,

    // === Power and speed ===
    #[validate(range(min = 0.0))]
    pub max_dash_power: f64,
    #[validate(range(min = 0.0))]
    pub max_kick_power: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub player_velocity_decay: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub ball_velocity_decay: f64,
    #[validate(range(min = 0.0))]
    pub max_player_speed: f64,
    #[validate(range(min = 0.0))]
    pub max_ball_speed: f64,

    // === Randomness ===
    #[validate(range(min = 0.0, max = 1.0))]
    pub catch_probability: f64,
    #[validate(range(min = 0.0))]
    pub player_random_noise: f64,
    #[validate(range(min = 0.0))]
    pub player_direction_noise: f64,
    /// Share of facing blended into the velocity heading on decay
    #[validate(range(min = 0.0, max = 1.0))]
    pub player_velocity_direction_mix: f64,
    /// Share of the ball push-out added to its velocity
    #[validate(range(min = 0.0))]
    pub ball_inside_player_velocity_displace: f64,
    /// Clearance between goalkeeper and ball when holding or releasing
    #[validate(range(min = 0.0))]
    pub after_catch_distance: f64,
}

fn validate_geometry(s: &Settings) -> std::result::Result<(), ValidationError> {
    if s.goal_width >= s.pitch_width {
        return Err(ValidationError::new("goal_wider_than_pitch"));
    }
    if s.center_radius * 2.0 >= s.pitch_width.min(s.pitch_length) {
        return Err(ValidationError::new("center_circle_too_large"));
    }
    if s.after_catch_distance >= s.player_radius - s.ball_radius {
        return Err(ValidationError::new("held_ball_outside_goalkeeper"));
    }
    Ok(())
}

impl Default for Settings {
    fn default() -> Self {
        Self::small_pitch()
    }
}

impl Settings {
    /// 32x19.2 pitch, 4 m goal, simplified rules
    pub fn small_pitch() -> Self {
        Self::from_dimensions(true, PitchDimensions::small_pitch())
    }

    /// 40x24 pitch, 4 m goal, 3 m center circle, simplified rules
    pub fn five_a_side() -> Self {
        Self::from_dimensions(true, PitchDimensions::five_a_side())
    }

    /// 105x68 pitch with the full (non-simplified) rule set
    pub fn regulation() -> Self {
        Self::from_dimensions(false, PitchDimensions::regulation())
    }

    /// Default physical constants on the given pitch; derived fields computed.
    pub fn from_dimensions(simplified: bool, dims: PitchDimensions) -> Self {
        let mut settings = Self {
            simplified,
            ticks_per_time: 3000,
            pitch_length: dims.pitch_length,
            pitch_width: dims.pitch_width,
            goal_width: dims.goal_width,
            center_radius: dims.center_radius,
            net_length: 1.5,
            pole_radius: 0.055,
            ball_radius: 0.11,
            player_radius: 0.4,
            catch_radius: 0.3,
            catch_holding_ticks: 2,
            kick_radius: 0.1,
            kickable_distance: 0.0,
            catchable_distance: 0.0,
            kickable_angle: PI / 3.0,
            kickable_direction_angle: PI / 2.0,
            catchable_angle: PI / 2.0,
            catchable_area_length: 0.0,
            catchable_area_width: 0.0,
            corner_min_distance: 0.0,
            throwin_min_distance: regulation::MIN_THROWIN_DISTANCE,
            out_pitch_limit: regulation::PLAYER_OUT_OF_PITCH_LIMIT,
            max_dash_power: 0.06,
            max_kick_power: 0.65,
            player_velocity_decay: 0.9,
            ball_velocity_decay: 0.97,
            max_player_speed: 0.2222,
            max_ball_speed: 0.6,
            catch_probability: 0.9,
            player_random_noise: 0.005,
            player_direction_noise: 0.005,
            player_velocity_direction_mix: 0.2,
            ball_inside_player_velocity_displace: 0.5,
            after_catch_distance: 0.05,
        };
        settings.refresh_derived();
        settings
    }

    /// Builder-style override of the half length.
    pub fn with_ticks_per_time(mut self, ticks: u32) -> Self {
        self.ticks_per_time = ticks;
        self
    }

    /// Builder-style toggle of the simplified rule set.
    pub fn with_simplified(mut self, simplified: bool) -> Self {
        self.simplified = simplified;
        self
    }

    /// Recompute reach distances, area size and corner distance from the
    /// primary fields. Call after editing radii or pitch dimensions.
    pub fn refresh_derived(&mut self) {
        self.kickable_distance = self.kick_radius + self.player_radius + self.ball_radius;
        self.catchable_distance = self.catch_radius + self.player_radius + self.ball_radius;
        self.catchable_area_length = regulation::area_length(self.pitch_length);
        self.catchable_area_width = regulation::area_width(self.pitch_width);
        self.corner_min_distance = regulation::corner_distance(self.pitch_width);
    }

    pub fn dimensions(&self) -> PitchDimensions {
        PitchDimensions {
            pitch_length: self.pitch_length,
            pitch_width: self.pitch_width,
            goal_width: self.goal_width,
            center_radius: self.center_radius,
        }
    }

    /// Range and geometry checks.
    pub fn check(&self) -> Result<()> {
        self.validate()?;
        Ok(())
    }

    /// Total ticks of a match (both halves).
    pub fn match_ticks(&self) -> u32 {
        self.ticks_per_time.saturating_mul(2)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.check()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

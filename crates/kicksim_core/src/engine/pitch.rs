//! Pitch geometry
//!
//! Constant layout derived once from [`Settings`]: goal lines, goal mouth,
//! penalty areas, goal-kick spots, the four goalposts and the roaming border.
//!
//! Coordinates: origin at the center spot, `right_x` is the right goal line,
//! `top_y` the upper touchline.

use crate::engine::config::Settings;
use crate::engine::vec2::Vec2;
use serde::{Deserialize, Serialize};

/// Index of the goalposts in [`Pitch::poles`]
pub mod poles {
    pub const LEFT_TOP: usize = 0;
    pub const LEFT_BOTTOM: usize = 1;
    pub const RIGHT_TOP: usize = 2;
    pub const RIGHT_BOTTOM: usize = 3;
}

/// Immutable pitch layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pitch {
    /// Right goal line
    pub right_x: f64,
    /// Left goal line
    pub left_x: f64,
    /// Upper touchline
    pub top_y: f64,
    /// Lower touchline
    pub bottom_y: f64,

    /// Back of the right net
    pub right_net_x: f64,
    /// Back of the left net
    pub left_net_x: f64,
    /// Upper edge of the goal mouth
    pub goal_top_y: f64,
    /// Lower edge of the goal mouth
    pub goal_bottom_y: f64,

    /// Front edge of the left penalty area
    pub area_left_x: f64,
    /// Front edge of the right penalty area
    pub area_right_x: f64,
    pub area_top_y: f64,
    pub area_bottom_y: f64,

    pub goal_kick_left_x: f64,
    pub goal_kick_right_x: f64,
    pub goal_kick_top_y: f64,
    pub goal_kick_bottom_y: f64,

    /// Goalpost centers, see [`poles`]
    pub poles: [Vec2; 4],

    pub border_top: f64,
    pub border_bottom: f64,
    pub border_left: f64,
    pub border_right: f64,
}

impl Pitch {
    pub fn new(settings: &Settings) -> Self {
        let right_x = settings.pitch_length / 2.0;
        let left_x = -right_x;
        let top_y = settings.pitch_width / 2.0;
        let bottom_y = -top_y;
        let right_net_x = right_x + settings.net_length;
        let goal_top_y = settings.goal_width / 2.0;
        let goal_bottom_y = -goal_top_y;
        let area_left_x = left_x + settings.catchable_area_length;
        let area_right_x = right_x - settings.catchable_area_length;
        let area_top_y = settings.catchable_area_width / 2.0;
        let area_bottom_y = -area_top_y;
        let pr = settings.pole_radius;
        let limit = settings.out_pitch_limit;

        Self {
            right_x,
            left_x,
            top_y,
            bottom_y,
            right_net_x,
            left_net_x: -right_net_x,
            goal_top_y,
            goal_bottom_y,
            area_left_x,
            area_right_x,
            area_top_y,
            area_bottom_y,
            goal_kick_left_x: left_x + (area_left_x - left_x) / 2.0,
            goal_kick_right_x: right_x + (area_right_x - right_x) / 2.0,
            goal_kick_top_y: goal_top_y + (area_top_y - goal_top_y) / 2.0,
            goal_kick_bottom_y: goal_bottom_y + (area_bottom_y - goal_bottom_y) / 2.0,
            poles: [
                Vec2::new(left_x, goal_top_y + pr),
                Vec2::new(left_x, goal_bottom_y - pr),
                Vec2::new(right_x, goal_top_y + pr),
                Vec2::new(right_x, goal_bottom_y - pr),
            ],
            border_top: top_y + limit,
            border_bottom: bottom_y - limit,
            border_left: left_x - limit,
            border_right: right_x + limit,
        }
    }

    /// Goal line of the goal on the given side.
    pub fn goal_line_x(&self, right: bool) -> f64 {
        if right {
            self.right_x
        } else {
            self.left_x
        }
    }

    /// Strictly between the posts.
    pub fn within_goal_mouth(&self, y: f64) -> bool {
        y > self.goal_bottom_y && y < self.goal_top_y
    }

    /// Center inside the penalty area on the given side (edges included).
    pub fn in_area(&self, pos: Vec2, right: bool) -> bool {
        let in_y = pos.y <= self.area_top_y && pos.y >= self.area_bottom_y;
        if right {
            in_y && pos.x <= self.right_x && pos.x >= self.area_right_x
        } else {
            in_y && pos.x >= self.left_x && pos.x <= self.area_left_x
        }
    }

    /// Whether any part of a body of `radius` centered at `pos` overlaps the
    /// penalty area on the given side.
    pub fn body_in_area(&self, pos: Vec2, radius: f64, right: bool) -> bool {
        let (near_x, far_x) = if right {
            (self.area_right_x, self.right_x)
        } else {
            (self.area_left_x, self.left_x)
        };
        let (lo_x, hi_x) = (near_x.min(far_x), near_x.max(far_x));
        let in_x = pos.x >= lo_x && pos.x <= hi_x;
        let in_y = pos.y <= self.area_top_y && pos.y >= self.area_bottom_y;
        if in_x && in_y {
            return true;
        }
        if in_x {
            return pos.y - radius <= self.area_top_y && pos.y + radius >= self.area_bottom_y;
        }
        if in_y {
            return pos.x + radius >= lo_x && pos.x - radius <= hi_x;
        }
        let corner_y = if pos.y > 0.0 { self.area_top_y } else { self.area_bottom_y };
        pos.dist(Vec2::new(near_x, corner_y)) < radius
    }

    /// Outside the touchlines or goal lines.
    pub fn is_out(&self, pos: Vec2) -> bool {
        pos.x < self.left_x || pos.x > self.right_x || pos.y < self.bottom_y || pos.y > self.top_y
    }

    /// Clamp into the roaming border.
    pub fn clamp_to_border(&self, pos: Vec2) -> Vec2 {
        Vec2::new(
            pos.x.clamp(self.border_left, self.border_right),
            pos.y.clamp(self.border_bottom, self.border_top),
        )
    }
}

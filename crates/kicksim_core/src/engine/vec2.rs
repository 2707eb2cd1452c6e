//! 2D vector primitive and angle helpers
//!
//! All engine geometry is expressed in pitch meters with the origin at the
//! center spot, x growing toward the right goal and y growing "up".

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

const TWO_PI: f64 = 2.0 * PI;

/// 2D point / vector (meters or meters per tick)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing at `angle` radians.
    pub fn from_angle(angle: f64) -> Self {
        Self { x: angle.cos(), y: angle.sin() }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    pub fn len(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn len_sq(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Unit vector with the same direction. A zero vector stays zero.
    pub fn normalized(&self) -> Self {
        let l = self.len();
        if l == 0.0 {
            return *self;
        }
        let k = 1.0 / l;
        Self { x: self.x * k, y: self.y * k }
    }

    /// Same direction, given length. A zero vector stays zero.
    pub fn resized(&self, length: f64) -> Self {
        self.normalized() * length
    }

    pub fn rotated(&self, rad: f64) -> Self {
        let (s, c) = rad.sin_cos();
        Self { x: self.x * c - self.y * s, y: self.x * s + self.y * c }
    }

    pub fn dot(&self, other: Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Cosine of the angle between the two vectors, 0 if either is zero.
    pub fn cos_between(&self, other: Vec2) -> f64 {
        let l = self.len() * other.len();
        if l == 0.0 {
            0.0
        } else {
            self.dot(other) / l
        }
    }

    pub fn dist(&self, other: Vec2) -> f64 {
        (other - *self).len()
    }

    /// atan2 heading of the vector in `[-PI, PI]`.
    pub fn angle(&self) -> f64 {
        self.y.atan2(self.x)
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    fn mul(self, k: f64) -> Vec2 {
        Vec2::new(self.x * k, self.y * k)
    }
}

impl Div<f64> for Vec2 {
    type Output = Vec2;
    fn div(self, k: f64) -> Vec2 {
        Vec2::new(self.x / k, self.y / k)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Vec2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl MulAssign<f64> for Vec2 {
    fn mul_assign(&mut self, k: f64) {
        self.x *= k;
        self.y *= k;
    }
}

// ============================================================================
// Angles
// ============================================================================

/// IEEE 754 remainder: `x - n*y` with `n` the integer nearest to `x/y`.
pub fn ieee_remainder(x: f64, y: f64) -> f64 {
    x - (x / y).round_ties_even() * y
}

/// Angle mapped into `[0, 2PI)`.
pub fn fix_angle_positive(angle: f64) -> f64 {
    let a = ieee_remainder(angle, TWO_PI);
    if a < 0.0 {
        TWO_PI + a
    } else {
        a
    }
}

/// Angle mapped into `[-PI, PI]`.
pub fn fix_angle_two_sides(angle: f64) -> f64 {
    ieee_remainder(angle, TWO_PI)
}

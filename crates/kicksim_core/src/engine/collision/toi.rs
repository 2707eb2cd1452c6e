//! Time of impact between moving circles
//!
//! Two circles in uniform motion collide when the relative trajectory of one
//! center, seen from the other, crosses a circle of the summed radii. The
//! engine only needs the earliest crossing inside the remaining part of the
//! tick, expressed as a fraction of it.

use crate::engine::physics_constants::EPSILON;
use crate::engine::vec2::Vec2;

/// Intersections of the segment `s1 -> s2` (as an infinite line) with a circle,
/// as segment parameters `t` where `s1 + (s2 - s1) * t` lies on the circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineCircle {
    Miss,
    Tangent(f64),
    /// Entry and exit, entry first
    Secant(f64, f64),
}

pub fn line_circle_intersection(s1: Vec2, s2: Vec2, center: Vec2, radius: f64) -> LineCircle {
    let d = s2 - s1;
    let l = s1 - center;
    let a = d.len_sq();
    if a == 0.0 {
        return LineCircle::Miss;
    }
    let b = 2.0 * d.dot(l);
    let c = l.len_sq() - radius * radius;
    let delta = b * b - 4.0 * a * c;
    if delta < 0.0 {
        LineCircle::Miss
    } else if delta == 0.0 {
        LineCircle::Tangent(-b / (2.0 * a))
    } else {
        let root = delta.sqrt();
        LineCircle::Secant((-b - root) / (2.0 * a), (-b + root) / (2.0 * a))
    }
}

/// Fraction of the remaining tick at which a body at `pos1` moving with `vel1`
/// first touches a body at `pos2` moving with `vel2`, their centers being
/// `radius` apart at contact. `partial_t` is the share of the tick already
/// simulated. Tangent grazes are not impacts.
pub fn time_of_impact(
    pos1: Vec2,
    vel1: Vec2,
    pos2: Vec2,
    vel2: Vec2,
    radius: f64,
    partial_t: f64,
) -> Option<f64> {
    let end = pos1 + (vel1 - vel2) * (1.0 - partial_t);
    match line_circle_intersection(pos1, end, pos2, radius) {
        LineCircle::Secant(t1, t2) => {
            let t = if t1 >= 0.0 { t1 } else { t2 };
            (EPSILON..=1.0).contains(&t).then_some(t)
        }
        _ => None,
    }
}

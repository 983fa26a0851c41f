//! Planar geometry helpers
//!
//! Positions are metres in the garden's local frame.

use serde::{Deserialize, Serialize};

/// 2-D point (metres)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance
    pub fn distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Point at `distance` from self along `angle` (radians)
    pub fn offset_polar(&self, angle: f64, distance: f64) -> Point {
        Point::new(
            self.x + distance * angle.cos(),
            self.y + distance * angle.sin(),
        )
    }
}

/// Arithmetic mean of a set of points (origin for an empty set)
pub fn centroid<'a, I>(points: I) -> Point
where
    I: IntoIterator<Item = &'a Point>,
{
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut n = 0usize;
    for p in points {
        sum_x += p.x;
        sum_y += p.y;
        n += 1;
    }
    if n == 0 {
        return Point::default();
    }
    Point::new(sum_x / n as f64, sum_y / n as f64)
}

/// Radius of a circle with the given area
pub fn radius_from_area(area: f64) -> f64 {
    if area <= 0.0 || !area.is_finite() {
        return 0.0;
    }
    (area / std::f64::consts::PI).sqrt()
}

/// Total overlap of two circles, measured along the line between centres
pub fn circle_overlap(a: Point, radius_a: f64, b: Point, radius_b: f64) -> f64 {
    let combined = radius_a + radius_b;
    let distance = a.distance_to(&b);
    if distance < combined {
        combined - distance
    } else {
        0.0
    }
}

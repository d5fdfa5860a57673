use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};
use std::ops::{Add, Sub};

/// 3D vector (area-trigger extents, spline points, roll/pitch/yaw triples)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    #[inline]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.length_sq().sqrt()
    }

    #[inline]
    pub fn length_sq(&self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

/// World position with facing
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Facing in radians, normalized to [0, 2π)
    pub orientation: f32,
}

impl Position {
    #[inline]
    pub fn new(x: f32, y: f32, z: f32, orientation: f32) -> Self {
        Self {
            x,
            y,
            z,
            orientation: normalize_orientation(orientation),
        }
    }

    #[inline]
    pub fn xyz(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    #[inline]
    pub fn exact_dist_sq(&self, other: &Position) -> f32 {
        (self.xyz() - other.xyz()).length_sq()
    }

    #[inline]
    pub fn exact_dist(&self, other: &Position) -> f32 {
        self.exact_dist_sq(other).sqrt()
    }

    /// Distance check without sqrt
    #[inline]
    pub fn is_within_dist(&self, other: &Position, dist: f32) -> bool {
        self.exact_dist_sq(other) <= dist * dist
    }

    /// Absolute angle from this position to another, in [0, 2π)
    pub fn angle_to(&self, other: &Position) -> f32 {
        let angle = (other.y - self.y).atan2(other.x - self.x);
        if angle >= 0.0 {
            angle
        } else {
            TAU + angle
        }
    }

    /// Check whether `other` lies inside the arc of width `arc` centred on
    /// this position's facing. A position is always in its own arc.
    pub fn has_in_arc(&self, arc: f32, other: &Position) -> bool {
        if self == other {
            return true;
        }

        let arc = normalize_orientation(arc);
        let mut angle = normalize_orientation(self.angle_to(other) - self.orientation);
        if angle > PI {
            angle -= TAU;
        }

        let border = arc / 2.0;
        angle >= -border && angle <= border
    }
}

/// Wrap an angle into [0, 2π)
pub fn normalize_orientation(o: f32) -> f32 {
    if o < 0.0 {
        let m = (-o) % TAU;
        if m == 0.0 {
            0.0
        } else {
            TAU - m
        }
    } else {
        o % TAU
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_dist() {
        let a = Position::new(0.0, 0.0, 0.0, 0.0);
        let b = Position::new(3.0, 4.0, 0.0, 0.0);
        assert!((a.exact_dist(&b) - 5.0).abs() < 1e-5);
        assert!(a.is_within_dist(&b, 5.0));
        assert!(!a.is_within_dist(&b, 4.9));
    }

    #[test]
    fn test_normalize_orientation() {
        assert!((normalize_orientation(-PI) - PI).abs() < 1e-5);
        assert!((normalize_orientation(TAU + 1.0) - 1.0).abs() < 1e-5);
        assert_eq!(normalize_orientation(0.0), 0.0);
    }

    #[test]
    fn test_has_in_arc_front_and_back() {
        // Facing +x
        let seer = Position::new(0.0, 0.0, 0.0, 0.0);
        let front = Position::new(10.0, 1.0, 0.0, 0.0);
        let behind = Position::new(-10.0, 0.0, 0.0, 0.0);

        assert!(seer.has_in_arc(PI, &front));
        assert!(!seer.has_in_arc(PI, &behind));
    }

    #[test]
    fn test_has_in_arc_edges() {
        let seer = Position::new(0.0, 0.0, 0.0, 0.0);
        // Slightly forward of the left/right edge of a half-circle arc
        assert!(seer.has_in_arc(PI, &Position::new(0.1, 10.0, 0.0, 0.0)));
        assert!(seer.has_in_arc(PI, &Position::new(0.1, -10.0, 0.0, 0.0)));
        assert!(!seer.has_in_arc(PI, &Position::new(-0.1, 10.0, 0.0, 0.0)));
    }
}

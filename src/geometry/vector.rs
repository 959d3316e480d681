use std::ops::{Add, Mul, Neg, Sub};

use super::Point2;

/// A position-less 2D vector (direction and length)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Vector pointing from `from` towards `to`
    pub fn from_points(from: Point2, to: Point2) -> Self {
        Self::new(to.x - from.x, to.y - from.y)
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Same direction, new length. A zero vector stays zero.
    pub fn with_length(self, length: f32) -> Self {
        self.normalized().scaled(length)
    }

    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn scaled(self, constant: f32) -> Self {
        Self::new(self.x * constant, self.y * constant)
    }

    /// Unit vector in the same direction; zero vectors are returned unchanged
    pub fn normalized(self) -> Self {
        let length = self.length();
        if length != 0.0 {
            self.scaled(1.0 / length)
        } else {
            self
        }
    }

    /// Rotated 90 degrees counter-clockwise
    pub fn perp(self) -> Self {
        Self::new(-self.y, self.x)
    }

    /// Rotated counter-clockwise by `angle` radians
    pub fn rotated(self, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// Angle in radians between the two vectors, `None` if either has zero length
    pub fn angle(self, other: Self) -> Option<f32> {
        let l1 = self.length();
        let l2 = other.length();
        if l1 == 0.0 || l2 == 0.0 {
            return None;
        }
        Some((self.dot(other) / (l1 * l2)).clamp(-1.0, 1.0).acos())
    }

    pub fn slope(self) -> f32 {
        self.y / self.x
    }

    /// Length of the component of this vector along `direction`.
    /// Zero when `direction` has no length.
    pub fn component_in(self, direction: Self) -> f32 {
        let length = direction.length();
        if length == 0.0 {
            0.0
        } else {
            self.dot(direction) / length
        }
    }

    /// Projection onto `direction` (the length of `direction` is irrelevant)
    pub fn project(self, direction: Self) -> Self {
        direction.with_length(self.component_in(direction))
    }
}

impl Add for Vector2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vector2 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        self.scaled(rhs)
    }
}

impl Neg for Vector2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_perp_is_counter_clockwise() {
        let v = Vector2::new(1.0, 0.0).perp();
        assert_eq!(v, Vector2::new(-0.0, 1.0));
        assert!(approx(Vector2::new(3.0, 4.0).perp().dot(Vector2::new(3.0, 4.0)), 0.0));
    }

    #[test]
    fn test_normalize_zero_vector() {
        assert_eq!(Vector2::ZERO.normalized(), Vector2::ZERO);
        assert!(approx(Vector2::new(3.0, 4.0).normalized().length(), 1.0));
    }

    #[test]
    fn test_angle_and_projection() {
        let a = Vector2::new(1.0, 0.0);
        let b = Vector2::new(0.0, 2.0);
        assert!(approx(a.angle(b).unwrap(), std::f32::consts::FRAC_PI_2));
        assert!(a.angle(Vector2::ZERO).is_none());

        let p = Vector2::new(3.0, 4.0).project(Vector2::new(10.0, 0.0));
        assert!(approx(p.x, 3.0) && approx(p.y, 0.0));
        assert!(approx(Vector2::new(3.0, 4.0).component_in(Vector2::new(0.0, -1.0)), -4.0));
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let v = Vector2::new(2.0, 0.0).rotated(std::f32::consts::FRAC_PI_2);
        assert!(approx(v.x, 0.0) && approx(v.y, 2.0));
    }
}

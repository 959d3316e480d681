use std::ops::{Add, Sub};

use super::Vector2;

/// A position in surface-local cartesian coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Self) -> f32 {
        self.vector_to(other).length()
    }

    pub fn vector_to(self, other: Self) -> Vector2 {
        Vector2::from_points(self, other)
    }

    /// This point translated by `vector * constant`
    pub fn scale_add(self, vector: Vector2, constant: f32) -> Self {
        Self::new(self.x + vector.x * constant, self.y + vector.y * constant)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add<Vector2> for Point2 {
    type Output = Self;

    fn add(self, rhs: Vector2) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub<Vector2> for Point2 {
    type Output = Self;

    fn sub(self, rhs: Vector2) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Sub for Point2 {
    type Output = Vector2;

    fn sub(self, rhs: Self) -> Vector2 {
        Vector2::from_points(rhs, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_and_vector() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(3.0, 4.0);
        assert_eq!(a.distance_to(b), 5.0);
        assert_eq!(b - a, Vector2::new(3.0, 4.0));
        assert_eq!(a.scale_add(Vector2::new(1.0, 2.0), 2.0), Point2::new(2.0, 4.0));
    }
}

//! Minimal 2D point/vector algebra used by the stroke fitter and the tools.

mod point;
mod vector;

pub use point::Point2;
pub use vector::Vector2;

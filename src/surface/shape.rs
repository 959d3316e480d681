use tiny_skia::{Path, PathBuilder};

use crate::stroke::CubicBezier;

/// Closed ribbon bounded by two offset curves.
///
/// `forward` is traced from start to end, then a straight edge joins its end
/// to `backward`'s end and `backward` is traced in reverse.
pub fn ribbon(forward: &CubicBezier, backward: &CubicBezier) -> Option<Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(forward.start.x, forward.start.y);
    pb.cubic_to(
        forward.cp_start.x,
        forward.cp_start.y,
        forward.cp_end.x,
        forward.cp_end.y,
        forward.end.x,
        forward.end.y,
    );
    pb.line_to(backward.end.x, backward.end.y);
    pb.cubic_to(
        backward.cp_end.x,
        backward.cp_end.y,
        backward.cp_start.x,
        backward.cp_start.y,
        backward.start.x,
        backward.start.y,
    );
    pb.close();
    pb.finish()
}

/// A single curve closed by the chord between its anchors; used for caps
pub fn cap(curve: &CubicBezier) -> Option<Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(curve.start.x, curve.start.y);
    pb.cubic_to(
        curve.cp_start.x,
        curve.cp_start.y,
        curve.cp_end.x,
        curve.cp_end.y,
        curve.end.x,
        curve.end.y,
    );
    pb.close();
    pb.finish()
}

/// An open curve, for stroking
pub fn curve(curve: &CubicBezier) -> Option<Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(curve.start.x, curve.start.y);
    pb.cubic_to(
        curve.cp_start.x,
        curve.cp_start.y,
        curve.cp_end.x,
        curve.cp_end.y,
        curve.end.x,
        curve.end.y,
    );
    pb.finish()
}

/// Full circle; `None` for non-positive or non-finite radii
pub fn circle(x: f32, y: f32, radius: f32) -> Option<Path> {
    if !(radius > 0.0 && radius.is_finite() && x.is_finite() && y.is_finite()) {
        return None;
    }
    PathBuilder::from_circle(x, y, radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point2;

    #[test]
    fn test_ribbon_bounds_cover_both_edges() {
        let top = CubicBezier {
            start: Point2::new(0.0, -5.0),
            cp_start: Point2::new(3.0, -5.0),
            cp_end: Point2::new(7.0, -5.0),
            end: Point2::new(10.0, -5.0),
        };
        let bottom = CubicBezier {
            start: Point2::new(0.0, 5.0),
            cp_start: Point2::new(3.0, 5.0),
            cp_end: Point2::new(7.0, 5.0),
            end: Point2::new(10.0, 5.0),
        };
        let path = ribbon(&top, &bottom).unwrap();
        let bounds = path.bounds();
        assert_eq!(bounds.top(), -5.0);
        assert_eq!(bounds.bottom(), 5.0);
        assert_eq!(bounds.right(), 10.0);
    }

    #[test]
    fn test_degenerate_circle() {
        assert!(circle(1.0, 1.0, 0.0).is_none());
        assert!(circle(1.0, 1.0, f32::NAN).is_none());
        assert!(circle(1.0, 1.0, 2.0).is_some());
    }
}

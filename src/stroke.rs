use crate::error::{PaintError, PaintResult};
use crate::geometry::{Point2, Vector2};
use crate::input::PointerSample;

/// Minimum travel in pixels before a sample is accepted into the path
pub const MIN_DIST: f32 = 3.0;

/// Bezier weight of the control points, relative to the anchor separation
pub const BEZIER_WEIGHT: f32 = 0.3;

/// Widths used when no contact geometry is available
const DEFAULT_WIDTHS: StrokeWidths = StrokeWidths { start: 10.0, end: 30.0 };

/// One cubic bezier segment: two anchors and their control points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub start: Point2,
    pub cp_start: Point2,
    pub cp_end: Point2,
    pub end: Point2,
}

/// Stroke widths at the beginning and the end of a segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeWidths {
    pub start: f32,
    pub end: f32,
}

/// Incremental curve fitter over the three most recent pointer samples.
///
/// `p1` is the oldest retained point and `p3` the newest. Direction and
/// perpendicular vectors are kept for the start and end of the segment so
/// that successive bezier segments join with a continuous tangent.
#[derive(Debug, Clone)]
pub struct StrokePath {
    p1: Option<Point2>,
    p2: Option<Point2>,
    p3: Point2,
    box1: Option<Vector2>,
    box2: Option<Vector2>,
    box3: Option<Vector2>,
    dist: f32,
    dir_start: Vector2,
    dir_end: Vector2,
    perp_start: Vector2,
    perp_end: Vector2,
    new_point: bool,
    min_dist: f32,
    weight: f32,
}

impl StrokePath {
    /// Starts a path at the given sample
    pub fn new(sample: &PointerSample) -> PaintResult<Self> {
        let p3 = sample_point(sample)?;
        Ok(Self {
            p1: None,
            p2: None,
            p3,
            box1: None,
            box2: None,
            box3: sample.contact_box(),
            dist: 0.0,
            dir_start: Vector2::ZERO,
            dir_end: Vector2::ZERO,
            perp_start: Vector2::ZERO,
            perp_end: Vector2::ZERO,
            new_point: false,
            min_dist: MIN_DIST,
            weight: BEZIER_WEIGHT,
        })
    }

    /// Overrides the acceptance distance
    pub fn with_min_dist(mut self, min_dist: f32) -> Self {
        self.min_dist = min_dist.max(0.0);
        self
    }

    /// Feeds a sample into the ring.
    ///
    /// Returns whether the sample was accepted; samples within `min_dist`
    /// of the newest point leave the path untouched apart from clearing the
    /// new-point flag.
    pub fn add_point(&mut self, sample: &PointerSample) -> PaintResult<bool> {
        let p = sample_point(sample)?;

        if self.p3.distance_to(p) <= self.min_dist {
            self.new_point = false;
            return Ok(false);
        }
        self.new_point = true;

        let previous = self.p3;
        self.p1 = self.p2;
        self.p2 = Some(previous);
        self.p3 = p;
        self.box1 = self.box2;
        self.box2 = self.box3;
        self.box3 = sample.contact_box();

        match self.p1 {
            None => {
                self.dist = previous.distance_to(p);
                self.dir_end = Vector2::from_points(previous, p).normalized();
                self.perp_end = self.dir_end.perp().normalized();
            }
            Some(p1) => {
                // The old end tangent becomes the new start tangent
                self.dist = p1.distance_to(previous);
                self.dir_start = self.dir_end;
                self.dir_end = Vector2::from_points(p1, p).normalized();
                self.perp_start = self.perp_end;
                self.perp_end = self.dir_end.perp().normalized();
            }
        }
        Ok(true)
    }

    pub fn num_points(&self) -> usize {
        match (self.p1, self.p2) {
            (Some(_), _) => 3,
            (None, Some(_)) => 2,
            (None, None) => 1,
        }
    }

    /// Only the initial point is known; nothing but a dot can be drawn
    pub fn created(&self) -> bool {
        self.num_points() == 1
    }

    /// Two points and a fresh sample: the stroke cap can be drawn
    pub fn starting(&self) -> bool {
        self.new_point && self.num_points() == 2
    }

    /// Three points and a fresh sample: a bezier segment can be drawn
    pub fn drawable(&self) -> bool {
        self.new_point && self.num_points() == 3
    }

    pub fn new_point(&self) -> bool {
        self.new_point
    }

    pub fn p1(&self) -> Option<Point2> {
        self.p1
    }

    pub fn p2(&self) -> Option<Point2> {
        self.p2
    }

    /// The newest accepted point
    pub fn p3(&self) -> Point2 {
        self.p3
    }

    /// Distance between the two oldest retained points
    pub fn dist(&self) -> f32 {
        self.dist
    }

    pub fn dir_start(&self) -> Vector2 {
        self.dir_start
    }

    pub fn dir_end(&self) -> Vector2 {
        self.dir_end
    }

    pub fn perp_start(&self) -> Vector2 {
        self.perp_start
    }

    pub fn perp_end(&self) -> Vector2 {
        self.perp_end
    }

    /// Bezier segment from `p1` to `p2`, shifted perpendicular by the given
    /// offsets and extended by `overlap` along the tangents.
    ///
    /// Drawing the curve for `+w/2` forward and the one for `-w/2` backwards
    /// closes a ribbon of width `w`.
    pub fn calculate_bezier(&self, offset_start: f32, offset_end: f32, overlap: f32) -> Option<CubicBezier> {
        let (p1, p2) = (self.p1?, self.p2?);

        let start = p1
            .scale_add(self.dir_start, -overlap)
            .scale_add(self.perp_start, offset_start);
        let end = p2
            .scale_add(self.dir_end, overlap)
            .scale_add(self.perp_end, offset_end);
        let dist = start.distance_to(end);

        Some(CubicBezier {
            start,
            cp_start: start.scale_add(self.dir_start, dist * self.weight),
            cp_end: end.scale_add(self.dir_end, -dist * self.weight),
            end,
        })
    }

    /// Final segment from `p2` to the newest point, pushed `inertia` pixels
    /// past it along the last direction.
    pub fn calculate_end_bezier(&self, offset_start: f32, offset_end: f32, inertia: f32) -> Option<CubicBezier> {
        let p2 = self.p2?;
        let dir3 = Vector2::from_points(p2, self.p3).normalized();
        let perp3 = dir3.perp().normalized();

        let start = p2.scale_add(self.perp_end, offset_start);
        let end = self
            .p3
            .scale_add(perp3, offset_end)
            .scale_add(dir3, inertia);
        let dist = start.distance_to(end);

        Some(CubicBezier {
            start,
            cp_start: start.scale_add(self.dir_end, dist * self.weight),
            cp_end: end.scale_add(dir3, -dist * self.weight),
            end,
        })
    }

    /// Rounded cap behind the first segment
    pub fn calculate_start_curve(
        &self,
        offset_top: f32,
        offset_bottom: f32,
        inertia: f32,
        min_inertia: f32,
        overlap: f32,
    ) -> Option<CubicBezier> {
        let p2 = self.p2?;
        let inertia = -calculate_inertia(inertia, self.dist, min_inertia, 4.0 * min_inertia);
        Some(self.cap_curve(p2, offset_top, offset_bottom, inertia, overlap))
    }

    /// Rounded cap ahead of the last drawn segment
    pub fn calculate_stop_curve(
        &self,
        offset_top: f32,
        offset_bottom: f32,
        inertia: f32,
        min_inertia: f32,
        overlap: f32,
    ) -> Option<CubicBezier> {
        let p2 = self.p2?;
        let inertia = calculate_inertia(inertia, self.dist, min_inertia, 4.0 * min_inertia);
        Some(self.cap_curve(p2, offset_top, offset_bottom, inertia, -overlap))
    }

    fn cap_curve(&self, anchor: Point2, top: f32, bottom: f32, inertia: f32, overlap: f32) -> CubicBezier {
        let base = anchor.scale_add(self.dir_end, overlap);
        let start = base.scale_add(self.perp_end, -bottom);
        let end = base.scale_add(self.perp_end, top);
        CubicBezier {
            start,
            cp_start: start.scale_add(self.dir_end, inertia),
            cp_end: end.scale_add(self.dir_end, inertia),
            end,
        }
    }

    /// Segment widths from the contact boxes projected onto the perpendiculars
    pub fn calculate_width(&self) -> StrokeWidths {
        match (self.box1, self.box2) {
            (Some(box1), Some(box2)) => StrokeWidths {
                start: box1.component_in(self.perp_start).abs(),
                end: box2.component_in(self.perp_end).abs(),
            },
            _ => DEFAULT_WIDTHS,
        }
    }
}

/// `dist * inertia` clamped to `[min, max]`
pub fn calculate_inertia(inertia: f32, dist: f32, min: f32, max: f32) -> f32 {
    (dist * inertia).max(min).min(max)
}

fn sample_point(sample: &PointerSample) -> PaintResult<Point2> {
    let point = Point2::new(sample.x, sample.y);
    if point.is_finite() {
        Ok(point)
    } else {
        Err(PaintError::InvalidArgument(format!(
            "stroke sample for pointer {} needs finite x and y, got ({}, {})",
            sample.id, sample.x, sample.y
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(x: f32, y: f32) -> PointerSample {
        PointerSample::new(0, x, y)
    }

    #[test]
    fn test_inertia_is_clamped() {
        assert_eq!(calculate_inertia(3.0, 1.0, 10.0, 40.0), 10.0);
        assert_eq!(calculate_inertia(3.0, 5.0, 10.0, 40.0), 15.0);
        assert_eq!(calculate_inertia(3.0, 50.0, 10.0, 40.0), 40.0);
    }

    #[test]
    fn test_start_curve_straddles_first_point() {
        let mut path = StrokePath::new(&sample(0.0, 0.0)).unwrap();
        path.add_point(&sample(10.0, 0.0)).unwrap();

        let cap = path.calculate_start_curve(5.0, 5.0, 3.0, 10.0, 0.0).unwrap();
        assert_eq!(cap.start, Point2::new(0.0, -5.0));
        assert_eq!(cap.end, Point2::new(0.0, 5.0));
        // Control points bulge backwards, away from the stroke direction
        assert!(cap.cp_start.x < 0.0 && cap.cp_end.x < 0.0);
    }

    #[test]
    fn test_bezier_requires_three_points() {
        let mut path = StrokePath::new(&sample(0.0, 0.0)).unwrap();
        assert!(path.calculate_bezier(1.0, 1.0, 0.0).is_none());
        path.add_point(&sample(10.0, 0.0)).unwrap();
        assert!(path.calculate_bezier(1.0, 1.0, 0.0).is_none());
        path.add_point(&sample(20.0, 0.0)).unwrap();

        let curve = path.calculate_bezier(0.0, 0.0, 0.0).unwrap();
        assert_eq!(curve.start, Point2::new(0.0, 0.0));
        assert_eq!(curve.end, Point2::new(10.0, 0.0));
        assert!((curve.cp_start.x - 3.0).abs() < 1e-5);
        assert!((curve.cp_end.x - 7.0).abs() < 1e-5);
    }

    #[test]
    fn test_width_falls_back_without_contact_data() {
        let mut path = StrokePath::new(&sample(0.0, 0.0)).unwrap();
        path.add_point(&sample(10.0, 0.0)).unwrap();
        assert_eq!(path.calculate_width(), StrokeWidths { start: 10.0, end: 30.0 });

        let mut path = StrokePath::new(&sample(0.0, 0.0).with_contact(4.0, 8.0)).unwrap();
        path.add_point(&sample(10.0, 0.0).with_contact(4.0, 8.0)).unwrap();
        path.add_point(&sample(20.0, 0.0).with_contact(4.0, 8.0)).unwrap();
        let widths = path.calculate_width();
        assert!((widths.start - 8.0).abs() < 1e-5);
        assert!((widths.end - 8.0).abs() < 1e-5);
    }
}

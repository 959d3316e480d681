//! Shared shape helpers for the ribbon-drawing tools.

use crate::stroke::{StrokePath, StrokeWidths};
use crate::surface::{shape, FillStyle, RasterSurface};

/// Inertia factor for start and stop caps
pub const CAP_INERTIA: f32 = 3.0;

/// Manual width, or contact-derived widths when `auto_width` is set
pub fn stroke_widths(path: &StrokePath, width: f32, auto_width: bool) -> StrokeWidths {
    if auto_width {
        path.calculate_width()
    } else {
        StrokeWidths { start: width, end: width }
    }
}

/// Body segment between `p1` and `p2`, `offset_start`/`offset_end` to
/// either side of the path
pub fn fill_body(
    surface: &mut RasterSurface,
    path: &StrokePath,
    offset_start: f32,
    offset_end: f32,
    overlap: f32,
    fill: &FillStyle<'_>,
) {
    let forward = path.calculate_bezier(offset_start, offset_end, overlap);
    let backward = path.calculate_bezier(-offset_start, -offset_end, overlap);
    if let (Some(forward), Some(backward)) = (forward, backward) {
        if let Some(ribbon) = shape::ribbon(&forward, &backward) {
            surface.fill_path(&ribbon, fill);
        }
    }
}

/// Last segment through the newest point, used when a stroke ends abruptly
pub fn fill_end(
    surface: &mut RasterSurface,
    path: &StrokePath,
    offset_start: f32,
    offset_end: f32,
    fill: &FillStyle<'_>,
) {
    let forward = path.calculate_end_bezier(offset_start, offset_end, 0.0);
    let backward = path.calculate_end_bezier(-offset_start, -offset_end, 0.0);
    if let (Some(forward), Some(backward)) = (forward, backward) {
        if let Some(ribbon) = shape::ribbon(&forward, &backward) {
            surface.fill_path(&ribbon, fill);
        }
    }
}

pub fn fill_start_cap(
    surface: &mut RasterSurface,
    path: &StrokePath,
    offset: f32,
    min_inertia: f32,
    overlap: f32,
    fill: &FillStyle<'_>,
) {
    if let Some(curve) = path.calculate_start_curve(offset, offset, CAP_INERTIA, min_inertia, overlap) {
        if let Some(cap) = shape::cap(&curve) {
            surface.fill_path(&cap, fill);
        }
    }
}

pub fn fill_stop_cap(
    surface: &mut RasterSurface,
    path: &StrokePath,
    offset: f32,
    min_inertia: f32,
    overlap: f32,
    fill: &FillStyle<'_>,
) {
    if let Some(curve) = path.calculate_stop_curve(offset, offset, CAP_INERTIA, min_inertia, overlap) {
        if let Some(cap) = shape::cap(&curve) {
            surface.fill_path(&cap, fill);
        }
    }
}

/// True when the stroke never produced a body segment, so a dot must
/// stand in for the end cap
pub fn never_drawn(path: &StrokePath) -> bool {
    path.created() || path.starting()
}

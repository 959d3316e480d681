use rand::Rng;

use crate::color::Color;
use crate::error::{PaintError, PaintResult};
use crate::stroke::{CubicBezier, StrokePath};
use crate::surface::{shape, Composite, DrawStyle, FillStyle, RasterSurface};
use crate::tools::ribbon::{self, never_drawn};
use crate::tools::{finite, flag, unknown_option, RenderContext, Tool, MAX_WIDTH};

const OPTION_KEYS: &[&str] = &["fade", "blends", "min_alpha", "max_alpha"];

const PX_PER_BRISTLE: f32 = 3.0;

/// How far past the last sample the closing strands reach
const STOP_INERTIA: f32 = 20.0;

/// One strand of the brush, aged independently of its neighbours
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bristle {
    pub color: Color,
    pub width: f32,
}

/// Bristle brush: parallel strands whose alpha decays as the stroke travels
#[derive(Debug, Clone)]
pub struct Brush {
    width: f32,
    /// Strands on each side of the centre one
    half_count: i32,
    min_alpha: f32,
    max_alpha: f32,
    /// Travel in pixels over which strands run dry; 0 switches to flicker
    fade: f32,
    /// Mix the strands with the paint already on the surface
    blends: bool,
    bristles: Vec<Bristle>,
}

impl Default for Brush {
    fn default() -> Self {
        let mut brush = Self {
            width: 0.0,
            half_count: 0,
            min_alpha: 0.8,
            max_alpha: 1.0,
            fade: 1000.0,
            blends: false,
            bristles: Vec::new(),
        };
        brush.snap_width(30.0);
        brush
    }
}

impl Brush {
    /// Strands as of the last render call
    pub fn bristles(&self) -> &[Bristle] {
        &self.bristles
    }

    pub fn bristle_count(&self) -> usize {
        (2 * self.half_count + 1) as usize
    }

    fn snap_width(&mut self, width: f32) {
        let width = width.abs().min(MAX_WIDTH);
        self.half_count = ((0.3 * width) / PX_PER_BRISTLE).floor() as i32;
        self.width = (2 * self.half_count + 1) as f32 * PX_PER_BRISTLE;
    }

    /// Perpendicular offset of the strand at `slot`
    fn offset(&self, slot: usize) -> f32 {
        (slot as i32 - self.half_count) as f32 * PX_PER_BRISTLE
    }

    fn stroke_strand(surface: &mut RasterSurface, curve: &CubicBezier, from: Color, to: Color, width: f32) {
        if let Some(strand) = shape::curve(curve) {
            let gradient = FillStyle::LinearGradient {
                start: curve.start,
                end: curve.end,
                from,
                to,
            };
            surface.stroke_path(&strand, &gradient, width);
        }
    }
}

impl Tool for Brush {
    fn name(&self) -> &'static str {
        "brush"
    }

    fn width(&self) -> f32 {
        self.width
    }

    fn set_width(&mut self, width: f32) -> PaintResult<()> {
        let width = finite(self.name(), "width", width)?;
        self.snap_width(width);
        Ok(())
    }

    fn option_keys(&self) -> &'static [&'static str] {
        OPTION_KEYS
    }

    fn option(&self, key: &str) -> PaintResult<f32> {
        match key {
            "fade" => Ok(self.fade),
            "blends" => Ok(flag(self.blends)),
            "min_alpha" => Ok(self.min_alpha),
            "max_alpha" => Ok(self.max_alpha),
            _ => Err(unknown_option(self.name(), key)),
        }
    }

    fn set_option(&mut self, key: &str, value: f32) -> PaintResult<()> {
        match key {
            "fade" => {
                let fade = finite(self.name(), key, value)?;
                if fade < 0.0 {
                    return Err(PaintError::InvalidArgument(format!(
                        "brush.fade must not be negative, got {}",
                        fade
                    )));
                }
                self.fade = fade;
            }
            "blends" => self.blends = finite(self.name(), key, value)? != 0.0,
            "min_alpha" => self.min_alpha = finite(self.name(), key, value)?.clamp(0.0, 1.0),
            "max_alpha" => self.max_alpha = finite(self.name(), key, value)?.clamp(0.0, 1.0),
            _ => return Err(unknown_option(self.name(), key)),
        }
        Ok(())
    }

    fn render_start(&mut self, _path: &StrokePath, ctx: &mut RenderContext<'_>) {
        let color = ctx.color.with_alpha(self.max_alpha);
        ctx.surface.set_style(DrawStyle {
            composite: Composite::SourceOver,
            global_alpha: 1.0,
            fill: color,
            glow: None,
        });
        self.bristles = vec![
            Bristle {
                color,
                width: PX_PER_BRISTLE + 0.5,
            };
            self.bristle_count()
        ];
        log::debug!("Brush loaded {} bristles", self.bristles.len());
    }

    fn render(&mut self, path: &StrokePath, ctx: &mut RenderContext<'_>) {
        if path.starting() {
            let fill = FillStyle::Solid(ctx.surface.style().fill);
            ribbon::fill_start_cap(ctx.surface, path, self.width / 2.0, self.width, 0.0, &fill);
        }
        if !path.drawable() {
            return;
        }

        let outer = (self.half_count + 1) as f32;
        for slot in 0..self.bristles.len() {
            let offset = self.offset(slot);
            let old = self.bristles[slot];
            let Some(curve) = path.calculate_bezier(offset, offset, old.color.alpha().powi(2) * 0.25) else {
                continue;
            };

            let mut color = old.color;
            if self.blends {
                color.blend_with(&ctx.surface.get_color_at(curve.cp_start.x, curve.cp_start.y));
            }
            let r: f32 = ctx.rng.gen_range(0.0..1.0);
            if self.fade > 0.0 {
                let wear = (0.2 * offset.abs() / PX_PER_BRISTLE / outer).powi(4) + path.dist() / self.fade;
                color.set_alpha(color.alpha() - r * wear);
            } else {
                color.set_alpha(r * (self.max_alpha - self.min_alpha) + self.min_alpha);
            }

            let width = PX_PER_BRISTLE + old.color.alpha().powi(2) * 0.5;
            Self::stroke_strand(ctx.surface, &curve, old.color, color, width);
            self.bristles[slot] = Bristle { color, width };
        }
    }

    fn render_stop(&mut self, path: &StrokePath, ctx: &mut RenderContext<'_>) {
        if never_drawn(path) {
            let p3 = path.p3();
            ctx.surface.draw_circle(p3.x, p3.y, self.width / 2.0);
            return;
        }

        for slot in 0..self.bristles.len() {
            let offset = self.offset(slot);
            let old = self.bristles[slot];
            let Some(curve) = path.calculate_end_bezier(offset, offset, STOP_INERTIA) else {
                continue;
            };
            let mut color = old.color;
            if self.blends {
                color.blend_with(&ctx.surface.get_color_at(curve.cp_start.x, curve.cp_start.y));
            }
            color.set_alpha(0.0);
            Self::stroke_strand(ctx.surface, &curve, old.color, color, old.width);
            self.bristles[slot] = Bristle { color, width: old.width };
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::input::PointerSample;
    use crate::tools::testing::stroke;

    fn line() -> Vec<(f32, f32)> {
        (0..12).map(|i| (10.0 + i as f32 * 8.0, 30.0)).collect()
    }

    #[test]
    fn test_width_snaps_to_bristle_grid() {
        let mut brush = Brush::default();
        brush.set_width(30.0).unwrap();
        assert_eq!(brush.bristle_count(), 7);
        assert_eq!(brush.width(), 21.0);

        brush.set_width(2.0).unwrap();
        assert_eq!(brush.bristle_count(), 1);
        assert_eq!(brush.width(), 3.0);

        brush.set_width(1e11).unwrap();
        assert_eq!(brush.bristle_count(), 201);
        assert_eq!(brush.width(), 603.0);
    }

    #[test]
    fn test_fade_must_not_be_negative() {
        let mut brush = Brush::default();
        assert!(brush.set_option("fade", -1.0).is_err());
        brush.set_option("fade", 0.0).unwrap();
        assert_eq!(brush.option("fade").unwrap(), 0.0);
    }

    #[test]
    fn test_stroke_ends_with_dry_bristles() {
        let mut surface = RasterSurface::new(120, 60, 10).unwrap();
        let mut brush = Brush::default();
        brush.set_width(20.0).unwrap();
        stroke(&mut brush, &mut surface, Color::from_rgb(200, 0, 0), &line());

        assert!(brush.bristles().iter().all(|b| b.color.alpha() == 0.0));
        let painted = surface.get_color_at(50.0, 30.0);
        assert!(painted.alpha() > 0.0);
        assert!(painted.red() > 150 && painted.green() == 0);
    }

    /// Paints one segment with a single opaque red bristle and returns the
    /// bristle color afterwards
    fn blended_dab(surface: &mut RasterSurface) -> Color {
        let mut brush = Brush::default();
        brush.set_width(2.0).unwrap();
        brush.set_option("blends", 1.0).unwrap();
        brush.set_option("fade", 0.0).unwrap();
        brush.set_option("min_alpha", 1.0).unwrap();

        let mut rng = StdRng::seed_from_u64(5);
        let mut ctx = RenderContext {
            surface,
            color: Color::from_rgb(255, 0, 0),
            rng: &mut rng,
        };
        let mut path = StrokePath::new(&PointerSample::new(0, 10.0, 30.0)).unwrap();
        path.add_point(&PointerSample::new(0, 30.0, 30.0)).unwrap();
        path.add_point(&PointerSample::new(0, 50.0, 30.0)).unwrap();
        brush.render_start(&path, &mut ctx);
        brush.render(&path, &mut ctx);
        brush.bristles()[0].color
    }

    #[test]
    fn test_blends_mix_with_canvas() {
        let mut surface = RasterSurface::new(120, 60, 10).unwrap();
        surface.set_fill(Color::from_rgb(0, 0, 255));
        surface.draw_circle(60.0, 30.0, 200.0);

        assert_eq!(blended_dab(&mut surface), Color::from_rgb(204, 0, 51));
    }

    #[test]
    fn test_blends_skip_transparent_canvas() {
        let mut surface = RasterSurface::new(120, 60, 10).unwrap();
        assert_eq!(blended_dab(&mut surface), Color::from_rgb(255, 0, 0));
    }

    #[test]
    fn test_flicker_mode_keeps_alpha_in_range() {
        let mut surface = RasterSurface::new(120, 60, 10).unwrap();
        let mut brush = Brush::default();
        brush.set_option("fade", 0.0).unwrap();
        brush.set_option("min_alpha", 0.4).unwrap();
        brush.set_option("max_alpha", 0.6).unwrap();

        let points = line();
        let mut rng = StdRng::seed_from_u64(3);
        let mut ctx = RenderContext {
            surface: &mut surface,
            color: Color::BLACK,
            rng: &mut rng,
        };
        let mut path = StrokePath::new(&PointerSample::new(0, points[0].0, points[0].1)).unwrap();
        brush.render_start(&path, &mut ctx);
        for &(x, y) in &points[1..] {
            path.add_point(&PointerSample::new(0, x, y)).unwrap();
            brush.render(&path, &mut ctx);
        }
        assert!(
            brush
                .bristles()
                .iter()
                .all(|b| (0.39..=0.61).contains(&b.color.alpha()))
        );
    }
}

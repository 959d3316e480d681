use crate::error::PaintResult;
use crate::stroke::StrokePath;
use crate::surface::{Composite, DrawStyle, FillStyle};
use crate::tools::ribbon::{self, never_drawn};
use crate::tools::{finite, flag, stroke_width, unknown_option, RenderContext, Tool};

const OPTION_KEYS: &[&str] = &["opacity", "auto_width"];

/// Smooth solid strokes, usually slightly transparent
#[derive(Debug, Clone)]
pub struct Marker {
    width: f32,
    opacity: f32,
    auto_width: bool,
}

impl Default for Marker {
    fn default() -> Self {
        Self {
            width: 30.0,
            opacity: 0.85,
            auto_width: false,
        }
    }
}

impl Marker {
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Joins overlap more at high opacity so seams do not show
    fn overlap(&self) -> f32 {
        self.opacity.powi(2) * 0.22
    }
}

impl Tool for Marker {
    fn name(&self) -> &'static str {
        "marker"
    }

    fn width(&self) -> f32 {
        self.width
    }

    fn set_width(&mut self, width: f32) -> PaintResult<()> {
        self.width = stroke_width(self.name(), width)?;
        Ok(())
    }

    fn option_keys(&self) -> &'static [&'static str] {
        OPTION_KEYS
    }

    fn option(&self, key: &str) -> PaintResult<f32> {
        match key {
            "opacity" => Ok(self.opacity),
            "auto_width" => Ok(flag(self.auto_width)),
            _ => Err(unknown_option(self.name(), key)),
        }
    }

    fn set_option(&mut self, key: &str, value: f32) -> PaintResult<()> {
        match key {
            "opacity" => self.opacity = finite(self.name(), key, value)?.clamp(0.0, 1.0),
            "auto_width" => self.auto_width = finite(self.name(), key, value)? != 0.0,
            _ => return Err(unknown_option(self.name(), key)),
        }
        Ok(())
    }

    fn render_start(&mut self, _path: &StrokePath, ctx: &mut RenderContext<'_>) {
        ctx.surface.set_style(DrawStyle {
            composite: Composite::SourceOver,
            global_alpha: self.opacity,
            fill: ctx.color,
            glow: None,
        });
    }

    fn render(&mut self, path: &StrokePath, ctx: &mut RenderContext<'_>) {
        let widths = ribbon::stroke_widths(path, self.width, self.auto_width);
        let fill = FillStyle::Solid(ctx.surface.style().fill);

        if path.starting() {
            ribbon::fill_start_cap(ctx.surface, path, widths.end / 2.0, widths.end, self.overlap(), &fill);
        }
        if path.drawable() {
            ribbon::fill_body(
                ctx.surface,
                path,
                widths.start / 2.0,
                widths.end / 2.0,
                self.overlap(),
                &fill,
            );
        }
    }

    fn render_stop(&mut self, path: &StrokePath, ctx: &mut RenderContext<'_>) {
        let widths = ribbon::stroke_widths(path, self.width, self.auto_width);

        if never_drawn(path) {
            let p3 = path.p3();
            ctx.surface.draw_circle(p3.x, p3.y, widths.end / 2.0);
        } else {
            let fill = FillStyle::Solid(ctx.surface.style().fill);
            ribbon::fill_stop_cap(ctx.surface, path, widths.end / 2.0, widths.end, self.overlap(), &fill);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::input::PointerSample;
    use crate::surface::RasterSurface;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_marker_paints_translucent_stroke() {
        let mut surface = RasterSurface::new(120, 60, 10).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let mut marker = Marker::default();
        marker.set_option("opacity", 0.5).unwrap();
        marker.set_width(10.0).unwrap();

        let mut ctx = RenderContext {
            surface: &mut surface,
            color: Color::from_rgb(0, 0, 255),
            rng: &mut rng,
        };
        let mut path = StrokePath::new(&PointerSample::new(0, 10.0, 30.0)).unwrap();
        marker.render_start(&path, &mut ctx);
        for x in [30.0, 50.0, 70.0, 90.0] {
            path.add_point(&PointerSample::new(0, x, 30.0)).unwrap();
            marker.render(&path, &mut ctx);
        }
        marker.render_stop(&path, &mut ctx);

        let mid = surface.get_color_at(50.0, 30.0);
        assert_eq!(mid.blue(), 255);
        assert!(mid.alpha() > 0.3 && mid.alpha() < 0.9);
        assert_eq!(surface.get_color_at(50.0, 50.0).alpha(), 0.0);
    }

    #[test]
    fn test_single_point_stroke_draws_dot() {
        let mut surface = RasterSurface::new(40, 40, 10).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let mut marker = Marker::default();
        marker.set_width(10.0).unwrap();
        let mut ctx = RenderContext {
            surface: &mut surface,
            color: Color::BLACK,
            rng: &mut rng,
        };
        let path = StrokePath::new(&PointerSample::new(0, 20.0, 20.0)).unwrap();
        marker.render_start(&path, &mut ctx);
        marker.render(&path, &mut ctx);
        marker.render_stop(&path, &mut ctx);

        assert!(surface.get_color_at(20.0, 20.0).alpha() > 0.5);
        assert_eq!(surface.get_color_at(20.0, 30.0).alpha(), 0.0);
    }

    #[test]
    fn test_opacity_is_clamped() {
        let mut marker = Marker::default();
        marker.set_option("opacity", 3.0).unwrap();
        assert_eq!(marker.option("opacity").unwrap(), 1.0);
        marker.set_option("auto_width", 1.0).unwrap();
        assert_eq!(marker.option("auto_width").unwrap(), 1.0);
    }
}

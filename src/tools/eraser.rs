use crate::color::Color;
use crate::error::PaintResult;
use crate::stroke::StrokePath;
use crate::surface::{Composite, DrawStyle, FillStyle};
use crate::tools::ribbon;
use crate::tools::{finite, flag, stroke_width, unknown_option, RenderContext, Tool};

const OPTION_KEYS: &[&str] = &["auto_width"];

/// Marker geometry that removes paint instead of adding it
#[derive(Debug, Clone)]
pub struct Eraser {
    width: f32,
    auto_width: bool,
}

impl Default for Eraser {
    fn default() -> Self {
        Self {
            width: 20.0,
            auto_width: false,
        }
    }
}

impl Tool for Eraser {
    fn name(&self) -> &'static str {
        "eraser"
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
            "auto_width" => Ok(flag(self.auto_width)),
            _ => Err(unknown_option(self.name(), key)),
        }
    }

    fn set_option(&mut self, key: &str, value: f32) -> PaintResult<()> {
        match key {
            "auto_width" => self.auto_width = finite(self.name(), key, value)? != 0.0,
            _ => return Err(unknown_option(self.name(), key)),
        }
        Ok(())
    }

    fn render_start(&mut self, path: &StrokePath, ctx: &mut RenderContext<'_>) {
        ctx.surface.set_style(DrawStyle {
            composite: Composite::DestinationOut,
            global_alpha: 1.0,
            fill: Color::BLACK,
            glow: None,
        });
        let p3 = path.p3();
        ctx.surface.draw_circle(p3.x, p3.y, self.width / 2.0);
    }

    fn render(&mut self, path: &StrokePath, ctx: &mut RenderContext<'_>) {
        if path.drawable() {
            let widths = ribbon::stroke_widths(path, self.width, self.auto_width);
            ribbon::fill_body(
                ctx.surface,
                path,
                widths.start / 2.0,
                widths.end / 2.0,
                0.5,
                &FillStyle::Solid(Color::BLACK),
            );
        }
    }

    fn render_stop(&mut self, path: &StrokePath, ctx: &mut RenderContext<'_>) {
        let widths = ribbon::stroke_widths(path, self.width, self.auto_width);
        ribbon::fill_end(
            ctx.surface,
            path,
            widths.start / 2.0,
            widths.end / 2.0,
            &FillStyle::Solid(Color::BLACK),
        );
        let p3 = path.p3();
        ctx.surface.draw_circle(p3.x, p3.y, self.width / 2.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RasterSurface;
    use crate::tools::testing::stroke;
    use crate::tools::Marker;

    #[test]
    fn test_eraser_clears_painted_pixels() {
        let mut surface = RasterSurface::new(100, 40, 10).unwrap();
        let mut marker = Marker::default();
        marker.set_option("opacity", 1.0).unwrap();
        stroke(&mut marker, &mut surface, Color::BLACK, &[(5.0, 20.0), (35.0, 20.0), (65.0, 20.0), (95.0, 20.0)]);
        assert!(surface.get_color_at(50.0, 20.0).alpha() > 0.99);

        let mut eraser = Eraser::default();
        stroke(&mut eraser, &mut surface, Color::BLACK, &[(40.0, 20.0), (50.0, 20.0), (60.0, 20.0)]);
        assert_eq!(surface.get_color_at(50.0, 20.0).alpha(), 0.0);
        assert!(surface.get_color_at(20.0, 20.0).alpha() > 0.99);
    }

    #[test]
    fn test_tap_erases_dot() {
        let mut surface = RasterSurface::new(40, 40, 10).unwrap();
        surface.draw_circle(20.0, 20.0, 15.0);
        let mut eraser = Eraser::default();
        stroke(&mut eraser, &mut surface, Color::BLACK, &[(20.0, 20.0)]);
        assert_eq!(surface.get_color_at(20.0, 20.0).alpha(), 0.0);
        assert!(surface.get_color_at(20.0, 32.0).alpha() > 0.9);
    }
}

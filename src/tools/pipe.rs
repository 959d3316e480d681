use crate::color::Color;
use crate::error::PaintResult;
use crate::stroke::StrokePath;
use crate::surface::{Composite, DrawStyle, FillStyle};
use crate::tools::ribbon::{self, never_drawn};
use crate::tools::{finite, flag, stroke_width, unknown_option, RenderContext, Tool};

const OPTION_KEYS: &[&str] = &["height", "auto_width"];

const PX_PER_BRISTLE: f32 = 1.0;
const MAX_HEIGHT: f32 = 6.0;
const MIDDLE_OVERLAP: f32 = 2.0;

/// Colors with a channel sum below this are lightened before shading
const DARK_THRESHOLD: f32 = 382.5;

/// Shaded tube: bands darkening towards the edges around a full-color core
#[derive(Debug, Clone)]
pub struct Pipe {
    width: f32,
    height: f32,
    auto_width: bool,
    /// Band colors, innermost first
    bands: Vec<Color>,
    middle_color: Color,
}

impl Default for Pipe {
    fn default() -> Self {
        Self {
            width: 20.0,
            height: MAX_HEIGHT,
            auto_width: false,
            bands: Vec::new(),
            middle_color: Color::BLACK,
        }
    }
}

impl Pipe {
    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn bands(&self) -> &[Color] {
        &self.bands
    }

    fn band_count(&self) -> usize {
        let n = (0.25 * self.width / PX_PER_BRISTLE).floor();
        if n <= 0.0 { 1 } else { n as usize }
    }

    fn middle_width(&self) -> f32 {
        self.width - 2.0 * self.bands.len() as f32 * PX_PER_BRISTLE
    }

    /// Distance from the path to the outer edge of band `i`
    fn band_offset(&self, i: usize) -> f32 {
        (i as f32 + 0.5) * PX_PER_BRISTLE + self.middle_width() / 2.0
    }

    fn band_overlap(&self, i: usize) -> f32 {
        1.5 * (1.0 - i as f32 / self.bands.len() as f32)
    }

    fn load_bands(&mut self, color: Color) {
        let mut base = color;
        if (base.brightness_sum() as f32) < DARK_THRESHOLD {
            base.lighten(0.2);
        }
        let n = self.band_count();
        self.bands = (0..n)
            .map(|i| {
                let mut band = base;
                band.scale(1.0 - ((i + 1) as f32 / n as f32) * (self.height / MAX_HEIGHT));
                band
            })
            .collect();
        self.middle_color = base;
    }
}

impl Tool for Pipe {
    fn name(&self) -> &'static str {
        "pipe"
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
            "height" => Ok(self.height),
            "auto_width" => Ok(flag(self.auto_width)),
            _ => Err(unknown_option(self.name(), key)),
        }
    }

    fn set_option(&mut self, key: &str, value: f32) -> PaintResult<()> {
        match key {
            "height" => self.height = finite(self.name(), key, value)?.clamp(0.0, MAX_HEIGHT),
            "auto_width" => self.auto_width = finite(self.name(), key, value)? != 0.0,
            _ => return Err(unknown_option(self.name(), key)),
        }
        Ok(())
    }

    fn render_start(&mut self, _path: &StrokePath, ctx: &mut RenderContext<'_>) {
        self.load_bands(ctx.color);
        ctx.surface.set_style(DrawStyle {
            composite: Composite::SourceOver,
            global_alpha: 1.0,
            fill: self.middle_color,
            glow: None,
        });
    }

    fn render(&mut self, path: &StrokePath, ctx: &mut RenderContext<'_>) {
        let widths = ribbon::stroke_widths(path, self.width, self.auto_width);
        let middle = self.middle_width() / 2.0;

        if path.starting() {
            for i in (0..self.bands.len()).rev() {
                let fill = FillStyle::Solid(self.bands[i]);
                ribbon::fill_start_cap(ctx.surface, path, self.band_offset(i), widths.end, 0.0, &fill);
            }
            let fill = FillStyle::Solid(self.middle_color);
            ribbon::fill_start_cap(ctx.surface, path, middle, widths.end, 0.0, &fill);
        }

        if path.drawable() {
            for i in (0..self.bands.len()).rev() {
                let offset = self.band_offset(i);
                let fill = FillStyle::Solid(self.bands[i]);
                ribbon::fill_body(ctx.surface, path, offset, offset, self.band_overlap(i), &fill);
            }
            let fill = FillStyle::Solid(self.middle_color);
            ribbon::fill_body(ctx.surface, path, middle, middle, MIDDLE_OVERLAP, &fill);
        }
    }

    fn render_stop(&mut self, path: &StrokePath, ctx: &mut RenderContext<'_>) {
        let widths = ribbon::stroke_widths(path, self.width, self.auto_width);
        let middle = self.middle_width() / 2.0;

        if never_drawn(path) {
            let p3 = path.p3();
            for i in (0..self.bands.len()).rev() {
                ctx.surface.set_fill(self.bands[i]);
                ctx.surface.draw_circle(p3.x, p3.y, self.band_offset(i));
            }
            ctx.surface.set_fill(self.middle_color);
            ctx.surface.draw_circle(p3.x, p3.y, middle);
            return;
        }

        for i in (0..self.bands.len()).rev() {
            let fill = FillStyle::Solid(self.bands[i]);
            let overlap = self.band_overlap(i);
            ribbon::fill_stop_cap(ctx.surface, path, self.band_offset(i), widths.end, overlap, &fill);
        }
        let fill = FillStyle::Solid(self.middle_color);
        ribbon::fill_stop_cap(ctx.surface, path, middle, widths.end, MIDDLE_OVERLAP, &fill);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RasterSurface;
    use crate::tools::testing::stroke;

    #[test]
    fn test_bands_darken_towards_edge() {
        let mut pipe = Pipe::default();
        pipe.load_bands(Color::from_rgb(250, 250, 250));
        assert_eq!(pipe.bands().len(), 5);
        assert_eq!(pipe.middle_width(), 10.0);
        let reds: Vec<u8> = pipe.bands().iter().map(|c| c.red()).collect();
        assert!(reds.windows(2).all(|w| w[0] > w[1]));
        assert_eq!(*reds.last().unwrap(), 0);
    }

    #[test]
    fn test_dark_colors_are_lightened() {
        let mut pipe = Pipe::default();
        pipe.load_bands(Color::BLACK);
        assert_eq!(pipe.middle_color.red(), 51);

        pipe.set_option("height", 0.0).unwrap();
        pipe.load_bands(Color::BLACK);
        assert!(pipe.bands().iter().all(|c| c.red() == 51));
    }

    #[test]
    fn test_height_is_clamped() {
        let mut pipe = Pipe::default();
        pipe.set_option("height", 9.0).unwrap();
        assert_eq!(pipe.height(), MAX_HEIGHT);
        pipe.set_option("height", -1.0).unwrap();
        assert_eq!(pipe.height(), 0.0);
    }

    #[test]
    fn test_band_count_follows_clamped_width() {
        let mut pipe = Pipe::default();
        pipe.set_width(1e20).unwrap();
        pipe.load_bands(Color::WHITE);
        assert_eq!(pipe.bands().len(), 250);
    }

    #[test]
    fn test_tube_is_brighter_in_the_middle() {
        let mut surface = RasterSurface::new(120, 60, 10).unwrap();
        let mut pipe = Pipe::default();
        let points: Vec<(f32, f32)> = (0..10).map(|i| (10.0 + i as f32 * 10.0, 30.0)).collect();
        stroke(&mut pipe, &mut surface, Color::from_rgb(0, 0, 250), &points);

        let core = surface.get_color_at(55.0, 30.0);
        let edge = surface.get_color_at(55.0, 38.5);
        assert!(core.alpha() > 0.99);
        assert!(edge.alpha() > 0.5);
        assert!(core.blue() > edge.blue());
    }
}

use rand::Rng;
use tiny_skia::Transform;

use crate::color::Color;
use crate::error::{PaintError, PaintResult};
use crate::stroke::StrokePath;
use crate::surface::{shape, Composite, DrawStyle, FillStyle};
use crate::texture::{Texture, MAX_ZOOM};
use crate::tools::ribbon::{self, never_drawn};
use crate::tools::{finite, flag, stroke_width, unknown_option, RenderContext, Tool};

const OPTION_KEYS: &[&str] = &["density", "auto_width"];

/// Largest random shift of the pattern origin, in pixels
const MAX_JITTER: f32 = 10.0;

/// Ribbons filled with a recolored grain texture
#[derive(Debug, Clone)]
pub struct Crayon {
    width: f32,
    density: f32,
    auto_width: bool,
    texture: Texture,
}

impl Crayon {
    pub fn new(mut texture: Texture) -> Self {
        let density = 0.5;
        texture.update(texture.color(), density);
        Self {
            width: 30.0,
            density,
            auto_width: false,
            texture,
        }
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    pub fn density(&self) -> f32 {
        self.density
    }

    /// Pattern placement for one fill, rotated and shifted at random so the
    /// tiles do not line up between segments
    fn jitter(rng: &mut impl Rng) -> Transform {
        let r: f32 = rng.gen_range(0.0..1.0);
        Transform::from_rotate(r * 360.0).pre_translate(MAX_JITTER * r, MAX_JITTER * r)
    }

    fn fill(&self, rng: &mut impl Rng) -> FillStyle<'_> {
        FillStyle::Pattern {
            pixmap: self.texture.pattern(),
            transform: Self::jitter(rng),
        }
    }
}

impl Tool for Crayon {
    fn name(&self) -> &'static str {
        "crayon"
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
            "density" => Ok(self.density),
            "auto_width" => Ok(flag(self.auto_width)),
            _ => Err(unknown_option(self.name(), key)),
        }
    }

    fn set_option(&mut self, key: &str, value: f32) -> PaintResult<()> {
        match key {
            "density" => {
                let density = finite(self.name(), key, value)?;
                if density <= 0.0 {
                    return Err(PaintError::InvalidArgument(format!(
                        "crayon.density must be positive, got {}",
                        density
                    )));
                }
                self.density = density.min(MAX_ZOOM);
                self.texture.update(self.texture.color(), density);
            }
            "auto_width" => self.auto_width = finite(self.name(), key, value)? != 0.0,
            _ => return Err(unknown_option(self.name(), key)),
        }
        Ok(())
    }

    fn update_color(&mut self, color: Color) {
        self.texture.update(color, self.density);
    }

    fn render_start(&mut self, _path: &StrokePath, ctx: &mut RenderContext<'_>) {
        if self.texture.color() != ctx.color {
            self.texture.update(ctx.color, self.density);
        }
        ctx.surface.set_style(DrawStyle {
            composite: Composite::SourceOver,
            global_alpha: 1.0,
            fill: ctx.color,
            glow: None,
        });
    }

    fn render(&mut self, path: &StrokePath, ctx: &mut RenderContext<'_>) {
        let widths = ribbon::stroke_widths(path, self.width, self.auto_width);

        if path.starting() {
            let fill = self.fill(&mut *ctx.rng);
            ribbon::fill_start_cap(ctx.surface, path, widths.end / 2.0, widths.end, 0.0, &fill);
        }
        if path.drawable() {
            let fill = self.fill(&mut *ctx.rng);
            ribbon::fill_body(ctx.surface, path, widths.start / 2.0, widths.end / 2.0, 0.0, &fill);
        }
    }

    fn render_stop(&mut self, path: &StrokePath, ctx: &mut RenderContext<'_>) {
        let widths = ribbon::stroke_widths(path, self.width, self.auto_width);
        let fill = self.fill(&mut *ctx.rng);

        if never_drawn(path) {
            let p3 = path.p3();
            if let Some(dot) = shape::circle(p3.x, p3.y, widths.end / 2.0) {
                ctx.surface.fill_path(&dot, &fill);
            }
        } else {
            ribbon::fill_stop_cap(ctx.surface, path, widths.end / 2.0, widths.end, 0.0, &fill);
        }
    }
}

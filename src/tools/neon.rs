use crate::error::PaintResult;
use crate::stroke::StrokePath;
use crate::surface::{Composite, DrawStyle, FillStyle, Glow};
use crate::tools::ribbon::{self, never_drawn};
use crate::tools::{finite, flag, stroke_width, unknown_option, RenderContext, Tool};

const OPTION_KEYS: &[&str] = &["glow", "auto_width"];

/// Solid strokes surrounded by a blurred halo of the same color
#[derive(Debug, Clone)]
pub struct Neon {
    width: f32,
    glow: f32,
    auto_width: bool,
}

impl Default for Neon {
    fn default() -> Self {
        Self {
            width: 20.0,
            glow: 20.0,
            auto_width: false,
        }
    }
}

impl Neon {
    pub fn glow(&self) -> f32 {
        self.glow
    }
}

impl Tool for Neon {
    fn name(&self) -> &'static str {
        "neon"
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
            "glow" => Ok(self.glow),
            "auto_width" => Ok(flag(self.auto_width)),
            _ => Err(unknown_option(self.name(), key)),
        }
    }

    fn set_option(&mut self, key: &str, value: f32) -> PaintResult<()> {
        match key {
            "glow" => self.glow = finite(self.name(), key, value)?.max(0.0),
            "auto_width" => self.auto_width = finite(self.name(), key, value)? != 0.0,
            _ => return Err(unknown_option(self.name(), key)),
        }
        Ok(())
    }

    fn render_start(&mut self, _path: &StrokePath, ctx: &mut RenderContext<'_>) {
        ctx.surface.set_style(DrawStyle {
            composite: Composite::SourceOver,
            global_alpha: 1.0,
            fill: ctx.color,
            glow: Some(Glow {
                blur: self.glow,
                color: ctx.color,
            }),
        });
    }

    fn render(&mut self, path: &StrokePath, ctx: &mut RenderContext<'_>) {
        let widths = ribbon::stroke_widths(path, self.width, self.auto_width);
        let fill = FillStyle::Solid(ctx.surface.style().fill);

        if path.starting() {
            ribbon::fill_start_cap(ctx.surface, path, widths.end / 2.0, widths.end, 0.0, &fill);
        }
        if path.drawable() {
            ribbon::fill_body(ctx.surface, path, widths.start / 2.0, widths.end / 2.0, 0.5, &fill);
        }
    }

    fn render_stop(&mut self, path: &StrokePath, ctx: &mut RenderContext<'_>) {
        let widths = ribbon::stroke_widths(path, self.width, self.auto_width);

        if never_drawn(path) {
            let p3 = path.p3();
            ctx.surface.draw_circle(p3.x, p3.y, widths.end / 2.0);
        } else {
            let fill = FillStyle::Solid(ctx.surface.style().fill);
            ribbon::fill_stop_cap(ctx.surface, path, widths.end / 2.0, widths.end, 0.0, &fill);
        }
    }
}

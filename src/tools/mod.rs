use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;

use crate::color::Color;
use crate::error::{PaintError, PaintResult};
use crate::stroke::StrokePath;
use crate::surface::RasterSurface;
use crate::texture::Texture;

mod brush;
mod crayon;
mod eraser;
mod marker;
mod neon;
mod pipe;
mod ribbon;

pub use brush::{Bristle, Brush};
pub use crayon::Crayon;
pub use eraser::Eraser;
pub use marker::Marker;
pub use neon::Neon;
pub use pipe::Pipe;

/// Seed of the procedural crayon grain used when no texture image is configured
pub const GRAIN_SEED: u64 = 0x5eed_c4a7;

/// Widest stroke a tool accepts, in pixels; larger widths are clamped
pub const MAX_WIDTH: f32 = 1000.0;

/// Everything a tool may touch while rendering
pub struct RenderContext<'a> {
    pub surface: &'a mut RasterSurface,
    /// The session's current color
    pub color: Color,
    pub rng: &'a mut StdRng,
}

/// Tool trait defines the interface for all painting tools.
///
/// A stroke calls `render_start` once, `render` for every sample fed to
/// the path, then `render` and `render_stop` for the final sample. Render
/// calls never fail; with too few points they fall back to simpler shapes.
pub trait Tool {
    /// Return the name of the tool
    fn name(&self) -> &'static str;

    fn width(&self) -> f32;

    /// Sets the manual stroke width; some tools snap it
    fn set_width(&mut self, width: f32) -> PaintResult<()>;

    /// Option keys accepted by [`Tool::option`] and [`Tool::set_option`]
    fn option_keys(&self) -> &'static [&'static str];

    fn option(&self, key: &str) -> PaintResult<f32>;

    fn set_option(&mut self, key: &str, value: f32) -> PaintResult<()>;

    /// Called when the session color changes
    fn update_color(&mut self, _color: Color) {}

    /// One-time setup for a new stroke
    fn render_start(&mut self, path: &StrokePath, ctx: &mut RenderContext<'_>);

    /// Draws whatever the latest sample made drawable
    fn render(&mut self, path: &StrokePath, ctx: &mut RenderContext<'_>);

    /// Draws the end of the stroke
    fn render_stop(&mut self, path: &StrokePath, ctx: &mut RenderContext<'_>);
}

/// The built-in tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    Marker,
    Brush,
    Neon,
    Pipe,
    Crayon,
    Eraser,
}

impl ToolKind {
    pub const ALL: [ToolKind; 6] = [
        ToolKind::Marker,
        ToolKind::Brush,
        ToolKind::Neon,
        ToolKind::Pipe,
        ToolKind::Crayon,
        ToolKind::Eraser,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Marker => "marker",
            ToolKind::Brush => "brush",
            ToolKind::Neon => "neon",
            ToolKind::Pipe => "pipe",
            ToolKind::Crayon => "crayon",
            ToolKind::Eraser => "eraser",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ToolKind {
    type Err = PaintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| PaintError::UnknownTool(s.to_owned()))
    }
}

/// Enum representing all available tool types
/// This allows us to avoid using Box<dyn Tool> and keeps tools cloneable
#[derive(Debug, Clone)]
pub enum ToolType {
    Marker(Marker),
    Brush(Brush),
    Neon(Neon),
    Pipe(Pipe),
    Crayon(Crayon),
    Eraser(Eraser),
}

impl ToolType {
    pub fn kind(&self) -> ToolKind {
        match self {
            Self::Marker(_) => ToolKind::Marker,
            Self::Brush(_) => ToolKind::Brush,
            Self::Neon(_) => ToolKind::Neon,
            Self::Pipe(_) => ToolKind::Pipe,
            Self::Crayon(_) => ToolKind::Crayon,
            Self::Eraser(_) => ToolKind::Eraser,
        }
    }

    fn inner(&self) -> &dyn Tool {
        match self {
            Self::Marker(tool) => tool,
            Self::Brush(tool) => tool,
            Self::Neon(tool) => tool,
            Self::Pipe(tool) => tool,
            Self::Crayon(tool) => tool,
            Self::Eraser(tool) => tool,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Tool {
        match self {
            Self::Marker(tool) => tool,
            Self::Brush(tool) => tool,
            Self::Neon(tool) => tool,
            Self::Pipe(tool) => tool,
            Self::Crayon(tool) => tool,
            Self::Eraser(tool) => tool,
        }
    }
}

impl Tool for ToolType {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn width(&self) -> f32 {
        self.inner().width()
    }

    fn set_width(&mut self, width: f32) -> PaintResult<()> {
        self.inner_mut().set_width(width)
    }

    fn option_keys(&self) -> &'static [&'static str] {
        self.inner().option_keys()
    }

    fn option(&self, key: &str) -> PaintResult<f32> {
        self.inner().option(key)
    }

    fn set_option(&mut self, key: &str, value: f32) -> PaintResult<()> {
        self.inner_mut().set_option(key, value)
    }

    fn update_color(&mut self, color: Color) {
        self.inner_mut().update_color(color)
    }

    fn render_start(&mut self, path: &StrokePath, ctx: &mut RenderContext<'_>) {
        self.inner_mut().render_start(path, ctx)
    }

    fn render(&mut self, path: &StrokePath, ctx: &mut RenderContext<'_>) {
        self.inner_mut().render(path, ctx)
    }

    fn render_stop(&mut self, path: &StrokePath, ctx: &mut RenderContext<'_>) {
        self.inner_mut().render_stop(path, ctx)
    }
}

// Factory function to create a built-in tool with its stock settings
pub fn new_tool(kind: ToolKind, crayon_texture: Option<&Texture>) -> PaintResult<ToolType> {
    Ok(match kind {
        ToolKind::Marker => ToolType::Marker(Marker::default()),
        ToolKind::Brush => ToolType::Brush(Brush::default()),
        ToolKind::Neon => ToolType::Neon(Neon::default()),
        ToolKind::Pipe => ToolType::Pipe(Pipe::default()),
        ToolKind::Eraser => ToolType::Eraser(Eraser::default()),
        ToolKind::Crayon => {
            let texture = match crayon_texture {
                Some(texture) => texture.clone(),
                None => Texture::grain(GRAIN_SEED)?,
            };
            ToolType::Crayon(Crayon::new(texture))
        }
    })
}

/// Rejects NaN and infinities in option and width values
pub(crate) fn finite(tool: &'static str, key: &str, value: f32) -> PaintResult<f32> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(PaintError::InvalidArgument(format!(
            "{}.{} must be finite, got {}",
            tool, key, value
        )))
    }
}

/// Finite width clamped to `0..=MAX_WIDTH`
pub(crate) fn stroke_width(tool: &'static str, value: f32) -> PaintResult<f32> {
    Ok(finite(tool, "width", value)?.clamp(0.0, MAX_WIDTH))
}

pub(crate) fn unknown_option(tool: &'static str, key: &str) -> PaintError {
    log::warn!("Tool {} has no option {:?}", tool, key);
    PaintError::UnknownOption {
        tool,
        key: key.to_owned(),
    }
}

/// Boolean options are exposed as 0 or 1
pub(crate) fn flag(on: bool) -> f32 {
    if on { 1.0 } else { 0.0 }
}

#[cfg(test)]
pub(crate) mod testing {
    use rand::SeedableRng;

    use super::*;
    use crate::input::PointerSample;

    /// Runs one full stroke through `tool`, the way a session would
    pub fn stroke(tool: &mut dyn Tool, surface: &mut RasterSurface, color: Color, points: &[(f32, f32)]) {
        let mut rng = StdRng::seed_from_u64(42);
        let mut ctx = RenderContext {
            surface,
            color,
            rng: &mut rng,
        };
        let Some((&(x, y), rest)) = points.split_first() else {
            return;
        };
        let mut path = StrokePath::new(&PointerSample::new(0, x, y)).unwrap();
        tool.render_start(&path, &mut ctx);
        for &(x, y) in rest {
            path.add_point(&PointerSample::new(0, x, y)).unwrap();
            tool.render(&path, &mut ctx);
        }
        tool.render_stop(&path, &mut ctx);
    }
}

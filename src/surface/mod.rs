//! The raster the tools paint on, plus its snapshot history.

mod glow;
mod history;
mod pixels;
pub mod shape;

use image::RgbaImage;
use tiny_skia::{
    BlendMode, FillRule, FilterQuality, GradientStop, LinearGradient, Paint, Path, Pattern, Pixmap, PixmapPaint,
    SpreadMode, Stroke, Transform,
};

use crate::color::Color;
use crate::error::{PaintError, PaintResult};
use crate::geometry::Point2;

pub use glow::{blur_pixmap, blur_radius};
pub use history::{HistoryBuffer, DEFAULT_DEPTH, MAX_DEPTH};
pub use pixels::{image_to_pixmap, pixmap_to_image};

/// How new paint combines with what is already on the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Composite {
    /// Paint over existing content
    #[default]
    SourceOver,
    /// Remove existing content where the shape covers it
    DestinationOut,
}

impl Composite {
    fn blend_mode(self) -> BlendMode {
        match self {
            Composite::SourceOver => BlendMode::SourceOver,
            Composite::DestinationOut => BlendMode::DestinationOut,
        }
    }
}

/// A blurred copy of each shape drawn beneath it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    pub blur: f32,
    pub color: Color,
}

/// Per-stroke drawing state, set up by a tool when a stroke starts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawStyle {
    pub composite: Composite,
    pub global_alpha: f32,
    /// Fill used by [`RasterSurface::draw_circle`]
    pub fill: Color,
    pub glow: Option<Glow>,
}

impl Default for DrawStyle {
    fn default() -> Self {
        Self {
            composite: Composite::SourceOver,
            global_alpha: 1.0,
            fill: Color::BLACK,
            glow: None,
        }
    }
}

/// Paint source for one fill or stroke
#[derive(Debug, Clone, Copy)]
pub enum FillStyle<'a> {
    Solid(Color),
    /// Color ramp from `from` at `start` to `to` at `end`
    LinearGradient {
        start: Point2,
        end: Point2,
        from: Color,
        to: Color,
    },
    /// Repeating image, placed by `transform`
    Pattern {
        pixmap: &'a Pixmap,
        transform: Transform,
    },
}

impl<'a> FillStyle<'a> {
    fn to_paint(self, global_alpha: f32, blend_mode: BlendMode) -> Paint<'a> {
        let mut paint = Paint {
            anti_alias: true,
            blend_mode,
            ..Default::default()
        };
        let faded = |color: Color| {
            let mut color = color.to_skia();
            color.apply_opacity(global_alpha);
            color
        };

        match self {
            FillStyle::Solid(color) => paint.set_color(faded(color)),
            FillStyle::LinearGradient { start, end, from, to } => {
                let shader = LinearGradient::new(
                    tiny_skia::Point::from_xy(start.x, start.y),
                    tiny_skia::Point::from_xy(end.x, end.y),
                    vec![GradientStop::new(0.0, faded(from)), GradientStop::new(1.0, faded(to))],
                    SpreadMode::Pad,
                    Transform::identity(),
                );
                match shader {
                    Some(shader) => paint.shader = shader,
                    // Zero-length ramp
                    None => paint.set_color(faded(to)),
                }
            }
            FillStyle::Pattern { pixmap, transform } => {
                paint.shader = Pattern::new(
                    pixmap.as_ref(),
                    SpreadMode::Repeat,
                    FilterQuality::Bilinear,
                    global_alpha,
                    transform,
                );
            }
        }
        paint
    }
}

/// Pixel buffer with drawing primitives and bounded undo/redo history.
///
/// Snapshots hold full copies of the premultiplied buffer. Index 0 is the
/// blank surface the history was created with.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    pixmap: Pixmap,
    history: HistoryBuffer<Pixmap>,
    style: DrawStyle,
}

impl RasterSurface {
    /// Blank, fully transparent surface
    pub fn new(width: u32, height: u32, depth: usize) -> PaintResult<Self> {
        let pixmap = Pixmap::new(width, height).ok_or_else(|| {
            PaintError::InvalidArgument(format!("surface must not be empty, got {}x{}", width, height))
        })?;
        if depth > MAX_DEPTH {
            return Err(PaintError::InvalidArgument(format!(
                "history depth must be at most {}, got {}",
                MAX_DEPTH, depth
            )));
        }
        log::debug!("Created {}x{} surface with history depth {}", width, height, depth);
        Ok(Self {
            history: HistoryBuffer::new(pixmap.clone(), depth),
            pixmap,
            style: DrawStyle::default(),
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn history(&self) -> &HistoryBuffer<Pixmap> {
        &self.history
    }

    pub fn style(&self) -> &DrawStyle {
        &self.style
    }

    /// Replaces the whole drawing state
    pub fn set_style(&mut self, style: DrawStyle) {
        self.style = style;
    }

    pub fn set_fill(&mut self, color: Color) {
        self.style.fill = color;
    }

    /// Fills a closed path, drawing its glow first when one is set
    pub fn fill_path(&mut self, path: &Path, fill: &FillStyle<'_>) {
        if let Some(glow) = self.style.glow {
            self.paint_glow(path, glow);
        }
        let paint = fill.to_paint(self.style.global_alpha, self.style.composite.blend_mode());
        self.pixmap
            .fill_path(path, &paint, FillRule::Winding, Transform::identity(), None);
    }

    /// Strokes a path with round joins
    pub fn stroke_path(&mut self, path: &Path, fill: &FillStyle<'_>, width: f32) {
        if !(width > 0.0 && width.is_finite()) {
            return;
        }
        let stroke = Stroke {
            width,
            line_join: tiny_skia::LineJoin::Round,
            ..Default::default()
        };
        if let Some(glow) = self.style.glow {
            if let Some(outline) = path.stroke(&stroke, 1.0) {
                self.paint_glow(&outline, glow);
            }
        }
        let paint = fill.to_paint(self.style.global_alpha, self.style.composite.blend_mode());
        self.pixmap
            .stroke_path(path, &paint, &stroke, Transform::identity(), None);
    }

    /// Fills a circle with the current fill color
    pub fn draw_circle(&mut self, x: f32, y: f32, radius: f32) {
        if let Some(circle) = shape::circle(x, y, radius) {
            let fill = FillStyle::Solid(self.style.fill);
            self.fill_path(&circle, &fill);
        }
    }

    /// Color of the pixel containing `(x, y)`; transparent outside the surface
    pub fn get_color_at(&self, x: f32, y: f32) -> Color {
        if !(x.is_finite() && y.is_finite()) || x < 0.0 || y < 0.0 {
            return Color::TRANSPARENT;
        }
        match self.pixmap.pixel(x.floor() as u32, y.floor() as u32) {
            Some(pixel) => {
                let c = pixel.demultiply();
                Color::from_data([c.red(), c.green(), c.blue(), c.alpha()])
            }
            None => Color::TRANSPARENT,
        }
    }

    fn paint_glow(&mut self, path: &Path, glow: Glow) {
        let radius = glow::blur_radius(glow.blur);
        if radius == 0 || glow.color.alpha() <= 0.0 {
            return;
        }
        let margin = glow::blur_margin(glow.blur) as f32;
        let bounds = path.bounds();
        let left = (bounds.left() - margin).floor().max(0.0);
        let top = (bounds.top() - margin).floor().max(0.0);
        let right = (bounds.right() + margin).ceil().min(self.width() as f32);
        let bottom = (bounds.bottom() + margin).ceil().min(self.height() as f32);
        if right <= left || bottom <= top {
            return;
        }

        let Some(mut scratch) = Pixmap::new((right - left) as u32, (bottom - top) as u32) else {
            return;
        };
        let paint = FillStyle::Solid(glow.color).to_paint(self.style.global_alpha, BlendMode::SourceOver);
        scratch.fill_path(
            path,
            &paint,
            FillRule::Winding,
            Transform::from_translate(-left, -top),
            None,
        );
        glow::blur_pixmap(&mut scratch, radius);

        let paint = PixmapPaint {
            blend_mode: self.style.composite.blend_mode(),
            ..Default::default()
        };
        self.pixmap
            .draw_pixmap(left as i32, top as i32, scratch.as_ref(), &paint, Transform::identity(), None);
    }

    /// Commits the current content as the newest snapshot, dropping any redo branch
    pub fn save_state(&mut self) {
        self.history.push(self.pixmap.clone());
        log::info!(
            "Saved history state {} (oldest {})",
            self.history.index(),
            self.history.min_index()
        );
    }

    /// Restores the snapshot at `index`
    pub fn load_state(&mut self, index: usize) -> PaintResult<()> {
        self.pixmap = self.history.load(index)?.clone();
        log::debug!("Loaded history state {}", index);
        Ok(())
    }

    /// Steps back one snapshot; returns whether anything changed
    pub fn undo(&mut self) -> PaintResult<bool> {
        if !self.can_undo() {
            return Ok(false);
        }
        self.load_state(self.history.index() - 1)?;
        Ok(true)
    }

    /// Steps forward one snapshot; returns whether anything changed
    pub fn redo(&mut self) -> PaintResult<bool> {
        if !self.can_redo() {
            return Ok(false);
        }
        self.load_state(self.history.index() + 1)?;
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Blanks the surface and records that as an undoable state
    pub fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
        self.save_state();
    }

    /// Straight-alpha copy of the current content
    pub fn raster(&self) -> RgbaImage {
        pixmap_to_image(&self.pixmap)
    }

    /// Writes `image` at the origin, replacing the pixels it covers.
    ///
    /// This does not touch the history.
    pub fn set_raster(&mut self, image: &RgbaImage) -> PaintResult<()> {
        let source = image_to_pixmap(image)?;
        if source.width() == self.width() && source.height() == self.height() {
            self.pixmap = source;
        } else {
            log::warn!(
                "Raster is {}x{} but the surface is {}x{}; copying the overlap",
                source.width(),
                source.height(),
                self.width(),
                self.height()
            );
            let paint = PixmapPaint {
                blend_mode: BlendMode::Source,
                ..Default::default()
            };
            self.pixmap
                .draw_pixmap(0, 0, source.as_ref(), &paint, Transform::identity(), None);
        }
        Ok(())
    }

    /// Straight-alpha copy of the snapshot at an absolute history index
    pub fn snapshot(&self, index: usize) -> PaintResult<RgbaImage> {
        Ok(pixmap_to_image(self.history.get(index)?))
    }

    /// Rebuilds the history from persisted images: `undo` oldest first, then
    /// `current`, which also becomes the visible content.
    pub fn restore_history(&mut self, undo: &[RgbaImage], current: &RgbaImage) -> PaintResult<()> {
        let mut snapshots = Vec::with_capacity(undo.len() + 1);
        for image in undo.iter().chain(std::iter::once(current)) {
            let mut pixmap = Pixmap::new(self.width(), self.height()).ok_or_else(|| {
                PaintError::InvalidArgument("surface must not be empty".to_owned())
            })?;
            let source = image_to_pixmap(image)?;
            pixmap.draw_pixmap(
                0,
                0,
                source.as_ref(),
                &PixmapPaint {
                    blend_mode: BlendMode::Source,
                    ..Default::default()
                },
                Transform::identity(),
                None,
            );
            snapshots.push(pixmap);
        }

        let mut snapshots = snapshots.into_iter();
        let Some(first) = snapshots.next() else {
            return Ok(());
        };
        self.history = HistoryBuffer::restore(first, snapshots, self.history.depth());
        self.pixmap = self.history.current().clone();
        log::info!(
            "Restored {} history states, current index {}",
            self.history.len(),
            self.history.index()
        );
        Ok(())
    }
}

use std::collections::{BTreeMap, HashMap};
use std::fs;

use image::RgbaImage;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::color::Color;
use crate::config::{PaintConfig, ToolCard};
use crate::error::{PaintError, PaintResult};
use crate::event::{EventBus, EventHandler, PaintEvent};
use crate::input::{PointerId, PointerSample};
use crate::stroke::StrokePath;
use crate::surface::{RasterSurface, DEFAULT_DEPTH};
use crate::texture::Texture;
use crate::tools::{new_tool, RenderContext, Tool, ToolKind, ToolType};

/// One in-progress stroke
#[derive(Debug)]
struct ActiveStroke {
    path: StrokePath,
    /// Whether this stroke has been added to the active counter yet
    counted: bool,
}

/// Drives strokes from pointer samples onto a surface and commits history.
///
/// Strokes are tracked per pointer id. A history snapshot is committed only
/// once every counted stroke has ended, so several fingers drawing at the
/// same time produce a single undo step.
#[derive(Debug)]
pub struct PaintSession {
    surface: RasterSurface,
    tools: BTreeMap<String, ToolType>,
    tool_name: String,
    color: Color,
    strokes: HashMap<PointerId, ActiveStroke>,
    active: usize,
    blocked: bool,
    rng: StdRng,
    events: EventBus,
}

impl PaintSession {
    /// Session with the built-in tools at their stock settings
    pub fn new(width: u32, height: u32) -> PaintResult<Self> {
        let mut tools = BTreeMap::new();
        for kind in ToolKind::ALL {
            tools.insert(kind.name().to_owned(), new_tool(kind, None)?);
        }
        Ok(Self {
            surface: RasterSurface::new(width, height, DEFAULT_DEPTH)?,
            tools,
            tool_name: ToolKind::Marker.name().to_owned(),
            color: Color::BLACK,
            strokes: HashMap::new(),
            active: 0,
            blocked: false,
            rng: StdRng::from_entropy(),
            events: EventBus::new(),
        })
    }

    /// Session sized, tooled and colored from `config`
    pub fn from_config(config: &PaintConfig) -> PaintResult<Self> {
        let crayon_texture = match &config.crayon_texture {
            Some(path) => Some(Texture::from_png_bytes(&fs::read(path)?)?),
            None => None,
        };

        let mut tools = BTreeMap::new();
        for kind in ToolKind::ALL {
            let mut tool = new_tool(kind, crayon_texture.as_ref())?;
            if let Some(card) = config.tool_card(kind.name()) {
                apply_card(&mut tool, card)?;
            }
            tools.insert(kind.name().to_owned(), tool);
        }

        let mut session = Self {
            surface: RasterSurface::new(config.canvas_width, config.canvas_height, config.history_depth)?,
            tools,
            tool_name: ToolKind::Marker.name().to_owned(),
            color: Color::BLACK,
            strokes: HashMap::new(),
            active: 0,
            blocked: false,
            rng: StdRng::from_entropy(),
            events: EventBus::new(),
        };
        session.set_tool(&config.default_tool)?;
        session.set_color_str(&config.default_color)?;
        log::info!(
            "Created {}x{} session with {} tools",
            config.canvas_width,
            config.canvas_height,
            session.tools.len()
        );
        Ok(session)
    }

    /// Reseeds the random source used by brush wear and crayon jitter
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn surface(&self) -> &RasterSurface {
        &self.surface
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn subscribe(&self, handler: impl EventHandler + 'static) {
        self.events.subscribe(handler);
    }

    /// Begins a stroke for the sample's pointer.
    ///
    /// Ignored while blocked or when the pointer already has a stroke.
    pub fn draw_start(&mut self, sample: &PointerSample) -> PaintResult<()> {
        if self.blocked {
            log::debug!("Surface blocked, ignoring stroke start for pointer {}", sample.id);
            return Ok(());
        }
        if self.strokes.contains_key(&sample.id) {
            return Ok(());
        }

        let path = StrokePath::new(sample)?;
        let tool = current_tool(&mut self.tools, &self.tool_name)?;
        let mut ctx = RenderContext {
            surface: &mut self.surface,
            color: self.color,
            rng: &mut self.rng,
        };
        tool.render_start(&path, &mut ctx);

        self.strokes.insert(sample.id, ActiveStroke { path, counted: false });
        log::debug!("Stroke started for pointer {} with {}", sample.id, self.tool_name);
        self.events.emit(PaintEvent::StrokeStarted { pointer: sample.id });
        Ok(())
    }

    /// Feeds a sample into the pointer's stroke; unknown pointers are ignored
    pub fn draw(&mut self, sample: &PointerSample) -> PaintResult<()> {
        let Some(stroke) = self.strokes.get_mut(&sample.id) else {
            return Ok(());
        };
        if !stroke.counted {
            stroke.counted = true;
            self.active += 1;
        }
        stroke.path.add_point(sample)?;

        let tool = current_tool(&mut self.tools, &self.tool_name)?;
        let mut ctx = RenderContext {
            surface: &mut self.surface,
            color: self.color,
            rng: &mut self.rng,
        };
        tool.render(&stroke.path, &mut ctx);
        Ok(())
    }

    /// Ends the pointer's stroke and commits history when no counted stroke
    /// remains active.
    ///
    /// The stroke is removed even when the final sample is rejected.
    pub fn draw_stop(&mut self, sample: &PointerSample) -> PaintResult<()> {
        let Some(mut stroke) = self.strokes.remove(&sample.id) else {
            return Ok(());
        };
        let added = stroke.path.add_point(sample);
        if stroke.counted {
            self.active = self.active.saturating_sub(1);
        }

        let tool = current_tool(&mut self.tools, &self.tool_name)?;
        let mut ctx = RenderContext {
            surface: &mut self.surface,
            color: self.color,
            rng: &mut self.rng,
        };
        if added.is_ok() {
            tool.render(&stroke.path, &mut ctx);
        }
        tool.render_stop(&stroke.path, &mut ctx);

        log::debug!("Stroke ended for pointer {} ({} still active)", sample.id, self.active);
        self.events.emit(PaintEvent::StrokeEnded { pointer: sample.id });
        if self.active == 0 {
            self.surface.save_state();
            self.emit_history();
        }
        added.map(|_| ())
    }

    /// Number of strokes that have received at least one sample and not ended
    pub fn active_strokes(&self) -> usize {
        self.active
    }

    pub fn is_drawing(&self, pointer: PointerId) -> bool {
        self.strokes.contains_key(&pointer)
    }

    /// Drops every in-progress stroke without committing, for pointers whose
    /// release was never delivered
    pub fn reset_pointers(&mut self) {
        if !self.strokes.is_empty() {
            log::warn!("Dropping {} stuck strokes", self.strokes.len());
        }
        self.strokes.clear();
        self.active = 0;
    }

    pub fn blocked(&self) -> bool {
        self.blocked
    }

    /// While blocked no new strokes start
    pub fn set_blocked(&mut self, blocked: bool) {
        self.blocked = blocked;
    }

    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    pub fn tool_names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(String::as_str)
    }

    pub fn set_tool(&mut self, name: &str) -> PaintResult<()> {
        if !self.tools.contains_key(name) {
            log::warn!("Unknown tool {:?}", name);
            return Err(PaintError::UnknownTool(name.to_owned()));
        }
        if self.tool_name != name {
            self.tool_name = name.to_owned();
            log::info!("Switched to {}", name);
            self.events.emit(PaintEvent::ToolChanged { name: name.to_owned() });
        }
        Ok(())
    }

    /// Adds or replaces a tool under `name`
    pub fn register_tool(&mut self, name: &str, mut tool: ToolType) {
        tool.update_color(self.color);
        self.tools.insert(name.to_owned(), tool);
    }

    pub fn tool(&self) -> PaintResult<&ToolType> {
        self.tools
            .get(&self.tool_name)
            .ok_or_else(|| PaintError::UnknownTool(self.tool_name.clone()))
    }

    pub fn tool_width(&self) -> PaintResult<f32> {
        Ok(self.tool()?.width())
    }

    pub fn set_tool_width(&mut self, width: f32) -> PaintResult<()> {
        current_tool(&mut self.tools, &self.tool_name)?.set_width(width)
    }

    pub fn tool_option(&self, key: &str) -> PaintResult<f32> {
        self.tool()?.option(key)
    }

    pub fn set_tool_option(&mut self, key: &str, value: f32) -> PaintResult<()> {
        current_tool(&mut self.tools, &self.tool_name)?.set_option(key, value)
    }

    /// Applies a tool card's default size and option preset to the named tool
    pub fn apply_tool_card(&mut self, name: &str, card: &ToolCard) -> PaintResult<()> {
        let tool = current_tool(&mut self.tools, name)?;
        apply_card(tool, card)
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        for tool in self.tools.values_mut() {
            tool.update_color(color);
        }
        self.events.emit(PaintEvent::ColorChanged { color });
    }

    /// Parses `rgba(r,g,b,a)`, `rgb(r,g,b)` or `#rrggbb`
    pub fn set_color_str(&mut self, color: &str) -> PaintResult<()> {
        let color = color.parse()?;
        self.set_color(color);
        Ok(())
    }

    pub fn raster(&self) -> RgbaImage {
        self.surface.raster()
    }

    /// Replaces the visible content without recording history
    pub fn set_raster(&mut self, image: &RgbaImage) -> PaintResult<()> {
        self.surface.set_raster(image)
    }

    /// Rebuilds history from persisted images; see [`RasterSurface::restore_history`]
    pub fn restore_history(&mut self, undo: &[RgbaImage], current: &RgbaImage) -> PaintResult<()> {
        self.reset_pointers();
        self.surface.restore_history(undo, current)?;
        self.emit_history();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.surface.clear();
        self.events.emit(PaintEvent::Cleared);
        self.emit_history();
    }

    pub fn undo(&mut self) -> PaintResult<bool> {
        let changed = self.surface.undo()?;
        if changed {
            self.emit_history();
        }
        Ok(changed)
    }

    pub fn redo(&mut self) -> PaintResult<bool> {
        let changed = self.surface.redo()?;
        if changed {
            self.emit_history();
        }
        Ok(changed)
    }

    pub fn can_undo(&self) -> bool {
        self.surface.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.surface.can_redo()
    }

    fn emit_history(&self) {
        self.events.emit(PaintEvent::HistoryChanged {
            index: self.surface.history().index(),
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
        });
    }
}

fn current_tool<'a>(tools: &'a mut BTreeMap<String, ToolType>, name: &str) -> PaintResult<&'a mut ToolType> {
    tools
        .get_mut(name)
        .ok_or_else(|| PaintError::UnknownTool(name.to_owned()))
}

fn apply_card(tool: &mut ToolType, card: &ToolCard) -> PaintResult<()> {
    if let Some(size) = card.default_size() {
        tool.set_width(size)?;
    }
    if let Some((key, value)) = card.default_option() {
        tool.set_option(key, value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventRecorder;

    fn session() -> PaintSession {
        PaintSession::new(100, 100).unwrap().with_seed(7)
    }

    #[test]
    fn test_tap_commits_once() {
        let mut session = session();
        let sample = PointerSample::new(1, 50.0, 50.0);
        session.draw_start(&sample).unwrap();
        session.draw_stop(&sample).unwrap();

        assert_eq!(session.surface().history().index(), 1);
        assert!(session.surface().get_color_at(50.0, 50.0).alpha() > 0.5);
        assert!(!session.is_drawing(1));
    }

    #[test]
    fn test_blocked_session_ignores_strokes() {
        let mut session = session();
        session.set_blocked(true);
        let sample = PointerSample::new(1, 50.0, 50.0);
        session.draw_start(&sample).unwrap();
        session.draw(&sample).unwrap();
        session.draw_stop(&sample).unwrap();
        assert_eq!(session.surface().history().index(), 0);
        assert_eq!(session.surface().get_color_at(50.0, 50.0).alpha(), 0.0);
    }

    #[test]
    fn test_unknown_tool_rejected() {
        let mut session = session();
        assert!(matches!(session.set_tool("chalk"), Err(PaintError::UnknownTool(_))));
        assert_eq!(session.tool_name(), "marker");
    }

    #[test]
    fn test_events_follow_operations() {
        let mut session = session();
        let recorder = EventRecorder::new();
        session.subscribe(recorder.clone());

        session.set_tool("neon").unwrap();
        session.set_color_str("#ff0000").unwrap();
        session.clear();

        assert_eq!(
            recorder.events(),
            vec![
                PaintEvent::ToolChanged { name: "neon".to_owned() },
                PaintEvent::ColorChanged { color: Color::from_rgb(255, 0, 0) },
                PaintEvent::Cleared,
                PaintEvent::HistoryChanged { index: 1, can_undo: true, can_redo: false },
            ]
        );
    }

    #[test]
    fn test_reset_pointers_clears_stuck_strokes() {
        let mut session = session();
        session.draw_start(&PointerSample::new(4, 10.0, 10.0)).unwrap();
        session.draw(&PointerSample::new(4, 20.0, 10.0)).unwrap();
        assert_eq!(session.active_strokes(), 1);

        session.reset_pointers();
        assert_eq!(session.active_strokes(), 0);
        assert!(!session.is_drawing(4));
    }

    #[test]
    fn test_bad_sample_does_not_start_stroke() {
        let mut session = session();
        let result = session.draw_start(&PointerSample::new(1, f32::NAN, 0.0));
        assert!(matches!(result, Err(PaintError::InvalidArgument(_))));
        assert!(!session.is_drawing(1));
    }
}

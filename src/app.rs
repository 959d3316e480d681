use std::path::PathBuf;

use egui::{Color32, ColorImage, Pos2, Rect, TextureHandle, TextureOptions};

use crate::color::Color;
use crate::config::PaintConfig;
use crate::error::PaintResult;
use crate::event::LoggingHandler;
use crate::input::{ButtonMask, InputEvent, InputRouter, PointerId, PointerKind, PointerSample};
use crate::persistence;
use crate::session::PaintSession;
use crate::tools::Tool;

/// Pointer id used for the mouse; touches are offset past it
const MOUSE_POINTER: PointerId = 0;

/// Pointer id for an egui touch; egui touch ids may be hashes
fn touch_pointer(id: egui::TouchId) -> PointerId {
    MOUSE_POINTER.wrapping_add(1).wrapping_add(id.0)
}

/// Native viewer hosting one [`PaintSession`]
pub struct PaintApp {
    session: PaintSession,
    router: InputRouter,
    texture: Option<TextureHandle>,
    dirty: bool,
    /// Directory for the Save and Load buttons
    session_dir: Option<PathBuf>,
    status: Option<String>,
}

impl PaintApp {
    /// Called once before the first frame.
    pub fn new(_cc: &eframe::CreationContext<'_>, config: &PaintConfig, session_dir: Option<PathBuf>) -> PaintResult<Self> {
        let session = PaintSession::from_config(config)?;
        session.subscribe(LoggingHandler);

        let mut app = Self {
            session,
            router: InputRouter::new(),
            texture: None,
            dirty: true,
            session_dir,
            status: None,
        };
        if let Some(dir) = &app.session_dir {
            if dir.join(persistence::MANIFEST_FILE).exists() {
                let result = persistence::load_from_dir(&mut app.session, dir);
                app.report(result.map(|_| "Restored session".to_owned()));
            }
        }
        Ok(app)
    }

    fn report(&mut self, result: PaintResult<String>) {
        self.status = Some(match result {
            Ok(message) => message,
            Err(err) => {
                log::error!("{}", err);
                err.to_string()
            }
        });
        self.dirty = true;
    }

    fn tools_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("tools_panel")
            .resizable(true)
            .default_width(200.0)
            .show(ctx, |ui| {
                ui.heading("Tools");

                let names: Vec<String> = self.session.tool_names().map(str::to_owned).collect();
                let active = self.session.tool_name().to_owned();
                for name in &names {
                    if ui.selectable_label(*name == active, name.as_str()).clicked() {
                        let result = self.session.set_tool(name);
                        self.report(result.map(|_| format!("Tool: {}", name)));
                    }
                }
                ui.separator();

                if let Ok(tool) = self.session.tool() {
                    let mut width = tool.width();
                    let keys = tool.option_keys();
                    if ui.add(egui::Slider::new(&mut width, 1.0..=80.0).text("width")).changed() {
                        let result = self.session.set_tool_width(width);
                        self.report(result.map(|_| format!("Width: {}", width)));
                    }
                    for &key in keys {
                        let Ok(mut value) = self.session.tool_option(key) else {
                            continue;
                        };
                        let range = match key {
                            "fade" => 0.0..=1000.0,
                            "glow" => 0.0..=70.0,
                            "height" => 0.0..=6.0,
                            "density" => 0.25..=3.0,
                            _ => 0.0..=1.0,
                        };
                        if ui.add(egui::Slider::new(&mut value, range).text(key)).changed() {
                            let result = self.session.set_tool_option(key, value);
                            self.report(result.map(|_| format!("{}: {}", key, value)));
                        }
                    }
                }

                let [r, g, b, a] = self.session.color().to_rgba8();
                let shown = Color32::from_rgba_unmultiplied(r, g, b, a);
                let mut color = shown;
                ui.horizontal(|ui| {
                    ui.label("Color:");
                    egui::color_picker::color_edit_button_srgba(
                        ui,
                        &mut color,
                        egui::color_picker::Alpha::OnlyBlend,
                    );
                });
                if color != shown {
                    let [r, g, b, a] = color.to_srgba_unmultiplied();
                    self.session
                        .set_color(Color::from_rgba(r as f32, g as f32, b as f32, a as f32 / 255.0));
                }
                ui.separator();

                ui.horizontal(|ui| {
                    if ui.add_enabled(self.session.can_undo(), egui::Button::new("Undo")).clicked() {
                        let result = self.session.undo();
                        self.report(result.map(|_| "Undo".to_owned()));
                    }
                    if ui.add_enabled(self.session.can_redo(), egui::Button::new("Redo")).clicked() {
                        let result = self.session.redo();
                        self.report(result.map(|_| "Redo".to_owned()));
                    }
                    if ui.button("Clear").clicked() {
                        self.session.clear();
                        self.dirty = true;
                    }
                });

                let mut blocked = self.session.blocked();
                if ui.checkbox(&mut blocked, "Block drawing").changed() {
                    self.session.set_blocked(blocked);
                }

                if let Some(dir) = self.session_dir.clone() {
                    ui.separator();
                    ui.horizontal(|ui| {
                        if ui.button("Save").clicked() {
                            let result = persistence::save_to_dir(&self.session, &dir);
                            self.report(result.map(|m| format!("Saved {} undo states", m.undo.len())));
                        }
                        if ui.button("Load").clicked() {
                            let result = persistence::load_from_dir(&mut self.session, &dir);
                            self.router.reset(&mut self.session);
                            self.report(result.map(|_| "Loaded".to_owned()));
                        }
                    });
                }

                if let Some(status) = &self.status {
                    ui.separator();
                    ui.label(status.as_str());
                }
            });
    }

    /// Translates this frame's egui events into router events
    fn route_input(&mut self, ctx: &egui::Context, canvas: Rect) {
        let (events, touching) = ctx.input(|i| (i.events.clone(), i.any_touches()));
        let local = |pos: Pos2| (pos.x - canvas.min.x, pos.y - canvas.min.y);

        for event in events {
            let routed = match event {
                egui::Event::Touch { id, phase, pos, .. } => {
                    let (x, y) = local(pos);
                    let sample = PointerSample::new(touch_pointer(id), x, y);
                    match phase {
                        egui::TouchPhase::Start if canvas.contains(pos) => Some(InputEvent::PointerDown {
                            sample,
                            kind: PointerKind::Touch,
                            buttons: ButtonMask::NONE,
                        }),
                        egui::TouchPhase::Move => Some(InputEvent::PointerMove { sample }),
                        egui::TouchPhase::End | egui::TouchPhase::Cancel => Some(InputEvent::PointerUp { sample }),
                        _ => None,
                    }
                }
                // egui mirrors the first touch as a mouse pointer
                _ if touching => None,
                egui::Event::PointerButton { pos, button, pressed, .. } => {
                    let (x, y) = local(pos);
                    let sample = PointerSample::new(MOUSE_POINTER, x, y);
                    if pressed && canvas.contains(pos) {
                        let buttons = match button {
                            egui::PointerButton::Primary => ButtonMask::LEFT,
                            egui::PointerButton::Secondary => ButtonMask::RIGHT,
                            _ => ButtonMask::MIDDLE,
                        };
                        Some(InputEvent::PointerDown {
                            sample,
                            kind: PointerKind::Mouse,
                            buttons,
                        })
                    } else if !pressed {
                        Some(InputEvent::PointerUp { sample })
                    } else {
                        None
                    }
                }
                egui::Event::PointerMoved(pos) => {
                    let (x, y) = local(pos);
                    let sample = PointerSample::new(MOUSE_POINTER, x, y);
                    if canvas.contains(pos) {
                        Some(InputEvent::PointerMove { sample })
                    } else {
                        Some(InputEvent::PointerLeave { sample })
                    }
                }
                egui::Event::PointerGone => Some(InputEvent::PointerLeave {
                    sample: PointerSample::new(MOUSE_POINTER, -1.0, -1.0),
                }),
                _ => None,
            };

            if let Some(routed) = routed {
                if let Err(err) = self.router.handle(&mut self.session, &routed) {
                    log::warn!("Dropped pointer event: {}", err);
                }
                self.dirty = true;
            }
        }
    }

    /// Uploads the raster when it changed since the last frame
    fn refresh_texture(&mut self, ctx: &egui::Context) -> Option<egui::TextureId> {
        if self.dirty || self.texture.is_none() {
            let raster = self.session.raster();
            let image = ColorImage::from_rgba_unmultiplied(
                [raster.width() as usize, raster.height() as usize],
                raster.as_raw(),
            );
            if let Some(texture) = &mut self.texture {
                texture.set(image, TextureOptions::NEAREST);
            } else {
                self.texture = Some(ctx.load_texture("canvas", image, TextureOptions::NEAREST));
            }
            self.dirty = false;
        }
        self.texture.as_ref().map(TextureHandle::id)
    }
}

impl eframe::App for PaintApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::Z)) {
            let result = if ctx.input(|i| i.modifiers.shift) {
                self.session.redo()
            } else {
                self.session.undo()
            };
            self.report(result.map(|changed| format!("History moved: {}", changed)));
        }

        self.tools_panel(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            let size = egui::vec2(
                self.session.surface().width() as f32,
                self.session.surface().height() as f32,
            );
            let (response, painter) = ui.allocate_painter(size, egui::Sense::drag());
            let canvas = response.rect;

            self.route_input(ctx, canvas);

            painter.rect_filled(canvas, 0.0, Color32::WHITE);
            if let Some(texture) = self.refresh_texture(ctx) {
                painter.image(
                    texture,
                    canvas,
                    Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                    Color32::WHITE,
                );
            }
        });
    }
}

#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use std::path::PathBuf;

use paint_play::{PaintApp, PaintConfig};

// Usage: paint_play [config.json] [session-dir]
fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => PaintConfig::load(&path).unwrap_or_else(|err| {
            log::error!("Failed to load config {}: {}, using defaults", path, err);
            PaintConfig::default()
        }),
        None => PaintConfig::default(),
    };
    let session_dir = args.next().map(PathBuf::from);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.canvas_width as f32 + 240.0, config.canvas_height as f32 + 40.0])
            .with_min_inner_size([300.0, 220.0]),
        ..Default::default()
    };
    eframe::run_native(
        "paint_play",
        native_options,
        Box::new(move |cc| Ok(Box::new(PaintApp::new(cc, &config, session_dir)?))),
    )
}

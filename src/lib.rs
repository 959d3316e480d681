#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod color;
pub mod config;
pub mod error;
pub mod event;
pub mod geometry;
pub mod input;
pub mod persistence;
pub mod session;
pub mod stroke;
pub mod surface;
pub mod texture;
pub mod tools;

pub use app::PaintApp;
pub use color::Color;
pub use config::{PaintConfig, ToolCard};
pub use error::{PaintError, PaintResult};
pub use event::{EventBus, EventHandler, PaintEvent};
pub use input::{InputEvent, InputRouter, PointerKind, PointerSample};
pub use session::PaintSession;
pub use stroke::StrokePath;
pub use surface::{HistoryBuffer, RasterSurface};
pub use texture::Texture;
pub use tools::{Tool, ToolKind, ToolType};

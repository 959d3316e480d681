//! Saving and restoring a session's raster and undo history as PNG blobs.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::imageops::{self, FilterType};
use image::{ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::{PaintError, PaintResult};
use crate::session::PaintSession;

pub const CANVAS_BLOB: &str = "canvas";
pub const MANIFEST_FILE: &str = "manifest.json";

/// Name of the undo blob at `position` in the exported history, oldest first
pub fn undo_blob_name(position: usize) -> String {
    format!("undoBlob-{}", position)
}

/// A session's visible raster plus every retained undo state, PNG encoded
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotExport {
    pub canvas: Vec<u8>,
    /// `(name, png)` pairs, oldest first
    pub undo: Vec<(String, Vec<u8>)>,
}

/// Index of the files written by [`save_to_dir`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub version: String,
    pub width: u32,
    pub height: u32,
    pub canvas: String,
    pub undo: Vec<String>,
}

pub fn encode_png(image: &RgbaImage) -> PaintResult<Vec<u8>> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

pub fn decode_png(bytes: &[u8]) -> PaintResult<RgbaImage> {
    Ok(image::load_from_memory_with_format(bytes, ImageFormat::Png)?.to_rgba8())
}

/// Exports the current raster and the states undo can reach
pub fn export_snapshots(session: &PaintSession) -> PaintResult<SnapshotExport> {
    let surface = session.surface();
    let min_index = surface.history().min_index();

    let mut undo = Vec::new();
    for (index, _) in surface.history().undo_snapshots() {
        let image = surface.snapshot(index)?;
        undo.push((undo_blob_name(index - min_index), encode_png(&image)?));
    }
    log::debug!("Exported canvas and {} undo states", undo.len());

    Ok(SnapshotExport {
        canvas: encode_png(&session.raster())?,
        undo,
    })
}

/// Restores history from PNG blobs: the undo states in order, then the
/// canvas as the current state. The session's depth still applies.
pub fn import_snapshots(session: &mut PaintSession, canvas_png: &[u8], undo_pngs: &[Vec<u8>]) -> PaintResult<()> {
    let canvas = decode_png(canvas_png)?;
    let undo = undo_pngs
        .iter()
        .map(|png| decode_png(png))
        .collect::<PaintResult<Vec<_>>>()?;
    session.restore_history(&undo, &canvas)?;
    log::info!("Imported canvas and {} undo states", undo.len());
    Ok(())
}

/// Writes `canvas.png`, one `undoBlob-N.png` per undo state and a manifest
pub fn save_to_dir(session: &PaintSession, dir: impl AsRef<Path>) -> PaintResult<Manifest> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let export = export_snapshots(session)?;
    fs::write(dir.join(format!("{}.png", CANVAS_BLOB)), &export.canvas)?;
    for (name, png) in &export.undo {
        fs::write(dir.join(format!("{}.png", name)), png)?;
    }

    let manifest = Manifest {
        version: env!("CARGO_PKG_VERSION").to_owned(),
        width: session.surface().width(),
        height: session.surface().height(),
        canvas: CANVAS_BLOB.to_owned(),
        undo: export.undo.into_iter().map(|(name, _)| name).collect(),
    };
    fs::write(dir.join(MANIFEST_FILE), serde_json::to_string_pretty(&manifest)?)?;
    log::info!("Saved session to {}", dir.display());
    Ok(manifest)
}

/// Restores a session saved with [`save_to_dir`]
pub fn load_from_dir(session: &mut PaintSession, dir: impl AsRef<Path>) -> PaintResult<Manifest> {
    let dir = dir.as_ref();
    let manifest: Manifest = serde_json::from_str(&fs::read_to_string(dir.join(MANIFEST_FILE))?)?;
    if manifest.version != env!("CARGO_PKG_VERSION") {
        log::warn!(
            "Session was saved by version {}, this is {}",
            manifest.version,
            env!("CARGO_PKG_VERSION")
        );
    }

    let canvas = fs::read(dir.join(format!("{}.png", manifest.canvas)))?;
    let undo = manifest
        .undo
        .iter()
        .map(|name| fs::read(dir.join(format!("{}.png", name))))
        .collect::<Result<Vec<_>, _>>()?;
    import_snapshots(session, &canvas, &undo)?;
    Ok(manifest)
}

/// The current raster resized to `width` x `height`, PNG encoded
pub fn scaled_png(session: &PaintSession, width: u32, height: u32) -> PaintResult<Vec<u8>> {
    if width == 0 || height == 0 {
        return Err(PaintError::InvalidArgument(format!(
            "scaled size must not be empty, got {}x{}",
            width, height
        )));
    }
    let scaled = imageops::resize(&session.raster(), width, height, FilterType::Triangle);
    encode_png(&scaled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_names_start_at_zero() {
        assert_eq!(undo_blob_name(0), "undoBlob-0");
        assert_eq!(undo_blob_name(12), "undoBlob-12");
    }

    #[test]
    fn test_scaled_png_has_requested_size() {
        let session = PaintSession::new(40, 20).unwrap();
        let png = scaled_png(&session, 10, 5).unwrap();
        let image = decode_png(&png).unwrap();
        assert_eq!(image.dimensions(), (10, 5));
        assert!(scaled_png(&session, 0, 5).is_err());
    }
}

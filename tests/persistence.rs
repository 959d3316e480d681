use paint_play::input::PointerSample;
use paint_play::persistence::{self, undo_blob_name};
use paint_play::PaintSession;

fn dot(session: &mut PaintSession, x: f32, y: f32) {
    let sample = PointerSample::new(1, x, y);
    session.draw_start(&sample).unwrap();
    session.draw_stop(&sample).unwrap();
}

#[test]
fn test_export_names_undo_states_oldest_first() {
    let mut session = PaintSession::new(32, 32).unwrap();
    for i in 0..3 {
        dot(&mut session, 5.0 + i as f32 * 10.0, 16.0);
    }
    session.undo().unwrap();

    let export = persistence::export_snapshots(&session).unwrap();
    let names: Vec<&str> = export.undo.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["undoBlob-0", "undoBlob-1"]);
    assert_eq!(persistence::decode_png(&export.canvas).unwrap(), session.raster());
}

#[test]
fn test_import_rebuilds_history() {
    let mut source = PaintSession::new(32, 32).unwrap();
    dot(&mut source, 8.0, 8.0);
    dot(&mut source, 24.0, 24.0);
    let export = persistence::export_snapshots(&source).unwrap();
    let undo: Vec<Vec<u8>> = export.undo.into_iter().map(|(_, png)| png).collect();

    let mut restored = PaintSession::new(32, 32).unwrap();
    persistence::import_snapshots(&mut restored, &export.canvas, &undo).unwrap();

    assert_eq!(restored.raster(), source.raster());
    assert_eq!(restored.surface().history().index(), 2);
    restored.undo().unwrap();
    source.undo().unwrap();
    assert_eq!(restored.raster(), source.raster());
}

#[test]
fn test_save_and_load_directory() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = PaintSession::new(40, 30).unwrap();
    dot(&mut session, 10.0, 10.0);
    dot(&mut session, 30.0, 20.0);

    let manifest = persistence::save_to_dir(&session, dir.path()).unwrap();
    assert_eq!(manifest.undo, vec![undo_blob_name(0), undo_blob_name(1)]);
    assert!(dir.path().join("canvas.png").exists());
    assert!(dir.path().join("undoBlob-1.png").exists());
    assert!(dir.path().join("manifest.json").exists());

    let mut loaded = PaintSession::new(40, 30).unwrap();
    let read = persistence::load_from_dir(&mut loaded, dir.path()).unwrap();
    assert_eq!(read, manifest);
    assert_eq!(loaded.raster(), session.raster());
    assert!(loaded.can_undo());
}

#[test]
fn test_missing_directory_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = PaintSession::new(8, 8).unwrap();
    let result = persistence::load_from_dir(&mut session, dir.path().join("nope"));
    assert!(matches!(result, Err(paint_play::PaintError::Io(_))));
}

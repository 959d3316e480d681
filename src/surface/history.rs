use std::collections::VecDeque;

use crate::error::{PaintError, PaintResult};

/// Default number of snapshots kept behind the oldest one
pub const DEFAULT_DEPTH: usize = 10;

/// Deepest history a surface accepts; every snapshot is a full raster
pub const MAX_DEPTH: usize = 1000;

/// Bounded, chronologically ordered snapshot history for undo/redo.
///
/// Cursors are absolute and only ever grow: `min_index` is the oldest
/// retained snapshot, `index` the current one and `max_index` the newest.
/// `min_index <= index <= max_index` and `max_index - min_index <= depth`
/// hold after every operation.
#[derive(Debug, Clone)]
pub struct HistoryBuffer<T> {
    /// Snapshots for `min_index..=max_index`, oldest first
    snapshots: VecDeque<T>,
    min_index: usize,
    index: usize,
    max_index: usize,
    depth: usize,
}

impl<T> HistoryBuffer<T> {
    /// Creates a history holding `initial` at index 0
    pub fn new(initial: T, depth: usize) -> Self {
        let mut snapshots = VecDeque::new();
        snapshots.push_back(initial);
        Self {
            snapshots,
            min_index: 0,
            index: 0,
            max_index: 0,
            depth,
        }
    }

    /// Rebuilds a history from persisted snapshots, oldest first; the last
    /// one becomes current. Snapshots beyond `depth` are evicted from the front.
    pub fn restore(initial: T, later: impl IntoIterator<Item = T>, depth: usize) -> Self {
        let mut history = Self::new(initial, depth);
        for snapshot in later {
            history.push(snapshot);
        }
        history
    }

    /// Commits a snapshot after the current index.
    ///
    /// Every snapshot after the current index (the redo branch) is dropped,
    /// and the oldest snapshot is evicted once the span exceeds `depth`.
    pub fn push(&mut self, snapshot: T) {
        self.snapshots.truncate(self.index - self.min_index + 1);
        self.snapshots.push_back(snapshot);
        self.index += 1;
        self.max_index = self.index;

        while self.max_index - self.min_index > self.depth {
            self.snapshots.pop_front();
            self.min_index += 1;
            log::debug!("History evicted snapshot {}", self.min_index - 1);
        }
    }

    /// Moves the cursor to `index` and returns that snapshot
    pub fn load(&mut self, index: usize) -> PaintResult<&T> {
        self.check_bounds(index)?;
        self.index = index;
        Ok(&self.snapshots[index - self.min_index])
    }

    /// Snapshot at an absolute index without moving the cursor
    pub fn get(&self, index: usize) -> PaintResult<&T> {
        self.check_bounds(index)?;
        Ok(&self.snapshots[index - self.min_index])
    }

    pub fn current(&self) -> &T {
        &self.snapshots[self.index - self.min_index]
    }

    /// Steps back one snapshot, if possible
    pub fn undo(&mut self) -> Option<&T> {
        if !self.can_undo() {
            return None;
        }
        self.load(self.index - 1).ok()
    }

    /// Steps forward one snapshot, if possible
    pub fn redo(&mut self) -> Option<&T> {
        if !self.can_redo() {
            return None;
        }
        self.load(self.index + 1).ok()
    }

    pub fn can_undo(&self) -> bool {
        self.index > self.min_index
    }

    pub fn can_redo(&self) -> bool {
        self.index < self.max_index
    }

    pub fn min_index(&self) -> usize {
        self.min_index
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn max_index(&self) -> usize {
        self.max_index
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of retained snapshots
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Snapshots strictly before the current one, oldest first, with their
    /// absolute indices
    pub fn undo_snapshots(&self) -> impl Iterator<Item = (usize, &T)> {
        self.snapshots
            .iter()
            .take(self.index - self.min_index)
            .enumerate()
            .map(move |(offset, snapshot)| (self.min_index + offset, snapshot))
    }

    fn check_bounds(&self, index: usize) -> PaintResult<()> {
        if index < self.min_index || index > self.max_index {
            log::error!(
                "History index {} outside [{}, {}]",
                index,
                self.min_index,
                self.max_index
            );
            return Err(PaintError::OutOfBounds {
                index,
                min: self.min_index,
                max: self.max_index,
            });
        }
        Ok(())
    }
}

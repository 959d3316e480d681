use crate::color::Color;
use crate::input::PointerId;

/// Notifications emitted by a paint session
#[derive(Debug, Clone, PartialEq)]
pub enum PaintEvent {
    StrokeStarted {
        pointer: PointerId,
    },
    StrokeEnded {
        pointer: PointerId,
    },
    /// A snapshot was committed or the history cursor moved
    HistoryChanged {
        index: usize,
        can_undo: bool,
        can_redo: bool,
    },
    ToolChanged {
        name: String,
    },
    ColorChanged {
        color: Color,
    },
    Cleared,
}

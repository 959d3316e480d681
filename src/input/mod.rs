//! Pointer samples and the discrete events an input source delivers.

use crate::geometry::Vector2;

mod router;
pub use router::InputRouter;

/// Identifier of one pointer (finger, pen, mouse) as reported by the input source
pub type PointerId = u64;

/// Kind of device that produced an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    Touch,
    Pen,
    Mouse,
}

/// Mouse buttons reported alongside mouse events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonMask(pub u8);

impl ButtonMask {
    pub const NONE: Self = Self(0);
    pub const LEFT: Self = Self(1);
    pub const RIGHT: Self = Self(2);
    pub const MIDDLE: Self = Self(4);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }
}

/// One pointer position in surface-local coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub id: PointerId,
    pub x: f32,
    pub y: f32,
    /// Width of the touch contact box, when the device reports one
    pub contact_width: Option<f32>,
    /// Height of the touch contact box, when the device reports one
    pub contact_height: Option<f32>,
}

impl PointerSample {
    pub fn new(id: PointerId, x: f32, y: f32) -> Self {
        Self {
            id,
            x,
            y,
            contact_width: None,
            contact_height: None,
        }
    }

    pub fn with_contact(mut self, width: f32, height: f32) -> Self {
        self.contact_width = Some(width);
        self.contact_height = Some(height);
        self
    }

    /// Contact box as a vector, present only when both dimensions are
    /// reported and non-zero. Devices report 0 when they cannot measure.
    pub fn contact_box(&self) -> Option<Vector2> {
        match (self.contact_width, self.contact_height) {
            (Some(w), Some(h)) if w > 0.0 && h > 0.0 && w.is_finite() && h.is_finite() => {
                Some(Vector2::new(w, h))
            }
            _ => None,
        }
    }
}

/// Discrete pointer events delivered by the input source
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Contact began (or the pointer entered the surface)
    PointerDown {
        sample: PointerSample,
        kind: PointerKind,
        buttons: ButtonMask,
    },
    PointerMove {
        sample: PointerSample,
    },
    /// Contact ended
    PointerUp {
        sample: PointerSample,
    },
    /// The pointer left the surface; handled as the end of contact
    PointerLeave {
        sample: PointerSample,
    },
}

impl InputEvent {
    pub fn sample(&self) -> &PointerSample {
        match self {
            InputEvent::PointerDown { sample, .. }
            | InputEvent::PointerMove { sample }
            | InputEvent::PointerUp { sample }
            | InputEvent::PointerLeave { sample } => sample,
        }
    }
}

use std::collections::HashSet;

use crate::error::PaintResult;
use crate::input::{ButtonMask, InputEvent, PointerId, PointerKind};
use crate::session::PaintSession;

/// Routes raw pointer events to a [`PaintSession`].
///
/// Strokes start for touch and pen contacts and for the left mouse button
/// only. Nothing is forwarded while the session is blocked, and leaving the
/// surface ends the stroke like a release.
#[derive(Debug, Default)]
pub struct InputRouter {
    down: HashSet<PointerId>,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward one event to the session
    pub fn handle(&mut self, session: &mut PaintSession, event: &InputEvent) -> PaintResult<()> {
        let sample = event.sample();
        let pressed = self.down.contains(&sample.id);

        match *event {
            InputEvent::PointerDown { kind, buttons, .. } => {
                let may_start = kind != PointerKind::Mouse || buttons.contains(ButtonMask::LEFT);
                if !pressed && may_start && !session.blocked() {
                    session.draw_start(sample)?;
                    self.down.insert(sample.id);
                }
            }
            InputEvent::PointerMove { .. } => {
                if pressed && !session.blocked() {
                    session.draw(sample)?;
                }
            }
            InputEvent::PointerUp { .. } | InputEvent::PointerLeave { .. } => {
                if pressed && !session.blocked() {
                    self.down.remove(&sample.id);
                    session.draw_stop(sample)?;
                }
            }
        }
        Ok(())
    }

    pub fn is_down(&self, pointer: PointerId) -> bool {
        self.down.contains(&pointer)
    }

    /// Forgets every pressed pointer and drops the session's open strokes
    pub fn reset(&mut self, session: &mut PaintSession) {
        self.down.clear();
        session.reset_pointers();
    }
}

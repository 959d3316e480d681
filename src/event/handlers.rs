use std::cell::RefCell;
use std::rc::Rc;

use crate::event::{EventHandler, PaintEvent};

/// Writes every event to the log at debug level
#[derive(Debug, Default)]
pub struct LoggingHandler;

impl EventHandler for LoggingHandler {
    fn handle_event(&mut self, event: &PaintEvent) {
        log::debug!("Paint event: {:?}", event);
    }
}

/// Keeps a shared list of every received event.
///
/// Clones share the same list, so one clone can be subscribed while the
/// other is read back.
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    events: Rc<RefCell<Vec<PaintEvent>>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PaintEvent> {
        self.events.borrow().clone()
    }

    /// Number of recorded events matching `predicate`
    pub fn count(&self, predicate: impl Fn(&PaintEvent) -> bool) -> usize {
        self.events.borrow().iter().filter(|e| predicate(e)).count()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl EventHandler for EventRecorder {
    fn handle_event(&mut self, event: &PaintEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

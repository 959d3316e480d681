mod bus;
mod events;
mod handlers;

pub use bus::EventBus;
pub use events::PaintEvent;
pub use handlers::{EventRecorder, LoggingHandler};

/// Receives every event emitted on an [`EventBus`]
pub trait EventHandler {
    fn handle_event(&mut self, event: &PaintEvent);
}

impl<F> EventHandler for F
where
    F: FnMut(&PaintEvent),
{
    fn handle_event(&mut self, event: &PaintEvent) {
        self(event)
    }
}

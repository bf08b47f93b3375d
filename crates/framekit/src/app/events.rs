use std::collections::VecDeque;

use super::input::{Key, MouseButton};
use crate::FrameworkError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameEvent {
    CloseRequested,
    Tick,
    KeyDown(Key),
    KeyUp(Key),
    MouseMoved { x: i32, y: i32, dx: i32, dy: i32 },
    MouseButtonDown(MouseButton),
    MouseButtonUp(MouseButton),
    FocusChanged(bool),
}

pub trait EventSource {
    fn wait_event(&mut self) -> Result<FrameEvent, FrameworkError>;

    fn is_empty(&mut self) -> bool;
}

/// Pre-filled event queue. Once drained it reports `CloseRequested`, so loops always end.
#[derive(Debug, Clone, Default)]
pub struct QueuedEventSource {
    events: VecDeque<FrameEvent>,
}

impl QueuedEventSource {
    pub fn new(events: impl IntoIterator<Item = FrameEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    pub fn push(&mut self, event: FrameEvent) {
        self.events.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl EventSource for QueuedEventSource {
    fn wait_event(&mut self) -> Result<FrameEvent, FrameworkError> {
        Ok(self
            .events
            .pop_front()
            .unwrap_or(FrameEvent::CloseRequested))
    }

    fn is_empty(&mut self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queued_source_yields_in_order_then_close() {
        let mut source = QueuedEventSource::new([FrameEvent::Tick, FrameEvent::KeyDown(Key::A)]);
        assert_eq!(source.len(), 2);
        assert_eq!(source.wait_event().expect("event"), FrameEvent::Tick);
        assert!(!source.is_empty());
        assert_eq!(source.wait_event().expect("event"), FrameEvent::KeyDown(Key::A));
        assert!(source.is_empty());
        assert_eq!(
            source.wait_event().expect("event"),
            FrameEvent::CloseRequested
        );
    }
}

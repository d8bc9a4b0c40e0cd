//! Local event bus carrying orchestrator events into the TUI.

use log::debug;
use pantry_rs_core::EventSink;
use pantry_rs_protocol::EventMsg;
use tokio::sync::broadcast;

/// Broadcast-backed event bus for the embedded orchestrator.
#[derive(Clone, Debug)]
pub struct EventBus {
    sender: broadcast::Sender<EventMsg>,
}

impl EventBus {
    /// Create a new event bus with the given channel buffer size.
    pub fn new(buffer: usize) -> Self {
        let (sender, _) = broadcast::channel(buffer);
        debug!("tui event bus initialized (buffer={})", buffer);
        Self { sender }
    }

    /// Subscribe to the event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<EventMsg> {
        self.sender.subscribe()
    }
}

impl EventSink for EventBus {
    fn emit(&self, event: EventMsg) {
        let _ = self.sender.send(event);
    }
}

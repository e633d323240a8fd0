use std::sync::RwLock;

use tracing::{error, info, warn};

use epm_types::{StatusEvent, StatusKind};

/// Receives status notifications. Emitting never blocks or fails.
pub trait StatusSink: Send + Sync {
    fn emit(&self, event: StatusEvent);
}

/// Forwards events to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingStatusSink;

impl StatusSink for TracingStatusSink {
    fn emit(&self, event: StatusEvent) {
        match event.kind {
            StatusKind::Error => error!(key = %event.key, "{}", event.title),
            StatusKind::Warning => warn!(key = %event.key, "{}", event.title),
            StatusKind::None => {}
            _ => info!(key = %event.key, "{}", event.title),
        }
    }
}

/// Keeps every event in order.
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: RwLock<Vec<StatusEvent>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<StatusEvent> {
        self.events.read().expect("lock poisoned").clone()
    }

    pub fn last(&self) -> Option<StatusEvent> {
        self.events.read().expect("lock poisoned").last().cloned()
    }

    pub fn clear(&self) {
        self.events.write().expect("lock poisoned").clear();
    }
}

impl StatusSink for CollectingSink {
    fn emit(&self, event: StatusEvent) {
        self.events.write().expect("lock poisoned").push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_in_order() {
        let sink = CollectingSink::new();
        sink.emit(StatusEvent::generating());
        sink.emit(StatusEvent::failed("boom"));
        let keys: Vec<_> = sink.events().into_iter().map(|e| e.key).collect();
        assert_eq!(keys, ["loading", "failed"]);
        assert_eq!(sink.last().unwrap().title, "boom");

        sink.clear();
        assert!(sink.last().is_none());
    }

    #[test]
    fn tracing_sink_accepts_every_kind() {
        let sink = TracingStatusSink;
        sink.emit(StatusEvent::compiled());
        sink.emit(StatusEvent::failed("x"));
        sink.emit(StatusEvent::cleared());
    }
}

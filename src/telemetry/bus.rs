use super::event::TelemetryEvent;
use tokio::sync::broadcast;

const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Best-effort fan-out of [`TelemetryEvent`]s. Emitting with no subscribers
/// is a no-op; a lagging subscriber drops the oldest events rather than
/// blocking emitters.
#[derive(Clone)]
pub struct TelemetryBus {
    sender: broadcast::Sender<TelemetryEvent>,
}

impl TelemetryBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(DEFAULT_CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TelemetryEvent> {
        self.sender.subscribe()
    }

    pub fn emit(&self, event: TelemetryEvent) {
        let _ = self.sender.send(event);
    }
}

impl Default for TelemetryBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_with_no_subscribers_does_not_panic() {
        let bus = TelemetryBus::new();
        bus.emit(TelemetryEvent::RequestRejected {
            reason: "rate_limited",
            status: 429,
        });
    }

    #[tokio::test]
    async fn subscriber_receives_emitted_event() {
        let bus = TelemetryBus::new();
        let mut rx = bus.subscribe();
        bus.emit(TelemetryEvent::PluginHookFailed {
            plugin: "auth".to_string(),
            hook: "before_request",
        });
        let event = rx.recv().await.unwrap();
        assert!(matches!(event, TelemetryEvent::PluginHookFailed { hook: "before_request", .. }));
    }

    #[tokio::test]
    async fn each_subscriber_gets_its_own_copy() {
        let bus = TelemetryBus::new();
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();
        bus.emit(TelemetryEvent::RequestRejected {
            reason: "payload_too_large",
            status: 413,
        });
        assert!(matches!(a.recv().await.unwrap(), TelemetryEvent::RequestRejected { status: 413, .. }));
        assert!(matches!(b.recv().await.unwrap(), TelemetryEvent::RequestRejected { status: 413, .. }));
    }
}

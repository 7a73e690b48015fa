use crate::telemetry::{TelemetryBus, TelemetryEvent};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleStage {
    Admission,
    PostRouting,
    PostHandler,
    ResponseEnd,
}

impl LifecycleStage {
    fn label(self) -> &'static str {
        match self {
            LifecycleStage::Admission => "admission",
            LifecycleStage::PostRouting => "post_routing",
            LifecycleStage::PostHandler => "post_handler",
            LifecycleStage::ResponseEnd => "response_end",
        }
    }
}

/// Per-request stage timestamps. Each `mark` records elapsed time since the
/// previous stage (or request start, for `Admission`) and emits a telemetry
/// event if it crossed the configured warning threshold; a slow stage never
/// fails the request.
pub struct LifecycleTracker {
    started_at: Instant,
    last_stage_at: Instant,
    warning_threshold: Duration,
}

impl LifecycleTracker {
    pub fn start(warning_threshold: Duration) -> Self {
        let now = Instant::now();
        Self {
            started_at: now,
            last_stage_at: now,
            warning_threshold,
        }
    }

    pub fn mark(&mut self, stage: LifecycleStage, bus: &TelemetryBus) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_stage_at);
        self.last_stage_at = now;
        if elapsed > self.warning_threshold {
            bus.emit(TelemetryEvent::StageThresholdExceeded {
                stage: stage.label(),
                elapsed,
                threshold: self.warning_threshold,
            });
        }
    }

    pub fn total_elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

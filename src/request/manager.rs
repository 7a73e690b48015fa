use super::concurrency::{ConcurrencySlot, ConcurrencyTracker};
use super::config::RequestManagerConfig;
use super::error::{RejectionReason, RequestError, TIMEOUT_STATUS};
use super::lifecycle::{LifecycleStage, LifecycleTracker};
use super::network_quality::NetworkQualityGate;
use crate::telemetry::{TelemetryBus, TelemetryEvent};
use std::future::Future;
use std::net::IpAddr;
use std::time::Duration;

/// Gates request admission (concurrency caps, payload/URL limits, network
/// quality), tracks per-request lifecycle timing, and wraps handler
/// execution in a per-route timeout.
pub struct RequestManager {
    config: RequestManagerConfig,
    concurrency: ConcurrencyTracker,
    network_gate: NetworkQualityGate,
    telemetry: TelemetryBus,
}

pub struct AdmittedRequest {
    pub slot: ConcurrencySlot,
    pub lifecycle: LifecycleTracker,
}

impl RequestManager {
    pub fn new(config: RequestManagerConfig) -> Self {
        let concurrency = ConcurrencyTracker::new(config.max_concurrent_total, config.max_concurrent_per_ip);
        let network_gate = NetworkQualityGate::new(config.network_quality.clone());
        Self {
            config,
            concurrency,
            network_gate,
            telemetry: TelemetryBus::new(),
        }
    }

    pub fn telemetry(&self) -> TelemetryBus {
        self.telemetry.clone()
    }

    pub fn validate_envelope(&self, url_len: usize, body_len: usize) -> Result<(), RejectionReason> {
        if url_len > self.config.max_url_length {
            return Err(RejectionReason::UrlTooLong);
        }
        if body_len > self.config.max_body_bytes {
            return Err(RejectionReason::PayloadTooLarge);
        }
        Ok(())
    }

    /// Admits a request from `remote_ip`, enforcing concurrency caps and the
    /// network-quality gate. On success returns a guard that releases the
    /// concurrency slot on drop and (if lifecycle tracking is enabled) a
    /// lifecycle tracker primed at the `Admission` stage.
    pub fn admit(&self, remote_ip: IpAddr) -> Result<AdmittedRequest, RequestError> {
        if self.network_gate.should_reject(remote_ip) {
            self.emit_rejection(RejectionReason::PoorConnection);
            return Err(RequestError::Rejected(RejectionReason::PoorConnection));
        }

        let slot = self.concurrency.try_admit(remote_ip).map_err(|reason| {
            self.emit_rejection(reason);
            RequestError::Rejected(reason)
        })?;

        let mut lifecycle = LifecycleTracker::start(self.config.stage_warning_threshold);
        if self.config.lifecycle_tracking {
            lifecycle.mark(LifecycleStage::Admission, &self.telemetry);
        }

        Ok(AdmittedRequest { slot, lifecycle })
    }

    pub fn mark_stage(&self, admitted: &mut AdmittedRequest, stage: LifecycleStage) {
        if self.config.lifecycle_tracking {
            admitted.lifecycle.mark(stage, &self.telemetry);
        }
    }

    pub fn record_latency(&self, remote_ip: IpAddr, latency: Duration) {
        self.network_gate.record_latency(remote_ip, latency);
    }

    pub fn rejection_status(&self, reason: RejectionReason) -> u16 {
        reason.status_code(self.network_gate.reject_status())
    }

    fn emit_rejection(&self, reason: RejectionReason) {
        self.telemetry.emit(TelemetryEvent::RequestRejected {
            reason: reason_label(reason),
            status: reason.status_code(self.network_gate.reject_status()),
        });
    }

    /// Runs `fut` under the timeout configured for `route_path` (or the
    /// default). A fired timeout maps to a 408 at the caller's discretion.
    pub async fn run_with_timeout<F, T>(&self, route_path: &str, fut: F) -> Result<T, RequestError>
    where
        F: Future<Output = T>,
    {
        let timeout = self.config.timeout_for(route_path);
        tokio::time::timeout(timeout, fut).await.map_err(|_| RequestError::Timeout)
    }

    pub fn timeout_status(&self) -> u16 {
        TIMEOUT_STATUS
    }
}

fn reason_label(reason: RejectionReason) -> &'static str {
    match reason {
        RejectionReason::GlobalConcurrencyExceeded => "global_concurrency_exceeded",
        RejectionReason::PerIpConcurrencyExceeded => "per_ip_concurrency_exceeded",
        RejectionReason::PayloadTooLarge => "payload_too_large",
        RejectionReason::UrlTooLong => "url_too_long",
        RejectionReason::PoorConnection => "poor_connection",
    }
}

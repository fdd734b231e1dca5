//! Permission check, optional permission request, then scan
//!
//! At most one request is in flight. Its reply is delivered through
//! [`ScanOrchestrator::poll`] exactly once.

use super::{Pending, PendingState, PermissionGate, ScanCapability, ScannerOptions};
use crate::game::ScanOutcome;
use std::mem;
use tracing::{debug, info, warn};

/// What `request_scan` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    /// Permission was already granted; the scanner is running
    Scanning,
    /// Waiting for the player to grant camera access
    AwaitingPermission,
    /// A previous request has not resolved yet; nothing was started
    Busy,
}

/// Result of a scan request, ready for the UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanFlowEvent {
    PermissionDenied,
    Outcome(ScanOutcome),
}

#[derive(Debug, Default)]
enum InFlight {
    #[default]
    Idle,
    Permission(Pending<bool>),
    Scan(Pending<ScanOutcome>),
}

/// Drives a scan request through the permission gate and the scanner
pub struct ScanOrchestrator<G, S> {
    gate: G,
    scanner: S,
    options: ScannerOptions,
    in_flight: InFlight,
}

impl<G: PermissionGate, S: ScanCapability> ScanOrchestrator<G, S> {
    pub fn new(gate: G, scanner: S, options: ScannerOptions) -> Self {
        Self {
            gate,
            scanner,
            options,
            in_flight: InFlight::Idle,
        }
    }

    /// Start a scan, asking for camera access first if it is not granted
    pub fn request_scan(&mut self) -> RequestStatus {
        if self.is_pending() {
            debug!("Scan requested while another request is pending");
            return RequestStatus::Busy;
        }

        if self.gate.is_granted() {
            self.start_scan();
            RequestStatus::Scanning
        } else {
            info!("Camera permission not granted, requesting it");
            self.in_flight = InFlight::Permission(self.gate.request());
            RequestStatus::AwaitingPermission
        }
    }

    /// Check the in-flight request without blocking
    pub fn poll(&mut self) -> Option<ScanFlowEvent> {
        match mem::take(&mut self.in_flight) {
            InFlight::Idle => None,
            InFlight::Permission(mut pending) => match pending.poll() {
                PendingState::Waiting => {
                    self.in_flight = InFlight::Permission(pending);
                    None
                }
                PendingState::Ready(true) => {
                    info!("Camera permission granted");
                    self.start_scan();
                    self.poll()
                }
                PendingState::Ready(false) => {
                    info!("Camera permission denied");
                    Some(ScanFlowEvent::PermissionDenied)
                }
                PendingState::Dropped => {
                    warn!("Permission gate closed without answering, treating as denied");
                    Some(ScanFlowEvent::PermissionDenied)
                }
            },
            InFlight::Scan(mut pending) => match pending.poll() {
                PendingState::Waiting => {
                    self.in_flight = InFlight::Scan(pending);
                    None
                }
                PendingState::Ready(outcome) => Some(ScanFlowEvent::Outcome(outcome)),
                PendingState::Dropped => {
                    warn!("Scanner closed without a result");
                    Some(ScanFlowEvent::Outcome(ScanOutcome::Failed(
                        "scanner closed without a result".to_string(),
                    )))
                }
            },
        }
    }

    pub fn is_pending(&self) -> bool {
        !matches!(self.in_flight, InFlight::Idle)
    }

    pub fn is_awaiting_permission(&self) -> bool {
        matches!(self.in_flight, InFlight::Permission(_))
    }

    pub fn is_scanning(&self) -> bool {
        matches!(self.in_flight, InFlight::Scan(_))
    }

    pub fn options(&self) -> &ScannerOptions {
        &self.options
    }

    pub fn gate(&self) -> &G {
        &self.gate
    }

    pub fn gate_mut(&mut self) -> &mut G {
        &mut self.gate
    }

    pub fn scanner(&self) -> &S {
        &self.scanner
    }

    pub fn scanner_mut(&mut self) -> &mut S {
        &mut self.scanner
    }

    fn start_scan(&mut self) {
        debug!(formats = ?self.options.formats, "Starting scan");
        self.in_flight = InFlight::Scan(self.scanner.start_scan(&self.options));
    }
}

//! Scanner and camera permission capabilities
//!
//! Both services are request/reply: a request returns a [`Pending`] handle
//! right away and the single reply shows up later. The UI loop polls the
//! handle once per tick, so replies are always consumed on the UI thread.
//!
//! Flow:
//! 1. UI asks the [`ScanOrchestrator`] for a scan
//! 2. Orchestrator checks the [`PermissionGate`], requesting a grant if needed
//! 3. On grant it calls [`ScanCapability::start_scan`]
//! 4. UI polls the orchestrator and hands the outcome to the game

pub mod orchestrator;
pub mod prompt;
pub mod scripted;

pub use orchestrator::{RequestStatus, ScanFlowEvent, ScanOrchestrator};
pub use prompt::{PermissionPolicy, PromptPermissionGate, PromptScanner};
pub use scripted::{ScriptedPermissionGate, ScriptedScanner};

use crate::game::ScanOutcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use uuid::Uuid;

/// Barcode symbologies a scan can be restricted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BarcodeFormat {
    QrCode,
    Aztec,
    DataMatrix,
    Code128,
    Ean13,
}

impl std::fmt::Display for BarcodeFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BarcodeFormat::QrCode => write!(f, "QR"),
            BarcodeFormat::Aztec => write!(f, "Aztec"),
            BarcodeFormat::DataMatrix => write!(f, "Data Matrix"),
            BarcodeFormat::Code128 => write!(f, "Code 128"),
            BarcodeFormat::Ean13 => write!(f, "EAN-13"),
        }
    }
}

/// Options for a single scan request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerOptions {
    /// Accepted formats; empty accepts anything
    pub formats: Vec<BarcodeFormat>,
}

impl ScannerOptions {
    pub fn qr_only() -> Self {
        Self {
            formats: vec![BarcodeFormat::QrCode],
        }
    }

    pub fn any_format() -> Self {
        Self {
            formats: Vec::new(),
        }
    }

    pub fn accepts(&self, format: BarcodeFormat) -> bool {
        self.formats.is_empty() || self.formats.contains(&format)
    }
}

impl Default for ScannerOptions {
    fn default() -> Self {
        Self::qr_only()
    }
}

/// Environment handed to capability implementations at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanContext {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    /// Shown by capabilities that render their own prompt
    pub title: String,
}

impl ScanContext {
    pub fn new(title: &str) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            started_at: Utc::now(),
            title: title.to_string(),
        }
    }
}

/// Result of polling a [`Pending`] handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingState<T> {
    /// No reply yet
    Waiting,
    /// The reply
    Ready(T),
    /// The other side went away without replying
    Dropped,
}

/// Receiving half of a request; yields at most one reply
#[derive(Debug)]
pub struct Pending<T> {
    receiver: oneshot::Receiver<T>,
}

/// Sending half of a request, held by the capability until it answers
#[derive(Debug)]
pub struct Responder<T> {
    sender: oneshot::Sender<T>,
}

impl<T> Pending<T> {
    /// Create a linked responder/pending pair
    pub fn channel() -> (Responder<T>, Pending<T>) {
        let (sender, receiver) = oneshot::channel();
        (Responder { sender }, Pending { receiver })
    }

    /// A request that is already answered
    pub fn ready(value: T) -> Self {
        let (responder, pending) = Self::channel();
        responder.respond(value);
        pending
    }

    /// Check for the reply without blocking
    pub fn poll(&mut self) -> PendingState<T> {
        match self.receiver.try_recv() {
            Ok(value) => PendingState::Ready(value),
            Err(oneshot::error::TryRecvError::Empty) => PendingState::Waiting,
            Err(oneshot::error::TryRecvError::Closed) => PendingState::Dropped,
        }
    }
}

impl<T> Responder<T> {
    /// Deliver the reply. Returns false if the requester already gave up.
    pub fn respond(self, value: T) -> bool {
        self.sender.send(value).is_ok()
    }
}

/// A service that decodes a barcode payload from the camera
pub trait ScanCapability {
    /// Begin a scan. The returned handle resolves exactly once.
    fn start_scan(&mut self, options: &ScannerOptions) -> Pending<ScanOutcome>;
}

/// Camera access control
pub trait PermissionGate {
    /// Current grant status
    fn is_granted(&self) -> bool;

    /// Ask for access; resolves to whether it was granted
    fn request(&mut self) -> Pending<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_resolves_once() {
        let (responder, mut pending) = Pending::channel();
        assert_eq!(pending.poll(), PendingState::Waiting);
        assert!(responder.respond(7));
        assert_eq!(pending.poll(), PendingState::Ready(7));
    }

    #[test]
    fn dropped_responder_is_reported() {
        let (responder, mut pending) = Pending::<bool>::channel();
        drop(responder);
        assert_eq!(pending.poll(), PendingState::Dropped);
    }

    #[test]
    fn respond_after_requester_left() {
        let (responder, pending) = Pending::channel();
        drop(pending);
        assert!(!responder.respond(ScanOutcome::Cancelled));
    }

    #[test]
    fn ready_pending_is_immediately_available() {
        let mut pending = Pending::ready(true);
        assert_eq!(pending.poll(), PendingState::Ready(true));
    }

    #[test]
    fn options_filter_formats() {
        let qr = ScannerOptions::default();
        assert!(qr.accepts(BarcodeFormat::QrCode));
        assert!(!qr.accepts(BarcodeFormat::Ean13));
        assert!(ScannerOptions::any_format().accepts(BarcodeFormat::Aztec));
    }

    #[test]
    fn contexts_get_distinct_sessions() {
        let a = ScanContext::new("Vendeta");
        let b = ScanContext::new("Vendeta");
        assert_ne!(a.session_id, b.session_id);
        assert_eq!(a.title, "Vendeta");
    }
}

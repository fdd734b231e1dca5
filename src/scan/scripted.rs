//! Scanner and permission gate driven by a script instead of a camera
//!
//! Used by tests and headless runs. Queued outcomes are answered at once;
//! with an empty queue the request is held until `resolve` is called.

use super::{Pending, PermissionGate, Responder, ScanCapability, ScannerOptions};
use crate::game::ScanOutcome;
use std::collections::VecDeque;

/// Replays a fixed list of scan outcomes
#[derive(Debug, Default)]
pub struct ScriptedScanner {
    outcomes: VecDeque<ScanOutcome>,
    held: Option<Responder<ScanOutcome>>,
    requests: Vec<ScannerOptions>,
}

impl ScriptedScanner {
    pub fn new(outcomes: Vec<ScanOutcome>) -> Self {
        Self {
            outcomes: outcomes.into(),
            held: None,
            requests: Vec::new(),
        }
    }

    /// Queue another outcome for a later scan
    pub fn push(&mut self, outcome: ScanOutcome) {
        self.outcomes.push_back(outcome);
    }

    /// Answer a held scan. Returns false when nothing is held.
    pub fn resolve(&mut self, outcome: ScanOutcome) -> bool {
        match self.held.take() {
            Some(responder) => responder.respond(outcome),
            None => false,
        }
    }

    /// Abandon a held scan without answering
    pub fn drop_pending(&mut self) {
        self.held = None;
    }

    pub fn scans_started(&self) -> usize {
        self.requests.len()
    }

    /// Options of every scan started so far
    pub fn requests(&self) -> &[ScannerOptions] {
        &self.requests
    }
}

impl ScanCapability for ScriptedScanner {
    fn start_scan(&mut self, options: &ScannerOptions) -> Pending<ScanOutcome> {
        self.requests.push(options.clone());
        match self.outcomes.pop_front() {
            Some(outcome) => Pending::ready(outcome),
            None => {
                let (responder, pending) = Pending::channel();
                self.held = Some(responder);
                pending
            }
        }
    }
}

/// Permission gate with a predetermined answer
#[derive(Debug)]
pub struct ScriptedPermissionGate {
    granted: bool,
    /// Reply to `request`; `None` holds the request open
    answer: Option<bool>,
    held: Option<Responder<bool>>,
    requests: usize,
}

impl ScriptedPermissionGate {
    /// Access already granted
    pub fn granted() -> Self {
        Self {
            granted: true,
            answer: Some(true),
            held: None,
            requests: 0,
        }
    }

    /// Not granted, and requests are refused
    pub fn denied() -> Self {
        Self {
            granted: false,
            answer: Some(false),
            held: None,
            requests: 0,
        }
    }

    /// Not granted until the first request, which succeeds
    pub fn grants_on_request() -> Self {
        Self {
            granted: false,
            answer: Some(true),
            held: None,
            requests: 0,
        }
    }

    /// Not granted; requests stay open until answered or dropped
    pub fn held() -> Self {
        Self {
            granted: false,
            answer: None,
            held: None,
            requests: 0,
        }
    }

    /// Answer a held request
    pub fn resolve(&mut self, granted: bool) -> bool {
        match self.held.take() {
            Some(responder) => {
                self.granted = granted;
                responder.respond(granted)
            }
            None => false,
        }
    }

    pub fn drop_pending(&mut self) {
        self.held = None;
    }

    pub fn requests(&self) -> usize {
        self.requests
    }
}

impl PermissionGate for ScriptedPermissionGate {
    fn is_granted(&self) -> bool {
        self.granted
    }

    fn request(&mut self) -> Pending<bool> {
        self.requests += 1;
        match self.answer {
            Some(granted) => {
                self.granted = granted;
                Pending::ready(granted)
            }
            None => {
                let (responder, pending) = Pending::channel();
                self.held = Some(responder);
                pending
            }
        }
    }
}

//! Terminal stand-ins for the camera scanner and the permission dialog
//!
//! The TUI renders an overlay while either is open and forwards the
//! player's keys here. Answers go back through the request's responder.

use super::{
    BarcodeFormat, Pending, PermissionGate, Responder, ScanCapability, ScanContext, ScannerOptions,
};
use crate::game::ScanOutcome;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Scanner where the player types or pastes the QR payload
#[derive(Debug)]
pub struct PromptScanner {
    context: ScanContext,
    input: String,
    responder: Option<Responder<ScanOutcome>>,
}

impl PromptScanner {
    pub fn new(context: ScanContext) -> Self {
        Self {
            context,
            input: String::new(),
            responder: None,
        }
    }

    pub fn context(&self) -> &ScanContext {
        &self.context
    }

    /// Whether a scan is waiting for input
    pub fn is_open(&self) -> bool {
        self.responder.is_some()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn push_char(&mut self, c: char) {
        if self.is_open() {
            self.input.push(c);
        }
    }

    pub fn push_str(&mut self, text: &str) {
        if self.is_open() {
            self.input.push_str(text);
        }
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    /// Finish the scan with the typed payload
    pub fn submit(&mut self) {
        let outcome = if self.input.is_empty() {
            ScanOutcome::Failed("no code detected".to_string())
        } else {
            ScanOutcome::Decoded(std::mem::take(&mut self.input))
        };
        self.finish(outcome);
    }

    /// Close the scanner without a payload
    pub fn cancel(&mut self) {
        self.finish(ScanOutcome::Cancelled);
    }

    fn finish(&mut self, outcome: ScanOutcome) {
        self.input.clear();
        if let Some(responder) = self.responder.take() {
            debug!(session = %self.context.session_id, ?outcome, "Prompt scan finished");
            responder.respond(outcome);
        }
    }
}

impl ScanCapability for PromptScanner {
    fn start_scan(&mut self, options: &ScannerOptions) -> Pending<ScanOutcome> {
        if !options.accepts(BarcodeFormat::QrCode) {
            return Pending::ready(ScanOutcome::Failed(
                "unsupported barcode format".to_string(),
            ));
        }

        let (responder, pending) = Pending::channel();
        self.input.clear();
        self.responder = Some(responder);
        debug!(session = %self.context.session_id, "Prompt scan opened");
        pending
    }
}

/// How camera access is decided in the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionPolicy {
    /// Access is always granted
    Granted,
    /// Ask the player the first time a scan is requested
    #[default]
    Ask,
    /// Access is always refused
    Denied,
}

/// Permission gate that asks the player through a yes/no dialog
#[derive(Debug)]
pub struct PromptPermissionGate {
    policy: PermissionPolicy,
    granted: bool,
    responder: Option<Responder<bool>>,
}

impl PromptPermissionGate {
    pub fn new(policy: PermissionPolicy) -> Self {
        Self {
            policy,
            granted: policy == PermissionPolicy::Granted,
            responder: None,
        }
    }

    pub fn policy(&self) -> PermissionPolicy {
        self.policy
    }

    /// Whether the dialog is waiting for an answer
    pub fn is_prompting(&self) -> bool {
        self.responder.is_some()
    }

    /// The player's answer to the dialog; a grant lasts for the session
    pub fn answer(&mut self, granted: bool) {
        if let Some(responder) = self.responder.take() {
            info!(granted, "Camera permission answered");
            self.granted = granted;
            responder.respond(granted);
        }
    }
}

impl PermissionGate for PromptPermissionGate {
    fn is_granted(&self) -> bool {
        self.granted
    }

    fn request(&mut self) -> Pending<bool> {
        match self.policy {
            PermissionPolicy::Granted => {
                self.granted = true;
                Pending::ready(true)
            }
            PermissionPolicy::Denied => Pending::ready(false),
            PermissionPolicy::Ask => {
                let (responder, pending) = Pending::channel();
                self.responder = Some(responder);
                pending
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::PendingState;

    fn scanner() -> PromptScanner {
        PromptScanner::new(ScanContext::new("test"))
    }

    #[test]
    fn typed_payload_is_decoded_verbatim() {
        let mut scanner = scanner();
        let mut pending = scanner.start_scan(&ScannerOptions::default());
        assert!(scanner.is_open());
        assert_eq!(pending.poll(), PendingState::Waiting);

        scanner.push_str("AUDITORIO_NIVEL_");
        scanner.push_char('X');
        scanner.backspace();
        scanner.push_char('4');
        assert_eq!(scanner.input(), "AUDITORIO_NIVEL_4");
        scanner.submit();

        assert!(!scanner.is_open());
        assert_eq!(scanner.input(), "");
        assert_eq!(
            pending.poll(),
            PendingState::Ready(ScanOutcome::Decoded("AUDITORIO_NIVEL_4".to_string()))
        );
    }

    #[test]
    fn escape_cancels() {
        let mut scanner = scanner();
        let mut pending = scanner.start_scan(&ScannerOptions::default());
        scanner.push_str("half");
        scanner.cancel();
        assert_eq!(pending.poll(), PendingState::Ready(ScanOutcome::Cancelled));
    }

    #[test]
    fn empty_submission_fails() {
        let mut scanner = scanner();
        let mut pending = scanner.start_scan(&ScannerOptions::default());
        scanner.submit();
        assert_eq!(
            pending.poll(),
            PendingState::Ready(ScanOutcome::Failed("no code detected".to_string()))
        );
    }

    #[test]
    fn non_qr_request_fails_immediately() {
        let mut scanner = scanner();
        let options = ScannerOptions {
            formats: vec![BarcodeFormat::Ean13],
        };
        let mut pending = scanner.start_scan(&options);
        assert!(!scanner.is_open());
        assert_eq!(
            pending.poll(),
            PendingState::Ready(ScanOutcome::Failed("unsupported barcode format".to_string()))
        );
    }

    #[test]
    fn typing_while_closed_is_ignored() {
        let mut scanner = scanner();
        scanner.push_char('a');
        assert_eq!(scanner.input(), "");
    }

    #[test]
    fn ask_policy_waits_for_answer_and_remembers_grant() {
        let mut gate = PromptPermissionGate::new(PermissionPolicy::Ask);
        assert!(!gate.is_granted());

        let mut pending = gate.request();
        assert!(gate.is_prompting());
        assert_eq!(pending.poll(), PendingState::Waiting);

        gate.answer(true);
        assert!(!gate.is_prompting());
        assert!(gate.is_granted());
        assert_eq!(pending.poll(), PendingState::Ready(true));
    }

    #[test]
    fn ask_policy_refusal_keeps_access_closed() {
        let mut gate = PromptPermissionGate::new(PermissionPolicy::Ask);
        let mut pending = gate.request();
        gate.answer(false);
        assert!(!gate.is_granted());
        assert_eq!(pending.poll(), PendingState::Ready(false));
    }

    #[test]
    fn fixed_policies() {
        let granted = PromptPermissionGate::new(PermissionPolicy::Granted);
        assert!(granted.is_granted());

        let mut denied = PromptPermissionGate::new(PermissionPolicy::Denied);
        assert!(!denied.is_granted());
        assert_eq!(denied.request().poll(), PendingState::Ready(false));
        assert!(!denied.is_prompting());
    }
}

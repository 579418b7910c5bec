use url::Url;

use crate::dispatch::SendBatch;
use crate::domain::Recipient;

/// Confirmation gate states
///
/// Sending is gated behind an explicit confirmation: a send request
/// parks the gate in `PendingConfirmation`, and only a confirm while
/// pending snapshots a batch. `Confirmed` covers the dispatch window
/// until [`Session::finish_send`] returns the gate to `Idle`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    #[default]
    Idle,
    PendingConfirmation,
    Confirmed,
}

/// Gate error type
#[derive(thiserror::Error, Debug)]
pub enum GateError {
    #[error("No data uploaded. Unable to send anything")]
    NoData,
    #[error("No send is awaiting confirmation")]
    NotPending,
    #[error("A send is already in progress")]
    SendInProgress,
}

/// The single operator session: the live recipient table, the message
/// inputs, and the confirmation gate
#[derive(Debug, Default)]
pub struct Session {
    filename: Option<String>,
    recipients: Vec<Recipient>,
    template: String,
    image_url: Option<Url>,
    gate: GateState,
}

impl Session {
    pub fn recipients(&self) -> &[Recipient] {
        &self.recipients
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn image_url(&self) -> Option<&Url> {
        self.image_url.as_ref()
    }

    pub const fn gate(&self) -> GateState {
        self.gate
    }

    /// Replace the recipient table wholesale with a fresh upload
    ///
    /// Any pending confirmation refers to the old table and is dropped.
    pub fn replace_recipients(&mut self, filename: String, recipients: Vec<Recipient>) {
        self.filename = Some(filename);
        self.recipients = recipients;
        self.gate = GateState::Idle;
    }

    pub fn set_message(&mut self, template: String, image_url: Option<Url>) {
        self.template = template;
        self.image_url = image_url;
    }

    /// Ask to send: `Idle -> PendingConfirmation`
    ///
    /// Returns the confirmation prompt, always computed from the live
    /// table. An empty table blocks the transition.
    pub fn request_send(&mut self) -> Result<String, GateError> {
        if self.gate == GateState::Confirmed {
            return Err(GateError::SendInProgress);
        }
        if self.recipients.is_empty() {
            self.gate = GateState::Idle;
            return Err(GateError::NoData);
        }
        self.gate = GateState::PendingConfirmation;
        Ok(format!("{} messages will be sent", self.recipients.len()))
    }

    /// Abandon a pending confirmation: `PendingConfirmation -> Idle`
    pub fn cancel_send(&mut self) {
        if self.gate == GateState::PendingConfirmation {
            self.gate = GateState::Idle;
        }
    }

    /// Confirm a pending send: `PendingConfirmation -> Confirmed`
    ///
    /// Snapshots the live table and message inputs into a batch; this is
    /// the only place a batch is ever built.
    pub fn confirm_send(&mut self) -> Result<SendBatch, GateError> {
        match self.gate {
            GateState::PendingConfirmation => {}
            GateState::Confirmed => return Err(GateError::SendInProgress),
            GateState::Idle => return Err(GateError::NotPending),
        }
        if self.recipients.is_empty() {
            self.gate = GateState::Idle;
            return Err(GateError::NoData);
        }
        self.gate = GateState::Confirmed;
        Ok(SendBatch {
            recipients: self.recipients.clone(),
            template: self.template.clone(),
            image_url: self.image_url.clone(),
        })
    }

    /// Close out a dispatched batch: `Confirmed -> Idle`
    ///
    /// A fully successful batch clears the table; a failed one leaves it
    /// in place.
    pub fn finish_send(&mut self, success: bool) {
        if success {
            self.recipients.clear();
            self.filename = None;
        }
        self.gate = GateState::Idle;
    }
}

use anyhow::Context;
use phonenumber::country;
use url::Url;

use crate::domain::{PhoneNumber, Recipient};
use crate::sms_client::SmsClient;
use crate::template;

/// A confirmed snapshot of recipients, template and optional image,
/// handed to [`send_batch`] exactly once
#[derive(Debug, Clone)]
pub struct SendBatch {
    pub recipients: Vec<Recipient>,
    pub template: String,
    pub image_url: Option<Url>,
}

/// Aggregate result of one batch
#[derive(Debug, Default, serde::Serialize)]
pub struct SendOutcome {
    /// Rows reached by the loop
    pub attempted: usize,
    /// Messages accepted by the provider
    pub sent: usize,
    /// Rows skipped because their phone number failed normalization
    pub skipped: Vec<SkippedRecipient>,
    /// First provider error, if one stopped the batch
    pub error: Option<String>,
}

impl SendOutcome {
    /// Whether every reached row was either sent or explicitly skipped
    pub const fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// A row that was not dispatched, and why
#[derive(Debug, serde::Serialize)]
pub struct SkippedRecipient {
    pub phone_number: String,
    pub reason: String,
}

/// Send one message per recipient, strictly in sequence
///
/// Each row is rendered against the shared template and its phone number
/// normalized against `default_region`. A row whose number fails
/// normalization is recorded in the outcome and skipped; a provider
/// error stops the loop immediately and becomes the batch error.
/// Messages already accepted are not rolled back.
#[tracing::instrument(name = "Send batch", skip(client, batch), fields(recipients = batch.recipients.len()))]
pub async fn send_batch(
    client: &SmsClient,
    default_region: country::Id,
    batch: &SendBatch,
) -> SendOutcome {
    let mut outcome = SendOutcome::default();
    for recipient in &batch.recipients {
        outcome.attempted += 1;
        let body = template::render(&batch.template, Some(recipient));
        let to = match PhoneNumber::parse(&recipient.phone_number, default_region) {
            Ok(to) => to,
            Err(error) => {
                tracing::warn!(
                    phone_number = %recipient.phone_number,
                    "Skipping a recipient with an invalid phone number",
                );
                outcome.skipped.push(SkippedRecipient {
                    phone_number: recipient.phone_number.clone(),
                    reason: error.to_string(),
                });
                continue;
            }
        };
        if let Err(error) = client
            .send_message(&to, &body, batch.image_url.as_ref())
            .await
            .with_context(|| format!("Failed to send message to {to}"))
        {
            tracing::error!(error.cause_chain = ?error, "Aborting batch on provider error");
            outcome.error = Some(format!("{error:#}"));
            break;
        }
        outcome.sent += 1;
    }
    outcome
}

use std::time;

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::domain::PhoneNumber;

/// SMS client data
pub struct SmsClient {
    http_client: Client,
    base_url: Url,
    account_sid: String,
    auth_token: SecretString,
    sender: PhoneNumber,
}

impl SmsClient {
    pub fn new(
        base_url: Url,
        account_sid: String,
        auth_token: SecretString,
        sender: PhoneNumber,
        timeout: time::Duration,
    ) -> Self {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");
        Self {
            http_client,
            base_url,
            account_sid,
            auth_token,
            sender,
        }
    }

    /// Send an SMS (or MMS, when a media URL is given) using Twilio's REST API
    /// <https://www.twilio.com/docs/messaging/api/message-resource>
    #[tracing::instrument(name = "Send a message", skip(self, body, media_url))]
    pub async fn send_message(
        &self,
        to: &PhoneNumber,
        body: &str,
        media_url: Option<&Url>,
    ) -> Result<(), reqwest::Error> {
        let url = self
            .base_url
            .join(&format!(
                "/2010-04-01/Accounts/{}/Messages.json",
                self.account_sid
            ))
            .expect("Cannot parse URL");
        let request_body = SendMessageRequest {
            to: to.as_ref(),
            from: self.sender.as_ref(),
            body,
            media_url: media_url.map(Url::as_str),
        };
        self.http_client
            .post(url)
            .basic_auth(&self.account_sid, Some(self.auth_token.expose_secret()))
            .form(&request_body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// Form-encoded request body for the Messages endpoint
#[derive(serde::Serialize)]
#[serde(rename_all = "PascalCase")]
struct SendMessageRequest<'a> {
    to: &'a str,
    from: &'a str,
    body: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    media_url: Option<&'a str>,
}

use std::fmt;
use std::sync::Mutex;

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};

use crate::dispatch;
use crate::routes::helpers::{error_chain_fmt, lock_session};
use crate::session::{GateError, Session};
use crate::sms_client::SmsClient;
use crate::startup::DefaultRegion;

/// Confirmation prompt shown before a send is allowed
#[derive(serde::Serialize)]
pub struct ConfirmationPrompt {
    pub message: String,
}

/// Send error type
#[derive(thiserror::Error)]
pub enum SendError {
    #[error(transparent)]
    Gate(#[from] GateError),
    #[error("{0}")]
    Delivery(String),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl fmt::Debug for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for SendError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Gate(_) => StatusCode::CONFLICT,
            Self::Delivery(_) => StatusCode::BAD_GATEWAY,
            Self::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Send request handler: park the gate behind a confirmation prompt
#[allow(clippy::future_not_send)]
#[tracing::instrument(name = "Request a send", skip(session))]
pub async fn send_request(session: web::Data<Mutex<Session>>) -> Result<HttpResponse, SendError> {
    let message = lock_session(&session)?.request_send()?;
    Ok(HttpResponse::Ok().json(ConfirmationPrompt { message }))
}

/// Send cancel handler: abandon the pending confirmation
#[allow(clippy::future_not_send)]
#[tracing::instrument(name = "Cancel a send", skip(session))]
pub async fn send_cancel(session: web::Data<Mutex<Session>>) -> Result<HttpResponse, SendError> {
    lock_session(&session)?.cancel_send();
    Ok(HttpResponse::Ok().finish())
}

/// Send confirm handler: snapshot the batch and dispatch it row by row
///
/// The session lock is released while the provider calls run; the gate's
/// `Confirmed` state keeps a second confirm out in the meantime. On full
/// success the table is cleared, on a provider failure it stays put and
/// the error is surfaced once, at batch level.
#[allow(clippy::future_not_send)]
#[tracing::instrument(name = "Confirm and dispatch a send", skip_all)]
pub async fn send_confirm(
    session: web::Data<Mutex<Session>>,
    sms_client: web::Data<SmsClient>,
    default_region: web::Data<DefaultRegion>,
) -> Result<HttpResponse, SendError> {
    let batch = lock_session(&session)?.confirm_send()?;

    let outcome = dispatch::send_batch(&sms_client, default_region.0, &batch).await;
    lock_session(&session)?.finish_send(outcome.is_success());

    if outcome.is_success() {
        Ok(HttpResponse::Ok().json(outcome))
    } else {
        Err(SendError::Delivery(outcome.error.unwrap_or_default()))
    }
}

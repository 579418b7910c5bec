use std::fmt;
use std::sync::Mutex;

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use url::Url;

use crate::routes::helpers::{error_chain_fmt, lock_session};
use crate::session::Session;
use crate::template;

/// Message form data
#[derive(serde::Deserialize)]
pub struct MessageForm {
    message: String,
    image_url: Option<String>,
}

/// The message preview, rendered against the first table row as a
/// representative sample
#[derive(serde::Serialize)]
pub struct Preview {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub body: String,
    pub image_url: Option<Url>,
}

/// Message error type
#[derive(thiserror::Error)]
pub enum MessageError {
    #[error("`{0}` is not a valid image URL")]
    InvalidImageUrl(String),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl fmt::Debug for MessageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for MessageError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidImageUrl(_) => StatusCode::BAD_REQUEST,
            Self::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Message handler: store the template and image URL, return the preview
#[allow(clippy::future_not_send)]
#[tracing::instrument(name = "Update the message", skip(form, session))]
pub async fn set_message(
    form: web::Form<MessageForm>,
    session: web::Data<Mutex<Session>>,
) -> Result<HttpResponse, MessageError> {
    let MessageForm { message, image_url } = form.into_inner();
    let image_url = image_url
        .filter(|url| !url.trim().is_empty())
        .map(|url| Url::parse(&url).map_err(|_| MessageError::InvalidImageUrl(url)))
        .transpose()?;

    let mut session = lock_session(&session)?;
    session.set_message(message, image_url);
    Ok(HttpResponse::Ok().json(preview_of(&session)))
}

/// Preview handler: show the preview without changing anything
#[allow(clippy::future_not_send)]
pub async fn preview(session: web::Data<Mutex<Session>>) -> Result<HttpResponse, MessageError> {
    let session = lock_session(&session)?;
    Ok(HttpResponse::Ok().json(preview_of(&session)))
}

fn preview_of(session: &Session) -> Preview {
    let sample = session.recipients().first();
    Preview {
        first_name: sample.map(|r| r.first_name.clone()),
        last_name: sample.map(|r| r.last_name.clone()),
        phone_number: sample.map(|r| r.phone_number.clone()),
        body: template::render(session.template(), sample),
        image_url: session.image_url().cloned(),
    }
}

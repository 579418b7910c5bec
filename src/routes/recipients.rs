use std::fmt;
use std::sync::Mutex;

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};

use crate::domain::Recipient;
use crate::routes::helpers::{error_chain_fmt, lock_session};
use crate::session::Session;
use crate::spreadsheet::{self, ParseError};

/// Upload query data
#[derive(Debug, serde::Deserialize)]
pub struct UploadQuery {
    filename: String,
}

/// The recipient table as shown to the operator
#[derive(serde::Serialize)]
pub struct RecipientTable {
    pub filename: Option<String>,
    pub rows: Vec<Recipient>,
}

/// Upload error type
#[derive(thiserror::Error)]
pub enum UploadError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl fmt::Debug for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for UploadError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Parse(ParseError::UnsupportedFormat(_)) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::Parse(_) => StatusCode::BAD_REQUEST,
            Self::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Upload handler: decode a contact file and replace the recipient table
#[allow(clippy::future_not_send)]
#[tracing::instrument(
    name = "Upload a recipient table",
    skip(body, session),
    fields(filename = %query.filename, bytes = body.len())
)]
pub async fn upload_recipients(
    query: web::Query<UploadQuery>,
    body: web::Bytes,
    session: web::Data<Mutex<Session>>,
) -> Result<HttpResponse, UploadError> {
    let recipients = spreadsheet::parse_recipients(&body, &query.filename)?;
    tracing::info!(rows = recipients.len(), "Recipient table replaced");

    let mut session = lock_session(&session)?;
    session.replace_recipients(query.into_inner().filename, recipients);
    Ok(HttpResponse::Ok().json(table_of(&session)))
}

/// Recipient table handler: show the current table
#[allow(clippy::future_not_send)]
pub async fn recipients_table(
    session: web::Data<Mutex<Session>>,
) -> Result<HttpResponse, UploadError> {
    let session = lock_session(&session)?;
    Ok(HttpResponse::Ok().json(table_of(&session)))
}

fn table_of(session: &Session) -> RecipientTable {
    RecipientTable {
        filename: session.filename().map(ToString::to_string),
        rows: session.recipients().to_vec(),
    }
}

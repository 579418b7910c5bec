use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::error::InternalError;
use actix_web::http::header::{self, HeaderMap, HeaderValue};
use actix_web::middleware::Next;
use actix_web::{web, HttpResponse};
use anyhow::Context;
use base64::engine::general_purpose;
use base64::Engine;
use secrecy::{ExposeSecret, SecretString};

use crate::configuration::AuthSettings;

/// Authentication credentials data
#[derive(Debug)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

/// Authentication error type
#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials(#[source] anyhow::Error),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

/// Extract credentials from the `Authorization` header (Basic scheme)
pub fn basic_authentication(headers: &HeaderMap) -> anyhow::Result<Credentials> {
    let header_value = headers
        .get("Authorization")
        .context("The 'Authorization' header was missing")?
        .to_str()
        .context("The 'Authorization' header was not a valid UTF8 string")?;
    let encoded = header_value
        .strip_prefix("Basic ")
        .context("The authorization scheme was not 'Basic'")?;
    let decoded = general_purpose::STANDARD
        .decode(encoded)
        .context("Failed to base64-decode 'Basic' credentials")?;
    let decoded = String::from_utf8(decoded).context("The decoded credentials are not valid UTF8")?;

    let mut credentials = decoded.splitn(2, ':');
    let username = credentials
        .next()
        .context("A username must be provided in 'Basic' auth")?
        .to_string();
    let password = credentials
        .next()
        .context("A password must be provided in 'Basic' auth")?
        .to_string();

    Ok(Credentials {
        username,
        password: SecretString::from(password),
    })
}

/// Validate provided credentials against the configured static pair
pub fn validate_credentials(creds: &Credentials, expected: &AuthSettings) -> Result<(), AuthError> {
    let username_matches = creds.username == expected.username;
    let password_matches = creds.password.expose_secret() == expected.password.expose_secret();
    if username_matches && password_matches {
        Ok(())
    } else {
        Err(AuthError::InvalidCredentials(anyhow::anyhow!(
            "Unknown username or wrong password"
        )))
    }
}

/// Reject requests that do not carry valid basic-auth credentials
#[allow(clippy::future_not_send)]
pub async fn reject_unauthorized_users(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> actix_web::Result<ServiceResponse<impl MessageBody>> {
    let expected = req
        .app_data::<web::Data<AuthSettings>>()
        .cloned()
        .ok_or_else(|| {
            actix_web::error::ErrorInternalServerError("Missing authentication configuration")
        })?;

    let outcome = basic_authentication(req.headers())
        .map_err(AuthError::InvalidCredentials)
        .and_then(|creds| validate_credentials(&creds, &expected));
    match outcome {
        Ok(()) => next.call(req).await,
        Err(error) => {
            let response = HttpResponse::Unauthorized()
                .insert_header((
                    header::WWW_AUTHENTICATE,
                    HeaderValue::from_static(r#"Basic realm="send""#),
                ))
                .finish();
            Err(InternalError::from_response(error, response).into())
        }
    }
}

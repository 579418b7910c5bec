use std::sync::{Mutex, MutexGuard};
use std::{error, fmt};

use actix_web::web;

use crate::session::Session;

/// Provide a representation for any type that implements `Error`
pub fn error_chain_fmt(e: &impl error::Error, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "{e}\n")?;

    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{cause}")?;
        current = cause.source();
    }

    Ok(())
}

/// Lock the operator session
pub fn lock_session(session: &web::Data<Mutex<Session>>) -> anyhow::Result<MutexGuard<'_, Session>> {
    session
        .lock()
        .map_err(|_| anyhow::anyhow!("The session lock was poisoned"))
}

use actix_web::{HttpResponse, Result};
use log::debug;

use crate::middleware::with_session_command;
use crate::models::{ResolvedSession, SessionCookieCommand, SessionStatusResponse};
use crate::session::SessionId;

/// Report whether the client carries a session, binding a new one if not
///
/// # Errors
/// Returns an error if the response cannot be built
pub async fn session_status(session: ResolvedSession) -> Result<HttpResponse> {
    if session.is_present() {
        return Ok(HttpResponse::Ok().json(SessionStatusResponse {
            active: true,
            new: false,
        }));
    }

    debug!("No session cookie on request, issuing a new session identifier");
    let response = HttpResponse::Ok().json(SessionStatusResponse {
        active: true,
        new: true,
    });
    Ok(with_session_command(
        response,
        SessionCookieCommand::Issue(SessionId::generate()),
    ))
}

/// Clear the session cookie on the client
///
/// # Errors
/// Returns an error if the response cannot be built
pub async fn session_end(session: ResolvedSession) -> Result<HttpResponse> {
    debug!("Ending session (cookie present={})", session.is_present());
    Ok(with_session_command(
        HttpResponse::NoContent().finish(),
        SessionCookieCommand::Expire,
    ))
}

use serde::{Deserialize, Serialize};

use crate::session::SessionId;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

/// Body of `GET /api/session`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatusResponse {
    /// A session identifier is bound to the client after this response
    pub active: bool,
    /// The identifier was issued by this response
    pub new: bool,
}

/// Session identifier resolved from the incoming request
///
/// Inserted into request extensions by the session cookie middleware.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedSession(Option<SessionId>);

impl ResolvedSession {
    #[must_use]
    pub const fn new(session_id: Option<SessionId>) -> Self {
        Self(session_id)
    }

    #[must_use]
    pub const fn session_id(&self) -> Option<&SessionId> {
        self.0.as_ref()
    }

    #[must_use]
    pub const fn is_present(&self) -> bool {
        self.0.is_some()
    }
}

/// Cookie change requested by a handler, applied by the middleware
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCookieCommand {
    /// Bind the identifier to the client
    Issue(SessionId),
    /// Remove the session cookie from the client
    Expire,
}

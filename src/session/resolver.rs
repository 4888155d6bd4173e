//! Session identifier resolution traits
//!
//! Two narrow capabilities that any HTTP layer can call:
//!
//! - [`CookieSerializer`] turns a cookie value into a `Set-Cookie` header and
//!   reads the raw values back from a request
//! - [`SessionIdResolver`] maps a request to session identifiers and writes or
//!   expires the identifier on a response

use actix_web::{
    http::header::{HeaderValue, SET_COOKIE},
    HttpRequest, HttpResponse,
};

use super::id::SessionId;
use super::policy::CookiePolicy;

/// Value written into the session cookie
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieValue {
    value: String,
    max_age: Option<i64>,
}

impl CookieValue {
    /// Cookie value using the serializer's configured max age
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            max_age: None,
        }
    }

    /// Empty value that removes the cookie on the client
    #[must_use]
    pub const fn expired() -> Self {
        Self {
            value: String::new(),
            max_age: Some(0),
        }
    }

    /// Override the configured max age for this value only
    #[must_use]
    pub fn with_max_age(mut self, max_age: i64) -> Self {
        self.max_age = Some(max_age);
        self
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub const fn max_age(&self) -> Option<i64> {
        self.max_age
    }
}

/// Writes and reads the session cookie
pub trait CookieSerializer {
    /// Build the `Set-Cookie` header value for the given cookie value
    fn write_cookie_value(&self, cookie_value: &CookieValue) -> String;

    /// All values of the session cookie found on the request, in order
    fn read_cookie_values(&self, req: &HttpRequest) -> Vec<String>;
}

/// Resolves session identifiers from requests and writes them to responses
pub trait SessionIdResolver {
    /// Session identifiers carried by the request; empty means no session
    fn resolve_session_ids(&self, req: &HttpRequest) -> Vec<SessionId>;

    /// Send the session identifier to the client
    fn set_session_id<B>(&self, res: &mut HttpResponse<B>, session_id: &SessionId);

    /// Instruct the client to forget its session identifier
    fn expire_session<B>(&self, res: &mut HttpResponse<B>);
}

/// [`SessionIdResolver`] backed by a cookie
#[derive(Debug, Clone, Default)]
pub struct CookieSessionIdResolver<S = CookiePolicy> {
    serializer: S,
}

impl<S: CookieSerializer> CookieSessionIdResolver<S> {
    #[must_use]
    pub const fn new(serializer: S) -> Self {
        Self { serializer }
    }

    #[must_use]
    pub const fn serializer(&self) -> &S {
        &self.serializer
    }

    fn append_set_cookie<B>(res: &mut HttpResponse<B>, header: &str) {
        let already_written = res
            .headers()
            .get_all(SET_COOKIE)
            .any(|value| value.to_str().is_ok_and(|value| value == header));
        if already_written {
            return;
        }

        match HeaderValue::from_str(header) {
            Ok(value) => {
                res.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => log::warn!("Failed to write session cookie header: {e}"),
        }
    }
}

impl<S: CookieSerializer> SessionIdResolver for CookieSessionIdResolver<S> {
    fn resolve_session_ids(&self, req: &HttpRequest) -> Vec<SessionId> {
        self.serializer
            .read_cookie_values(req)
            .into_iter()
            .filter_map(|value| SessionId::parse(value).ok())
            .collect()
    }

    fn set_session_id<B>(&self, res: &mut HttpResponse<B>, session_id: &SessionId) {
        let header = self
            .serializer
            .write_cookie_value(&CookieValue::new(session_id.as_str()));
        Self::append_set_cookie(res, &header);
    }

    fn expire_session<B>(&self, res: &mut HttpResponse<B>) {
        let header = self.serializer.write_cookie_value(&CookieValue::expired());
        Self::append_set_cookie(res, &header);
    }
}

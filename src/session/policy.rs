use actix_web::{
    cookie::{Cookie, SameSite},
    http::header::COOKIE,
    HttpRequest,
};
use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Utc};
use thiserror::Error;

use super::id::SessionId;
use super::resolver::{CookieSerializer, CookieValue};
use crate::settings::CookieSettings;

/// Name of the session cookie
pub const SESSION_COOKIE_NAME: &str = "JSESSIONID";

/// Path scope of the session cookie (the whole application)
pub const SESSION_COOKIE_PATH: &str = "/";

/// Negative max age marks a session-scoped cookie: no `Max-Age`, no `Expires`
pub const SESSION_SCOPED_MAX_AGE: i64 = -1;

/// `Expires` attribute format (IMF-fixdate)
const EXPIRES_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Errors raised when a cookie policy is built from configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("SameSite=None requires the Secure attribute")]
    InsecureCrossSite,

    #[error("invalid cookie name {0:?}")]
    InvalidCookieName(String),

    #[error("invalid cookie path {0:?}")]
    InvalidPath(String),

    #[error("invalid cookie domain {0:?}")]
    InvalidDomain(String),

    #[error("unknown SameSite value {0:?}, expected Strict, Lax or None")]
    InvalidSameSite(String),
}

/// Immutable policy describing how the session cookie is read and written
///
/// Built once at startup and shared by reference with every worker. All
/// operations are pure functions of the policy and their input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookiePolicy {
    cookie_name: String,
    max_age: i64,
    secure: bool,
    same_site: Option<SameSite>,
    path: String,
    domain: Option<String>,
    http_only: bool,
    base64_encoding: bool,
}

impl Default for CookiePolicy {
    fn default() -> Self {
        Self::cross_domain()
    }
}

impl CookiePolicy {
    /// The fixed cross-domain policy:
    /// `JSESSIONID`, session-scoped, `Secure`, `SameSite=None`, `Path=/`
    #[must_use]
    pub fn cross_domain() -> Self {
        Self {
            cookie_name: SESSION_COOKIE_NAME.to_string(),
            max_age: SESSION_SCOPED_MAX_AGE,
            secure: true,
            same_site: Some(SameSite::None),
            path: SESSION_COOKIE_PATH.to_string(),
            domain: None,
            http_only: false,
            base64_encoding: false,
        }
    }

    /// Build a policy from configuration and validate it
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The cookie name, path or domain is not a valid cookie attribute
    /// - The same-site value is unknown
    /// - `SameSite=None` is combined with a non-secure cookie
    pub fn from_settings(settings: &CookieSettings) -> Result<Self, PolicyError> {
        let policy = Self {
            cookie_name: settings.name.clone(),
            max_age: settings.max_age_seconds,
            secure: settings.secure,
            same_site: parse_same_site(&settings.same_site)?,
            path: settings.path.clone(),
            domain: settings.domain.clone().filter(|domain| !domain.is_empty()),
            http_only: settings.http_only,
            base64_encoding: settings.base64_encoding,
        };
        policy.validate()?;

        log::info!(
            "Session cookie policy: name={}, max_age={}, secure={}, same_site={:?}, path={}",
            policy.cookie_name,
            policy.max_age,
            policy.secure,
            policy.same_site,
            policy.path
        );
        Ok(policy)
    }

    /// Check the policy attributes and the cross-site invariant
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint
    pub fn validate(&self) -> Result<(), PolicyError> {
        if !is_valid_cookie_name(&self.cookie_name) {
            return Err(PolicyError::InvalidCookieName(self.cookie_name.clone()));
        }
        if !is_valid_attribute_value(&self.path) {
            return Err(PolicyError::InvalidPath(self.path.clone()));
        }
        if let Some(domain) = &self.domain {
            if !is_valid_attribute_value(domain) || domain.contains(char::is_whitespace) {
                return Err(PolicyError::InvalidDomain(domain.clone()));
            }
        }
        if self.same_site == Some(SameSite::None) && !self.secure {
            return Err(PolicyError::InsecureCrossSite);
        }
        Ok(())
    }

    #[must_use]
    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    #[must_use]
    pub const fn max_age(&self) -> i64 {
        self.max_age
    }

    #[must_use]
    pub const fn secure(&self) -> bool {
        self.secure
    }

    #[must_use]
    pub const fn same_site(&self) -> Option<SameSite> {
        self.same_site
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    #[must_use]
    pub const fn http_only(&self) -> bool {
        self.http_only
    }

    /// Whether the cookie lives only for the browser session
    #[must_use]
    pub const fn is_session_scoped(&self) -> bool {
        self.max_age < 0
    }

    /// Resolve the session identifier carried by the request
    ///
    /// A missing cookie, an unparsable `Cookie` header or a value that is not
    /// a valid identifier all mean "no existing session". When the cookie is
    /// repeated the first valid value wins.
    #[must_use]
    pub fn resolve_session_id(&self, req: &HttpRequest) -> Option<SessionId> {
        self.read_cookie_values(req)
            .into_iter()
            .find_map(|value| match SessionId::parse(value) {
                Ok(id) => Some(id),
                Err(e) => {
                    log::debug!("Ignoring malformed {} cookie: {e}", self.cookie_name);
                    None
                }
            })
    }

    /// Build the `Set-Cookie` header value carrying the session identifier
    #[must_use]
    pub fn build_set_cookie_header(&self, session_id: &SessionId) -> String {
        self.write_cookie_value(&CookieValue::new(session_id.as_str()))
    }

    /// Build the `Set-Cookie` header value that removes the session cookie
    #[must_use]
    pub fn build_expired_cookie_header(&self) -> String {
        self.write_cookie_value(&CookieValue::expired())
    }

    fn format_header(&self, value: &str, max_age: i64, now: DateTime<Utc>) -> String {
        let mut header = format!("{}={}", self.cookie_name, self.encode_value(value));

        if max_age >= 0 {
            let expires_at = if max_age == 0 {
                0
            } else {
                now.timestamp().saturating_add(max_age)
            };
            let expires =
                DateTime::<Utc>::from_timestamp(expires_at, 0).unwrap_or(DateTime::<Utc>::MAX_UTC);
            header.push_str(&format!("; Max-Age={max_age}"));
            header.push_str(&format!("; Expires={}", expires.format(EXPIRES_FORMAT)));
        }
        if let Some(domain) = &self.domain {
            header.push_str(&format!("; Domain={domain}"));
        }
        header.push_str(&format!("; Path={}", self.path));
        if self.secure {
            header.push_str("; Secure");
        }
        if self.http_only {
            header.push_str("; HttpOnly");
        }
        if let Some(same_site) = self.same_site {
            header.push_str(&format!("; SameSite={same_site}"));
        }
        header
    }

    fn encode_value(&self, value: &str) -> String {
        if self.base64_encoding && !value.is_empty() {
            general_purpose::STANDARD.encode(value)
        } else {
            value.to_string()
        }
    }

    fn decode_value(&self, value: &str) -> Option<String> {
        if !self.base64_encoding {
            return Some(value.to_string());
        }
        general_purpose::STANDARD
            .decode(value)
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .or_else(|| {
                log::debug!("Failed to decode base64 {} cookie value", self.cookie_name);
                None
            })
    }
}

impl CookieSerializer for CookiePolicy {
    fn write_cookie_value(&self, cookie_value: &CookieValue) -> String {
        // An empty value always deletes the cookie
        let max_age = if cookie_value.value().is_empty() {
            0
        } else {
            cookie_value.max_age().unwrap_or(self.max_age)
        };
        self.format_header(cookie_value.value(), max_age, Utc::now())
    }

    fn read_cookie_values(&self, req: &HttpRequest) -> Vec<String> {
        // Values are taken verbatim: no percent-decoding
        let mut values = Vec::new();
        for header in req.headers().get_all(COOKIE) {
            let Ok(header) = std::str::from_utf8(header.as_bytes()) else {
                log::debug!("Unparsable Cookie header, treating {} as absent", self.cookie_name);
                return Vec::new();
            };
            for pair in header.split(';').map(str::trim).filter(|pair| !pair.is_empty()) {
                match Cookie::parse(pair) {
                    Ok(cookie) if cookie.name() == self.cookie_name => {
                        values.extend(self.decode_value(cookie.value()));
                    }
                    Ok(_) => {}
                    Err(e) => log::debug!("Skipping unparsable cookie pair: {e}"),
                }
            }
        }
        values
    }
}

/// Parse a configured same-site value; an empty value omits the attribute
///
/// # Errors
///
/// Returns an error for anything other than `Strict`, `Lax`, `None` or empty
pub fn parse_same_site(value: &str) -> Result<Option<SameSite>, PolicyError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" => Ok(None),
        "strict" => Ok(Some(SameSite::Strict)),
        "lax" => Ok(Some(SameSite::Lax)),
        "none" => Ok(Some(SameSite::None)),
        _ => Err(PolicyError::InvalidSameSite(value.to_string())),
    }
}

/// RFC 7230 token without the `$` prefix reserved by RFC 2109
fn is_valid_cookie_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('$')
        && name
            .chars()
            .all(|c| c.is_ascii_graphic() && !"()<>@,;:\\\"/[]?={}".contains(c))
}

fn is_valid_attribute_value(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| !c.is_control() && c != ';')
}

//! Session identifier type
//!
//! A session identifier is an opaque token correlating a request with
//! server-held session state. It travels as a cookie value, so it is limited
//! to the RFC 6265 `cookie-octet` character set.

use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised when a string cannot be used as a session identifier
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionIdError {
    #[error("session identifier is empty")]
    Empty,

    #[error("session identifier contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// Validated session identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Parse a session identifier from a raw cookie value
    ///
    /// # Errors
    ///
    /// Returns an error if the value is empty or contains a character that is
    /// not allowed in a cookie value
    pub fn parse(value: impl Into<String>) -> Result<Self, SessionIdError> {
        let value = value.into();
        if value.is_empty() {
            return Err(SessionIdError::Empty);
        }
        if let Some(invalid) = value.chars().find(|c| !is_cookie_octet(*c)) {
            return Err(SessionIdError::InvalidCharacter(invalid));
        }
        Ok(Self(value))
    }

    /// Generate a fresh random session identifier
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for SessionId {
    type Error = SessionIdError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

/// RFC 6265 `cookie-octet`: %x21 / %x23-2B / %x2D-3A / %x3C-5B / %x5D-7E
pub(crate) const fn is_cookie_octet(c: char) -> bool {
    matches!(c, '\x21' | '\x23'..='\x2B' | '\x2D'..='\x3A' | '\x3C'..='\x5B' | '\x5D'..='\x7E')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_cookie_octets() {
        let id = SessionId::parse("abc-123_XYZ.~").unwrap();
        assert_eq!(id.as_str(), "abc-123_XYZ.~");
        assert_eq!(id.to_string(), "abc-123_XYZ.~");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_eq!(SessionId::parse(""), Err(SessionIdError::Empty));
    }

    #[test]
    fn test_parse_rejects_separators() {
        for (value, bad) in [
            ("a;b", ';'),
            ("a b", ' '),
            ("a,b", ','),
            ("a\"b", '"'),
            ("a\\b", '\\'),
            ("caf\u{e9}", '\u{e9}'),
        ] {
            assert_eq!(
                SessionId::parse(value),
                Err(SessionIdError::InvalidCharacter(bad)),
                "value {value:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_generate_is_valid_and_unique() {
        let first = SessionId::generate();
        let second = SessionId::generate();
        assert_ne!(first, second);
        assert!(SessionId::parse(first.as_str()).is_ok());
        assert_eq!(first.as_str().len(), 36);
    }
}

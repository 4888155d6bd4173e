//! Session Cookie Module
//!
//! Everything needed to carry a session identifier in a cross-domain cookie.
//!
//! # Modules
//!
//! - [`policy`] - The immutable cookie policy and `Set-Cookie` serialization
//! - [`resolver`] - Resolver and serializer traits plus the cookie-backed resolver
//! - [`id`] - Validated session identifiers

pub mod id;
pub mod policy;
pub mod resolver;

// Re-export commonly used items for convenience
pub use id::{SessionId, SessionIdError};
pub use policy::{
    parse_same_site, CookiePolicy, PolicyError, SESSION_COOKIE_NAME, SESSION_COOKIE_PATH,
    SESSION_SCOPED_MAX_AGE,
};
pub use resolver::{CookieSerializer, CookieSessionIdResolver, CookieValue, SessionIdResolver};

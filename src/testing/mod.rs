//! Testing utilities for the session cookie policy
//!
//! ## Organization
//!
//! - [`fixtures`] - Pre-built policies, resolvers and settings
//! - [`requests`] - HTTP request builders carrying session cookies
//! - [`assertions`] - Assertion helpers for `Set-Cookie` headers
//!
//! ## Usage
//!
//! ```ignore
//! use crossdomain_session::testing::{RequestBuilder, TestFixtures};
//!
//! let policy = TestFixtures::cross_domain_policy();
//! let req = RequestBuilder::new().with_session_cookie("abc").build();
//! assert!(policy.resolve_session_id(&req).is_some());
//! ```

pub mod assertions;
pub mod fixtures;
pub mod requests;

// Re-export commonly used items for convenience
pub use assertions::*;
pub use fixtures::TestFixtures;
pub use requests::RequestBuilder;

/// Common test constants
pub mod constants {
    /// Session identifier used by the scenario tests
    pub const TEST_SESSION_ID: &str = "xyz789";

    /// `Set-Cookie` value expected for [`TEST_SESSION_ID`] under the cross-domain policy
    pub const TEST_SET_COOKIE: &str = "JSESSIONID=xyz789; Path=/; Secure; SameSite=None";

    /// Origin of the single-page application calling the API
    pub const TEST_SPA_ORIGIN: &str = "https://app.example.com";

    /// Origin not present in the CORS allow list
    pub const TEST_FOREIGN_ORIGIN: &str = "https://evil.example.net";
}

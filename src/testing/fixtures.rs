//! Test fixtures providing pre-built test objects

use crate::session::{CookiePolicy, CookieSessionIdResolver, SessionId};
use crate::settings::{CookieSettings, SessionSettings};

use super::constants::{TEST_SESSION_ID, TEST_SPA_ORIGIN};

/// Central fixture provider for all test data
pub struct TestFixtures;

impl TestFixtures {
    /// The fixed production policy
    #[must_use]
    pub fn cross_domain_policy() -> CookiePolicy {
        CookiePolicy::cross_domain()
    }

    /// Resolver over the fixed production policy
    #[must_use]
    pub fn resolver() -> CookieSessionIdResolver {
        CookieSessionIdResolver::new(Self::cross_domain_policy())
    }

    /// Session identifier used by the scenario tests
    ///
    /// # Panics
    ///
    /// Panics if the test constant is not a valid identifier
    #[must_use]
    pub fn session_id() -> SessionId {
        SessionId::parse(TEST_SESSION_ID).expect("test session id is valid")
    }

    /// Cookie settings for local development over plain HTTP
    #[must_use]
    pub fn local_development_cookie() -> CookieSettings {
        CookieSettings {
            secure: false,
            same_site: "Lax".to_string(),
            ..CookieSettings::default()
        }
    }

    /// Settings allowing the test SPA origin
    #[must_use]
    pub fn settings() -> SessionSettings {
        let mut settings = SessionSettings::default();
        settings.application.cors_origins = TEST_SPA_ORIGIN.to_string();
        settings
    }
}

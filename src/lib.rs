#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

/// Version of the crossdomain-session application
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod app;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod session;
pub mod settings;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Re-export commonly used items
pub use handlers::{health, session_end, session_status};
pub use middleware::session_cookie;
pub use models::{ResolvedSession, SessionCookieCommand};
pub use session::{CookiePolicy, CookieSessionIdResolver, SessionId, SessionIdResolver};
pub use settings::SessionSettings;

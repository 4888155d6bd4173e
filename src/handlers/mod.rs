// HTTP request handlers for the session cookie endpoints
pub mod health;
pub mod session;

// Re-export the main handler functions
pub use health::health;
pub use session::{session_end, session_status};

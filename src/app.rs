//! Application wiring shared by the binary and the integration tests

use actix_cors::Cors;
use actix_web::web;

use crate::handlers::{health, session_end, session_status};

/// Register the session cookie endpoints
pub fn configure_services(cfg: &mut web::ServiceConfig) {
    cfg
        // Session endpoints
        .route("/api/session", web::get().to(session_status))
        .route("/api/session", web::post().to(session_end))
        .route("/api/session", web::delete().to(session_end))
        // Health endpoint
        .route("/ping", web::get().to(health));
}

/// CORS for credentialed cross-origin requests from the configured origins
///
/// Browsers only attach the `SameSite=None` session cookie to cross-origin
/// requests when the response allows credentials for the exact origin.
#[must_use]
pub fn build_cors(cors_origins: Vec<String>) -> Cors {
    Cors::default()
        .allowed_origin_fn(move |origin, _| {
            cors_origins
                .iter()
                .any(|allowed| allowed == origin.to_str().unwrap_or(""))
        })
        .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
        .allowed_headers(vec!["Authorization", "Content-Type", "Accept"])
        .supports_credentials()
        .max_age(3600)
}

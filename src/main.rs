#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use actix_web::{
    middleware::{from_fn, Logger},
    web, App, HttpServer,
};
use crossdomain_session::{
    app::{build_cors, configure_services},
    session_cookie,
    settings::SessionSettings,
    CookiePolicy, CookieSessionIdResolver,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load configuration from Settings.toml and environment variables
    // This also loads .env file and initializes the logger
    let settings = SessionSettings::load()
        .map_err(|e| std::io::Error::other(format!("Failed to load settings: {e:#}")))?;

    // Build the cookie policy once; it is shared immutably by every worker
    let policy = CookiePolicy::from_settings(&settings.cookie)
        .map_err(|e| std::io::Error::other(format!("Invalid session cookie policy: {e}")))?;
    if !policy.secure() {
        log::warn!("Session cookie is not Secure; use only for local development over HTTP");
    }

    start_server(policy, settings).await
}

/// Start the server with the session cookie middleware installed
///
/// # Errors
///
/// Returns an error if:
/// - Server binding fails
/// - Server fails to start
async fn start_server(policy: CookiePolicy, settings: SessionSettings) -> std::io::Result<()> {
    let bind_address = settings.get_bind_address();
    print_startup_info(&bind_address, &policy, &settings);

    let resolver = web::Data::new(CookieSessionIdResolver::new(policy));
    let cors_origins = settings.get_cors_origins();

    HttpServer::new(move || {
        App::new()
            .app_data(resolver.clone())
            .wrap(from_fn(session_cookie))
            .wrap(build_cors(cors_origins.clone()))
            .wrap(Logger::default())
            .configure(configure_services)
    })
    .bind(&bind_address)?
    .run()
    .await
}

fn print_startup_info(bind_address: &str, policy: &CookiePolicy, settings: &SessionSettings) {
    println!("Starting crossdomain-session on http://{bind_address}");
    println!();
    println!("Session cookie:");
    println!("  Name:      {}", policy.cookie_name());
    println!("  Path:      {}", policy.path());
    println!("  Secure:    {}", policy.secure());
    println!(
        "  SameSite:  {}",
        policy
            .same_site()
            .map_or_else(|| "(omitted)".to_string(), |same_site| same_site.to_string())
    );
    if policy.is_session_scoped() {
        println!("  Lifetime:  browser session");
    } else {
        println!("  Lifetime:  {}s", policy.max_age());
    }
    println!();
    println!("Session endpoints:");
    println!("  GET         /api/session - Resolve or issue the session cookie");
    println!("  POST|DELETE /api/session - Clear the session cookie");
    println!();
    println!("System endpoints:");
    println!("  GET  /ping            - Health check");
    println!();
    println!("CORS origins: {}", settings.get_cors_origins().join(", "));
}

//! Session cookie middleware
//!
//! Resolves the session identifier before the handler runs and writes the
//! `Set-Cookie` header the handler asked for afterwards.

use std::future::{ready, Ready};

use actix_web::{
    body::MessageBody,
    dev::{Payload, ServiceRequest, ServiceResponse},
    middleware::Next,
    web, Error, FromRequest, HttpMessage, HttpRequest, HttpResponse,
};

use crate::models::{ResolvedSession, SessionCookieCommand};
use crate::session::{CookieSessionIdResolver, SessionIdResolver};

/// Middleware body, install with `actix_web::middleware::from_fn(session_cookie)`
///
/// Requires `web::Data<CookieSessionIdResolver>` in app data. Without it
/// requests pass through untouched.
///
/// # Errors
///
/// Returns the error produced by the wrapped service
pub async fn session_cookie(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let Some(resolver) = req
        .app_data::<web::Data<CookieSessionIdResolver>>()
        .cloned()
    else {
        log::warn!("Session cookie middleware installed without a resolver");
        return next.call(req).await;
    };

    let session_id = resolver
        .resolve_session_ids(req.request())
        .into_iter()
        .next();
    log::debug!(
        "{} {}: session cookie present={}",
        req.method(),
        req.path(),
        session_id.is_some()
    );
    req.extensions_mut().insert(ResolvedSession::new(session_id));

    let mut res = next.call(req).await?;

    let command = res
        .response()
        .extensions()
        .get::<SessionCookieCommand>()
        .cloned();
    match command {
        Some(SessionCookieCommand::Issue(session_id)) => {
            resolver.set_session_id(res.response_mut(), &session_id);
        }
        Some(SessionCookieCommand::Expire) => resolver.expire_session(res.response_mut()),
        None => {}
    }

    Ok(res)
}

/// Attach a cookie command to a handler response
#[must_use]
pub fn with_session_command(mut res: HttpResponse, command: SessionCookieCommand) -> HttpResponse {
    res.extensions_mut().insert(command);
    res
}

impl FromRequest for ResolvedSession {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        if let Some(resolved) = req.extensions().get::<Self>() {
            return ready(Ok(resolved.clone()));
        }

        // Not behind the middleware: resolve directly from the configured policy
        let session_id = req
            .app_data::<web::Data<CookieSessionIdResolver>>()
            .and_then(|resolver| resolver.serializer().resolve_session_id(req));
        ready(Ok(Self::new(session_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::CookiePolicy;
    use actix_web::{http::header::SET_COOKIE, middleware::from_fn, test, App};

    async fn echo(session: ResolvedSession) -> HttpResponse {
        HttpResponse::Ok().body(
            session
                .session_id()
                .map_or_else(String::new, ToString::to_string),
        )
    }

    #[actix_web::test]
    async fn test_resolved_session_reaches_handler() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(CookieSessionIdResolver::new(
                    CookiePolicy::cross_domain(),
                )))
                .wrap(from_fn(session_cookie))
                .route("/", web::get().to(echo)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header(("Cookie", "JSESSIONID=abc"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert!(res.headers().get(SET_COOKIE).is_none());
        let body = test::read_body(res).await;
        assert_eq!(body, "abc");
    }

    #[actix_web::test]
    async fn test_extractor_without_middleware_uses_policy() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(CookieSessionIdResolver::new(
                    CookiePolicy::cross_domain(),
                )))
                .route("/", web::get().to(echo)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header(("Cookie", "JSESSIONID=direct"))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "direct");
    }

    #[actix_web::test]
    async fn test_missing_resolver_passes_through() {
        let app = test::init_service(
            App::new()
                .wrap(from_fn(session_cookie))
                .route("/", web::get().to(echo)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header(("Cookie", "JSESSIONID=abc"))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "");
    }
}

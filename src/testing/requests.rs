//! HTTP request builders for testing the session cookie policy

use actix_web::cookie::Cookie;
use actix_web::http::Method;
use actix_web::{test, HttpRequest};

use crate::session::SESSION_COOKIE_NAME;

/// Builder for creating HTTP requests for testing
pub struct RequestBuilder {
    method: Method,
    uri: String,
    headers: Vec<(String, String)>,
    cookies: Vec<Cookie<'static>>,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestBuilder {
    /// Create a new request builder
    #[must_use]
    pub fn new() -> Self {
        Self {
            method: Method::GET,
            uri: "/".to_string(),
            headers: Vec::new(),
            cookies: Vec::new(),
        }
    }

    /// Set the HTTP method
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Set the request URI
    #[must_use]
    pub fn uri(mut self, uri: &str) -> Self {
        self.uri = uri.to_string();
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Mark the request as coming from another site
    #[must_use]
    pub fn cross_site(self, origin: &str) -> Self {
        self.header("Origin", origin).header("Sec-Fetch-Site", "cross-site")
    }

    /// Add a cookie to the request
    #[must_use]
    pub fn with_cookie(mut self, cookie: Cookie<'static>) -> Self {
        self.cookies.push(cookie);
        self
    }

    /// Add the session cookie with the given value
    #[must_use]
    pub fn with_session_cookie(self, session_value: &str) -> Self {
        self.with_cookie(Cookie::new(SESSION_COOKIE_NAME, session_value.to_string()))
    }

    /// Add cookies from a raw cookie header string
    #[must_use]
    pub fn with_cookie_header(self, cookies: &str) -> Self {
        self.header("Cookie", cookies)
    }

    /// Build a `TestRequest`, e.g. for `actix_web::test::call_service`
    #[must_use]
    pub fn test_request(self) -> test::TestRequest {
        let mut req = test::TestRequest::default()
            .method(self.method)
            .uri(&self.uri);

        for (name, value) in self.headers {
            req = req.insert_header((name, value));
        }
        for cookie in self.cookies {
            req = req.cookie(cookie);
        }
        req
    }

    /// Build the final `HttpRequest`
    #[must_use]
    pub fn build(self) -> HttpRequest {
        self.test_request().to_http_request()
    }
}

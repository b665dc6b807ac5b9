//! Security headers middleware
//!
//! Every response, including errors, carries a fixed set of hardening
//! headers. The content security policy allows inline styles because the
//! entity visualization is styled with `style` attributes.
//!
//! Author: hephaex@gmail.com

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};

/// Headers applied to every response (lowercase names)
pub const SECURITY_HEADERS: [(&str, &str); 6] = [
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "DENY"),
    (
        "content-security-policy",
        "default-src 'self'; style-src 'self' 'unsafe-inline'; script-src 'none'; form-action 'self'",
    ),
    ("referrer-policy", "no-referrer"),
    ("cache-control", "no-store"),
    ("permissions-policy", "geolocation=(), camera=(), microphone=()"),
];

/// Add [`SECURITY_HEADERS`] to the response
pub async fn security_headers_middleware(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    for (name, value) in SECURITY_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }

    response
}

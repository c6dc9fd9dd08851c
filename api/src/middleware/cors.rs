//! CORS middleware configuration for cross-origin requests.
//!
//! The booking web app and the admin dashboard call the API from browsers.
//! With no configured origins every origin is accepted, which matches local
//! development; production deployments list their front-end origins in
//! `CORS_ALLOWED_ORIGINS`.

use actix_cors::Cors;
use actix_web::http::{header, Method};

/// Preflight cache lifetime in seconds
const MAX_AGE: usize = 3600;

/// Creates a CORS middleware instance for the configured origins.
pub fn create_cors(allowed_origins: &[String]) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::ACCEPT_LANGUAGE,
            header::CONTENT_TYPE,
        ])
        // Throttled clients read the wait time from this header
        .expose_headers(vec![header::RETRY_AFTER])
        .max_age(MAX_AGE);

    if allowed_origins.is_empty() {
        tracing::info!("Configuring CORS to accept any origin");
        return cors.allow_any_origin();
    }

    for origin in allowed_origins {
        tracing::info!("Adding allowed origin: {}", origin);
        cors = cors.allowed_origin(origin);
    }
    cors
}

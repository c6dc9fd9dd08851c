//! Route handlers and their registration

pub mod health;
pub mod otp;

use actix_web::{web, HttpResponse};

use cb_core::repositories::ChallengeStore;
use cb_shared::error_codes;

use crate::handlers::json_error_handler;

/// Register every route on an application or scope
///
/// The `AppState<S>` itself is attached by the caller.
pub fn configure<S: ChallengeStore + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .route("/health", web::get().to(health::health_check::<S>))
        .service(
            web::scope("/api")
                .route("/send-otp", web::post().to(otp::send_otp::<S>))
                .route("/verify-otp", web::post().to(otp::verify_otp::<S>))
                .route(
                    "/send-confirmation",
                    web::post().to(otp::send_confirmation::<S>),
                )
                .route("/status/{sid}", web::get().to(otp::message_status::<S>)),
        )
        .default_service(web::route().to(not_found));
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": error_codes::NOT_FOUND,
        "message": "The requested resource was not found"
    }))
}

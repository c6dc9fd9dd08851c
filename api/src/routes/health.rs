use actix_web::{web, HttpResponse};
use chrono::Utc;

use cb_core::repositories::ChallengeStore;

use crate::app::AppState;
use crate::dto::HealthResponse;

/// Health check endpoint handler
pub async fn health_check<S: ChallengeStore + 'static>(
    state: web::Data<AppState<S>>,
) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "OK".to_string(),
        service: "chairbook-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        dispatch_mode: state.otp_service.dispatch_mode().to_string(),
        timestamp: Utc::now(),
    })
}

use actix_web::{web, HttpRequest, HttpResponse};

use cb_core::repositories::ChallengeStore;

use crate::app::AppState;
use crate::handlers::{handle_domain_error, language_from_request};

/// Handler for GET /api/status/{sid}
///
/// Looks up delivery status for a message sent through the real transport.
/// Returns 400 when no real transport is configured.
pub async fn message_status<S: ChallengeStore + 'static>(
    req: HttpRequest,
    state: web::Data<AppState<S>>,
    sid: web::Path<String>,
) -> HttpResponse {
    let lang = language_from_request(&req);

    match state.otp_service.message_status(&sid).await {
        Ok(status) => HttpResponse::Ok().json(status),
        Err(error) => handle_domain_error(&error, lang),
    }
}

use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use cb_core::repositories::ChallengeStore;

use crate::app::AppState;
use crate::dto::VerifyOtpRequest;
use crate::handlers::{
    handle_domain_error, language_from_request, validation_error_response, verification_response,
};

/// Handler for POST /api/verify-otp
///
/// A matching code consumes the challenge. A wrong code leaves it in place;
/// an expired one removes it.
///
/// # Request Body
///
/// ```json
/// { "phone": "+972501234567", "code": "123456" }
/// ```
pub async fn verify_otp<S: ChallengeStore + 'static>(
    req: HttpRequest,
    state: web::Data<AppState<S>>,
    request: web::Json<VerifyOtpRequest>,
) -> HttpResponse {
    let lang = language_from_request(&req);

    if let Err(errors) = request.validate() {
        return validation_error_response(&errors, lang);
    }

    match state
        .otp_service
        .submit_challenge(&request.phone, &request.code)
        .await
    {
        Ok(outcome) => verification_response(outcome, lang),
        Err(error) => handle_domain_error(&error, lang),
    }
}

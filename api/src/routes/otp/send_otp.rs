use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use cb_core::repositories::ChallengeStore;
use cb_shared::phone::mask_phone_number;

use crate::app::AppState;
use crate::dto::{DispatchResponse, SendOtpRequest};
use crate::handlers::{handle_domain_error, language_from_request, localized, validation_error_response};

/// Handler for POST /api/send-otp
///
/// Issues a fresh 6-digit code for the phone and sends it by SMS, or
/// simulates the send when SMS is disabled.
///
/// # Request Body
///
/// ```json
/// { "phone": "0501234567" }
/// ```
///
/// # Responses
///
/// - `200` with `message`, `sid`, `status` and `resend_after`
/// - `400` invalid or missing phone
/// - `429` cooldown or hourly limit, with `Retry-After`
/// - `500`/`502`/`503` SMS configuration, rejection or outage
pub async fn send_otp<S: ChallengeStore + 'static>(
    req: HttpRequest,
    state: web::Data<AppState<S>>,
    request: web::Json<SendOtpRequest>,
) -> HttpResponse {
    let lang = language_from_request(&req);

    if let Err(errors) = request.validate() {
        return validation_error_response(&errors, lang);
    }

    tracing::info!(
        phone = %mask_phone_number(&request.phone),
        "Processing send-otp request"
    );

    match state.otp_service.request_challenge(&request.phone).await {
        Ok(issued) => {
            let message = if issued.transmitted() {
                localized(lang, "OTP sent via SMS", "تم إرسال رمز التحقق عبر SMS")
            } else {
                localized(
                    lang,
                    "OTP generated (SMS disabled)",
                    "تم إنشاء رمز التحقق (الرسائل معطلة)",
                )
            };
            HttpResponse::Ok().json(DispatchResponse {
                message,
                sid: issued.receipt.id,
                status: issued.receipt.status,
                resend_after: Some(issued.resend_after_seconds),
            })
        }
        Err(error) => handle_domain_error(&error, lang),
    }
}

use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use cb_core::repositories::ChallengeStore;

use crate::app::AppState;
use crate::dto::{DispatchResponse, SendConfirmationRequest};
use crate::handlers::{handle_domain_error, language_from_request, localized, validation_error_response};

/// Handler for POST /api/send-confirmation
///
/// Sends the booking confirmation notice. Only transmitted when the dispatch
/// mode is `all`; otherwise the send is simulated and `status` is `mocked`.
///
/// # Request Body
///
/// ```json
/// {
///     "phone": "0501234567",
///     "customerName": "Omar",
///     "barberName": "Sami",
///     "services": "Haircut",
///     "date": "2026-03-01",
///     "time": "10:30"
/// }
/// ```
pub async fn send_confirmation<S: ChallengeStore + 'static>(
    req: HttpRequest,
    state: web::Data<AppState<S>>,
    request: web::Json<SendConfirmationRequest>,
) -> HttpResponse {
    let lang = language_from_request(&req);

    if let Err(errors) = request.validate() {
        return validation_error_response(&errors, lang);
    }

    let booking = request.booking();
    match state
        .otp_service
        .send_confirmation(&request.phone, &booking)
        .await
    {
        Ok(receipt) => {
            let message = if !receipt.simulated {
                localized(
                    lang,
                    "Booking confirmation sent via SMS",
                    "تم إرسال رسالة التأكيد عبر SMS",
                )
            } else {
                localized(
                    lang,
                    "Booking confirmation processed (SMS disabled for this route)",
                    "تمت معالجة التأكيد (SMS معطل في هذا المسار)",
                )
            };

            HttpResponse::Ok().json(DispatchResponse {
                message,
                sid: receipt.id,
                status: receipt.status,
                resend_after: None,
            })
        }
        Err(error) => handle_domain_error(&error, lang),
    }
}

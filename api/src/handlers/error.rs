//! Mapping of domain results to localized HTTP responses

use actix_web::{
    error::{InternalError, JsonPayloadError},
    http::{header, StatusCode},
    HttpRequest, HttpResponse,
};
use validator::ValidationErrors;

use cb_core::errors::{DispatchError, DomainError, OtpError, ThrottleRejection};
use cb_core::services::otp::VerificationOutcome;
use cb_shared::{error_codes, ErrorResponse, Language};

use crate::dto::{ErrorResponseExt, VerifyOtpResponse};

/// Detect language preference from the Accept-Language header
pub fn language_from_request(req: &HttpRequest) -> Language {
    req.headers()
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
        .map(Language::from_accept_language)
        .unwrap_or_default()
}

/// Helper function to get localized message
pub fn localized(lang: Language, en: &str, ar: &str) -> String {
    match lang {
        Language::English => en.to_string(),
        Language::Arabic => ar.to_string(),
    }
}

/// Convert a domain error into the matching HTTP response
pub fn handle_domain_error(error: &DomainError, lang: Language) -> HttpResponse {
    match error {
        DomainError::Validation { message } => {
            tracing::warn!("Request rejected: {}", message);
            ErrorResponse::new(error_codes::BAD_REQUEST, message.clone())
                .to_response(StatusCode::BAD_REQUEST)
        }
        DomainError::Internal { message } => {
            tracing::error!("Internal error: {}", message);
            ErrorResponse::new(
                error_codes::INTERNAL_ERROR,
                localized(lang, "An internal error occurred", "حدث خطأ داخلي"),
            )
            .to_response(StatusCode::INTERNAL_SERVER_ERROR)
        }
        DomainError::Otp(otp_error) => handle_otp_error(otp_error, lang),
    }
}

fn handle_otp_error(error: &OtpError, lang: Language) -> HttpResponse {
    match error {
        OtpError::InvalidPhoneFormat { .. } => ErrorResponse::new(
            error_codes::PHONE_INVALID,
            localized(
                lang,
                "Invalid phone format. Use +9725XXXXXXXX or local 05XXXXXXXX",
                "صيغة رقم الهاتف غير صحيحة. استخدم +9725XXXXXXXX أو 05XXXXXXXX",
            ),
        )
        .to_response(StatusCode::BAD_REQUEST),
        OtpError::Throttled(rejection) => throttled_response(rejection, lang),
        OtpError::Dispatch(dispatch_error) => dispatch_error_response(dispatch_error, lang),
    }
}

fn throttled_response(rejection: &ThrottleRejection, lang: Language) -> HttpResponse {
    let retry_after = rejection.retry_after_seconds();
    let message = match rejection {
        ThrottleRejection::Cooldown { .. } => localized(
            lang,
            &rejection.to_string(),
            &format!("يرجى الانتظار {} ثانية قبل طلب رمز جديد.", retry_after),
        ),
        ThrottleRejection::WindowExceeded { .. } => localized(
            lang,
            &rejection.to_string(),
            &format!("طلبات كثيرة. يرجى المحاولة بعد {} ثانية.", retry_after),
        ),
    };

    HttpResponse::TooManyRequests()
        .insert_header((header::RETRY_AFTER, retry_after.to_string()))
        .json(
            ErrorResponse::new(error_codes::RATE_LIMIT_EXCEEDED, message)
                .add_detail("retry_after", retry_after),
        )
}

fn dispatch_error_response(error: &DispatchError, lang: Language) -> HttpResponse {
    tracing::error!(error = %error, "SMS dispatch failed");

    match error {
        DispatchError::Configuration { .. } => ErrorResponse::new(
            error_codes::SMS_CONFIGURATION_ERROR,
            localized(
                lang,
                "SMS service is not configured correctly",
                "خدمة الرسائل غير مهيأة بشكل صحيح",
            ),
        )
        .to_response(StatusCode::INTERNAL_SERVER_ERROR),
        DispatchError::Rejected { code, message } => ErrorResponse::new(
            error_codes::SMS_REJECTED,
            localized(
                lang,
                "The SMS provider rejected the message",
                "رفض مزود الرسائل إرسال الرسالة",
            ),
        )
        .add_detail("provider_code", code)
        .add_detail("provider_message", message)
        .to_response(StatusCode::BAD_GATEWAY),
        DispatchError::Unavailable { .. } => ErrorResponse::new(
            error_codes::SMS_UNAVAILABLE,
            localized(
                lang,
                "SMS service is temporarily unavailable. Please try again later",
                "خدمة الرسائل غير متاحة مؤقتاً. يرجى المحاولة لاحقاً",
            ),
        )
        .to_response(StatusCode::SERVICE_UNAVAILABLE),
    }
}

/// Response for a verification attempt: 200 when verified, 400 otherwise
pub fn verification_response(outcome: VerificationOutcome, lang: Language) -> HttpResponse {
    let (code, message) = match outcome {
        VerificationOutcome::Verified => {
            return HttpResponse::Ok().json(VerifyOtpResponse {
                message: localized(lang, "OTP verified successfully", "تم التحقق من الرمز بنجاح"),
                verified: true,
            });
        }
        VerificationOutcome::NoChallenge => (
            error_codes::NO_CHALLENGE,
            localized(
                lang,
                "No OTP sent to this phone",
                "لم يتم إرسال رمز تحقق لهذا الرقم",
            ),
        ),
        VerificationOutcome::Expired => (
            error_codes::CHALLENGE_EXPIRED,
            localized(
                lang,
                "OTP expired, please request a new one",
                "انتهت صلاحية الرمز، يرجى طلب رمز جديد",
            ),
        ),
        VerificationOutcome::Mismatch => (
            error_codes::INVALID_CODE,
            localized(lang, "Invalid OTP code", "رمز التحقق غير صحيح"),
        ),
    };

    ErrorResponse::new(code, message).to_response(StatusCode::BAD_REQUEST)
}

/// Convert request validation failures to a 400 response with per-field messages
pub fn validation_error_response(errors: &ValidationErrors, lang: Language) -> HttpResponse {
    let mut response = ErrorResponse::new(
        error_codes::VALIDATION_ERROR,
        localized(
            lang,
            "Invalid request data. Please check the required fields",
            "بيانات الطلب غير صالحة. يرجى التحقق من الحقول المطلوبة",
        ),
    );

    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<String> = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        response = response.add_detail(field, messages);
    }

    response.to_response(StatusCode::BAD_REQUEST)
}

/// Error handler for malformed JSON bodies
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    let lang = language_from_request(req);
    let response = ErrorResponse::new(
        error_codes::BAD_REQUEST,
        localized(lang, "Malformed JSON body", "صيغة JSON غير صالحة"),
    )
    .add_detail("reason", err.to_string())
    .to_response(StatusCode::BAD_REQUEST);

    InternalError::from_response(err, response).into()
}

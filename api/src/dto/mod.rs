pub mod error;
pub mod otp;

pub use error::ErrorResponseExt;
pub use otp::{
    DispatchResponse, HealthResponse, SendConfirmationRequest, SendOtpRequest, VerifyOtpRequest,
    VerifyOtpResponse,
};

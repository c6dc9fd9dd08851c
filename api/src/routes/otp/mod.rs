//! Phone verification and notification routes
//!
//! - `POST /api/send-otp` issues a code
//! - `POST /api/verify-otp` checks a code
//! - `POST /api/send-confirmation` sends the booking confirmation notice
//! - `GET /api/status/{sid}` reports provider delivery status

mod message_status;
mod send_confirmation;
mod send_otp;
mod verify_otp;

pub use message_status::message_status;
pub use send_confirmation::send_confirmation;
pub use send_otp::send_otp;
pub use verify_otp::verify_otp;

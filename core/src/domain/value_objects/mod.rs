//! Value objects representing immutable domain concepts.

pub mod dispatch;
pub mod phone_key;

// Re-export commonly used types
pub use dispatch::{
    BookingConfirmation, DispatchReceipt, DispatchRequest, MessageStatus, OperationTag,
    SIMULATED_STATUS,
};
pub use phone_key::{PhoneKey, DEFAULT_COUNTRY_CODE};

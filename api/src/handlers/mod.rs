pub mod error;

pub use error::{
    handle_domain_error, json_error_handler, language_from_request, localized,
    validation_error_response, verification_response,
};

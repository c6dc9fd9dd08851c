//! # Chairbook Core
//!
//! Phone verification engine for the Chairbook booking backend.
//! This crate contains the domain entities, the challenge store interface,
//! the issuance throttle, the dispatch mode policy and the OTP service that
//! ties them together.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;

//! Tests for the OTP service

mod mocks;
mod throttle_tests;

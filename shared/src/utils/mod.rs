//! Common utility functions

pub mod phone;

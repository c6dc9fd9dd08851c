//! Type definitions shared by the API and domain crates

pub mod language;

pub use language::Language;

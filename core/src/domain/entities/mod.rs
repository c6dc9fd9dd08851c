//! Domain entities representing core business objects.

pub mod challenge;

// Re-export commonly used types
pub use challenge::{
    canonical_code, generate_code, hash_code, ChallengeRecord, CODE_LENGTH,
    DEFAULT_EXPIRATION_MINUTES,
};

pub mod challenge;

pub use challenge::{ChallengeStore, InMemoryChallengeStore, RecordPredicate};

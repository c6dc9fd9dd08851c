pub mod r#trait {
    pub use super::trait_::*;
}
#[path = "trait.rs"]
mod trait_;
pub mod memory;

pub use memory::InMemoryChallengeStore;
pub use r#trait::{ChallengeStore, RecordPredicate};

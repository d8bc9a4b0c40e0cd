//! Test helpers shared across Pantry crates.

pub mod events;
pub mod inference;
pub mod storage;

pub use events::RecordingSink;
pub use inference::{
    EmptyInference, FailingInference, FixedInference, GatedInference, RecordingInference,
};
pub use storage::FailingStore;

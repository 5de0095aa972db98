#![no_std] // Shared by every crate, keep it allocation-only

extern crate alloc;

// Enable std if the feature is active (for tests/tools)
#[cfg(feature = "std")]
extern crate std;

pub mod ids;
pub mod morphology;

// Re-export core types for convenience
pub use ids::{EntryId, TagIndex};
pub use morphology::*;

pub mod model;
pub use model::*;

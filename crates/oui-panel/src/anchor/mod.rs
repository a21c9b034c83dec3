//! Tracked real-world anchors and the obstruction sets derived from them

mod obstruction;
mod registry;

pub use obstruction::{Obstruction, ObstructionSets, RayHit};
pub use registry::{AnchorRegistry, AnchorUpdate, TrackedAnchor, DEFAULT_ANCHOR_LIFETIME};

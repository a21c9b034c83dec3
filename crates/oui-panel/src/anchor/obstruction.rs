//! Main/side obstruction sets
//!
//! Each anchor casts a handful of rays from points on its surface toward the
//! viewer. The panel carries two colliders: a main one covering its body and
//! a side one around its edges. Whatever the rays hit decides which set the
//! anchor belongs to.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::trace;

/// What a single anchor-to-viewer ray hit first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RayHit {
    /// Nothing at all
    None,
    /// The panel's main collider
    Main,
    /// The panel's side collider
    Side,
    /// The viewer, unobstructed
    Viewer,
    /// Some other scene object
    Other,
}

/// How an anchor relates to the panel this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Obstruction {
    #[default]
    Clear,
    Main,
    Side,
}

impl Obstruction {
    /// Strongest obstruction among a set of ray results: any main hit wins,
    /// then any side hit.
    pub fn classify(hits: &[RayHit]) -> Self {
        if hits.contains(&RayHit::Main) {
            Obstruction::Main
        } else if hits.contains(&RayHit::Side) {
            Obstruction::Side
        } else {
            Obstruction::Clear
        }
    }
}

/// Anchor ids currently obstructing the panel, split by priority.
///
/// An id is in at most one of the two sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObstructionSets {
    main: BTreeSet<String>,
    side: BTreeSet<String>,
}

impl ObstructionSets {
    /// Create empty sets
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the latest classification for `id`. Returns true if either set
    /// changed.
    pub fn report(&mut self, id: &str, obstruction: Obstruction) -> bool {
        let changed = match obstruction {
            Obstruction::Main => {
                let removed = self.side.remove(id);
                self.main.insert(id.to_string()) || removed
            }
            Obstruction::Side => {
                let removed = self.main.remove(id);
                self.side.insert(id.to_string()) || removed
            }
            Obstruction::Clear => self.forget(id),
        };
        if changed {
            trace!(
                id,
                ?obstruction,
                main = self.main.len(),
                side = self.side.len(),
                "obstruction changed"
            );
        }
        changed
    }

    /// Remove `id` from both sets. Returns true if it was present.
    pub fn forget(&mut self, id: &str) -> bool {
        let main = self.main.remove(id);
        let side = self.side.remove(id);
        main || side
    }

    /// Number of anchors blocking the panel body
    pub fn main_count(&self) -> usize {
        self.main.len()
    }

    /// Number of anchors blocking the panel edges
    pub fn side_count(&self) -> usize {
        self.side.len()
    }

    pub fn contains_main(&self, id: &str) -> bool {
        self.main.contains(id)
    }

    pub fn contains_side(&self, id: &str) -> bool {
        self.side.contains(id)
    }

    pub fn main(&self) -> impl Iterator<Item = &str> {
        self.main.iter().map(String::as_str)
    }

    pub fn side(&self) -> impl Iterator<Item = &str> {
        self.side.iter().map(String::as_str)
    }

    /// Forget every obstruction
    pub fn clear(&mut self) {
        self.main.clear();
        self.side.clear();
    }
}

//! Anchor registry with fixed-lifetime expiry

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::spatial::{Point3D, Vector3D};

/// Anchors disappear this long after they were first spawned
pub const DEFAULT_ANCHOR_LIFETIME: Duration = Duration::from_secs(3);

/// A detected object reported by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorUpdate {
    pub id: String,
    pub position: Point3D,
    /// Width, height and depth of the marker
    pub extent: Vector3D,
}

impl AnchorUpdate {
    /// Create an update with a unit extent
    pub fn new(id: impl Into<String>, position: Point3D) -> Self {
        Self {
            id: id.into(),
            position,
            extent: Vector3D::new(1.0, 1.0, 1.0),
        }
    }

    pub fn with_extent(mut self, extent: Vector3D) -> Self {
        self.extent = extent;
        self
    }
}

/// An anchor currently placed in the world
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedAnchor {
    pub id: String,
    pub position: Point3D,
    pub extent: Vector3D,
    /// Session time of the first sighting; expiry counts from here
    pub spawned_at: Duration,
    /// Session time of the most recent update
    pub updated_at: Duration,
}

impl TrackedAnchor {
    /// Time since the anchor was first spawned
    pub fn age(&self, now: Duration) -> Duration {
        now.saturating_sub(self.spawned_at)
    }
}

/// All live anchors, keyed by id
#[derive(Debug, Clone)]
pub struct AnchorRegistry {
    anchors: BTreeMap<String, TrackedAnchor>,
    lifetime: Duration,
}

impl Default for AnchorRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_ANCHOR_LIFETIME)
    }
}

impl AnchorRegistry {
    /// Create an empty registry with the given anchor lifetime
    pub fn new(lifetime: Duration) -> Self {
        Self {
            anchors: BTreeMap::new(),
            lifetime,
        }
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Place a new anchor or move an existing one. Moving does not extend its
    /// lifetime. Returns true if the anchor was new.
    pub fn upsert(&mut self, update: AnchorUpdate, now: Duration) -> bool {
        if let Some(existing) = self.anchors.get_mut(&update.id) {
            existing.position = update.position;
            existing.extent = update.extent;
            existing.updated_at = now;
            return false;
        }

        info!("Anchor {} spawned at {:?}", update.id, update.position);
        self.anchors.insert(
            update.id.clone(),
            TrackedAnchor {
                id: update.id,
                position: update.position,
                extent: update.extent,
                spawned_at: now,
                updated_at: now,
            },
        );
        true
    }

    pub fn remove(&mut self, id: &str) -> Option<TrackedAnchor> {
        self.anchors.remove(id)
    }

    /// Drop every anchor whose lifetime has elapsed; returns their ids in
    /// ascending order.
    pub fn expire(&mut self, now: Duration) -> Vec<String> {
        let lifetime = self.lifetime;
        let expired: Vec<String> = self
            .anchors
            .values()
            .filter(|anchor| anchor.age(now) >= lifetime)
            .map(|anchor| anchor.id.clone())
            .collect();

        for id in &expired {
            self.anchors.remove(id);
            debug!("Anchor {} expired", id);
        }
        expired
    }

    /// Mean anchor position, `None` when no anchors are registered
    pub fn centroid(&self) -> Option<Point3D> {
        Point3D::centroid(self.anchors.values().map(|anchor| &anchor.position))
    }

    pub fn get(&self, id: &str) -> Option<&TrackedAnchor> {
        self.anchors.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.anchors.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackedAnchor> {
        self.anchors.values()
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }
}

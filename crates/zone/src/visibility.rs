//! Line-of-sight seam and visibility outcome types
//!
//! The occlusion backend is an external collaborator consumed through the
//! [`LineOfSight`] trait so the zone logic never depends on a specific
//! collision implementation.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::ops::{BitAnd, BitOr};

/// Category bit mask forwarded to the occlusion backend.
///
/// Each bit names one collision category; a ray only considers colliders
/// whose category intersects the mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// Mask matching every category
    pub const ALL: LayerMask = LayerMask(u32::MAX);
    /// Mask matching no category
    pub const NONE: LayerMask = LayerMask(0);

    /// True when the two masks share at least one category bit
    pub fn intersects(self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        LayerMask::ALL
    }
}

impl BitOr for LayerMask {
    type Output = LayerMask;
    fn bitor(self, rhs: LayerMask) -> LayerMask {
        LayerMask(self.0 | rhs.0)
    }
}

impl BitAnd for LayerMask {
    type Output = LayerMask;
    fn bitand(self, rhs: LayerMask) -> LayerMask {
        LayerMask(self.0 & rhs.0)
    }
}

/// Opaque handle to a collider reported by the occlusion backend
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ColliderId(pub u64);

/// A hit returned by the occlusion backend.
///
/// The collider reference is optional: a hit whose collider has already
/// been destroyed resolves to `None` and must be treated exactly like no
/// hit at all.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// The collider that was struck, if it still resolves
    pub collider: Option<ColliderId>,
    /// Distance from the ray origin to the hit point
    pub distance: f32,
}

impl RayHit {
    /// Whether this hit actually blocks the line of sight
    pub fn blocks(&self) -> bool {
        self.collider.is_some()
    }
}

/// Result of testing one sample point against a zone
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointVisibility {
    /// The point lies outside the zone; no occlusion query was issued
    Outside,
    /// The point lies inside the zone with an unobstructed line of sight
    Seen,
    /// The point lies inside the zone but something blocks the sight line
    Obstructed,
}

/// Synchronous line-of-sight query into the external collision backend.
///
/// The backend casts a bounded ray and reports the nearest hit, if any.
/// Calls block until the backend answers; the zone layer defines no
/// fallback policy for a stalled or failing backend.
pub trait LineOfSight {
    /// Cast a ray from `origin` along `direction` (unit length) up to
    /// `max_distance`, considering only colliders matching `filter`.
    fn cast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: LayerMask,
    ) -> Option<RayHit>;
}

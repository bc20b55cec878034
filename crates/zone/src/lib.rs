//! Zone geometry and line-of-sight kernels for the sightline detection
//! system.
//!
//! A detector watches one [`Zone`] per tick: a circle, sphere, planar
//! vision cone, or six-plane view frustum. Zones answer two questions
//! about a sample point:
//!
//! - [`Zone::contains_point`] — pure geometric containment;
//! - [`Zone::visibility`] — containment plus an occlusion probe through
//!   the [`LineOfSight`] backend, classifying the point as outside, seen,
//!   or obstructed.
//!
//! Shapes are configured through [`ZoneSpec`], validated once and
//! realized into a `Zone` from the owner's transform every tick. The
//! occlusion backend is injected as a trait so this crate carries no
//! collision dependency of its own.

mod error;
mod gizmo;
mod plane;
mod shape;
mod visibility;

pub use error::{GeometryError, Result};
pub use gizmo::GizmoSink;
pub use plane::{
    extract_frustum_planes, frustum_corners, Plane, PLANE_BOTTOM, PLANE_FAR, PLANE_LEFT,
    PLANE_NEAR, PLANE_RIGHT, PLANE_TOP,
};
pub use shape::{Zone, ZoneSpec};
pub use visibility::{ColliderId, LayerMask, LineOfSight, PointVisibility, RayHit};

// Re-export glam for convenience
pub use glam;

//! Zone shapes, containment kernels, and visibility probes
//!
//! A [`Zone`] is the geometric region one detector watches for one tick.
//! It is a small immutable value rebuilt every tick from the detector's
//! transform; derived quantities (half-angle cosine, frustum planes) are
//! recomputed per call rather than cached.
//!
//! Persisted configuration uses [`ZoneSpec`]: the shape parameters without
//! a transform, validated once and realized into a `Zone` each tick.

use crate::error::{GeometryError, Result};
use crate::plane::{extract_frustum_planes, PLANE_FAR, PLANE_NEAR};
use crate::visibility::{LayerMask, LineOfSight, PointVisibility};
use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Probes shorter than this are degenerate and count as seen without
/// consulting the occlusion backend.
const MIN_PROBE_LENGTH: f32 = 1e-6;

/// A detector's watch region for one tick.
///
/// Planar variants live in the XY plane; their visibility probes run at
/// `z = 0`. The 3D frustum uses the OpenGL basis convention (forward is
/// `orientation * -Z`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Zone {
    /// Planar disc around a center point
    Circle { center: Vec2, radius: f32 },
    /// Ball around a center point
    Sphere { center: Vec3, radius: f32 },
    /// Planar vision cone: apex, facing direction, half-angle, reach
    Frustum2d {
        origin: Vec2,
        forward: Vec2,
        half_angle: f32,
        radius: f32,
    },
    /// Six-plane view frustum
    Frustum3d {
        origin: Vec3,
        orientation: Quat,
        near: f32,
        far: f32,
        hfov: f32,
        aspect: f32,
    },
}

impl Zone {
    /// The point occlusion probes are anchored at: the center for round
    /// shapes, the apex for cones and frustums.
    pub fn reference_point(&self) -> Vec3 {
        match *self {
            Zone::Circle { center, .. } => center.extend(0.0),
            Zone::Sphere { center, .. } => center,
            Zone::Frustum2d { origin, .. } => origin.extend(0.0),
            Zone::Frustum3d { origin, .. } => origin,
        }
    }

    /// Pure containment test, boundary inclusive. Planar variants ignore
    /// the point's z component.
    pub fn contains_point(&self, point: Vec3) -> bool {
        match *self {
            Zone::Circle { center, radius } => {
                (point.truncate() - center).length_squared() <= radius * radius
            }
            Zone::Sphere { center, radius } => {
                (point - center).length_squared() <= radius * radius
            }
            Zone::Frustum2d {
                origin,
                forward,
                half_angle,
                radius,
            } => {
                let to_point = point.truncate() - origin;
                let dist_sq = to_point.length_squared();
                if dist_sq > radius * radius {
                    return false;
                }
                let along = forward.dot(to_point);
                if along < 0.0 {
                    return false;
                }
                // dot / |to| >= cos(half_angle), in multiplied form so the
                // apex itself (zero length) stays inside.
                along >= half_angle.cos() * dist_sq.sqrt()
            }
            Zone::Frustum3d {
                origin,
                orientation,
                near,
                far,
                hfov,
                aspect,
            } => {
                let height = frustum_height(near, far, hfov, aspect);
                let planes = extract_frustum_planes(origin, orientation, height, aspect, near, far);
                planes.iter().all(|plane| plane.contains(point))
            }
        }
    }

    /// Classify a sample point: outside, seen, or obstructed.
    ///
    /// Containment is tested first; points outside the zone never touch
    /// the backend. Inside, a ray runs from the reference point toward the
    /// sample, clamped to the lesser of the exact distance and the zone's
    /// own reach; for the 3D frustum the target is first clipped onto the
    /// near/far planes so the ray never leaves the depth slab. A
    /// zero-length probe is seen without a query, and a hit whose collider
    /// no longer resolves counts as no hit.
    pub fn visibility(
        &self,
        point: Vec3,
        los: &impl LineOfSight,
        filter: LayerMask,
    ) -> PointVisibility {
        if !self.contains_point(point) {
            return PointVisibility::Outside;
        }

        let origin = self.reference_point();
        let (target, reach) = match *self {
            Zone::Circle { radius, .. } => (point.truncate().extend(0.0), radius),
            Zone::Sphere { radius, .. } => (point, radius),
            Zone::Frustum2d { radius, .. } => (point.truncate().extend(0.0), radius),
            Zone::Frustum3d {
                origin,
                orientation,
                near,
                far,
                hfov,
                aspect,
            } => {
                let height = frustum_height(near, far, hfov, aspect);
                let planes = extract_frustum_planes(origin, orientation, height, aspect, near, far);
                let mut target = point;
                if !planes[PLANE_NEAR].contains(target) {
                    target = planes[PLANE_NEAR].project(target);
                }
                if !planes[PLANE_FAR].contains(target) {
                    target = planes[PLANE_FAR].project(target);
                }
                (target, far)
            }
        };

        let offset = target - origin;
        let distance = offset.length().min(reach);
        if distance < MIN_PROBE_LENGTH {
            return PointVisibility::Seen;
        }

        let direction = offset / offset.length();
        match los.cast(origin, direction, distance, filter) {
            Some(hit) if hit.blocks() => PointVisibility::Obstructed,
            _ => PointVisibility::Seen,
        }
    }
}

/// Full height of the far rectangle for a frustum described by its
/// horizontal field of view. Width spans the depth range, height follows
/// from the aspect ratio.
pub(crate) fn frustum_height(near: f32, far: f32, hfov: f32, aspect: f32) -> f32 {
    let width = 2.0 * (far - near) * (hfov / 2.0).tan();
    width / aspect
}

/// Shape parameters without a transform: the persisted configuration form
/// of a zone.
///
/// Validate once at construction, then [`realize`](ZoneSpec::realize) into
/// a [`Zone`] each tick from the owner's current position and rotation.
/// Realization is infallible for a validated spec.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ZoneSpec {
    Circle { radius: f32 },
    Sphere { radius: f32 },
    Frustum2d { half_angle: f32, radius: f32 },
    Frustum3d { near: f32, far: f32, hfov: f32, aspect: f32 },
}

impl ZoneSpec {
    /// Fail fast on non-finite or degenerate parameters.
    ///
    /// Catching these here keeps non-finite values out of the plane
    /// extraction and containment kernels entirely.
    pub fn validate(&self) -> Result<()> {
        match *self {
            ZoneSpec::Circle { radius } | ZoneSpec::Sphere { radius } => {
                check_positive("radius", radius)?;
            }
            ZoneSpec::Frustum2d { half_angle, radius } => {
                check_positive("radius", radius)?;
                check_angle("half_angle", half_angle, std::f32::consts::PI)?;
            }
            ZoneSpec::Frustum3d {
                near,
                far,
                hfov,
                aspect,
            } => {
                check_positive("near", near)?;
                check_positive("far", far)?;
                check_positive("aspect", aspect)?;
                check_angle("hfov", hfov, std::f32::consts::PI)?;
                if near >= far {
                    return Err(GeometryError::DegenerateDepthRange { near, far });
                }
            }
        }
        Ok(())
    }

    /// Build the tick's zone snapshot from the owner's transform.
    ///
    /// Planar shapes take their center from the XY components of
    /// `position` and face along the rotated +X axis; 3D shapes use the
    /// transform as-is.
    pub fn realize(&self, position: Vec3, rotation: Quat) -> Zone {
        match *self {
            ZoneSpec::Circle { radius } => Zone::Circle {
                center: position.truncate(),
                radius,
            },
            ZoneSpec::Sphere { radius } => Zone::Sphere {
                center: position,
                radius,
            },
            ZoneSpec::Frustum2d { half_angle, radius } => Zone::Frustum2d {
                origin: position.truncate(),
                forward: (rotation * Vec3::X).truncate().normalize_or(Vec2::X),
                half_angle,
                radius,
            },
            ZoneSpec::Frustum3d {
                near,
                far,
                hfov,
                aspect,
            } => Zone::Frustum3d {
                origin: position,
                orientation: rotation,
                near,
                far,
                hfov,
                aspect,
            },
        }
    }
}

fn check_positive(name: &'static str, value: f32) -> Result<()> {
    if !value.is_finite() {
        return Err(GeometryError::NonFinite(name));
    }
    if value <= 0.0 {
        return Err(GeometryError::NonPositive(name, value));
    }
    Ok(())
}

fn check_angle(name: &'static str, value: f32, max: f32) -> Result<()> {
    if !value.is_finite() {
        return Err(GeometryError::NonFinite(name));
    }
    if value <= 0.0 || value >= max {
        return Err(GeometryError::AngleOutOfRange {
            name,
            value,
            min: 0.0,
            max,
        });
    }
    Ok(())
}

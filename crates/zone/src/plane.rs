//! Plane kernels and frustum plane extraction
//!
//! Pure geometry, no state, no I/O. Planes are oriented so that "inside"
//! means a non-negative signed distance; the six planes of a frustum all
//! face inward, so a point is inside the frustum exactly when every plane
//! contains it.

use glam::{Quat, Vec3};

/// Index of the left plane in the array returned by [`extract_frustum_planes`]
pub const PLANE_LEFT: usize = 0;
/// Index of the top plane
pub const PLANE_TOP: usize = 1;
/// Index of the right plane
pub const PLANE_RIGHT: usize = 2;
/// Index of the bottom plane
pub const PLANE_BOTTOM: usize = 3;
/// Index of the near plane
pub const PLANE_NEAR: usize = 4;
/// Index of the far plane
pub const PLANE_FAR: usize = 5;

/// An oriented plane in 3D space.
///
/// Stored as a unit normal plus the signed distance from the origin along
/// that normal, so that `normal.dot(p) + distance` is the signed distance
/// of `p` from the plane. Points on the positive side (distance >= 0)
/// count as inside the half-space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    /// Unit normal of the plane
    pub normal: Vec3,
    /// Signed distance from the origin along the normal
    pub distance: f32,
}

impl Plane {
    /// Create a plane from a unit normal and a point on the plane
    pub fn from_normal_and_point(normal: Vec3, point: Vec3) -> Self {
        Self {
            normal,
            distance: -normal.dot(point),
        }
    }

    /// Create a plane from three points in counter-clockwise winding.
    ///
    /// The normal follows the right-hand rule: counter-clockwise when
    /// viewed from the side the normal points toward.
    pub fn from_points(a: Vec3, b: Vec3, c: Vec3) -> Self {
        let normal = (b - a).cross(c - a).normalize();
        Self {
            normal,
            distance: -normal.dot(a),
        }
    }

    /// Signed distance of `point` from the plane (positive = inside)
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }

    /// Half-space test, boundary inclusive.
    pub fn contains(&self, point: Vec3) -> bool {
        self.signed_distance(point) >= 0.0
    }

    /// Orthogonal projection of `point` onto the plane.
    ///
    /// Used to clip a probe target back onto the near/far plane before an
    /// occlusion ray is issued; the ray must never leave the frustum's
    /// depth slab.
    pub fn project(&self, point: Vec3) -> Vec3 {
        point - self.signed_distance(point) * self.normal
    }
}

/// Extract the six inward-facing planes of a view frustum.
///
/// The basis follows the OpenGL convention used across the codebase:
/// forward is `orientation * -Z`, right is `orientation * X`, up is
/// `orientation * Y`.
///
/// `vertical_extent` is the full height of the far rectangle; the far
/// half-width is the half-height scaled by `aspect`, and the near
/// rectangle's half-extents are the far ones scaled by `near / far`.
///
/// # Returns
/// Planes in the order left, top, right, bottom, near, far (see the
/// `PLANE_*` index constants).
pub fn extract_frustum_planes(
    position: Vec3,
    orientation: Quat,
    vertical_extent: f32,
    aspect: f32,
    near: f32,
    far: f32,
) -> [Plane; 6] {
    let [nbl, nbr, ntl, ntr, fbl, fbr, ftl, ftr] =
        frustum_corners(position, orientation, vertical_extent, aspect, near, far);

    // Corner triples chosen so every normal faces the frustum interior.
    [
        Plane::from_points(nbl, fbl, ftl), // left
        Plane::from_points(ntr, ntl, ftl), // top
        Plane::from_points(nbr, ntr, ftr), // right
        Plane::from_points(nbl, nbr, fbr), // bottom
        Plane::from_points(nbl, ntl, ntr), // near
        Plane::from_points(fbl, fbr, ftr), // far
    ]
}

/// Compute the eight corners of a view frustum.
///
/// Order: near bottom-left, near bottom-right, near top-left, near
/// top-right, then the same four at the far depth.
pub fn frustum_corners(
    position: Vec3,
    orientation: Quat,
    vertical_extent: f32,
    aspect: f32,
    near: f32,
    far: f32,
) -> [Vec3; 8] {
    let forward = orientation * Vec3::NEG_Z;
    let right = orientation * Vec3::X;
    let up = orientation * Vec3::Y;

    let half_height_far = vertical_extent / 2.0;
    let half_width_far = half_height_far * aspect;
    let near_scale = near / far;
    let half_height_near = half_height_far * near_scale;
    let half_width_near = half_width_far * near_scale;

    let near_center = position + forward * near;
    let far_center = position + forward * far;

    [
        near_center - right * half_width_near - up * half_height_near,
        near_center + right * half_width_near - up * half_height_near,
        near_center - right * half_width_near + up * half_height_near,
        near_center + right * half_width_near + up * half_height_near,
        far_center - right * half_width_far - up * half_height_far,
        far_center + right * half_width_far - up * half_height_far,
        far_center - right * half_width_far + up * half_height_far,
        far_center + right * half_width_far + up * half_height_far,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn half_space_is_boundary_inclusive() {
        let plane = Plane::from_normal_and_point(Vec3::Y, Vec3::ZERO);

        assert!(plane.contains(Vec3::new(3.0, 1.0, -2.0)));
        assert!(plane.contains(Vec3::new(5.0, 0.0, 5.0)), "boundary point counts as inside");
        assert!(!plane.contains(Vec3::new(0.0, -0.001, 0.0)));
    }

    #[test]
    fn projection_lands_on_plane() {
        let plane = Plane::from_normal_and_point(Vec3::Y, Vec3::new(0.0, 2.0, 0.0));
        let projected = plane.project(Vec3::new(1.0, 7.0, -3.0));

        assert!(plane.signed_distance(projected).abs() < EPS);
        assert_eq!(projected, Vec3::new(1.0, 2.0, -3.0));
    }

    #[test]
    fn from_points_follows_right_hand_winding() {
        // Counter-clockwise in the XZ plane seen from +Y
        let plane = Plane::from_points(
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, -1.0),
        );

        assert!((plane.normal - Vec3::Y).length() < EPS);
    }

    #[test]
    fn frustum_corners_classified_inside() {
        let position = Vec3::new(1.0, 2.0, 3.0);
        let orientation = Quat::from_rotation_y(0.7);
        let (vertical_extent, aspect, near, far) = (4.0, 1.5, 1.0, 10.0);

        let planes =
            extract_frustum_planes(position, orientation, vertical_extent, aspect, near, far);
        let corners = frustum_corners(position, orientation, vertical_extent, aspect, near, far);

        for corner in corners {
            for plane in &planes {
                assert!(
                    plane.signed_distance(corner) >= -EPS,
                    "corner {:?} should sit inside or on plane {:?}",
                    corner,
                    plane
                );
            }
        }

        // The frustum centroid is strictly inside every plane.
        let centroid = corners.iter().sum::<Vec3>() / 8.0;
        for plane in &planes {
            assert!(plane.signed_distance(centroid) > 0.0);
        }
    }

    #[test]
    fn point_beyond_far_fails_the_far_plane() {
        let orientation = Quat::IDENTITY;
        let planes = extract_frustum_planes(Vec3::ZERO, orientation, 4.0, 1.0, 1.0, 10.0);

        let forward = orientation * Vec3::NEG_Z;
        let beyond = forward * 20.0;

        assert!(!planes[PLANE_FAR].contains(beyond));
        // It still satisfies the near plane, which faces forward.
        assert!(planes[PLANE_NEAR].contains(beyond));
    }

    #[test]
    fn near_and_far_normals_face_each_other() {
        let orientation = Quat::from_rotation_x(-0.3);
        let planes = extract_frustum_planes(Vec3::ZERO, orientation, 2.0, 1.0, 0.5, 5.0);
        let forward = orientation * Vec3::NEG_Z;

        assert!((planes[PLANE_NEAR].normal - forward).length() < EPS);
        assert!((planes[PLANE_FAR].normal + forward).length() < EPS);
    }
}

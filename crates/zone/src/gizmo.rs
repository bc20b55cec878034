//! Debug outline emission for zones
//!
//! Tooling-only: outlines feed whatever line renderer the host provides
//! and have no effect on detection results.

use crate::shape::{frustum_height, Zone};
use crate::plane::frustum_corners;
use glam::{Vec2, Vec3};

/// Number of segments used for rings and arcs
const RING_SEGMENTS: usize = 32;

/// Receiver for debug line segments.
///
/// Implemented by the host's debug renderer; the zone layer only emits
/// segments and never draws anything itself.
pub trait GizmoSink {
    /// Emit one line segment
    fn line(&mut self, from: Vec3, to: Vec3);
}

impl GizmoSink for Vec<(Vec3, Vec3)> {
    fn line(&mut self, from: Vec3, to: Vec3) {
        self.push((from, to));
    }
}

impl Zone {
    /// Emit the zone's outline as line segments.
    ///
    /// Circles draw one ring, spheres three axis-aligned rings, cones an
    /// arc plus their two edges, and frustums their twelve edges.
    pub fn outline(&self, sink: &mut impl GizmoSink) {
        match *self {
            Zone::Circle { center, radius } => {
                ring(sink, center.extend(0.0), Vec3::X, Vec3::Y, radius);
            }
            Zone::Sphere { center, radius } => {
                ring(sink, center, Vec3::X, Vec3::Y, radius);
                ring(sink, center, Vec3::X, Vec3::Z, radius);
                ring(sink, center, Vec3::Y, Vec3::Z, radius);
            }
            Zone::Frustum2d {
                origin,
                forward,
                half_angle,
                radius,
            } => {
                let apex = origin.extend(0.0);
                let left = Vec2::from_angle(half_angle).rotate(forward);
                let right = Vec2::from_angle(-half_angle).rotate(forward);
                sink.line(apex, apex + (left * radius).extend(0.0));
                sink.line(apex, apex + (right * radius).extend(0.0));

                let mut prev = apex + (right * radius).extend(0.0);
                for i in 1..=RING_SEGMENTS {
                    let t = i as f32 / RING_SEGMENTS as f32;
                    let angle = -half_angle + 2.0 * half_angle * t;
                    let dir = Vec2::from_angle(angle).rotate(forward);
                    let next = apex + (dir * radius).extend(0.0);
                    sink.line(prev, next);
                    prev = next;
                }
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
                let [nbl, nbr, ntl, ntr, fbl, fbr, ftl, ftr] =
                    frustum_corners(origin, orientation, height, aspect, near, far);

                // Near rectangle, far rectangle, then the connecting edges.
                for (a, b) in [
                    (nbl, nbr),
                    (nbr, ntr),
                    (ntr, ntl),
                    (ntl, nbl),
                    (fbl, fbr),
                    (fbr, ftr),
                    (ftr, ftl),
                    (ftl, fbl),
                    (nbl, fbl),
                    (nbr, fbr),
                    (ntl, ftl),
                    (ntr, ftr),
                ] {
                    sink.line(a, b);
                }
            }
        }
    }
}

fn ring(sink: &mut impl GizmoSink, center: Vec3, axis_a: Vec3, axis_b: Vec3, radius: f32) {
    let mut prev = center + axis_a * radius;
    for i in 1..=RING_SEGMENTS {
        let angle = i as f32 / RING_SEGMENTS as f32 * std::f32::consts::TAU;
        let next = center + (axis_a * angle.cos() + axis_b * angle.sin()) * radius;
        sink.line(prev, next);
        prev = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    #[test]
    fn circle_outline_closes_the_ring() {
        let zone = Zone::Circle {
            center: Vec2::new(2.0, 0.0),
            radius: 1.0,
        };
        let mut segments: Vec<(Vec3, Vec3)> = Vec::new();
        zone.outline(&mut segments);

        assert_eq!(segments.len(), RING_SEGMENTS);
        // Segments chain end to end and close back at the start.
        for pair in segments.windows(2) {
            assert_eq!(pair[0].1, pair[1].0);
        }
        assert_eq!(segments.first().unwrap().0, segments.last().unwrap().1);
        // Every vertex sits on the circle.
        for (from, _) in &segments {
            let r = (from.truncate() - Vec2::new(2.0, 0.0)).length();
            assert!((r - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn frustum_outline_has_twelve_edges() {
        let zone = Zone::Frustum3d {
            origin: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            near: 1.0,
            far: 10.0,
            hfov: 1.0,
            aspect: 1.0,
        };
        let mut segments: Vec<(Vec3, Vec3)> = Vec::new();
        zone.outline(&mut segments);
        assert_eq!(segments.len(), 12);
    }

    #[test]
    fn cone_outline_spans_the_half_angle() {
        let zone = Zone::Frustum2d {
            origin: Vec2::ZERO,
            forward: Vec2::X,
            half_angle: 0.5,
            radius: 2.0,
        };
        let mut segments: Vec<(Vec3, Vec3)> = Vec::new();
        zone.outline(&mut segments);

        // Two edges plus the arc.
        assert_eq!(segments.len(), 2 + RING_SEGMENTS);
        assert_eq!(segments[0].0, Vec3::ZERO);
        assert_eq!(segments[1].0, Vec3::ZERO);
    }
}

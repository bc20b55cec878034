//! Scene files for the testbed
//!
//! A scene is a JSON document describing detectors, objects, and the
//! sphere occluders that the built-in line-of-sight backend tests rays
//! against. Presentation fields (outline emission) never affect
//! detection results.

use anyhow::Context;
use detect::{DetectableObject, Detector, DetectorId, ObjectId, ObjectRegistry, SampleLayout};
use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use zone::{ColliderId, LayerMask, LineOfSight, RayHit, ZoneSpec};

/// A complete testbed scene
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub detectors: Vec<DetectorScene>,
    #[serde(default)]
    pub objects: Vec<ObjectScene>,
    #[serde(default)]
    pub occluders: Vec<SphereOccluder>,
}

/// One detector entry in a scene file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorScene {
    pub zone: ZoneSpec,
    #[serde(default)]
    pub position: Vec3,
    /// Euler rotation in degrees, XYZ order
    #[serde(default)]
    pub rotation_degrees: Vec3,
    #[serde(default)]
    pub filter: LayerMask,
    #[serde(default)]
    pub ghost_capable: bool,
}

/// One trackable object entry in a scene file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectScene {
    #[serde(default)]
    pub position: Vec3,
    /// Constant drift applied every tick
    #[serde(default)]
    pub velocity: Vec3,
    #[serde(default)]
    pub ghost: bool,
    /// Extra local-space sample offsets; empty means a single sample at
    /// the object position
    #[serde(default)]
    pub sample_offsets: Vec<Vec3>,
}

/// A blocking sphere for the built-in occlusion backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SphereOccluder {
    pub center: Vec3,
    pub radius: f32,
    #[serde(default)]
    pub layers: LayerMask,
}

impl Scene {
    /// Load a scene from a JSON file
    pub fn load(path: &Path) -> anyhow::Result<Scene> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read scene file {}", path.display()))?;
        let scene: Scene = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse scene file {}", path.display()))?;
        Ok(scene)
    }

    /// The built-in demo scene: one circle sentry, one narrow cone, one
    /// orbiting intruder, one ghost, and a wall between sentry and spawn.
    pub fn demo() -> Scene {
        Scene {
            detectors: vec![
                DetectorScene {
                    zone: ZoneSpec::Circle { radius: 8.0 },
                    position: Vec3::ZERO,
                    rotation_degrees: Vec3::ZERO,
                    filter: LayerMask::ALL,
                    ghost_capable: false,
                },
                DetectorScene {
                    zone: ZoneSpec::Frustum2d {
                        half_angle: 0.4,
                        radius: 12.0,
                    },
                    position: Vec3::new(-5.0, 0.0, 0.0),
                    rotation_degrees: Vec3::ZERO,
                    filter: LayerMask::ALL,
                    ghost_capable: true,
                },
            ],
            objects: vec![
                ObjectScene {
                    position: Vec3::new(10.0, 0.0, 0.0),
                    velocity: Vec3::new(-0.5, 0.0, 0.0),
                    ghost: false,
                    sample_offsets: vec![Vec3::ZERO, Vec3::new(0.0, 0.5, 0.0)],
                },
                ObjectScene {
                    position: Vec3::new(2.0, 3.0, 0.0),
                    velocity: Vec3::ZERO,
                    ghost: true,
                    sample_offsets: Vec::new(),
                },
            ],
            occluders: vec![SphereOccluder {
                center: Vec3::new(5.0, 0.0, 0.0),
                radius: 1.0,
                layers: LayerMask::ALL,
            }],
        }
    }

    /// Register every scene object, returning ids paired with their
    /// drift velocities for the tick loop.
    pub fn build_registry(&self) -> (ObjectRegistry, Vec<(ObjectId, Vec3)>) {
        let mut registry = ObjectRegistry::new();
        let mut motions = Vec::with_capacity(self.objects.len());
        for entry in &self.objects {
            let mut object = DetectableObject::new(entry.position).with_ghost(entry.ghost);
            if !entry.sample_offsets.is_empty() {
                object = object.with_layout(SampleLayout::Offsets {
                    points: entry.sample_offsets.clone(),
                });
            }
            let id = registry.insert(object);
            motions.push((id, entry.velocity));
        }
        (registry, motions)
    }

    /// Build the scene's detectors, validating each zone spec
    pub fn build_detectors(&self) -> anyhow::Result<Vec<Detector>> {
        self.detectors
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let rot = entry.rotation_degrees;
                let rotation = Quat::from_euler(
                    EulerRot::XYZ,
                    rot.x.to_radians(),
                    rot.y.to_radians(),
                    rot.z.to_radians(),
                );
                let detector = Detector::new(
                    DetectorId(i as u32),
                    entry.zone.clone(),
                    entry.filter,
                    entry.ghost_capable,
                )
                .with_context(|| format!("detector {i} has an invalid zone"))?
                .with_transform(entry.position, rotation);
                Ok(detector)
            })
            .collect()
    }

    /// Build the occlusion backend from the scene's occluders
    pub fn build_occluders(&self) -> SphereField {
        SphereField {
            spheres: self.occluders.clone(),
        }
    }
}

/// Analytic line-of-sight backend: a flat list of blocking spheres.
///
/// Stands in for a real collision engine; the nearest sphere whose
/// layers intersect the query filter blocks the ray.
#[derive(Debug, Clone, Default)]
pub struct SphereField {
    spheres: Vec<SphereOccluder>,
}

impl SphereField {
    pub fn new(spheres: Vec<SphereOccluder>) -> Self {
        Self { spheres }
    }
}

impl LineOfSight for SphereField {
    fn cast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: LayerMask,
    ) -> Option<RayHit> {
        let mut nearest: Option<RayHit> = None;
        for (index, sphere) in self.spheres.iter().enumerate() {
            if !filter.intersects(sphere.layers) {
                continue;
            }
            // Quadratic ray-sphere intersection with a unit direction.
            let to_center = origin - sphere.center;
            let b = to_center.dot(direction);
            let c = to_center.length_squared() - sphere.radius * sphere.radius;
            let disc = b * b - c;
            if disc < 0.0 {
                continue;
            }
            let t = -b - disc.sqrt();
            if t < 0.0 || t > max_distance {
                continue;
            }
            if nearest.map_or(true, |hit| t < hit.distance) {
                nearest = Some(RayHit {
                    collider: Some(ColliderId(index as u64)),
                    distance: t,
                });
            }
        }
        nearest
    }
}

//! Trackable objects and their sample points

use crate::result::OperationResult;
use crate::DetectorId;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Identity of a trackable object, assigned by the registry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub u32);

/// How an object derives its sample points from its transform.
///
/// `Single` samples the object's position; `Offsets` samples one point
/// per local-space offset, rotated into world space. The first sample
/// that a zone sees wins, so put the most representative point first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum SampleLayout {
    Single,
    Offsets { points: Vec<Vec3> },
}

impl Default for SampleLayout {
    fn default() -> Self {
        SampleLayout::Single
    }
}

impl SampleLayout {
    /// Number of sample points this layout produces
    pub fn sample_count(&self) -> usize {
        match self {
            SampleLayout::Single => 1,
            SampleLayout::Offsets { points } => points.len(),
        }
    }
}

/// An entity that detectors can see.
///
/// Objects own their sample buffer; the update pass refreshes it from the
/// current transform before any detector scans. The `detected_by` set is
/// a non-owning reverse index of detector detected-sets and stays
/// symmetric with them: an object holds a detector's id exactly when that
/// detector holds the object's id.
#[derive(Clone, Debug)]
pub struct DetectableObject {
    /// Position in world space
    pub position: Vec3,
    /// Rotation applied to sample offsets
    pub rotation: Quat,
    /// Geometrically visible but non-detectable when set
    pub ghost: bool,
    /// Cleared when the object should fail basic validity
    pub active: bool,
    layout: SampleLayout,
    samples: Vec<Vec3>,
    detected_by: HashSet<DetectorId>,
}

impl DetectableObject {
    /// Create an object at the given position with a single sample point
    pub fn new(position: Vec3) -> Self {
        let mut object = Self {
            position,
            rotation: Quat::IDENTITY,
            ghost: false,
            active: true,
            layout: SampleLayout::Single,
            samples: Vec::new(),
            detected_by: HashSet::new(),
        };
        object.refresh_samples();
        object
    }

    /// Mark the object as a ghost (builder pattern)
    pub fn with_ghost(mut self, ghost: bool) -> Self {
        self.ghost = ghost;
        self
    }

    /// Set the rotation (builder pattern)
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self.refresh_samples();
        self
    }

    /// Set the sample layout (builder pattern)
    pub fn with_layout(mut self, layout: SampleLayout) -> Self {
        self.layout = layout;
        self.refresh_samples();
        self
    }

    /// Per-pair eligibility: invalid when inactive, ghost when flagged,
    /// otherwise permitted.
    pub fn eligibility(&self) -> OperationResult {
        if !self.active {
            OperationResult::invalid_object()
        } else if self.ghost {
            OperationResult::ghost()
        } else {
            OperationResult::permitted()
        }
    }

    /// Recompute the sample buffer from the current transform.
    ///
    /// Runs once per tick for every object, strictly before any detector
    /// scan reads the buffer.
    pub fn refresh_samples(&mut self) {
        self.samples.clear();
        match &self.layout {
            SampleLayout::Single => self.samples.push(self.position),
            SampleLayout::Offsets { points } => {
                for &offset in points {
                    self.samples.push(self.position + self.rotation * offset);
                }
            }
        }
    }

    /// The sample points produced by the last update pass
    pub fn samples(&self) -> &[Vec3] {
        &self.samples
    }

    pub fn layout(&self) -> &SampleLayout {
        &self.layout
    }

    /// Detectors currently holding this object in their detected set
    pub fn detected_by(&self) -> &HashSet<DetectorId> {
        &self.detected_by
    }

    pub fn is_detected_by(&self, detector: DetectorId) -> bool {
        self.detected_by.contains(&detector)
    }

    pub(crate) fn add_detected_by(&mut self, detector: DetectorId) {
        self.detected_by.insert(detector);
    }

    pub(crate) fn remove_detected_by(&mut self, detector: DetectorId) {
        self.detected_by.remove(&detector);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::DetectionCode;

    #[test]
    fn eligibility_matrix() {
        let object = DetectableObject::new(Vec3::ZERO);
        assert_eq!(
            object.eligibility().detection_code(),
            Some(DetectionCode::Permitted)
        );

        let ghost = DetectableObject::new(Vec3::ZERO).with_ghost(true);
        assert_eq!(
            ghost.eligibility().detection_code(),
            Some(DetectionCode::Ghost)
        );

        // Inactive wins over the ghost flag.
        let mut stale = DetectableObject::new(Vec3::ZERO).with_ghost(true);
        stale.active = false;
        assert_eq!(
            stale.eligibility().detection_code(),
            Some(DetectionCode::InvalidObject)
        );
    }

    #[test]
    fn single_layout_samples_the_position() {
        let mut object = DetectableObject::new(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(object.samples(), &[Vec3::new(1.0, 2.0, 3.0)]);

        object.position = Vec3::new(4.0, 0.0, 0.0);
        // The buffer is stale until the next update pass.
        assert_eq!(object.samples(), &[Vec3::new(1.0, 2.0, 3.0)]);
        object.refresh_samples();
        assert_eq!(object.samples(), &[Vec3::new(4.0, 0.0, 0.0)]);
    }

    #[test]
    fn offsets_rotate_with_the_object() {
        let object = DetectableObject::new(Vec3::new(10.0, 0.0, 0.0))
            .with_layout(SampleLayout::Offsets {
                points: vec![Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0)],
            })
            .with_rotation(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2));

        let samples = object.samples();
        assert_eq!(samples.len(), 2);
        assert!((samples[0] - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-5);
        assert!((samples[1] - Vec3::new(10.0, 1.0, 0.0)).length() < 1e-5);
    }
}

//! Detectors and the per-tick scan

use crate::events::{DetectionContext, DetectionHandler};
use crate::object::{DetectableObject, ObjectId};
use crate::registry::ObjectRegistry;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, trace};
use zone::{LayerMask, LineOfSight, PointVisibility, Zone, ZoneSpec};

/// Identity of a detector, chosen by the caller
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetectorId(pub u32);

/// Counters for one detector's scan of the registry
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Objects evaluated (every registered object, exactly once)
    pub evaluated: usize,
    /// Objects classified seen (permitted or ghost)
    pub seen: usize,
    /// Objects newly added to the detected set
    pub started: usize,
    /// Objects removed from the detected set
    pub ended: usize,
}

/// An observer that scans the object registry every tick.
///
/// The detector owns its zone snapshot and its detected set. The scan is
/// a brute-force pass over every registered object, O(objects × samples)
/// per detector with one occlusion query per inside sample; there is no
/// broad phase, which is acceptable for small-to-moderate populations and
/// a known scaling limit beyond that.
#[derive(Debug)]
pub struct Detector {
    id: DetectorId,
    /// Position fed into zone realization each tick
    pub position: Vec3,
    /// Rotation fed into zone realization each tick
    pub rotation: Quat,
    spec: ZoneSpec,
    zone: Zone,
    filter: LayerMask,
    ghost_capable: bool,
    detected: HashSet<ObjectId>,
}

impl Detector {
    /// Create a detector with a validated zone spec.
    ///
    /// `ghost_capable` is fixed at construction: a ghost-capable detector
    /// still registers ghost objects as seen (on the ghost path) instead
    /// of treating them as undetected.
    pub fn new(
        id: DetectorId,
        spec: ZoneSpec,
        filter: LayerMask,
        ghost_capable: bool,
    ) -> zone::Result<Self> {
        spec.validate()?;
        let zone = spec.realize(Vec3::ZERO, Quat::IDENTITY);
        debug!(id = id.0, ghost_capable, "detector created");
        Ok(Self {
            id,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            spec,
            zone,
            filter,
            ghost_capable,
            detected: HashSet::new(),
        })
    }

    /// Place the detector (builder pattern)
    pub fn with_transform(mut self, position: Vec3, rotation: Quat) -> Self {
        self.position = position;
        self.rotation = rotation;
        self.zone = self.spec.realize(position, rotation);
        self
    }

    pub fn id(&self) -> DetectorId {
        self.id
    }

    /// The zone snapshot from the most recent scan
    pub fn zone(&self) -> &Zone {
        &self.zone
    }

    pub fn spec(&self) -> &ZoneSpec {
        &self.spec
    }

    pub fn filter(&self) -> LayerMask {
        self.filter
    }

    pub fn is_ghost_capable(&self) -> bool {
        self.ghost_capable
    }

    /// Objects currently classified as seen by this detector
    pub fn detected(&self) -> &HashSet<ObjectId> {
        &self.detected
    }

    pub fn is_detecting(&self, object: ObjectId) -> bool {
        self.detected.contains(&object)
    }

    /// Drop a stale entry after its object left the registry.
    ///
    /// Fires no event: the object is gone, so there is no context to
    /// deliver one for. Returns whether the entry was present.
    pub fn forget(&mut self, object: ObjectId) -> bool {
        self.detected.remove(&object)
    }

    /// Scan every registered object once and maintain the detected set.
    ///
    /// Rebuilds the zone from the current transform, then classifies each
    /// object. The notification hooks (`on_detected`, `on_ghost_detected`,
    /// `on_detection_failed`) fire on every evaluation; the started/ended
    /// hooks fire only when detected-set membership actually changes.
    pub fn scan(
        &mut self,
        registry: &mut ObjectRegistry,
        los: &impl LineOfSight,
        handler: &mut impl DetectionHandler,
    ) -> ScanSummary {
        self.zone = self.spec.realize(self.position, self.rotation);
        let mut summary = ScanSummary::default();

        // Snapshot the ids up front; the registry must not change shape
        // while the scan walks it.
        let ids: Vec<ObjectId> = registry.ids().collect();
        for object_id in ids {
            let Some(object) = registry.get_mut(object_id) else {
                continue;
            };
            summary.evaluated += 1;
            let ctx = DetectionContext {
                detector: self.id,
                object: object_id,
            };

            let eligibility = object.eligibility();
            if !self.ghost_capable && !eligibility.is_success() {
                // Geometry is never tested for objects this detector
                // cannot register anyway.
                self.fail(object, ctx, eligibility, handler, &mut summary);
                continue;
            }

            let zone = &self.zone;
            let filter = self.filter;
            let seen = object
                .samples()
                .iter()
                .any(|&sample| zone.visibility(sample, los, filter) == PointVisibility::Seen);

            if !seen {
                self.fail(object, ctx, eligibility, handler, &mut summary);
                continue;
            }

            summary.seen += 1;
            if eligibility.is_success() {
                handler.on_detected(ctx);
            } else {
                handler.on_ghost_detected(ctx);
            }
            object.add_detected_by(self.id);
            if self.detected.insert(object_id) {
                summary.started += 1;
                handler.on_detection_started(ctx);
            }
        }

        trace!(
            detector = self.id.0,
            evaluated = summary.evaluated,
            seen = summary.seen,
            started = summary.started,
            ended = summary.ended,
            "scan complete"
        );
        summary
    }

    fn fail(
        &mut self,
        object: &mut DetectableObject,
        ctx: DetectionContext,
        result: crate::result::OperationResult,
        handler: &mut impl DetectionHandler,
        summary: &mut ScanSummary,
    ) {
        handler.on_detection_failed(ctx, result);
        if self.detected.remove(&ctx.object) {
            object.remove_detected_by(self.id);
            summary.ended += 1;
            handler.on_detection_ended(ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::DetectionContext;
    use crate::result::OperationResult;
    use zone::RayHit;

    struct NoOcclusion;

    impl LineOfSight for NoOcclusion {
        fn cast(&self, _: Vec3, _: Vec3, _: f32, _: LayerMask) -> Option<RayHit> {
            None
        }
    }

    /// Records every raw event as a readable line.
    #[derive(Default)]
    struct Log {
        events: Vec<String>,
    }

    impl DetectionHandler for Log {
        fn on_detected(&mut self, ctx: DetectionContext) {
            self.events.push(format!("detected {}", ctx.object.0));
        }
        fn on_ghost_detected(&mut self, ctx: DetectionContext) {
            self.events.push(format!("ghost {}", ctx.object.0));
        }
        fn on_detection_failed(&mut self, ctx: DetectionContext, result: OperationResult) {
            self.events
                .push(format!("failed {} {:?}", ctx.object.0, result.detection_code()));
        }
        fn on_detection_started(&mut self, ctx: DetectionContext) {
            self.events.push(format!("started {}", ctx.object.0));
        }
        fn on_detection_ended(&mut self, ctx: DetectionContext) {
            self.events.push(format!("ended {}", ctx.object.0));
        }
    }

    fn sphere_detector(ghost_capable: bool) -> Detector {
        Detector::new(
            DetectorId(1),
            ZoneSpec::Sphere { radius: 5.0 },
            LayerMask::ALL,
            ghost_capable,
        )
        .unwrap()
    }

    #[test]
    fn start_fires_once_per_membership_change() {
        let mut registry = ObjectRegistry::new();
        let id = registry.insert(DetectableObject::new(Vec3::new(3.0, 0.0, 0.0)));
        let mut detector = sphere_detector(false);
        let mut log = Log::default();

        registry.refresh_samples();
        let first = detector.scan(&mut registry, &NoOcclusion, &mut log);
        assert_eq!((first.seen, first.started), (1, 1));
        assert_eq!(log.events, vec![format!("detected {}", id.0), format!("started {}", id.0)]);

        // Still seen: level-triggered notification, no new edge.
        log.events.clear();
        let second = detector.scan(&mut registry, &NoOcclusion, &mut log);
        assert_eq!((second.seen, second.started), (1, 0));
        assert_eq!(log.events, vec![format!("detected {}", id.0)]);
    }

    #[test]
    fn end_fires_once_then_failures_keep_reporting() {
        let mut registry = ObjectRegistry::new();
        let id = registry.insert(DetectableObject::new(Vec3::new(3.0, 0.0, 0.0)));
        let mut detector = sphere_detector(false);
        let mut log = Log::default();

        registry.refresh_samples();
        detector.scan(&mut registry, &NoOcclusion, &mut log);
        assert!(detector.is_detecting(id));

        registry.get_mut(id).unwrap().position = Vec3::new(6.0, 0.0, 0.0);
        registry.refresh_samples();

        log.events.clear();
        let out = detector.scan(&mut registry, &NoOcclusion, &mut log);
        assert_eq!(out.ended, 1);
        assert_eq!(
            log.events,
            vec![
                format!("failed {} Some(Permitted)", id.0),
                format!("ended {}", id.0)
            ]
        );
        assert!(!detector.is_detecting(id));

        // Subsequent failing ticks report the failure but no further edge.
        log.events.clear();
        let out = detector.scan(&mut registry, &NoOcclusion, &mut log);
        assert_eq!(out.ended, 0);
        assert_eq!(log.events, vec![format!("failed {} Some(Permitted)", id.0)]);
    }

    #[test]
    fn plain_detector_skips_geometry_for_ghosts() {
        let mut registry = ObjectRegistry::new();
        let id = registry.insert(DetectableObject::new(Vec3::new(1.0, 0.0, 0.0)).with_ghost(true));
        let mut detector = sphere_detector(false);
        let mut log = Log::default();

        registry.refresh_samples();
        let out = detector.scan(&mut registry, &NoOcclusion, &mut log);
        assert_eq!(out.seen, 0);
        assert_eq!(log.events, vec![format!("failed {} Some(Ghost)", id.0)]);
        assert!(!detector.is_detecting(id));
    }

    #[test]
    fn ghost_capable_detector_registers_ghosts() {
        let mut registry = ObjectRegistry::new();
        let id = registry.insert(DetectableObject::new(Vec3::new(1.0, 0.0, 0.0)).with_ghost(true));
        let mut detector = sphere_detector(true);
        let mut log = Log::default();

        registry.refresh_samples();
        let out = detector.scan(&mut registry, &NoOcclusion, &mut log);
        assert_eq!((out.seen, out.started), (1, 1));
        assert_eq!(log.events, vec![format!("ghost {}", id.0), format!("started {}", id.0)]);
        assert!(detector.is_detecting(id));
        assert!(registry.get(id).unwrap().is_detected_by(detector.id()));
    }

    #[test]
    fn back_references_stay_symmetric() {
        let mut registry = ObjectRegistry::new();
        let id = registry.insert(DetectableObject::new(Vec3::new(3.0, 0.0, 0.0)));
        let mut detector = sphere_detector(false);

        registry.refresh_samples();
        detector.scan(&mut registry, &NoOcclusion, &mut crate::events::NullHandler);
        assert!(detector.is_detecting(id));
        assert!(registry.get(id).unwrap().is_detected_by(detector.id()));

        registry.get_mut(id).unwrap().position = Vec3::new(9.0, 0.0, 0.0);
        registry.refresh_samples();
        detector.scan(&mut registry, &NoOcclusion, &mut crate::events::NullHandler);
        assert!(!detector.is_detecting(id));
        assert!(!registry.get(id).unwrap().is_detected_by(detector.id()));
    }

    #[test]
    fn first_seen_sample_wins() {
        let mut registry = ObjectRegistry::new();
        // Position is outside the zone; one offset reaches back inside.
        let object = DetectableObject::new(Vec3::new(8.0, 0.0, 0.0)).with_layout(
            crate::object::SampleLayout::Offsets {
                points: vec![Vec3::ZERO, Vec3::new(-4.0, 0.0, 0.0)],
            },
        );
        let id = registry.insert(object);
        let mut detector = sphere_detector(false);
        let mut log = Log::default();

        registry.refresh_samples();
        let out = detector.scan(&mut registry, &NoOcclusion, &mut log);
        assert_eq!(out.seen, 1);
        assert!(detector.is_detecting(id));
    }

    #[test]
    fn inactive_object_fails_with_invalid_code() {
        let mut registry = ObjectRegistry::new();
        let id = registry.insert(DetectableObject::new(Vec3::new(1.0, 0.0, 0.0)));
        registry.get_mut(id).unwrap().active = false;
        let mut detector = sphere_detector(false);
        let mut log = Log::default();

        registry.refresh_samples();
        detector.scan(&mut registry, &NoOcclusion, &mut log);
        assert_eq!(
            log.events,
            vec![format!("failed {} Some(InvalidObject)", id.0)]
        );
    }

    #[test]
    fn forget_drops_membership_without_events() {
        let mut registry = ObjectRegistry::new();
        let id = registry.insert(DetectableObject::new(Vec3::new(3.0, 0.0, 0.0)));
        let mut detector = sphere_detector(false);

        registry.refresh_samples();
        detector.scan(&mut registry, &NoOcclusion, &mut crate::events::NullHandler);
        assert!(detector.forget(id));
        assert!(!detector.forget(id));
        assert!(!detector.is_detecting(id));
    }

    #[test]
    fn rejects_degenerate_zone_specs() {
        let result = Detector::new(
            DetectorId(1),
            ZoneSpec::Sphere { radius: -1.0 },
            LayerMask::ALL,
            false,
        );
        assert!(result.is_err());
    }
}

//! Tick orchestration
//!
//! One tick is two ordered passes: every object refreshes its sample
//! points, then every detector scans the registry. The ordering is
//! mandatory — scans read the buffers the update pass produces.

use crate::detector::{Detector, ScanSummary};
use crate::events::DetectionHandler;
use crate::registry::ObjectRegistry;
use zone::LineOfSight;

/// Aggregated counters for one tick
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// Objects in the registry at the start of the scan pass
    pub objects: usize,
    /// Detectors that scanned
    pub detectors: usize,
    /// Sum of per-scan evaluation counts
    pub evaluated: usize,
    /// Sum of per-scan seen counts
    pub seen: usize,
    /// Detection-start edges across all detectors
    pub started: usize,
    /// Detection-end edges across all detectors
    pub ended: usize,
}

impl TickSummary {
    fn absorb(&mut self, scan: ScanSummary) {
        self.detectors += 1;
        self.evaluated += scan.evaluated;
        self.seen += scan.seen;
        self.started += scan.started;
        self.ended += scan.ended;
    }
}

/// Run one full tick: the object-update pass, then every detector's scan.
///
/// Detectors scan in slice order; with a shared state-tracking handler
/// the later detector's evaluation of an object overwrites the earlier
/// one's (last write wins).
pub fn run_tick(
    registry: &mut ObjectRegistry,
    detectors: &mut [Detector],
    los: &impl LineOfSight,
    handler: &mut impl DetectionHandler,
) -> TickSummary {
    registry.refresh_samples();

    let mut summary = TickSummary {
        objects: registry.len(),
        ..TickSummary::default()
    };
    for detector in detectors.iter_mut() {
        summary.absorb(detector.scan(registry, los, handler));
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::NullHandler;
    use crate::object::DetectableObject;
    use crate::DetectorId;
    use glam::Vec3;
    use zone::{LayerMask, RayHit, ZoneSpec};

    struct NoOcclusion;

    impl LineOfSight for NoOcclusion {
        fn cast(&self, _: Vec3, _: Vec3, _: f32, _: LayerMask) -> Option<RayHit> {
            None
        }
    }

    #[test]
    fn update_pass_runs_before_the_scans() {
        let mut registry = ObjectRegistry::new();
        let id = registry.insert(DetectableObject::new(Vec3::new(10.0, 0.0, 0.0)));
        let mut detectors = vec![Detector::new(
            DetectorId(1),
            ZoneSpec::Sphere { radius: 5.0 },
            LayerMask::ALL,
            false,
        )
        .unwrap()];

        let out = run_tick(&mut registry, &mut detectors, &NoOcclusion, &mut NullHandler);
        assert_eq!(out.seen, 0);

        // Move the object inside; the tick must see the fresh position
        // without an explicit refresh by the caller.
        registry.get_mut(id).unwrap().position = Vec3::new(2.0, 0.0, 0.0);
        let out = run_tick(&mut registry, &mut detectors, &NoOcclusion, &mut NullHandler);
        assert_eq!((out.objects, out.detectors, out.seen, out.started), (1, 1, 1, 1));
    }

    #[test]
    fn counters_aggregate_across_detectors() {
        let mut registry = ObjectRegistry::new();
        registry.insert(DetectableObject::new(Vec3::new(1.0, 0.0, 0.0)));
        registry.insert(DetectableObject::new(Vec3::new(100.0, 0.0, 0.0)));

        let spec = ZoneSpec::Sphere { radius: 5.0 };
        let mut detectors = vec![
            Detector::new(DetectorId(1), spec.clone(), LayerMask::ALL, false).unwrap(),
            Detector::new(DetectorId(2), spec, LayerMask::ALL, false).unwrap(),
        ];

        let out = run_tick(&mut registry, &mut detectors, &NoOcclusion, &mut NullHandler);
        assert_eq!(out.evaluated, 4, "both detectors visit both objects");
        assert_eq!(out.seen, 2, "each detector sees the near object only");
    }
}

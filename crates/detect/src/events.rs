//! Raw detection event surface

use crate::object::ObjectId;
use crate::result::OperationResult;
use crate::DetectorId;

/// Ephemeral (detector, object) pair built per evaluation.
///
/// Constructed fresh for each classification and handed to the event
/// hooks; never stored past the call that uses it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DetectionContext {
    pub detector: DetectorId,
    pub object: ObjectId,
}

/// Receiver for the raw scan events.
///
/// All methods default to no-ops so implementors only override what they
/// care about. The three notification hooks are level-triggered (fired on
/// every evaluation that meets their condition); started/ended are
/// edge-triggered (fired only on detected-set membership changes).
pub trait DetectionHandler {
    /// A permitted object was seen this evaluation (level-triggered)
    fn on_detected(&mut self, ctx: DetectionContext) {
        let _ = ctx;
    }

    /// A non-permitted object was seen by a ghost-capable detector
    /// (level-triggered)
    fn on_ghost_detected(&mut self, ctx: DetectionContext) {
        let _ = ctx;
    }

    /// The object was not seen this evaluation (level-triggered); the
    /// result carries the eligibility outcome of the evaluation
    fn on_detection_failed(&mut self, ctx: DetectionContext, result: OperationResult) {
        let _ = (ctx, result);
    }

    /// The object just entered the detector's detected set (edge)
    fn on_detection_started(&mut self, ctx: DetectionContext) {
        let _ = ctx;
    }

    /// The object just left the detector's detected set (edge)
    fn on_detection_ended(&mut self, ctx: DetectionContext) {
        let _ = ctx;
    }
}

/// Handler that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHandler;

impl DetectionHandler for NullHandler {}

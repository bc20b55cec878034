//! Optional per-object state tracking over the raw events
//!
//! Converts the three level-triggered raw events into a four-state
//! machine with stay/start/end hooks. The tracker keeps one scalar state
//! per object: when several detectors evaluate the same object in one
//! tick, each evaluation overwrites the state and the last one wins.
//! This matches the single-observer design; no cross-detector
//! aggregation is performed.

use crate::events::{DetectionContext, DetectionHandler};
use crate::object::ObjectId;
use crate::result::OperationResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tracking state of one object
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DetectionState {
    /// No evaluation has reached this object yet
    #[default]
    Unknown,
    NotDetected,
    GhostDetected,
    Detected,
}

/// Hooks fired by the state machine.
///
/// The `any_*` hooks treat Detected and GhostDetected as one combined
/// "any-detected" condition; a direct swap between the two substates
/// fires only the substate hooks, never the `any_*` pair.
pub trait TrackingHandler {
    fn any_detection_started(&mut self, ctx: DetectionContext) {
        let _ = ctx;
    }
    fn any_detection_stay(&mut self, ctx: DetectionContext) {
        let _ = ctx;
    }
    fn any_detection_ended(&mut self, ctx: DetectionContext) {
        let _ = ctx;
    }
    fn detected_started(&mut self, ctx: DetectionContext) {
        let _ = ctx;
    }
    fn detected_stay(&mut self, ctx: DetectionContext) {
        let _ = ctx;
    }
    fn detected_ended(&mut self, ctx: DetectionContext) {
        let _ = ctx;
    }
    fn ghost_started(&mut self, ctx: DetectionContext) {
        let _ = ctx;
    }
    fn ghost_stay(&mut self, ctx: DetectionContext) {
        let _ = ctx;
    }
    fn ghost_ended(&mut self, ctx: DetectionContext) {
        let _ = ctx;
    }
    fn undetected_stay(&mut self, ctx: DetectionContext) {
        let _ = ctx;
    }
}

/// State-tracking layer: plugs in as the scan's [`DetectionHandler`] and
/// drives a [`TrackingHandler`] from the state transitions.
///
/// States start at [`DetectionState::Unknown`] and are dropped again via
/// [`forget`](DetectionTracker::forget) when an object leaves the
/// registry.
#[derive(Debug, Default)]
pub struct DetectionTracker<H: TrackingHandler> {
    states: HashMap<ObjectId, DetectionState>,
    handler: H,
}

impl<H: TrackingHandler> DetectionTracker<H> {
    pub fn new(handler: H) -> Self {
        Self {
            states: HashMap::new(),
            handler,
        }
    }

    /// Current state of an object (`Unknown` if never evaluated)
    pub fn state(&self, object: ObjectId) -> DetectionState {
        self.states
            .get(&object)
            .copied()
            .unwrap_or(DetectionState::Unknown)
    }

    /// Drop an object's state when it leaves the registry
    pub fn forget(&mut self, object: ObjectId) {
        self.states.remove(&object);
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    pub fn into_handler(self) -> H {
        self.handler
    }

    fn apply(&mut self, ctx: DetectionContext, target: DetectionState) {
        let current = self.state(ctx.object);

        if current == target {
            match target {
                DetectionState::Detected => {
                    self.handler.any_detection_stay(ctx);
                    self.handler.detected_stay(ctx);
                }
                DetectionState::GhostDetected => {
                    self.handler.any_detection_stay(ctx);
                    self.handler.ghost_stay(ctx);
                }
                DetectionState::NotDetected => self.handler.undetected_stay(ctx),
                // Raw events never target Unknown.
                DetectionState::Unknown => {}
            }
            return;
        }

        self.states.insert(ctx.object, target);
        match (current, target) {
            (DetectionState::Unknown, DetectionState::Detected)
            | (DetectionState::NotDetected, DetectionState::Detected) => {
                self.handler.any_detection_started(ctx);
                self.handler.detected_started(ctx);
            }
            (DetectionState::Unknown, DetectionState::GhostDetected)
            | (DetectionState::NotDetected, DetectionState::GhostDetected) => {
                self.handler.any_detection_started(ctx);
                self.handler.ghost_started(ctx);
            }
            // First-ever evaluation failed: nothing to end, and no start
            // hook exists for the undetected condition.
            (DetectionState::Unknown, DetectionState::NotDetected) => {}
            (DetectionState::Detected, DetectionState::NotDetected) => {
                self.handler.any_detection_ended(ctx);
                self.handler.detected_ended(ctx);
            }
            (DetectionState::GhostDetected, DetectionState::NotDetected) => {
                self.handler.any_detection_ended(ctx);
                self.handler.ghost_ended(ctx);
            }
            // Substate swap: the object stays "any-detected" throughout,
            // so only the substate hooks fire.
            (DetectionState::Detected, DetectionState::GhostDetected) => {
                self.handler.detected_ended(ctx);
                self.handler.ghost_started(ctx);
            }
            (DetectionState::GhostDetected, DetectionState::Detected) => {
                self.handler.ghost_ended(ctx);
                self.handler.detected_started(ctx);
            }
            _ => {}
        }
    }
}

impl<H: TrackingHandler> DetectionHandler for DetectionTracker<H> {
    fn on_detected(&mut self, ctx: DetectionContext) {
        self.apply(ctx, DetectionState::Detected);
    }

    fn on_ghost_detected(&mut self, ctx: DetectionContext) {
        self.apply(ctx, DetectionState::GhostDetected);
    }

    fn on_detection_failed(&mut self, ctx: DetectionContext, _result: OperationResult) {
        self.apply(ctx, DetectionState::NotDetected);
    }
}

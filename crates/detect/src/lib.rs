//! Detection core for the sightline system
//!
//! Answers, every tick, "which trackable entities can each observer
//! currently see?" Detectors own a zone (from `sightline-zone`) and a
//! detected-object set; objects expose sample points and an eligibility
//! check; the scan matches every detector against every registered
//! object with strict edge-vs-level event semantics.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                       run_tick                           │
//! ├─────────────────────────────────────────────────────────┤
//! │  ObjectRegistry                                          │
//! │  ├── update pass: refresh every object's sample points  │
//! │  └── insert/remove lifecycle, never mutated mid-scan    │
//! ├─────────────────────────────────────────────────────────┤
//! │  Detector::scan (per detector)                           │
//! │  ├── realize the Zone from the current transform        │
//! │  ├── eligibility → ghost-capability short-circuit       │
//! │  ├── first seen sample wins (Zone::visibility)          │
//! │  └── detected set + back-references, edge/level events  │
//! ├─────────────────────────────────────────────────────────┤
//! │  DetectionHandler (raw events)                           │
//! │  └── DetectionTracker: 4-state machine, 10 hooks        │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! The scan is deliberately brute force — O(detectors × objects ×
//! samples) with no broad phase. That is a documented scaling limit, not
//! an oversight; keep the event semantics intact if you ever shard it.

mod detector;
mod events;
mod object;
mod registry;
mod result;
mod state;
mod tick;

pub use detector::{Detector, DetectorId, ScanSummary};
pub use events::{DetectionContext, DetectionHandler, NullHandler};
pub use object::{DetectableObject, ObjectId, SampleLayout};
pub use registry::ObjectRegistry;
pub use result::{DetectionCode, OperationResult, Subsystem};
pub use state::{DetectionState, DetectionTracker, TrackingHandler};
pub use tick::{run_tick, TickSummary};

// Re-export the zone crate and glam for convenience
pub use glam;
pub use zone;

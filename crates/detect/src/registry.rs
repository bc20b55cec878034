//! Registry of live detectable objects
//!
//! One registry per simulation, passed explicitly into the scan entry
//! points. Objects are inserted when they come alive and removed when
//! they are destroyed; the registry is never mutated while a scan is in
//! progress (the `&mut` borrows make that unrepresentable).

use crate::object::{DetectableObject, ObjectId};
use std::collections::HashMap;
use tracing::debug;

/// Process-lifetime mapping from identity to live objects.
///
/// Ids are allocated monotonically and never reused, so a stale id held
/// by a caller can never alias a newer object.
#[derive(Debug, Default)]
pub struct ObjectRegistry {
    objects: HashMap<ObjectId, DetectableObject>,
    next_id: u32,
}

impl ObjectRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an object, assigning its identity
    pub fn insert(&mut self, object: DetectableObject) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        debug!(id = id.0, ghost = object.ghost, "object registered");
        self.objects.insert(id, object);
        id
    }

    /// Remove an object at destruction time.
    ///
    /// Returns the object so the caller can walk its `detected_by` set
    /// and detach the stale entry from each detector (and from any
    /// tracking layer) via `Detector::forget` / `DetectionTracker::forget`.
    pub fn remove(&mut self, id: ObjectId) -> Option<DetectableObject> {
        let removed = self.objects.remove(&id);
        if removed.is_some() {
            debug!(id = id.0, "object unregistered");
        }
        removed
    }

    pub fn get(&self, id: ObjectId) -> Option<&DetectableObject> {
        self.objects.get(&id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut DetectableObject> {
        self.objects.get_mut(&id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// All registered ids, in no particular order
    pub fn ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.objects.keys().copied()
    }

    /// All registered objects, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &DetectableObject)> {
        self.objects.iter().map(|(id, object)| (*id, object))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ObjectId, &mut DetectableObject)> {
        self.objects.iter_mut().map(|(id, object)| (*id, object))
    }

    /// The object-update pass: every object recomputes its sample points
    /// from its current transform. Must run before any detector scan of
    /// the same tick.
    pub fn refresh_samples(&mut self) {
        for object in self.objects.values_mut() {
            object.refresh_samples();
        }
    }
}

//=========================================================================
// Instance Tracker
//=========================================================================
//
// Index of live spawned instances keyed by `(registry key, sequential id)`.
//
// Ids come from one counter shared by every registry key. The counter only
// ever grows; removing an instance leaves a gap instead of handing its id
// out again. Only an explicit reset (new game, full reload) rewinds it.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeMap;
use std::fmt;

use log::trace;

//=== Internal Dependencies ===============================================

use crate::core::scene::ObjectId;

//=== InstanceKey =========================================================

/// Identity of a tracked instance.
///
/// Ordered by id first, so iteration follows spawn order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceKey {
    pub id: u64,
    pub name: String,
}

impl InstanceKey {
    pub fn new(name: impl Into<String>, id: u64) -> Self {
        Self { id, name: name.into() }
    }
}

/// Renders as `<name>_<id>`, the snapshot entry key.
impl fmt::Display for InstanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.name, self.id)
    }
}

//=== InstanceTracker =====================================================

/// Live-instance index.
#[derive(Debug, Default)]
pub struct InstanceTracker {
    instances: BTreeMap<InstanceKey, ObjectId>,
    counter: u64,
}

impl InstanceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Membership -------------------------------------------------------

    /// Identity-based membership test.
    pub fn contains(&self, instance: ObjectId) -> bool {
        self.instances.values().any(|&id| id == instance)
    }

    /// Identity of a tracked instance.
    pub fn key_of(&self, instance: ObjectId) -> Option<&InstanceKey> {
        self.instances
            .iter()
            .find(|(_, &id)| id == instance)
            .map(|(key, _)| key)
    }

    pub fn get(&self, name: &str, id: u64) -> Option<ObjectId> {
        self.instances.get(&InstanceKey::new(name, id)).copied()
    }

    //--- Mutation ---------------------------------------------------------

    /// Tracks `instance` under `name` with the next sequential id.
    ///
    /// Returns the new identity, or `None` if the instance was already
    /// tracked (in which case nothing changes).
    pub fn track(&mut self, instance: ObjectId, name: &str) -> Option<InstanceKey> {
        if self.contains(instance) {
            trace!(target: "registry", "Instance {} already tracked", instance);
            return None;
        }

        self.counter += 1;
        let key = InstanceKey::new(name, self.counter);
        self.instances.insert(key.clone(), instance);

        trace!(target: "registry", "Tracking {} as {}", instance, key);
        Some(key)
    }

    /// Stops tracking the instance at `(name, id)`. The counter is left
    /// untouched.
    pub fn untrack(&mut self, name: &str, id: u64) -> Option<ObjectId> {
        let removed = self.instances.remove(&InstanceKey::new(name, id));
        if removed.is_some() {
            trace!(target: "registry", "Untracked {}_{}", name, id);
        }
        removed
    }

    /// Stops tracking `instance`, whatever its identity.
    pub fn untrack_instance(&mut self, instance: ObjectId) -> Option<InstanceKey> {
        let key = self.key_of(instance)?.clone();
        self.instances.remove(&key);
        Some(key)
    }

    /// Drops every entry. The counter is kept; see [`Self::reset_counter`].
    pub fn clear(&mut self) {
        self.instances.clear();
    }

    pub fn reset_counter(&mut self) {
        self.counter = 0;
    }

    //--- Queries ----------------------------------------------------------

    /// Last id handed out.
    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// Tracked instances in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = (&InstanceKey, ObjectId)> {
        self.instances.iter().map(|(key, &id)| (key, id))
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scene::{SceneGraph, SceneObject};

    fn objects(n: usize) -> Vec<ObjectId> {
        let mut scene = SceneGraph::default();
        (0..n).map(|i| scene.insert(SceneObject::new(format!("o{i}")))).collect()
    }

    #[test]
    fn key_renders_as_name_underscore_id() {
        assert_eq!(InstanceKey::new("fuel_tank", 12).to_string(), "fuel_tank_12");
    }

    #[test]
    fn track_assigns_global_sequential_ids() {
        let ids = objects(3);
        let mut tracker = InstanceTracker::new();

        assert_eq!(tracker.track(ids[0], "engine"), Some(InstanceKey::new("engine", 1)));
        assert_eq!(tracker.track(ids[1], "battery"), Some(InstanceKey::new("battery", 2)));
        assert_eq!(tracker.track(ids[2], "engine"), Some(InstanceKey::new("engine", 3)));
        assert_eq!(tracker.counter(), 3);
    }

    #[test]
    fn track_is_idempotent_per_instance() {
        let ids = objects(1);
        let mut tracker = InstanceTracker::new();

        tracker.track(ids[0], "engine");
        assert_eq!(tracker.track(ids[0], "engine"), None);
        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.counter(), 1);
    }

    #[test]
    fn untrack_never_rewinds_the_counter() {
        let ids = objects(3);
        let mut tracker = InstanceTracker::new();
        tracker.track(ids[0], "a");
        tracker.track(ids[1], "b");

        assert_eq!(tracker.untrack("a", 1), Some(ids[0]));
        assert_eq!(tracker.counter(), 2);

        let key = tracker.track(ids[2], "c").unwrap();
        assert_eq!(key.id, 3);
        assert_eq!(tracker.get("b", 2), Some(ids[1]));
    }

    #[test]
    fn untrack_unknown_identity_is_none() {
        let mut tracker = InstanceTracker::new();
        assert_eq!(tracker.untrack("ghost", 7), None);
    }

    #[test]
    fn iteration_follows_spawn_order() {
        let ids = objects(3);
        let mut tracker = InstanceTracker::new();
        tracker.track(ids[0], "zeta");
        tracker.track(ids[1], "alpha");
        tracker.track(ids[2], "mid");

        let names: Vec<&str> = tracker.iter().map(|(k, _)| k.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn clear_and_reset_are_separate() {
        let ids = objects(2);
        let mut tracker = InstanceTracker::new();
        tracker.track(ids[0], "a");
        tracker.track(ids[1], "b");

        tracker.clear();
        assert!(tracker.is_empty());
        assert_eq!(tracker.counter(), 2);

        tracker.reset_counter();
        assert_eq!(tracker.counter(), 0);
        assert!(!tracker.contains(ids[0]));
    }

    #[test]
    fn untrack_instance_by_handle() {
        let ids = objects(1);
        let mut tracker = InstanceTracker::new();
        tracker.track(ids[0], "coil");

        assert_eq!(tracker.untrack_instance(ids[0]), Some(InstanceKey::new("coil", 1)));
        assert!(tracker.is_empty());
    }
}

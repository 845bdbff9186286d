//=========================================================================
// Slots
//=========================================================================
//
// Lookup of the two kinds of attachment points a part can be restored to.
//
// - Engine mounts: one per part type, resolved by a `MountLocator`
//   (external collaborator; `NamedMountLocator` finds them by name).
// - Storage slots: relay points under the trunk structure, rediscovered
//   on every game load and matched by local position.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeMap;

use glam::Vec3;
use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::PartType;
use crate::core::scene::{ObjectId, SceneGraph};

//=== MountLocator ========================================================

/// Maps part types to their engine-mount slot.
pub trait MountLocator: Send {
    /// Recomputes the mapping from the current scene.
    fn refresh(&mut self, scene: &SceneGraph);

    /// Mount slot for `part`, if one is known.
    fn mount_for(&self, part: PartType) -> Option<ObjectId>;
}

//=== NamedMountLocator ===================================================

/// Finds engine mounts by object name.
///
/// Only objects carrying slot state qualify, so a part that happens to
/// share a mount's name is never mistaken for it.
#[derive(Debug, Clone)]
pub struct NamedMountLocator {
    names: BTreeMap<PartType, String>,
    mounts: BTreeMap<PartType, ObjectId>,
}

impl NamedMountLocator {
    pub fn new(names: BTreeMap<PartType, String>) -> Self {
        Self {
            names,
            mounts: BTreeMap::new(),
        }
    }

    /// Default naming: `<Tag>Mount`, e.g. `CarburettorMount`.
    pub fn default_names() -> BTreeMap<PartType, String> {
        PartType::ALL
            .into_iter()
            .map(|part| (part, format!("{}Mount", part.tag())))
            .collect()
    }
}

impl Default for NamedMountLocator {
    fn default() -> Self {
        Self::new(Self::default_names())
    }
}

impl MountLocator for NamedMountLocator {
    fn refresh(&mut self, scene: &SceneGraph) {
        self.mounts.clear();

        for (&part, name) in &self.names {
            let found = scene
                .iter()
                .find(|(_, o)| o.slot.is_some() && &o.name == name)
                .map(|(id, _)| id);

            match found {
                Some(id) => {
                    self.mounts.insert(part, id);
                }
                None => debug!(target: "persistence", "No `{}` mount in scene", name),
            }
        }

        info!(target: "persistence", "Resolved {}/{} engine mounts", self.mounts.len(), self.names.len());
    }

    fn mount_for(&self, part: PartType) -> Option<ObjectId> {
        self.mounts.get(&part).copied()
    }
}

//=== StorageSlots ========================================================

/// Storage slots discovered under the trunk structure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StorageSlots {
    slots: Vec<ObjectId>,
}

impl StorageSlots {
    pub fn new(slots: Vec<ObjectId>) -> Self {
        Self { slots }
    }

    /// Collects every slot-carrying descendant of the object named
    /// `trunk_name`.
    ///
    /// Returns an empty set if the trunk is not in the scene.
    pub fn discover(scene: &SceneGraph, trunk_name: &str) -> Self {
        let Some(trunk) = scene.find_by_name(trunk_name) else {
            warn!(target: "persistence", "Trunk `{}` not found; no storage slots", trunk_name);
            return Self::default();
        };

        let slots: Vec<ObjectId> = scene
            .descendants(trunk)
            .into_iter()
            .filter(|&id| scene.get(id).is_some_and(|o| o.slot.is_some()))
            .collect();

        info!(target: "persistence", "Discovered {} storage slots under `{}`", slots.len(), trunk_name);
        Self { slots }
    }

    /// First live slot whose local position equals `position` exactly.
    pub fn find_at(&self, scene: &SceneGraph, position: Vec3) -> Option<ObjectId> {
        self.slots
            .iter()
            .copied()
            .find(|&id| scene.get(id).is_some_and(|o| o.local_position == position))
    }

    pub fn iter(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.slots.iter().copied()
    }

    pub fn contains(&self, slot: ObjectId) -> bool {
        self.slots.contains(&slot)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scene::{SceneObject, SlotState};

    fn slot(name: &str, position: Vec3) -> SceneObject {
        SceneObject::new(name)
            .with_position(position)
            .with_slot(SlotState::default())
    }

    //--- NamedMountLocator ------------------------------------------------

    #[test]
    fn locator_resolves_named_slots_after_refresh() {
        let mut scene = SceneGraph::default();
        let engine = scene.insert(slot("EngineMount", Vec3::ZERO));
        let battery = scene.insert(slot("BatteryMount", Vec3::ZERO));

        let mut locator = NamedMountLocator::default();
        assert_eq!(locator.mount_for(PartType::Engine), None);

        locator.refresh(&scene);
        assert_eq!(locator.mount_for(PartType::Engine), Some(engine));
        assert_eq!(locator.mount_for(PartType::Battery), Some(battery));
        assert_eq!(locator.mount_for(PartType::WaterTank), None);
    }

    #[test]
    fn locator_ignores_objects_without_slot_state() {
        let mut scene = SceneGraph::default();
        scene.insert(SceneObject::new("EngineMount"));

        let mut locator = NamedMountLocator::default();
        locator.refresh(&scene);
        assert_eq!(locator.mount_for(PartType::Engine), None);
    }

    #[test]
    fn refresh_forgets_stale_mounts() {
        let mut scene = SceneGraph::default();
        let engine = scene.insert(slot("EngineMount", Vec3::ZERO));
        let mut locator = NamedMountLocator::default();
        locator.refresh(&scene);

        scene.destroy(engine);
        locator.refresh(&scene);
        assert_eq!(locator.mount_for(PartType::Engine), None);
    }

    //--- StorageSlots -----------------------------------------------------

    #[test]
    fn discover_collects_slots_under_trunk() {
        let mut scene = SceneGraph::default();
        let boot = scene.insert(SceneObject::new("Boot"));
        let rack = scene.insert(SceneObject::new("Rack"));
        let a = scene.insert(slot("A", Vec3::new(0.1, 0.0, 0.0)));
        let b = scene.insert(slot("B", Vec3::new(0.2, 0.0, 0.0)));
        let outside = scene.insert(slot("Outside", Vec3::ZERO));
        scene.set_parent(rack, Some(boot));
        scene.set_parent(a, Some(rack));
        scene.set_parent(b, Some(boot));

        let slots = StorageSlots::discover(&scene, "Boot");

        assert_eq!(slots.len(), 2);
        assert!(slots.contains(a));
        assert!(slots.contains(b));
        assert!(!slots.contains(outside));
    }

    #[test]
    fn discover_without_trunk_is_empty() {
        let scene = SceneGraph::default();
        assert!(StorageSlots::discover(&scene, "Boot").is_empty());
    }

    #[test]
    fn find_at_requires_exact_match() {
        let mut scene = SceneGraph::default();
        let a = scene.insert(slot("A", Vec3::new(0.25, -0.5, 1.0)));
        let slots = StorageSlots::new(vec![a]);

        assert_eq!(slots.find_at(&scene, Vec3::new(0.25, -0.5, 1.0)), Some(a));
        assert_eq!(slots.find_at(&scene, Vec3::new(0.250001, -0.5, 1.0)), None);
    }
}

//=========================================================================
// Spawner
//=========================================================================
//
// Turns registered prototypes into live instances.
//
// Flow:
//   key → PrototypeRegistry::get → SceneGraph::instantiate
//       → place / orient → activate → InstanceTracker::track
//
// The spawner borrows the three pieces of state it needs for the duration
// of one call chain; get one from `ObjectContext::spawner`.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::{EulerRot, Quat, Vec3};
use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{InstanceTracker, PrototypeRegistry};
use crate::core::scene::{ObjectId, SceneGraph};

//=== Spawner =============================================================

pub struct Spawner<'a> {
    scene: &'a mut SceneGraph,
    registry: &'a PrototypeRegistry,
    tracker: &'a mut InstanceTracker,
}

impl<'a> Spawner<'a> {
    pub fn new(
        scene: &'a mut SceneGraph,
        registry: &'a PrototypeRegistry,
        tracker: &'a mut InstanceTracker,
    ) -> Self {
        Self { scene, registry, tracker }
    }

    //--- Tracked Spawns ---------------------------------------------------

    /// Spawns and tracks an instance of `key`.
    ///
    /// Returns `None` for unknown keys, without touching the tracker.
    pub fn spawn(&mut self, key: &str) -> Option<ObjectId> {
        let instance = self.instantiate(key, true)?;
        self.tracker.track(instance, key);
        Some(instance)
    }

    /// Spawns and tracks an instance at a world position.
    ///
    /// The instance is flagged as explicitly placed, so automatic
    /// registration skips it.
    pub fn spawn_at(&mut self, key: &str, position: Vec3) -> Option<ObjectId> {
        let instance = self.instantiate(key, true)?;
        self.scene.set_world_position(instance, position);
        if let Some(object) = self.scene.get_mut(instance) {
            object.auto_register = false;
        }
        self.tracker.track(instance, key);
        Some(instance)
    }

    /// Like [`Self::spawn_at`], with a world rotation.
    pub fn spawn_at_rotated(&mut self, key: &str, position: Vec3, rotation: Quat) -> Option<ObjectId> {
        let instance = self.spawn_at(key, position)?;
        self.scene.set_world_rotation(instance, rotation);
        Some(instance)
    }

    //--- Untracked Spawns -------------------------------------------------

    /// Spawns an instance the tracker never hears about.
    ///
    /// `euler_degrees` is applied Y, then X, then Z. The caller owns the
    /// instance's lifecycle.
    pub fn spawn_unregistered(
        &mut self,
        key: &str,
        position: Vec3,
        euler_degrees: Vec3,
        activate: bool,
    ) -> Option<ObjectId> {
        let instance = self.instantiate(key, activate)?;
        let rotation = Quat::from_euler(
            EulerRot::YXZ,
            euler_degrees.y.to_radians(),
            euler_degrees.x.to_radians(),
            euler_degrees.z.to_radians(),
        );
        self.scene.set_world_position(instance, position);
        self.scene.set_world_rotation(instance, rotation);
        Some(instance)
    }

    //--- Deletion ---------------------------------------------------------

    /// Destroys the tracked instance at `(key, id)` and untracks it.
    ///
    /// Returns whether an instance was tracked under that identity.
    pub fn delete(&mut self, key: &str, id: u64) -> bool {
        let Some(instance) = self.tracker.untrack(key, id) else {
            debug!(target: "registry", "Nothing tracked as {}_{}", key, id);
            return false;
        };
        self.scene.destroy(instance);
        true
    }

    //--- Internal Helpers -------------------------------------------------

    fn instantiate(&mut self, key: &str, activate: bool) -> Option<ObjectId> {
        let Some(prototype) = self.registry.get(key) else {
            debug!(target: "registry", "Cannot spawn `{}`: no such prototype", key);
            return None;
        };

        let Some(instance) = self.scene.instantiate(prototype) else {
            warn!(target: "registry", "Prototype `{}` ({}) no longer exists", key, prototype);
            return None;
        };

        if let Some(object) = self.scene.get_mut(instance) {
            object.active = activate;
        }
        Some(instance)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use crate::core::context::ObjectContext;
    use crate::core::scene::SceneObject;
    use glam::{Quat, Vec3};

    fn context_with(keys: &[&str]) -> ObjectContext {
        let mut ctx = ObjectContext::default();
        for key in keys {
            let id = ctx.scene.insert(SceneObject::new(*key));
            ctx.register(key, id).unwrap();
        }
        ctx
    }

    #[test]
    fn spawn_unknown_key_has_no_side_effects() {
        let mut ctx = context_with(&["engine"]);
        let before = ctx.scene.len();

        assert_eq!(ctx.spawner().spawn("turbo"), None);
        assert!(ctx.tracker.is_empty());
        assert_eq!(ctx.tracker.counter(), 0);
        assert_eq!(ctx.scene.len(), before);
    }

    #[test]
    fn two_spawns_share_key_with_distinct_ids() {
        let mut ctx = context_with(&["engine"]);

        let a = ctx.spawner().spawn("engine").unwrap();
        let b = ctx.spawner().spawn("engine").unwrap();

        assert_ne!(a, b);
        assert_eq!(ctx.tracker.counter(), 2);
        assert_eq!(ctx.tracker.get("engine", 1), Some(a));
        assert_eq!(ctx.tracker.get("engine", 2), Some(b));
    }

    #[test]
    fn spawned_instance_is_active_in_active_scene() {
        let mut ctx = context_with(&["battery"]);
        ctx.scene.set_active_scene("Garage");

        let id = ctx.spawner().spawn("battery").unwrap();
        let object = ctx.scene.get(id).unwrap();

        assert!(object.active);
        assert!(!object.persistent);
        assert_eq!(object.scene, "Garage");
        assert_eq!(object.name, "battery");
    }

    #[test]
    fn spawn_at_places_and_flags_instance() {
        let mut ctx = context_with(&["coil"]);
        let position = Vec3::new(1.0, 2.0, 3.0);

        let id = ctx.spawner().spawn_at("coil", position).unwrap();
        let object = ctx.scene.get(id).unwrap();

        assert_eq!(object.local_position, position);
        assert!(!object.auto_register);
        assert!(ctx.tracker.contains(id));
    }

    #[test]
    fn spawn_at_rotated_sets_rotation() {
        let mut ctx = context_with(&["coil"]);
        let rotation = Quat::from_rotation_z(0.5);

        let id = ctx.spawner().spawn_at_rotated("coil", Vec3::ZERO, rotation).unwrap();
        assert_eq!(ctx.scene.get(id).unwrap().local_rotation, rotation);
    }

    #[test]
    fn spawn_unregistered_skips_tracker() {
        let mut ctx = context_with(&["filter"]);

        let id = ctx
            .spawner()
            .spawn_unregistered("filter", Vec3::ONE, Vec3::new(0.0, 90.0, 0.0), false)
            .unwrap();

        let object = ctx.scene.get(id).unwrap();
        assert!(!object.active);
        assert!(ctx.tracker.is_empty());

        let forward = object.local_rotation * Vec3::Z;
        assert!((forward - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn delete_destroys_and_untracks() {
        let mut ctx = context_with(&["tank"]);
        let id = ctx.spawner().spawn("tank").unwrap();

        assert!(ctx.spawner().delete("tank", 1));
        assert!(!ctx.scene.is_alive(id));
        assert!(ctx.tracker.is_empty());
        assert!(!ctx.spawner().delete("tank", 1));
    }
}

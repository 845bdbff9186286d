//=========================================================================
// Object Context
//=========================================================================
//
// Shared object state handed to every collaborating component.
//
// Contains:
// - scene:    the host object graph
// - registry: prototype catalogue
// - tracker:  live-instance index
//
//=========================================================================

//=== External Dependencies ===============================================

use log::warn;

//=== Internal Dependencies ===============================================

use crate::core::registry::{InstanceTracker, PrototypeRegistry, Spawner};
use crate::core::scene::{ObjectId, SceneGraph, SceneObject};
use crate::error::RegistryError;

//=== ObjectContext =======================================================

/// Owner of the scene graph, prototype registry and instance tracker.
///
/// Components receive `&ObjectContext` or `&mut ObjectContext` instead of
/// reaching for process-wide state.
#[derive(Debug, Default)]
pub struct ObjectContext {
    pub scene: SceneGraph,
    pub registry: PrototypeRegistry,
    pub tracker: InstanceTracker,
}

impl ObjectContext {
    pub fn new(scene: SceneGraph, registry: PrototypeRegistry) -> Self {
        Self {
            scene,
            registry,
            tracker: InstanceTracker::new(),
        }
    }

    /// Borrows a spawner over this context.
    pub fn spawner(&mut self) -> Spawner<'_> {
        Spawner::new(&mut self.scene, &self.registry, &mut self.tracker)
    }

    /// Registers a prototype object under `key`.
    pub fn register(&mut self, key: &str, prototype: ObjectId) -> Result<(), RegistryError> {
        self.registry.register(&mut self.scene, key, prototype)
    }

    /// Inserts `object` into the scene and registers it under `key`.
    ///
    /// When the key is already taken the inserted object is removed again.
    /// With duplicates silenced the existing prototype's handle is returned.
    pub fn register_object(
        &mut self,
        key: &str,
        object: SceneObject,
    ) -> Result<ObjectId, RegistryError> {
        let id = self.scene.insert(object);

        if let Err(e) = self.register(key, id) {
            self.scene.destroy(id);
            return Err(e);
        }

        match self.registry.get(key) {
            Some(existing) if existing == id => Ok(id),
            existing => {
                self.scene.destroy(id);
                existing.ok_or_else(|| RegistryError::NullPrototype(key.to_owned()))
            }
        }
    }

    /// Inserts a host structure, under the first object named `parent`
    /// when one is given.
    ///
    /// An unknown parent leaves the object at the scene root.
    pub fn add_object(&mut self, object: SceneObject, parent: Option<&str>) -> ObjectId {
        let id = self.scene.insert(object);

        if let Some(name) = parent {
            match self.scene.find_by_name(name) {
                Some(parent) => {
                    self.scene.set_parent(id, Some(parent));
                }
                None => warn!(target: "scene", "No parent `{}` for {}; left at root", name, id),
            }
        }

        id
    }

    /// Destroys `instance` and forgets it if tracked.
    pub fn destroy_instance(&mut self, instance: ObjectId) -> bool {
        self.tracker.untrack_instance(instance);
        self.scene.destroy(instance)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

//=========================================================================
// Prototype Registry
//=========================================================================
//
// Maps registry keys to inert prototype objects living in the scene graph.
//
// Registered prototypes are deactivated, renamed to their key and marked
// persistent so scene unloads never tear them down.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeMap;

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use crate::core::scene::{ObjectId, SceneGraph, SceneObject};
use crate::error::RegistryError;

//=== PrototypeRegistry ===================================================

/// Key → prototype catalogue.
#[derive(Debug, Default)]
pub struct PrototypeRegistry {
    prototypes: BTreeMap<String, ObjectId>,
    silence_duplicates: bool,
}

impl PrototypeRegistry {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self::default()
    }

    /// When set, registering an existing key is a silent no-op instead of
    /// an [`RegistryError::AlreadyExists`] error.
    pub fn with_silenced_duplicates(mut self, silence: bool) -> Self {
        self.silence_duplicates = silence;
        self
    }

    //--- Registration -----------------------------------------------------

    /// Registers `prototype` under `key`.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::AlreadyExists`] if the key is taken (unless
    ///   duplicates are silenced, in which case `Ok(())` is returned and
    ///   the original stays in place)
    /// - [`RegistryError::NullPrototype`] if `prototype` is not alive
    pub fn register(
        &mut self,
        scene: &mut SceneGraph,
        key: &str,
        prototype: ObjectId,
    ) -> Result<(), RegistryError> {
        if self.prototypes.contains_key(key) {
            if self.silence_duplicates {
                debug!(target: "registry", "Ignoring duplicate registration of `{}`", key);
                return Ok(());
            }
            warn!(target: "registry", "Prototype `{}` is already registered", key);
            return Err(RegistryError::AlreadyExists(key.to_owned()));
        }

        let Some(object) = scene.get_mut(prototype) else {
            warn!(target: "registry", "Refusing to register `{}`: object {} is gone", key, prototype);
            return Err(RegistryError::NullPrototype(key.to_owned()));
        };

        Self::make_inert(object, key);
        self.prototypes.insert(key.to_owned(), prototype);

        info!(target: "registry", "Registered prototype `{}` ({})", key, prototype);
        Ok(())
    }

    /// Replaces the prototype bound to `key`.
    ///
    /// Does nothing if the key is unknown or the new object is not alive.
    /// Returns whether the replacement happened.
    pub fn overwrite(&mut self, scene: &mut SceneGraph, key: &str, prototype: ObjectId) -> bool {
        let Some(slot) = self.prototypes.get_mut(key) else {
            return false;
        };
        let Some(object) = scene.get_mut(prototype) else {
            return false;
        };

        Self::make_inert(object, key);
        *slot = prototype;

        debug!(target: "registry", "Overwrote prototype `{}` with {}", key, prototype);
        true
    }

    //--- Lookup -----------------------------------------------------------

    pub fn get(&self, key: &str) -> Option<ObjectId> {
        self.prototypes.get(key).copied()
    }

    /// Reverse lookup by handle identity.
    pub fn key_of(&self, prototype: ObjectId) -> Option<&str> {
        self.prototypes
            .iter()
            .find(|(_, &id)| id == prototype)
            .map(|(key, _)| key.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.prototypes.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.prototypes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }

    //--- Internal Helpers -------------------------------------------------

    fn make_inert(object: &mut SceneObject, key: &str) {
        object.active = false;
        object.name = key.to_owned();
        object.persistent = true;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

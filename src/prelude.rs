//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use custom_objects::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Runtime and configuration
pub use crate::config::Config;
pub use crate::runtime::{Runtime, RuntimeBuilder};

// Errors
pub use crate::error::{CodecError, PersistenceError, RegistryError};

// Object model
pub use crate::core::context::ObjectContext;
pub use crate::core::registry::{InstanceKey, InstanceTracker, PrototypeRegistry, Spawner};
pub use crate::core::scene::{
    Collider, EngineComponent, ObjectId, PartState, RigidBody, SceneGraph, SceneObject, SlotState,
};

// Persistence
pub use crate::core::persistence::{
    LoadReport, MountLocator, NamedMountLocator, PartRecord, PartType, PersistenceEngine,
    SaveReport, StorageSlots,
};

// Host interface
pub use crate::core::host_bridge::{HostEvent, HostHandle, TickControl};
pub use crate::core::lifecycle::Notification;
pub use crate::platform::WinitInputForwarder;

//=========================================================================
// Registry System
//=========================================================================
//
// Prototype catalogue, live-instance index and the spawner joining them.
//
// Architecture:
//   PrototypeRegistry   key → prototype ObjectId
//   InstanceTracker     (key, id) → live ObjectId
//   Spawner             prototype → instance, tracked on demand
//
//=========================================================================

//=== Module Declarations =================================================

mod instance_tracker;
mod prototype_registry;
mod spawner;

//=== Public API ==========================================================

pub use instance_tracker::{InstanceKey, InstanceTracker};
pub use prototype_registry::PrototypeRegistry;
pub use spawner::Spawner;

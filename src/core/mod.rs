//=========================================================================
// Core Systems
//
// Everything that runs on the tick thread.
//
// Layout (leaf to root):
// - `scene`:        host object graph (arena of scene objects)
// - `registry`:     prototype registry, instance tracker, spawner
// - `context`:      `ObjectContext`, owner of scene + registry + tracker
// - `persistence`:  record codec, snapshot file, slot placement, engine
// - `input`:        keyboard state and debug shortcuts
// - `host_bridge`:  host events in, bounded per-tick draining
// - `lifecycle`:    coordinator, deferred tasks, notifications
// - `systems`:      `PartSystems`, the services the coordinator drives
//
//=========================================================================

//=== Module Declarations =================================================

pub mod context;
pub mod host_bridge;
pub mod input;
pub mod lifecycle;
pub mod persistence;
pub mod registry;
pub mod scene;
pub mod systems;

//=== Public API ==========================================================

pub use context::ObjectContext;
pub use systems::PartSystems;

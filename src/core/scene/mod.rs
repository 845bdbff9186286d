//=========================================================================
// Scene System
//=========================================================================
//
// Host-side object graph the registry spawns into and the persistence
// engine re-parents parts within.
//
// Architecture:
//   SceneGraph
//     ├─ entries: generational arena of SceneObject
//     └─ active_scene: label new objects are placed into
//
//   SceneObject
//     ├─ transform (local position/rotation, parent/children)
//     ├─ physics   (RigidBody, Collider)
//     └─ capabilities (PartState / EngineComponent, SlotState)
//
//=========================================================================

//=== Module Declarations =================================================

mod object;
mod scene_graph;

//=== Public API ==========================================================

pub use object::{
    Collider, EngineComponent, PartState, PartStats, RigidBody, SceneObject, SlotState,
};
pub use scene_graph::{ObjectId, SceneGraph};

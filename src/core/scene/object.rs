//=========================================================================
// Scene Object
//=========================================================================
//
// A node of the host scene graph plus the capabilities the part system
// cares about.
//
// Capabilities are plain optional fields, resolved once when an object is
// built or instantiated:
//   - `part`      pickup capability (can be carried, mounted, stored)
//   - `part.engine` engine component (condition, type tag, stats)
//   - `slot`      attachment point (engine mount or storage slot)
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::{Quat, Vec3};

//=== Internal Dependencies ===============================================

use super::ObjectId;
use crate::core::persistence::PartType;

//=== Physics =============================================================

/// Rigid body state. Only the dynamic flag is modelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RigidBody {
    pub dynamic: bool,
}

/// Collider state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collider {
    pub enabled: bool,
    /// Trigger colliders report overlaps but do not block.
    pub trigger: bool,
}

impl Collider {
    pub fn solid() -> Self {
        Self { enabled: true, trigger: false }
    }
}

//=== Engine Component ====================================================

/// Performance figures derived from a part's condition and its mount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartStats {
    pub mounted_as: PartType,
    pub effectiveness: f32,
}

/// Engine component capability.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineComponent {
    /// Part type tag, matched exactly against [`PartType`] names.
    pub tag: String,

    /// Wear state, `1.0` is new.
    pub condition: f32,

    /// Derived figures, refreshed whenever the part is mounted.
    pub stats: Option<PartStats>,
}

impl EngineComponent {
    pub fn new(tag: impl Into<String>, condition: f32) -> Self {
        Self {
            tag: tag.into(),
            condition,
            stats: None,
        }
    }

    /// Part type resolved from the tag, `None` for unknown tags.
    pub fn part_type(&self) -> Option<PartType> {
        self.tag.parse().ok()
    }

    /// Recomputes derived stats for the given mount.
    pub fn recompute_stats(&mut self, mounted_as: PartType) {
        self.stats = Some(PartStats {
            mounted_as,
            effectiveness: self.condition.clamp(0.0, 1.0),
        });
    }
}

//=== Part State ==========================================================

/// Pickup capability and its placement state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PartState {
    /// Bolted into its engine mount.
    pub in_engine: bool,

    /// Slot currently holding the part (engine mount or storage slot).
    pub slot: Option<ObjectId>,

    /// Owned by an extension that persists it on its own.
    pub extension_owned: bool,

    pub engine: Option<EngineComponent>,
}

impl PartState {
    pub fn pickup() -> Self {
        Self::default()
    }

    pub fn engine_part(component: EngineComponent) -> Self {
        Self {
            engine: Some(component),
            ..Self::default()
        }
    }
}

//=== Slot State ==========================================================

/// Attachment point state.
///
/// The adjustment offsets are applied to a part's local transform when it
/// is snapped into a storage slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotState {
    pub occupied: bool,
    pub adjust_position: Vec3,
    pub adjust_rotation: Quat,
}

impl Default for SlotState {
    fn default() -> Self {
        Self {
            occupied: false,
            adjust_position: Vec3::ZERO,
            adjust_rotation: Quat::IDENTITY,
        }
    }
}

//=== SceneObject =========================================================

/// A node in the scene graph.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub name: String,
    pub active: bool,

    /// Scene that owns the object.
    pub scene: String,

    /// Survives scene unloads.
    pub persistent: bool,

    /// Set when a spawn placed the object explicitly, so it is not picked
    /// up again by automatic registration.
    pub auto_register: bool,

    pub local_position: Vec3,
    pub local_rotation: Quat,

    pub body: Option<RigidBody>,
    pub collider: Option<Collider>,
    pub part: Option<PartState>,
    pub slot: Option<SlotState>,

    pub(super) parent: Option<ObjectId>,
    pub(super) children: Vec<ObjectId>,
}

impl SceneObject {
    /// Creates an active, detached object with identity transform.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: true,
            scene: String::new(),
            persistent: false,
            auto_register: true,
            local_position: Vec3::ZERO,
            local_rotation: Quat::IDENTITY,
            body: None,
            collider: None,
            part: None,
            slot: None,
            parent: None,
            children: Vec::new(),
        }
    }

    //--- Builders ---------------------------------------------------------

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.local_position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.local_rotation = rotation;
        self
    }

    pub fn with_body(mut self, dynamic: bool) -> Self {
        self.body = Some(RigidBody { dynamic });
        self
    }

    pub fn with_collider(mut self, collider: Collider) -> Self {
        self.collider = Some(collider);
        self
    }

    pub fn with_part(mut self, part: PartState) -> Self {
        self.part = Some(part);
        self
    }

    pub fn with_slot(mut self, slot: SlotState) -> Self {
        self.slot = Some(slot);
        self
    }

    //--- Accessors --------------------------------------------------------

    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    pub fn children(&self) -> &[ObjectId] {
        &self.children
    }

    pub fn engine(&self) -> Option<&EngineComponent> {
        self.part.as_ref().and_then(|p| p.engine.as_ref())
    }

    pub fn engine_mut(&mut self) -> Option<&mut EngineComponent> {
        self.part.as_mut().and_then(|p| p.engine.as_mut())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

//=========================================================================
// Part Placement
//=========================================================================
//
// Attaching parts to engine mounts and storage slots.
//
// `mount_in_engine` is the single routine used both by live gameplay and
// by snapshot restoration, so a restored part ends up in exactly the
// state a hand-mounted one would.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::{Quat, Vec3};
use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::PartType;
use crate::core::context::ObjectContext;
use crate::core::scene::{ObjectId, PartState, SceneGraph};

//=== Engine Mounts =======================================================

/// Bolts `instance` into the engine mount `mount`.
///
/// If the mount is already occupied, the previous occupant (the mount's
/// first child) is destroyed and the mount is reset before the new part
/// takes its place. Afterwards the part sits at the mount's origin, is
/// flagged in-engine and refers back to the mount, the mount is occupied
/// and its collider is disabled so the part cannot be picked up again.
/// A part taken out of another slot frees that slot first.
///
/// Returns `false` if either object is gone.
pub fn mount_in_engine(
    ctx: &mut ObjectContext,
    instance: ObjectId,
    mount: ObjectId,
    part_type: PartType,
) -> bool {
    if !ctx.scene.is_alive(instance) || !ctx.scene.is_alive(mount) {
        warn!(target: "persistence", "Cannot mount {} into {}: object missing", instance, mount);
        return false;
    }

    let held_by = ctx
        .scene
        .get(instance)
        .and_then(|o| o.part.as_ref())
        .and_then(|p| p.slot);
    if held_by.is_some_and(|slot| slot != mount) {
        release_from_slot(&mut ctx.scene, instance);
    }

    if ctx.scene.parent(instance) != Some(mount) {
        ctx.scene.set_parent(instance, Some(mount));
    }

    if ctx.scene.get(mount).is_some_and(|m| m.slot.is_some_and(|s| s.occupied)) {
        evict_occupant(ctx, instance, mount);
    }

    if let Some(object) = ctx.scene.get_mut(instance) {
        object.local_position = Vec3::ZERO;
        object.local_rotation = Quat::IDENTITY;

        let part = object.part.get_or_insert_with(PartState::pickup);
        part.in_engine = true;
        part.slot = Some(mount);
        if let Some(engine) = part.engine.as_mut() {
            engine.recompute_stats(part_type);
        }
    }

    if let Some(slot_object) = ctx.scene.get_mut(mount) {
        slot_object.slot.get_or_insert_with(Default::default).occupied = true;
        if let Some(collider) = slot_object.collider.as_mut() {
            collider.enabled = false;
        }
    }

    debug!(target: "persistence", "Mounted {} as {}", instance, part_type);
    true
}

fn evict_occupant(ctx: &mut ObjectContext, instance: ObjectId, mount: ObjectId) {
    if let Some(slot_object) = ctx.scene.get_mut(mount) {
        if let Some(slot) = slot_object.slot.as_mut() {
            slot.occupied = false;
        }
        if let Some(collider) = slot_object.collider.as_mut() {
            collider.enabled = true;
        }
    }

    match ctx.scene.first_child(mount) {
        Some(previous) if previous != instance => {
            debug!(target: "persistence", "Replacing previous occupant {} of {}", previous, mount);
            ctx.destroy_instance(previous);
        }
        _ => {}
    }
}

//=== Storage Slots =======================================================

/// Snaps `instance` into the storage slot `slot`.
///
/// The part's local transform is set to the slot's adjustment offsets.
/// Returns `false` if either object is gone.
pub fn place_in_storage(scene: &mut SceneGraph, instance: ObjectId, slot: ObjectId) -> bool {
    if !scene.is_alive(instance) || !scene.is_alive(slot) {
        return false;
    }

    let adjustment = {
        let Some(slot_object) = scene.get_mut(slot) else {
            return false;
        };
        let state = slot_object.slot.get_or_insert_with(Default::default);
        state.occupied = true;
        (state.adjust_position, state.adjust_rotation)
    };

    scene.set_parent(instance, Some(slot));

    if let Some(object) = scene.get_mut(instance) {
        let part = object.part.get_or_insert_with(PartState::pickup);
        part.in_engine = false;
        part.slot = Some(slot);
        object.local_position = adjustment.0;
        object.local_rotation = adjustment.1;
    }

    debug!(target: "persistence", "Stored {} in slot {}", instance, slot);
    true
}

//=== Release =============================================================

/// Takes `instance` out of whatever slot holds it.
///
/// The slot is freed and its collider re-enabled; the part is detached to
/// the scene root keeping its world position. Returns the freed slot.
pub fn release_from_slot(scene: &mut SceneGraph, instance: ObjectId) -> Option<ObjectId> {
    let slot = scene.get(instance)?.part.as_ref()?.slot?;
    let world = scene.world_transform(instance);

    if let Some(slot_object) = scene.get_mut(slot) {
        if let Some(state) = slot_object.slot.as_mut() {
            state.occupied = false;
        }
        if let Some(collider) = slot_object.collider.as_mut() {
            collider.enabled = true;
        }
    }

    scene.set_parent(instance, None);

    if let Some(object) = scene.get_mut(instance) {
        if let Some((position, rotation)) = world {
            object.local_position = position;
            object.local_rotation = rotation;
        }
        if let Some(part) = object.part.as_mut() {
            part.in_engine = false;
            part.slot = None;
        }
    }

    Some(slot)
}

//=== Physics =============================================================

/// Freezes an instance so it does not interact physically before it is
/// placed: the body stops being dynamic and the collider becomes a trigger.
pub fn make_kinematic(scene: &mut SceneGraph, instance: ObjectId) {
    if let Some(object) = scene.get_mut(instance) {
        if let Some(body) = object.body.as_mut() {
            body.dynamic = false;
        }
        if let Some(collider) = object.collider.as_mut() {
            collider.trigger = true;
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

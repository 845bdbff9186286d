//=========================================================================
// Persistence Engine
//=========================================================================
//
// Saves and restores the installable-part subset of tracked instances.
//
// Save:
//   tracker → eligible parts → PartRecord → Snapshot → file
//
// Load:
//   despawn tracked parts
//   file → Snapshot → per entry: split key → decode → spawn
//        → freeze physics → restore condition
//        → engine mount (in-engine) | storage slot (full load only)
//
// A record that fails to decode is logged and skipped; the rest of the
// snapshot still loads.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::{Quat, Vec3};
use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::placement::{make_kinematic, mount_in_engine, place_in_storage, release_from_slot};
use super::snapshot::split_entry_key;
use super::{MountLocator, PartRecord, PartType, Snapshot, SnapshotStore, StorageSlots};
use crate::core::context::ObjectContext;
use crate::core::registry::InstanceKey;
use crate::core::scene::{ObjectId, SceneGraph};
use crate::error::PersistenceError;

//=== Reports =============================================================

/// Outcome of a save.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveReport {
    /// Records written.
    pub saved: usize,
    /// Tracked instances that were not eligible.
    pub skipped: usize,
}

/// Outcome of a load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Instances spawned from records.
    pub spawned: usize,
    /// Spawned instances bolted into an engine mount.
    pub mounted: usize,
    /// Spawned instances placed into a storage slot.
    pub stored: usize,
    /// Spawned instances left loose at the origin.
    pub unplaced: usize,
    /// Mounted instances destroyed again because a later record of the
    /// same part type took their mount.
    pub replaced: usize,
    /// Records that produced no instance.
    pub skipped: usize,
}

//=== PersistenceEngine ===================================================

pub struct PersistenceEngine {
    store: SnapshotStore,
    snapshot: Snapshot,
    storage: StorageSlots,
}

impl PersistenceEngine {
    pub fn new(store: SnapshotStore) -> Self {
        Self {
            store,
            snapshot: Snapshot::new(),
            storage: StorageSlots::default(),
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Snapshot from the last save or load.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn storage_slots(&self) -> &StorageSlots {
        &self.storage
    }

    /// Replaces the known storage slots, usually after rediscovery on game
    /// load.
    pub fn set_storage_slots(&mut self, storage: StorageSlots) {
        self.storage = storage;
    }

    //--- Save -------------------------------------------------------------

    /// Rebuilds the snapshot from the tracked instances and overwrites the
    /// file with it.
    pub fn save(&mut self, ctx: &ObjectContext) -> Result<SaveReport, PersistenceError> {
        self.snapshot.clear();
        let mut report = SaveReport::default();

        for (key, instance) in ctx.tracker.iter() {
            match Self::record_for(&ctx.scene, key, instance) {
                Some(record) => {
                    self.snapshot.insert(key.to_string(), record.to_string());
                    report.saved += 1;
                }
                None => report.skipped += 1,
            }
        }

        self.store.write(&self.snapshot)?;

        info!(target: "persistence", "Saved {} parts ({} skipped)", report.saved, report.skipped);
        Ok(report)
    }

    /// Projects a tracked instance onto a record, `None` if it is not
    /// eligible for persistence.
    fn record_for(scene: &SceneGraph, key: &InstanceKey, instance: ObjectId) -> Option<PartRecord> {
        let Some(object) = scene.get(instance) else {
            debug!(target: "persistence", "Skipping {}: destroyed", key);
            return None;
        };
        let part = object.part.as_ref()?;
        if part.extension_owned {
            return None;
        }

        let (part_type, parameters) = match &part.engine {
            Some(engine) => match engine.part_type() {
                Some(part_type) => (part_type, vec![engine.condition]),
                None => {
                    debug!(target: "persistence", "Skipping {}: unknown part tag `{}`", key, engine.tag);
                    return None;
                }
            },
            None => (PartType::default(), Vec::new()),
        };

        if part.in_engine {
            return Some(PartRecord::mounted(part_type, parameters));
        }

        let slot = scene.get(part.slot?)?;
        Some(PartRecord::stored(part_type, parameters, slot.local_position))
    }

    //--- Load -------------------------------------------------------------

    /// Restores the saved parts.
    ///
    /// Parts tracked before the load are despawned and their slots freed,
    /// so each saved part exists once no matter how often loads repeat.
    /// Tracking then restarts from an empty tracker with the counter at
    /// zero.
    ///
    /// In-engine parts are always mounted; stored parts are put back into
    /// their storage slot only when `full` is set and otherwise stay loose
    /// at the origin. With no registered prototypes this does nothing.
    pub fn load(
        &mut self,
        ctx: &mut ObjectContext,
        mounts: &dyn MountLocator,
        full: bool,
    ) -> Result<LoadReport, PersistenceError> {
        let mut report = LoadReport::default();

        if ctx.registry.is_empty() {
            debug!(target: "persistence", "No prototypes registered; nothing to load");
            return Ok(report);
        }

        let despawned = Self::despawn_tracked(ctx);
        if despawned > 0 {
            debug!(target: "persistence", "Despawned {} previously tracked parts", despawned);
        }
        ctx.tracker.reset_counter();

        let Some(snapshot) = self.store.read()? else {
            self.snapshot.clear();
            return Ok(report);
        };

        let mut restored: Vec<ObjectId> = Vec::with_capacity(snapshot.len());
        for entry in snapshot.iter() {
            let Some((instance, placement)) =
                self.restore_entry(ctx, mounts, full, &entry.key, &entry.value)
            else {
                report.skipped += 1;
                continue;
            };

            match placement {
                // The displaced part was counted as mounted when it loaded.
                Placement::Mounted { displaced } => {
                    if displaced.is_some_and(|previous| restored.contains(&previous)) {
                        report.replaced += 1;
                    } else {
                        report.mounted += 1;
                    }
                }
                Placement::Stored => report.stored += 1,
                Placement::Loose => report.unplaced += 1,
            }
            restored.push(instance);
            report.spawned += 1;
        }

        self.snapshot = snapshot;

        info!(
            target: "persistence",
            "Loaded {} parts (mounted {}, stored {}, loose {}, replaced {}, skipped {}, full {})",
            report.spawned,
            report.mounted,
            report.stored,
            report.unplaced,
            report.replaced,
            report.skipped,
            full
        );
        Ok(report)
    }

    fn restore_entry(
        &self,
        ctx: &mut ObjectContext,
        mounts: &dyn MountLocator,
        full: bool,
        key: &str,
        line: &str,
    ) -> Option<(ObjectId, Placement)> {
        let Some((name, _)) = split_entry_key(key) else {
            warn!(target: "persistence", "Skipping entry with malformed key `{}`", key);
            return None;
        };
        if !ctx.registry.contains_key(name) {
            debug!(target: "persistence", "Skipping `{}`: no prototype `{}`", key, name);
            return None;
        }

        let record: PartRecord = match line.parse() {
            Ok(record) => record,
            Err(e) => {
                warn!(target: "persistence", "Skipping `{}`: {}", key, e);
                return None;
            }
        };

        let instance = ctx.spawner().spawn_at_rotated(name, Vec3::ZERO, Quat::IDENTITY)?;
        make_kinematic(&mut ctx.scene, instance);

        if let Some(condition) = record.condition() {
            if let Some(engine) = ctx.scene.get_mut(instance).and_then(|o| o.engine_mut()) {
                engine.condition = condition;
            }
        }

        Some((instance, self.place(ctx, mounts, full, key, instance, &record)))
    }

    fn place(
        &self,
        ctx: &mut ObjectContext,
        mounts: &dyn MountLocator,
        full: bool,
        key: &str,
        instance: ObjectId,
        record: &PartRecord,
    ) -> Placement {
        if record.in_engine {
            let Some(mount) = mounts.mount_for(record.part_type) else {
                warn!(target: "persistence", "No mount for {}; `{}` left loose", record.part_type, key);
                return Placement::Loose;
            };
            let displaced = ctx
                .scene
                .get(mount)
                .is_some_and(|m| m.slot.is_some_and(|s| s.occupied))
                .then(|| ctx.scene.first_child(mount))
                .flatten();

            ctx.scene.set_parent(instance, Some(mount));
            if mount_in_engine(ctx, instance, mount, record.part_type) {
                return Placement::Mounted { displaced };
            }
            return Placement::Loose;
        }

        if !full {
            return Placement::Loose;
        }

        match self.storage.find_at(&ctx.scene, record.storage_position) {
            Some(slot) if place_in_storage(&mut ctx.scene, instance, slot) => Placement::Stored,
            _ => {
                warn!(
                    target: "persistence",
                    "No storage slot at {}; `{}` left loose",
                    record.storage_position, key
                );
                Placement::Loose
            }
        }
    }

    //--- Delete -----------------------------------------------------------

    /// Removes the snapshot file, despawns the tracked parts and restarts
    /// tracking from zero.
    pub fn delete(&mut self, ctx: &mut ObjectContext) -> Result<(), PersistenceError> {
        let removed = self.store.delete()?;
        self.snapshot.clear();
        Self::despawn_tracked(ctx);
        ctx.tracker.reset_counter();

        info!(target: "persistence", "Deleted saved parts (file present: {})", removed);
        Ok(())
    }

    //--- Internal Helpers -------------------------------------------------

    /// Destroys every tracked instance, freeing the slot each one occupies,
    /// and empties the tracker. Returns how many were still alive.
    fn despawn_tracked(ctx: &mut ObjectContext) -> usize {
        let tracked: Vec<ObjectId> = ctx.tracker.iter().map(|(_, id)| id).collect();
        let mut despawned = 0;

        for instance in tracked {
            release_from_slot(&mut ctx.scene, instance);
            if ctx.scene.destroy(instance) {
                despawned += 1;
            }
        }

        ctx.tracker.clear();
        despawned
    }
}

enum Placement {
    /// `displaced` is the mount's occupant at the time, if any.
    Mounted { displaced: Option<ObjectId> },
    Stored,
    Loose,
}

//=========================================================================
// Unit Tests
//=========================================================================

//=========================================================================
// Persistence
//=========================================================================
//
// Saving and restoring installable parts across sessions.
//
//=========================================================================

//=== Module Declarations =================================================

mod engine;
mod part_type;
mod placement;
mod record_codec;
mod slots;
mod snapshot;

//=== Public API ==========================================================

pub use engine::{LoadReport, PersistenceEngine, SaveReport};
pub use part_type::PartType;
pub use placement::{make_kinematic, mount_in_engine, place_in_storage, release_from_slot};
pub use record_codec::{decode, encode, PartRecord};
pub use slots::{MountLocator, NamedMountLocator, StorageSlots};
pub use snapshot::{split_entry_key, Snapshot, SnapshotEntry, SnapshotStore};

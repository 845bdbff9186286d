//=========================================================================
// Part Systems
//=========================================================================
//
// Container for the systems that act on the object context.
//
// Contains:
// - persistence:   snapshot save/load/delete
// - mounts:        part type → engine mount lookup
// - notifications: outgoing announcements
//
// The save/load/delete wrappers here are what the lifecycle coordinator
// and the debug shortcuts call: they run the operation and publish its
// outcome, success or failure, on the notification bus.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::error;

//=== Internal Dependencies ===============================================

use crate::core::context::ObjectContext;
use crate::core::lifecycle::{Notification, NotificationBus, Operation};
use crate::core::persistence::{LoadReport, MountLocator, PersistenceEngine, SaveReport};

//=== PartSystems =========================================================

pub struct PartSystems {
    pub persistence: PersistenceEngine,

    /// Resolves engine mounts; refreshed on every game load.
    pub mounts: Box<dyn MountLocator>,

    pub notifications: NotificationBus,
}

impl PartSystems {
    pub fn new(persistence: PersistenceEngine, mounts: Box<dyn MountLocator>) -> Self {
        Self {
            persistence,
            mounts,
            notifications: NotificationBus::new(),
        }
    }

    //--- Reported Operations ----------------------------------------------

    pub fn save(&mut self, objects: &ObjectContext) -> Option<SaveReport> {
        match self.persistence.save(objects) {
            Ok(report) => {
                self.notifications.push(Notification::SaveCompleted(report));
                Some(report)
            }
            Err(e) => {
                self.fail(Operation::Save, e);
                None
            }
        }
    }

    pub fn load(&mut self, objects: &mut ObjectContext, full: bool) -> Option<LoadReport> {
        match self.persistence.load(objects, self.mounts.as_ref(), full) {
            Ok(report) => {
                self.notifications.push(Notification::LoadCompleted { full, report });
                Some(report)
            }
            Err(e) => {
                self.fail(Operation::Load, e);
                None
            }
        }
    }

    pub fn delete(&mut self, objects: &mut ObjectContext) -> bool {
        match self.persistence.delete(objects) {
            Ok(()) => {
                self.notifications.push(Notification::PartsDeleted);
                true
            }
            Err(e) => {
                self.fail(Operation::Delete, e);
                false
            }
        }
    }

    fn fail(&mut self, operation: Operation, reason: impl std::fmt::Display) {
        error!(target: "persistence", "{:?} failed: {}", operation, reason);
        self.notifications.push(Notification::PersistenceFailed {
            operation,
            reason: reason.to_string(),
        });
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

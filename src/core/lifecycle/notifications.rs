//=========================================================================
// Notification Bus
//=========================================================================
//
// Outgoing notifications from the runtime to the host and other mods.
//
// Architecture:
//   Coordinator → push() → tick queue ──→ read() (in-tick consumers)
//                              │
//                              └─────→ subscribers (crossbeam, any thread)
//   Runtime ─────→ clear() at tick boundary
//
// Pattern: push → read (N consumers) → clear → repeat
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::trace;

//=== Internal Dependencies ===============================================

use crate::core::persistence::{LoadReport, SaveReport};

//=== Notification ========================================================

/// Persistence operation named in failure reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Save,
    Load,
    Delete,
}

/// Something the runtime announces.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// Dependent registrations are complete and the registry is final.
    RegistrationFinished,

    /// Ask the shop catalogue to rebuild. The three arguments are
    /// placeholders the receiver ignores; they are always `None`.
    CatalogueRefresh([Option<String>; 3]),

    SaveCompleted(SaveReport),

    LoadCompleted { full: bool, report: LoadReport },

    /// The snapshot was removed and tracking restarted.
    PartsDeleted,

    PersistenceFailed { operation: Operation, reason: String },
}

impl Notification {
    pub fn catalogue_refresh() -> Self {
        Self::CatalogueRefresh([None, None, None])
    }
}

//=== NotificationBus =====================================================

/// Per-tick notification queue with cross-thread subscribers.
#[derive(Debug, Default)]
pub struct NotificationBus {
    queue: Vec<Notification>,
    subscribers: Vec<Sender<Notification>>,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Subscription -----------------------------------------------------

    /// Returns a receiver that gets every notification pushed from now on.
    ///
    /// Dropping the receiver unsubscribes on the next push.
    pub fn subscribe(&mut self) -> Receiver<Notification> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    //--- Message Operations -----------------------------------------------

    /// Queues a notification for this tick and forwards it to subscribers.
    pub fn push(&mut self, notification: Notification) {
        trace!(target: "lifecycle", "Notify {:?}", notification);
        self.subscribers
            .retain(|subscriber| subscriber.send(notification.clone()).is_ok());
        self.queue.push(notification);
    }

    /// Notifications pushed since the last [`Self::clear`].
    pub fn read(&self) -> &[Notification] {
        &self.queue
    }

    pub fn has_messages(&self) -> bool {
        !self.queue.is_empty()
    }

    pub fn count(&self) -> usize {
        self.queue.len()
    }

    /// Empties the tick queue, keeping its capacity.
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

//=========================================================================
// Tests
//=========================================================================

//=========================================================================
// Lifecycle
//=========================================================================
//
// Host lifecycle sequencing, deferred work and outgoing notifications.
//
//=========================================================================

//=== Module Declarations =================================================

mod coordinator;
mod notifications;
mod scheduler;

//=== Public API ==========================================================

pub use coordinator::{LifecycleCoordinator, LifecycleTask};
pub use notifications::{Notification, NotificationBus, Operation};
pub use scheduler::{DeferredQueue, Wait};

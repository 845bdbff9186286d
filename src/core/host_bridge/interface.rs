//=========================================================================
// Host Bridge Interface
//=========================================================================
//
// Host-to-runtime contract: the lifecycle events the host simulation
// reports, and the cloneable handle it reports them through.
//
// Once the runtime ticks on its own thread this channel is the only way
// in, so prototype registrations and host structures travel over it too.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Sender, TrySendError};
use log::warn;

//=== Internal Dependencies ===============================================

use crate::core::input::InputEvent;
use crate::core::scene::SceneObject;

//=== HostEvent ===========================================================

/// Events sent from the host to the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// The host is writing its own save; persist the parts alongside it.
    SaveRequested,

    /// The main menu finished loading.
    MenuLoaded,

    /// A game scene finished loading and its structures exist.
    GameLoaded,

    /// The player started a new game; saved parts are discarded.
    NewGameStarted,

    /// Every dependent mod finished registering its prototypes.
    RegistrationsReady,

    /// Insert `prototype` into the scene and register it under `key`.
    Register { key: String, prototype: SceneObject },

    /// Insert a host structure (trunk, slot, engine mount), optionally
    /// under the first object named `parent`.
    AddObject { object: SceneObject, parent: Option<String> },

    /// Keyboard input batched by the platform layer.
    Input(Vec<InputEvent>),

    /// Stop ticking.
    Shutdown,
}

//=== HostHandle ==========================================================

/// Sending side of the host channel.
///
/// Cheap to clone; hand one to every host-side component that reports
/// lifecycle events.
#[derive(Debug, Clone)]
pub struct HostHandle {
    sender: Sender<HostEvent>,
}

impl HostHandle {
    pub(crate) fn new(sender: Sender<HostEvent>) -> Self {
        Self { sender }
    }

    /// Queues an event, blocking while the channel is full.
    ///
    /// Only the tick drains the channel. A host that steps
    /// `Runtime::tick` on the sending thread must not queue more than the
    /// channel capacity between ticks, or this never returns; use
    /// [`Self::try_send`] or the shorthands there.
    ///
    /// Returns `false` if the runtime is gone; the event is dropped.
    pub fn send(&self, event: HostEvent) -> bool {
        match self.sender.send(event) {
            Ok(()) => true,
            Err(e) => {
                warn!(target: "host", "Runtime disconnected, dropping {:?}", e.into_inner());
                false
            }
        }
    }

    /// Queues an event without blocking.
    ///
    /// Returns `false` if the channel is full or the runtime is gone.
    pub fn try_send(&self, event: HostEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                warn!(target: "host", "Host channel full, dropping {:?}", event);
                false
            }
            Err(TrySendError::Disconnected(event)) => {
                warn!(target: "host", "Runtime disconnected, dropping {:?}", event);
                false
            }
        }
    }

    //--- Shorthands -------------------------------------------------------
    //
    // Non-blocking: each returns `false` and drops the event when the
    // channel is full.

    pub fn request_save(&self) -> bool {
        self.try_send(HostEvent::SaveRequested)
    }

    pub fn menu_loaded(&self) -> bool {
        self.try_send(HostEvent::MenuLoaded)
    }

    pub fn game_loaded(&self) -> bool {
        self.try_send(HostEvent::GameLoaded)
    }

    pub fn new_game_started(&self) -> bool {
        self.try_send(HostEvent::NewGameStarted)
    }

    pub fn registrations_ready(&self) -> bool {
        self.try_send(HostEvent::RegistrationsReady)
    }

    /// Registers a prototype from the host side, e.g. while the runtime
    /// runs on its tick thread.
    pub fn register(&self, key: impl Into<String>, prototype: SceneObject) -> bool {
        self.try_send(HostEvent::Register { key: key.into(), prototype })
    }

    pub fn add_object(&self, object: SceneObject, parent: Option<&str>) -> bool {
        self.try_send(HostEvent::AddObject {
            object,
            parent: parent.map(str::to_owned),
        })
    }

    pub fn shutdown(&self) -> bool {
        self.try_send(HostEvent::Shutdown)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    #[test]
    fn shorthands_send_matching_events() {
        let (tx, rx) = bounded(8);
        let host = HostHandle::new(tx);

        assert!(host.request_save());
        assert!(host.game_loaded());
        assert!(host.shutdown());

        let received: Vec<HostEvent> = rx.try_iter().collect();
        assert_eq!(
            received,
            vec![HostEvent::SaveRequested, HostEvent::GameLoaded, HostEvent::Shutdown]
        );
    }

    #[test]
    fn shorthands_do_not_block_on_a_full_channel() {
        let (tx, rx) = bounded(1);
        let host = HostHandle::new(tx);

        assert!(host.request_save());
        assert!(!host.menu_loaded());
        assert!(!host.register("crate", SceneObject::new("crate")));

        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![HostEvent::SaveRequested]);
    }

    #[test]
    fn structure_events_carry_their_payload() {
        let (tx, rx) = bounded(4);
        let host = HostHandle::new(tx);

        host.register("crate", SceneObject::new("crate"));
        host.add_object(SceneObject::new("Slot1"), Some("Boot"));

        assert_eq!(
            rx.try_iter().collect::<Vec<_>>(),
            vec![
                HostEvent::Register { key: "crate".into(), prototype: SceneObject::new("crate") },
                HostEvent::AddObject { object: SceneObject::new("Slot1"), parent: Some("Boot".into()) },
            ]
        );
    }

    #[test]
    fn try_send_reports_full_channel() {
        let (tx, _rx) = bounded(1);
        let host = HostHandle::new(tx);

        assert!(host.try_send(HostEvent::MenuLoaded));
        assert!(!host.try_send(HostEvent::MenuLoaded));
    }

    #[test]
    fn send_after_disconnect_is_dropped() {
        let (tx, rx) = bounded(1);
        let host = HostHandle::new(tx);
        drop(rx);

        assert!(!host.send(HostEvent::NewGameStarted));
    }
}

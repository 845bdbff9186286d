//=========================================================================
// Lifecycle Coordinator
//=========================================================================
//
// Sequences persistence across the host's lifecycle.
//
//   NewGameStarted     → cancel pending loads, Delete
//   MenuLoaded         → Load(false) after the menu delay
//   GameLoaded         → rediscover storage slots, refresh mounts,
//                        next tick: Load(true) + catalogue refresh
//   SaveRequested      → Save
//   RegistrationsReady → RegistrationFinished, Load(false)   (once)
//   Register / AddObject → applied to the object context in arrival order
//
// Loads are deferred so the host's structures exist before parts are
// attached to them.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::scheduler::{DeferredQueue, Wait};
use super::Notification;
use crate::core::context::ObjectContext;
use crate::core::host_bridge::HostEvent;
use crate::core::input::DebugCommand;
use crate::core::persistence::StorageSlots;
use crate::core::systems::PartSystems;

//=== LifecycleTask =======================================================

/// Work the coordinator defers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleTask {
    Load { full: bool, refresh_catalogue: bool },
}

//=== LifecycleCoordinator ================================================

pub struct LifecycleCoordinator {
    deferred: DeferredQueue<LifecycleTask>,
    menu_load_delay: Duration,
    trunk_name: String,
    registration_complete: bool,
}

impl LifecycleCoordinator {
    pub fn new(menu_load_delay: Duration, trunk_name: impl Into<String>) -> Self {
        Self {
            deferred: DeferredQueue::new(),
            menu_load_delay,
            trunk_name: trunk_name.into(),
            registration_complete: false,
        }
    }

    //--- Queries ----------------------------------------------------------

    /// Whether dependent registrations have been reported complete.
    pub fn is_registration_complete(&self) -> bool {
        self.registration_complete
    }

    /// Tasks still waiting, in scheduling order.
    pub fn pending(&self) -> impl Iterator<Item = &LifecycleTask> {
        self.deferred.iter()
    }

    //--- Tick Processing --------------------------------------------------

    /// Runs the deferred tasks that became due during this tick.
    pub fn advance(&mut self, dt: Duration, objects: &mut ObjectContext, systems: &mut PartSystems) {
        for task in self.deferred.advance(dt) {
            self.run_task(task, objects, systems);
        }
    }

    /// Reacts to one host lifecycle event.
    pub fn handle_event(
        &mut self,
        event: HostEvent,
        objects: &mut ObjectContext,
        systems: &mut PartSystems,
    ) {
        debug!(target: "lifecycle", "Handling {:?}", event);

        match event {
            HostEvent::NewGameStarted => {
                let cancelled = self
                    .deferred
                    .cancel_where(|task| matches!(task, LifecycleTask::Load { .. }));
                if cancelled > 0 {
                    info!(target: "lifecycle", "New game: cancelled {} pending loads", cancelled);
                }
                systems.delete(objects);
            }

            HostEvent::MenuLoaded => {
                self.deferred.schedule(
                    LifecycleTask::Load { full: false, refresh_catalogue: false },
                    Wait::Duration(self.menu_load_delay),
                );
            }

            HostEvent::GameLoaded => {
                let storage = StorageSlots::discover(&objects.scene, &self.trunk_name);
                systems.persistence.set_storage_slots(storage);
                systems.mounts.refresh(&objects.scene);

                self.deferred.schedule(
                    LifecycleTask::Load { full: true, refresh_catalogue: true },
                    Wait::Ticks(1),
                );
            }

            HostEvent::SaveRequested => {
                systems.save(objects);
            }

            HostEvent::RegistrationsReady => {
                if self.registration_complete {
                    debug!(target: "lifecycle", "Registrations already complete");
                    return;
                }
                self.registration_complete = true;
                info!(
                    target: "lifecycle",
                    "Registration finished with {} prototypes",
                    objects.registry.len()
                );
                systems.notifications.push(Notification::RegistrationFinished);
                systems.load(objects, false);
            }

            HostEvent::Register { key, prototype } => {
                if let Err(e) = objects.register_object(&key, prototype) {
                    warn!(target: "lifecycle", "Host registration of `{}` failed: {}", key, e);
                }
            }

            HostEvent::AddObject { object, parent } => {
                objects.add_object(object, parent.as_deref());
            }

            HostEvent::Input(_) | HostEvent::Shutdown => {}
        }
    }

    /// Runs a debug shortcut immediately.
    pub fn handle_command(
        &mut self,
        command: DebugCommand,
        objects: &mut ObjectContext,
        systems: &mut PartSystems,
    ) {
        info!(target: "lifecycle", "Debug command {:?}", command);
        match command {
            DebugCommand::Save => {
                systems.save(objects);
            }
            DebugCommand::Load { full } => {
                systems.load(objects, full);
            }
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn run_task(&mut self, task: LifecycleTask, objects: &mut ObjectContext, systems: &mut PartSystems) {
        match task {
            LifecycleTask::Load { full, refresh_catalogue } => {
                systems.load(objects, full);
                if refresh_catalogue {
                    systems.notifications.push(Notification::catalogue_refresh());
                }
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::persistence::{
        mount_in_engine, NamedMountLocator, PartType, PersistenceEngine, SnapshotStore,
    };
    use crate::core::scene::{Collider, EngineComponent, PartState, SceneObject, SlotState};

    const TICK: Duration = Duration::from_millis(500);

    struct Harness {
        _dir: tempfile::TempDir,
        coordinator: LifecycleCoordinator,
        objects: ObjectContext,
        systems: PartSystems,
    }

    impl Harness {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let systems = PartSystems::new(
                PersistenceEngine::new(SnapshotStore::in_dir(dir.path(), "parts.json")),
                Box::new(NamedMountLocator::default()),
            );
            let mut objects = ObjectContext::default();
            let block = objects.scene.insert(
                SceneObject::new("block")
                    .with_body(true)
                    .with_part(PartState::engine_part(EngineComponent::new("Engine", 0.5))),
            );
            objects.register("block", block).unwrap();
            objects.scene.insert(
                SceneObject::new("EngineMount")
                    .with_collider(Collider::solid())
                    .with_slot(SlotState::default()),
            );

            Self {
                _dir: dir,
                coordinator: LifecycleCoordinator::new(Duration::from_secs(1), "Boot"),
                objects,
                systems,
            }
        }

        fn event(&mut self, event: HostEvent) {
            self.coordinator.handle_event(event, &mut self.objects, &mut self.systems);
        }

        fn tick(&mut self) {
            self.coordinator.advance(TICK, &mut self.objects, &mut self.systems);
        }

        fn save_one_mounted_part(&mut self) {
            self.systems.mounts.refresh(&self.objects.scene);
            let mount = self.systems.mounts.mount_for(PartType::Engine).unwrap();
            let part = self.objects.spawner().spawn("block").unwrap();
            mount_in_engine(&mut self.objects, part, mount, PartType::Engine);
            self.systems.save(&self.objects).unwrap();
            self.objects.destroy_instance(part);
            self.systems.notifications.clear();
        }

        fn load_count(&self) -> usize {
            self.systems
                .notifications
                .read()
                .iter()
                .filter(|n| matches!(n, Notification::LoadCompleted { .. }))
                .count()
        }
    }

    #[test]
    fn registrations_ready_finishes_once_and_loads() {
        let mut h = Harness::new();
        h.save_one_mounted_part();

        h.event(HostEvent::RegistrationsReady);
        h.event(HostEvent::RegistrationsReady);

        assert!(h.coordinator.is_registration_complete());
        let read = h.systems.notifications.read();
        assert_eq!(read[0], Notification::RegistrationFinished);
        assert!(matches!(read[1], Notification::LoadCompleted { full: false, .. }));
        assert_eq!(read.len(), 2);
        assert_eq!(h.objects.tracker.len(), 1);
    }

    #[test]
    fn menu_load_waits_for_delay() {
        let mut h = Harness::new();
        h.save_one_mounted_part();

        h.event(HostEvent::MenuLoaded);
        h.tick();
        assert_eq!(h.load_count(), 0);

        h.tick();
        assert_eq!(h.load_count(), 1);
        assert_eq!(h.coordinator.pending().count(), 0);
    }

    #[test]
    fn game_load_runs_full_load_next_tick_then_refreshes_catalogue() {
        let mut h = Harness::new();
        h.save_one_mounted_part();

        h.event(HostEvent::GameLoaded);
        assert_eq!(h.load_count(), 0);

        h.tick();
        let read = h.systems.notifications.read();
        assert!(matches!(
            read[0],
            Notification::LoadCompleted { full: true, report } if report.mounted == 1
        ));
        assert_eq!(read[1], Notification::catalogue_refresh());
    }

    #[test]
    fn new_game_cancels_pending_loads_and_deletes() {
        let mut h = Harness::new();
        h.save_one_mounted_part();

        h.event(HostEvent::MenuLoaded);
        h.event(HostEvent::NewGameStarted);
        h.tick();
        h.tick();
        h.tick();

        assert_eq!(h.load_count(), 0);
        assert!(!h.systems.persistence.store().exists());
        assert_eq!(h.systems.notifications.read(), &[Notification::PartsDeleted]);
    }

    #[test]
    fn save_request_saves() {
        let mut h = Harness::new();
        h.event(HostEvent::SaveRequested);

        assert!(h.systems.persistence.store().exists());
        assert!(matches!(
            h.systems.notifications.read(),
            [Notification::SaveCompleted(_)]
        ));
    }

    #[test]
    fn debug_load_command_runs_immediately() {
        let mut h = Harness::new();
        h.save_one_mounted_part();

        h.coordinator.handle_command(
            DebugCommand::Load { full: true },
            &mut h.objects,
            &mut h.systems,
        );
        assert_eq!(h.load_count(), 1);
    }

    #[test]
    fn host_structures_arrive_before_game_load() {
        let mut h = Harness::new();

        h.event(HostEvent::Register {
            key: "tank".into(),
            prototype: SceneObject::new("tank").with_part(PartState::pickup()),
        });
        h.event(HostEvent::AddObject { object: SceneObject::new("Boot"), parent: None });
        h.event(HostEvent::AddObject {
            object: SceneObject::new("S").with_slot(SlotState::default()),
            parent: Some("Boot".into()),
        });
        h.event(HostEvent::GameLoaded);

        assert!(h.objects.registry.contains_key("tank"));
        assert_eq!(h.systems.persistence.storage_slots().len(), 1);
    }

    #[test]
    fn game_load_discovers_storage_under_trunk() {
        let mut h = Harness::new();
        let boot = h.objects.scene.insert(SceneObject::new("Boot"));
        let slot = h.objects.scene.insert(SceneObject::new("S").with_slot(SlotState::default()));
        h.objects.scene.set_parent(slot, Some(boot));

        h.event(HostEvent::GameLoaded);

        assert!(h.systems.persistence.storage_slots().contains(slot));
    }
}

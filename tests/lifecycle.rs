//=========================================================================
// Lifecycle Integration Tests
//
// Drives a `Runtime` through host events the way a host would, stepping
// ticks manually.
//
//=========================================================================

use std::time::Duration;

use custom_objects::core::persistence::{mount_in_engine, PartType};
use custom_objects::prelude::*;

const TICK: Duration = Duration::from_millis(250);

fn runtime() -> (tempfile::TempDir, Runtime) {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().unwrap();
    let config = Config::builder()
        .with_data_dir(dir.path())
        .with_menu_load_delay(Duration::from_millis(500))
        .build();
    let mut runtime = Runtime::new(config);

    let objects = runtime.objects_mut();
    let block = objects.scene.insert(
        SceneObject::new("v8_block")
            .with_body(true)
            .with_part(PartState::engine_part(EngineComponent::new("Engine", 1.0))),
    );
    objects.scene.insert(
        SceneObject::new("EngineMount")
            .with_collider(Collider::solid())
            .with_slot(SlotState::default()),
    );
    runtime.register("v8_block", block).unwrap();

    (dir, runtime)
}

fn engine_mount(runtime: &Runtime) -> ObjectId {
    runtime.objects().scene.find_by_name("EngineMount").unwrap()
}

/// Mounts a part with the given condition, saves through the host and
/// removes the part again.
fn save_mounted_part(runtime: &mut Runtime, condition: f32) -> SaveReport {
    let mount = engine_mount(runtime);
    let objects = runtime.objects_mut();
    let part = objects.spawner().spawn("v8_block").unwrap();
    objects.scene.get_mut(part).unwrap().engine_mut().unwrap().condition = condition;
    mount_in_engine(objects, part, mount, PartType::Engine);

    runtime.host().request_save();
    runtime.tick(TICK);
    let report = match runtime.notifications() {
        [Notification::SaveCompleted(report)] => *report,
        other => panic!("expected a save, got {:?}", other),
    };

    runtime.objects_mut().destroy_instance(part);
    report
}

fn loads(runtime: &Runtime) -> Vec<(bool, LoadReport)> {
    runtime
        .notifications()
        .iter()
        .filter_map(|n| match n {
            Notification::LoadCompleted { full, report } => Some((*full, *report)),
            _ => None,
        })
        .collect()
}

#[test]
fn game_load_restores_parts_on_the_following_tick() {
    let (_dir, mut runtime) = runtime();
    assert_eq!(save_mounted_part(&mut runtime, 0.42).saved, 1);

    runtime.host().game_loaded();
    runtime.tick(TICK);
    assert!(loads(&runtime).is_empty());

    runtime.tick(TICK);
    let loads = loads(&runtime);
    assert_eq!(loads.len(), 1);
    assert!(loads[0].0);
    assert_eq!(loads[0].1.mounted, 1);
    assert!(runtime.notifications().contains(&Notification::catalogue_refresh()));

    let mount = engine_mount(&runtime);
    let part = runtime.objects().scene.first_child(mount).unwrap();
    let condition = runtime.objects().scene.get(part).unwrap().engine().unwrap().condition;
    assert_eq!(condition, 0.42);
}

#[test]
fn session_start_leaves_one_copy_of_each_saved_part() {
    let (_dir, mut runtime) = runtime();

    let objects = runtime.objects_mut();
    let tank = objects.scene.insert(
        SceneObject::new("tank")
            .with_part(PartState::engine_part(EngineComponent::new("WaterTank", 1.0))),
    );
    let boot = objects.scene.insert(SceneObject::new("Boot"));
    let slot = objects.scene.insert(
        SceneObject::new("Slot1")
            .with_position(glam::Vec3::new(0.0, 0.2, -0.5))
            .with_slot(SlotState::default()),
    );
    objects.scene.set_parent(slot, Some(boot));
    runtime.register("water_tank", tank).unwrap();

    let objects = runtime.objects_mut();
    let stored = objects.spawner().spawn("water_tank").unwrap();
    custom_objects::core::persistence::place_in_storage(&mut objects.scene, stored, slot);
    assert_eq!(save_mounted_part(&mut runtime, 0.6).saved, 2);
    runtime.objects_mut().destroy_instance(stored);

    runtime.host().registrations_ready();
    runtime.tick(TICK);
    runtime.host().menu_loaded();
    for _ in 0..3 {
        runtime.tick(TICK);
    }
    runtime.host().game_loaded();
    runtime.tick(TICK);
    runtime.tick(TICK);

    let live = |name: &str| {
        runtime
            .objects()
            .scene
            .iter()
            .filter(|(_, o)| o.name == name && o.active)
            .count()
    };
    assert_eq!(live("water_tank"), 1);
    assert_eq!(live("v8_block"), 1);
    assert_eq!(runtime.objects().tracker.len(), 2);

    let mount = engine_mount(&runtime);
    assert_eq!(runtime.objects().scene.children(mount).len(), 1);
    assert_eq!(runtime.objects().scene.children(slot).len(), 1);
}

#[test]
fn menu_load_runs_after_delay() {
    let (_dir, mut runtime) = runtime();
    save_mounted_part(&mut runtime, 0.9);

    runtime.host().menu_loaded();
    runtime.tick(TICK);
    runtime.tick(TICK);
    assert!(loads(&runtime).is_empty());

    runtime.tick(TICK);
    assert_eq!(loads(&runtime).len(), 1);
    assert!(!loads(&runtime)[0].0);
}

#[test]
fn new_game_cancels_menu_load_and_deletes_snapshot() {
    let (_dir, mut runtime) = runtime();
    save_mounted_part(&mut runtime, 0.9);
    let snapshot = runtime.config().snapshot_path();
    assert!(snapshot.exists());

    runtime.host().menu_loaded();
    runtime.tick(TICK);
    runtime.host().new_game_started();
    runtime.tick(TICK);
    assert_eq!(runtime.notifications(), &[Notification::PartsDeleted]);

    for _ in 0..8 {
        runtime.tick(TICK);
        assert!(loads(&runtime).is_empty());
    }
    assert!(!snapshot.exists());
    assert!(runtime.objects().tracker.is_empty());
}

#[test]
fn registrations_ready_announces_then_loads() {
    let (_dir, mut runtime) = runtime();
    save_mounted_part(&mut runtime, 0.5);
    let notifications = runtime.subscribe();

    runtime.host().registrations_ready();
    runtime.tick(TICK);

    assert_eq!(notifications.try_recv().unwrap(), Notification::RegistrationFinished);
    assert!(matches!(
        notifications.try_recv().unwrap(),
        Notification::LoadCompleted { full: false, .. }
    ));
    assert!(runtime.coordinator().is_registration_complete());
}

#[test]
fn shutdown_stops_the_tick_thread() {
    let (_dir, runtime) = runtime();
    let host = runtime.host();

    let handle = runtime.spawn_tick_thread();
    host.request_save();
    host.shutdown();
    let runtime = handle.join().unwrap();

    assert!(runtime.config().snapshot_path().exists());
}

#[test]
fn host_registers_prototypes_while_the_tick_thread_runs() {
    let (_dir, runtime) = runtime();
    let host = runtime.host();
    let handle = runtime.spawn_tick_thread();

    assert!(host.register(
        "water_tank",
        SceneObject::new("tank")
            .with_part(PartState::engine_part(EngineComponent::new("WaterTank", 1.0))),
    ));
    assert!(host.add_object(SceneObject::new("Boot"), None));
    assert!(host.add_object(SceneObject::new("Slot1").with_slot(SlotState::default()), Some("Boot")));
    assert!(host.registrations_ready());
    assert!(host.shutdown());
    let runtime = handle.join().unwrap();

    let objects = runtime.objects();
    assert!(objects.registry.contains_key("water_tank"));
    assert!(objects.registry.contains_key("v8_block"));
    let boot = objects.scene.find_by_name("Boot").unwrap();
    assert_eq!(objects.scene.children(boot).len(), 1);
    assert!(runtime.coordinator().is_registration_complete());
}

//=========================================================================
// Runtime
//
// Composition root for the registry, persistence and lifecycle systems.
//
// Architecture:
// ```text
//     RuntimeBuilder  ──build()──>  Runtime  ──spawn_tick_thread()──>  [Tick Thread]
//         │                           │
//         ├─ with_config()            ├─ host() → HostHandle (any thread)
//         ├─ with_scene()             ├─ subscribe() → notifications
//         ├─ with_mount_locator()     └─ tick(dt) (manual stepping)
//         ├─ with_tps()
//         └─ with_channel_capacity()
// ```
//
// Each tick:
//   1. Drain host events (bounded)
//   2. Clear last tick's notifications
//   3. Run deferred lifecycle tasks that became due
//   4. Handle this tick's lifecycle events
//   5. Resolve debug shortcuts from input
//
//=========================================================================

//=== External Dependencies ===============================================

use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, Sender};
use log::info;

//=== Internal Dependencies ===============================================

use crate::config::Config;
use crate::core::context::ObjectContext;
use crate::core::host_bridge::{EventCollector, HostEvent, HostHandle, TickControl};
use crate::core::input::{DebugShortcuts, InputSystem};
use crate::core::lifecycle::{LifecycleCoordinator, Notification};
use crate::core::persistence::{MountLocator, PersistenceEngine};
use crate::core::registry::PrototypeRegistry;
use crate::core::scene::{ObjectId, SceneGraph};
use crate::core::systems::PartSystems;
use crate::error::RegistryError;

//=== RuntimeBuilder ======================================================

/// Builder for a [`Runtime`].
///
/// # Default Values
///
/// - **TPS**: 60.0
/// - **Channel capacity**: 128 events
/// - **Config**: [`Config::default`]
/// - **Scene**: empty scene graph, active scene `Game`
/// - **Mount locator**: name-based, from the config's mount names
///
/// # Examples
///
/// ```no_run
/// use custom_objects::RuntimeBuilder;
/// use custom_objects::config::Config;
///
/// let config = Config::builder().with_debug_shortcuts(true).build();
/// let runtime = RuntimeBuilder::new()
///     .with_config(config)
///     .with_tps(30.0)
///     .build();
///
/// let host = runtime.host();
/// let handle = runtime.spawn_tick_thread();
/// host.registrations_ready();
/// host.shutdown();
/// let _runtime = handle.join();
/// ```
pub struct RuntimeBuilder {
    config: Config,
    tps: f64,
    channel_capacity: usize,
    scene: Option<SceneGraph>,
    mounts: Option<Box<dyn MountLocator>>,
}

impl RuntimeBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            tps: 60.0,
            channel_capacity: 128,
            scene: None,
            mounts: None,
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Sets the tick rate of [`Runtime::spawn_tick_thread`].
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.tps = tps;
        self
    }

    /// Sets the capacity of the host → runtime channel.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Uses an existing host scene instead of an empty one.
    pub fn with_scene(mut self, scene: SceneGraph) -> Self {
        self.scene = Some(scene);
        self
    }

    /// Replaces the name-based mount lookup.
    pub fn with_mount_locator(mut self, mounts: impl MountLocator + 'static) -> Self {
        self.mounts = Some(Box::new(mounts));
        self
    }

    pub fn build(self) -> Runtime {
        let config = self.config;
        info!(
            target: "lifecycle",
            "Building runtime (TPS: {}, channel: {}, snapshot: {})",
            self.tps,
            self.channel_capacity,
            config.snapshot_path().display()
        );

        let registry =
            PrototypeRegistry::new().with_silenced_duplicates(config.silence_duplicate_registration);
        let objects = ObjectContext::new(self.scene.unwrap_or_default(), registry);

        let mounts = self
            .mounts
            .unwrap_or_else(|| Box::new(config.mount_locator()));
        let systems = PartSystems::new(PersistenceEngine::new(config.snapshot_store()), mounts);

        let coordinator =
            LifecycleCoordinator::new(config.menu_load_delay, config.trunk_name.clone());
        let input = InputSystem::new(DebugShortcuts::with_defaults(config.debug_shortcuts));

        let (sender, receiver): (Sender<HostEvent>, Receiver<HostEvent>) =
            bounded(self.channel_capacity);

        Runtime {
            objects,
            systems,
            coordinator,
            input,
            collector: EventCollector::new(receiver),
            sender,
            tps: self.tps,
            config,
        }
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Runtime =============================================================

/// Owns every piece of state; all mutation happens inside [`Runtime::tick`]
/// or through the accessors between ticks.
///
/// The runtime keeps a sender to its own channel, so the tick thread only
/// stops on [`HostEvent::Shutdown`].
pub struct Runtime {
    objects: ObjectContext,
    systems: PartSystems,
    coordinator: LifecycleCoordinator,
    input: InputSystem,
    collector: EventCollector,
    sender: Sender<HostEvent>,
    tps: f64,
    config: Config,
}

impl Runtime {
    pub fn new(config: Config) -> Self {
        RuntimeBuilder::new().with_config(config).build()
    }

    //--- Host Interface ---------------------------------------------------

    /// A handle the host uses to report lifecycle events and input.
    pub fn host(&self) -> HostHandle {
        HostHandle::new(self.sender.clone())
    }

    /// Receives every notification published from now on.
    pub fn subscribe(&mut self) -> Receiver<Notification> {
        self.systems.notifications.subscribe()
    }

    /// Registers a prototype that already lives in the scene.
    pub fn register(&mut self, key: &str, prototype: ObjectId) -> Result<(), RegistryError> {
        self.objects.register(key, prototype)
    }

    //--- Accessors --------------------------------------------------------

    pub fn objects(&self) -> &ObjectContext {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut ObjectContext {
        &mut self.objects
    }

    pub fn systems(&self) -> &PartSystems {
        &self.systems
    }

    pub fn systems_mut(&mut self) -> &mut PartSystems {
        &mut self.systems
    }

    pub fn coordinator(&self) -> &LifecycleCoordinator {
        &self.coordinator
    }

    pub fn input(&self) -> &InputSystem {
        &self.input
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Notifications published during the last tick.
    pub fn notifications(&self) -> &[Notification] {
        self.systems.notifications.read()
    }

    //--- Execution --------------------------------------------------------

    /// Runs one tick of length `dt`.
    ///
    /// Events that arrived before a shutdown are still handled; the
    /// returned control then tells the caller to stop.
    ///
    /// The channel only drains here. When the same thread both sends and
    /// ticks, send through the non-blocking [`HostHandle`] shorthands.
    pub fn tick(&mut self, dt: Duration) -> TickControl {
        let control = self.collector.collect_tick();

        self.systems.notifications.clear();

        //--- Deferred tasks ----------------------------------------------
        self.coordinator
            .advance(dt, &mut self.objects, &mut self.systems);

        //--- Lifecycle events --------------------------------------------
        for event in self.collector.take_lifecycle_events() {
            self.coordinator
                .handle_event(event, &mut self.objects, &mut self.systems);
        }

        //--- Debug shortcuts ---------------------------------------------
        let mut batches = self.collector.take_batches();
        for command in self.input.update(&mut batches) {
            self.coordinator
                .handle_command(command, &mut self.objects, &mut self.systems);
        }

        control
    }

    /// Moves the runtime onto a dedicated thread ticking at the configured
    /// rate until a shutdown arrives. Joining the handle gives the runtime
    /// back.
    pub fn spawn_tick_thread(mut self) -> thread::JoinHandle<Runtime> {
        let tick_duration = Duration::from_secs_f64(1.0 / self.tps);

        thread::spawn(move || {
            info!(target: "lifecycle", "Tick thread started ({} TPS)", self.tps);
            let mut last_tick = Instant::now();

            loop {
                let tick_start = Instant::now();
                let dt = tick_start - last_tick;
                last_tick = tick_start;

                if self.tick(dt) == TickControl::Exit {
                    info!(target: "lifecycle", "Tick thread exiting");
                    break;
                }

                let elapsed = tick_start.elapsed();
                if elapsed < tick_duration {
                    thread::sleep(tick_duration - elapsed);
                }
            }

            self
        })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

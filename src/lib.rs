//=========================================================================
// Custom Objects — Library Root
//
// Runtime catalogue of prototype objects contributed by mods, live
// instance tracking, and persistence of installable engine parts across
// the host simulation's save/load cycles.
//
// Typical usage:
// ```no_run
// use custom_objects::prelude::*;
//
// let mut runtime = Runtime::new(Config::default());
// let prototype = runtime
//     .objects_mut()
//     .scene
//     .insert(SceneObject::new("fuel_tank").with_part(PartState::pickup()));
// runtime.register("fuel_tank", prototype).unwrap();
//
// let host = runtime.host();
// let handle = runtime.spawn_tick_thread();
// host.registrations_ready();
// host.shutdown();
// handle.join().unwrap();
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds every system the tick thread runs. `config` and `error`
// are shared by all of them.
//
pub mod config;
pub mod core;
pub mod error;
pub mod prelude;

//--- Integration Modules -------------------------------------------------
//
// `platform` adapts winit window events for the host channel.
// `runtime` is the composition root and tick loop.
//
pub mod platform;
mod runtime;

//--- Public Exports ------------------------------------------------------

pub use runtime::{Runtime, RuntimeBuilder};

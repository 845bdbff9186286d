//=========================================================================
// Host Bridge
//=========================================================================
//
// Bridges the host simulation with the runtime.
//
// Components:
// - `interface`: host events and the handle used to send them
// - `event_collector`: runtime-side draining and splitting per tick
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod event_collector;
pub(crate) mod interface;

//=== Public API ==========================================================

pub use event_collector::TickControl;
pub use interface::{HostEvent, HostHandle};

pub(crate) use event_collector::EventCollector;

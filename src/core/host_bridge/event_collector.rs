//=========================================================================
// Event Collector
//=========================================================================
//
// Host event collector with bounded draining and shutdown detection.
//
// Architecture:
//   Receiver<HostEvent> → collect_tick() → lifecycle events
//                                        → input batches
//                                        → TickControl
//
// Draining is bounded per tick so a flooding host cannot starve the
// deferred tasks that run after collection.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::HostEvent;
use crate::core::input::InputEvent;

//=== Constants ===========================================================

const MAX_EVENTS_PER_TICK: usize = 100;

//=== TickControl =========================================================

/// Update loop control signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Exit,
}

//=== EventCollector ======================================================

/// Splits the host stream into lifecycle events and input batches.
pub(crate) struct EventCollector {
    receiver: Receiver<HostEvent>,
    lifecycle: Vec<HostEvent>,
    input_batches: Vec<Vec<InputEvent>>,
}

impl EventCollector {
    pub(crate) fn new(receiver: Receiver<HostEvent>) -> Self {
        Self {
            receiver,
            lifecycle: Vec::with_capacity(4),
            input_batches: Vec::with_capacity(4),
        }
    }

    /// Collects pending host events, at most [`MAX_EVENTS_PER_TICK`].
    ///
    /// Events received before a `Shutdown` in the same tick are kept, so
    /// the caller can still process them before exiting.
    pub(crate) fn collect_tick(&mut self) -> TickControl {
        self.lifecycle.clear();
        self.input_batches.clear();
        let mut drained = 0;

        while drained < MAX_EVENTS_PER_TICK {
            match self.receiver.try_recv() {
                Ok(event) => {
                    drained += 1;
                    if self.handle_event(event) == TickControl::Exit {
                        debug!(target: "host", "Shutdown received");
                        return TickControl::Exit;
                    }
                }
                Err(TryRecvError::Disconnected) => {
                    debug!(target: "host", "Host channel disconnected");
                    return TickControl::Exit;
                }
                Err(TryRecvError::Empty) => break,
            }
        }

        if drained >= MAX_EVENTS_PER_TICK {
            warn!(target: "host", "Event queue backlog: drained {} events this tick", drained);
        }

        TickControl::Continue
    }

    /// Lifecycle events of this tick, in arrival order.
    #[cfg(test)]
    pub(crate) fn lifecycle_events(&self) -> &[HostEvent] {
        &self.lifecycle
    }

    pub(crate) fn take_lifecycle_events(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.lifecycle)
    }

    pub(crate) fn take_batches(&mut self) -> Vec<Vec<InputEvent>> {
        std::mem::take(&mut self.input_batches)
    }

    fn handle_event(&mut self, event: HostEvent) -> TickControl {
        match event {
            HostEvent::Input(batch) => {
                if !batch.is_empty() {
                    self.input_batches.push(batch);
                }
            }
            HostEvent::Shutdown => return TickControl::Exit,
            other => self.lifecycle.push(other),
        }
        TickControl::Continue
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

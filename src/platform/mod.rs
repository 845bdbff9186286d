//=========================================================================
// Platform Layer
//
// Feeds winit window events into the runtime's host channel.
//
// Architecture:
// ```text
//  Host Thread (winit loop):          Tick Thread:
//  ┌──────────────────────────┐      ┌──────────────────┐
//  │  WindowEvent             │      │  Runtime         │
//  │   ↓                      │      │   ↓              │
//  │  InputProcessor          │      │  InputSystem     │
//  │   ├─ converts keys       │      │   ↓              │
//  │   └─ tracks modifiers    │      │  DebugShortcuts  │
//  │   ↓                      │      │   ↓              │
//  │  pending batch           │      │  Coordinator     │
//  │   ↓ (RedrawRequested)    │      └──────────────────┘
//  │  HostHandle ─────────────┼──────────────┘
//  └──────────────────────────┘   HostEvent::Input
// ```
//
// The host keeps its own event loop and window; it hands every
// `WindowEvent` to the forwarder. `RedrawRequested` is the batch
// boundary, empty batches are not sent, and `CloseRequested` becomes a
// runtime shutdown.
//
//=========================================================================

//=== Submodules ==========================================================

mod input_processor;

//=== External Crates =====================================================

use log::{trace, warn};
use winit::event::WindowEvent;

//=== Internal Imports ====================================================

use crate::core::host_bridge::{HostEvent, HostHandle};
use crate::core::input::InputEvent;
use input_processor::InputProcessor;

//=== WinitInputForwarder =================================================

pub struct WinitInputForwarder {
    host: HostHandle,
    processor: InputProcessor,
    pending: Vec<InputEvent>,
}

impl WinitInputForwarder {
    pub fn new(host: HostHandle) -> Self {
        Self {
            host,
            processor: InputProcessor::new(),
            pending: Vec::with_capacity(16),
        }
    }

    /// Handles one window event from the host's event loop.
    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::RedrawRequested => self.flush(),
            WindowEvent::CloseRequested => {
                self.flush();
                self.host.send(HostEvent::Shutdown);
            }
            other => {
                if let Some(input) = self.processor.process_window_event(other) {
                    self.push(input);
                }
            }
        }
    }

    /// Sends the pending batch, if any.
    pub fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }

        let batch = std::mem::take(&mut self.pending);
        let count = batch.len();
        trace!(target: "host", "Forwarding {} input events", count);

        if !self.host.send(HostEvent::Input(batch)) {
            warn!(target: "host", "Runtime gone, dropped {} input events", count);
        }
    }

    pub fn pending(&self) -> &[InputEvent] {
        &self.pending
    }

    /// Appends an event; repeats of the previous event are dropped.
    fn push(&mut self, event: InputEvent) {
        if self.pending.last() != Some(&event) {
            self.pending.push(event);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

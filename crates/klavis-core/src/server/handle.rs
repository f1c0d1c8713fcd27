//! Cloneable control handle for a running server.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use super::{ServerShared, ServerState};
use crate::callback::{Callback, CallbackResult};
use klavis_midi::MidiEvent;

/// Stops, interrupts and extends a [`MidiServer`](super::MidiServer) from
/// any thread, including from inside a callback.
///
/// Created via `server.handle()`.
///
/// # Example
/// ```ignore
/// let handle = server.handle();
/// std::thread::spawn(move || {
///     std::thread::sleep(Duration::from_secs(1));
///     handle.register_callback(|event| println!("late: {event}"));
///     std::thread::sleep(Duration::from_secs(1));
///     handle.stop();
/// });
/// server.start()?;
/// ```
#[derive(Clone)]
pub struct ServerHandle {
    shared: Arc<ServerShared>,
}

impl ServerHandle {
    pub(crate) fn new(shared: Arc<ServerShared>) -> Self {
        Self { shared }
    }

    /// Idempotent. The loop exits after its in-flight read.
    pub fn stop(&self) {
        self.shared.stop();
    }

    /// Same effect as `stop()`, but logged as a user interrupt.
    pub fn interrupt(&self) {
        self.shared.request_interrupt();
    }

    pub fn is_running(&self) -> bool {
        self.shared.is_running()
    }

    pub fn state(&self) -> ServerState {
        self.shared.state()
    }

    /// Takes effect from the next dispatch cycle.
    pub fn register_callback<F>(&self, f: F)
    where
        F: Fn(&MidiEvent) + Send + Sync + 'static,
    {
        self.shared.register(Callback::new(f));
    }

    pub fn register_fallible_callback<F>(&self, f: F)
    where
        F: Fn(&MidiEvent) -> CallbackResult + Send + Sync + 'static,
    {
        self.shared.register(Callback::fallible(f));
    }

    pub fn callback_count(&self) -> usize {
        self.shared.callback_count()
    }

    pub fn events_dispatched(&self) -> u64 {
        self.shared.events_dispatched()
    }

    /// The raw interrupt flag, for `signal_hook::flag::register`.
    pub fn interrupt_flag(&self) -> Arc<AtomicBool> {
        self.shared.interrupt_flag()
    }
}

impl std::fmt::Debug for ServerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerHandle")
            .field("state", &self.state())
            .field("events_dispatched", &self.events_dispatched())
            .finish()
    }
}

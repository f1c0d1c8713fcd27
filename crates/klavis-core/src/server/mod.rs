//! The poll-dispatch event loop.

mod builder;
mod handle;

pub use builder::MidiServerBuilder;
pub use handle::ServerHandle;

use parking_lot::Mutex;
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::callback::{Callback, CallbackRegistry, CallbackResult};
use crate::config::{DispatchPolicy, ServerConfig};
use crate::error::{Error, Result};
use klavis_midi::MidiEvent;
use klavis_midi_io::MidiInput;

/// Lifecycle state of a [`MidiServer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServerState {
    #[default]
    Stopped,
    Running,
}

impl ServerState {
    pub fn as_str(self) -> &'static str {
        match self {
            ServerState::Stopped => "stopped",
            ServerState::Running => "running",
        }
    }
}

impl fmt::Display for ServerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State shared between the server and its handles.
pub(crate) struct ServerShared {
    running: AtomicBool,
    interrupt: Arc<AtomicBool>,
    callbacks: CallbackRegistry,
    dispatched: AtomicU64,
}

impl ServerShared {
    fn new() -> Self {
        Self {
            running: AtomicBool::new(false),
            interrupt: Arc::new(AtomicBool::new(false)),
            callbacks: CallbackRegistry::new(),
            dispatched: AtomicU64::new(0),
        }
    }

    pub(crate) fn stop(&self) {
        if self.running.swap(false, Ordering::AcqRel) {
            info!("Server stopped");
        } else {
            debug!("stop() called while already stopped");
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub(crate) fn state(&self) -> ServerState {
        if self.is_running() {
            ServerState::Running
        } else {
            ServerState::Stopped
        }
    }

    pub(crate) fn request_interrupt(&self) {
        self.interrupt.store(true, Ordering::Release);
    }

    pub(crate) fn interrupt_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.interrupt)
    }

    pub(crate) fn register(&self, callback: Callback) -> usize {
        self.callbacks.register(callback)
    }

    pub(crate) fn callback_count(&self) -> usize {
        self.callbacks.len()
    }

    pub(crate) fn events_dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    /// Consume a pending interrupt (stopping the server), then report
    /// whether the loop should go on.
    fn keep_running(&self) -> bool {
        if self.interrupt.swap(false, Ordering::AcqRel) {
            info!("Interrupted by user");
            self.stop();
        }
        self.is_running()
    }
}

/// Resets `running` when `start()` returns, errors or unwinds.
struct RunningGuard<'a>(&'a ServerShared);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.running.store(false, Ordering::Release);
    }
}

/// Polls one [`MidiInput`] and dispatches every event to the registered
/// callbacks, in registration order, on the thread that called [`start`].
///
/// [`start`]: MidiServer::start
pub struct MidiServer {
    input: Mutex<Box<dyn MidiInput>>,
    shared: Arc<ServerShared>,
    config: ServerConfig,
}

impl MidiServer {
    /// Server with the default configuration.
    pub fn new<I: MidiInput + 'static>(input: I) -> Self {
        Self::from_parts(Box::new(input), ServerConfig::default())
    }

    pub fn with_config<I: MidiInput + 'static>(input: I, config: ServerConfig) -> Self {
        Self::from_parts(Box::new(input), config)
    }

    pub fn builder() -> MidiServerBuilder {
        MidiServerBuilder::new()
    }

    pub(crate) fn from_parts(input: Box<dyn MidiInput>, config: ServerConfig) -> Self {
        Self {
            input: Mutex::new(input),
            shared: Arc::new(ServerShared::new()),
            config,
        }
    }

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

    /// Run the event loop on the calling thread until stopped.
    ///
    /// Returns `Ok(())` after [`stop`](Self::stop), an interrupt, or an
    /// input that reports `Interrupted`. A failed read, or a failed callback
    /// under [`DispatchPolicy::Propagate`], stops the loop and is returned.
    ///
    /// # Errors
    ///
    /// [`Error::AlreadyRunning`] if another `start()` is in progress,
    /// including one that was stopped but has not yet returned.
    pub fn start(&self) -> Result<()> {
        // The input lock is held for the whole run; a loop that is still
        // finishing its last read keeps it.
        let Some(mut input) = self.input.try_lock() else {
            return Err(Error::AlreadyRunning);
        };
        if self
            .shared
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(Error::AlreadyRunning);
        }
        // Declared after the lock so it resets `running` before the lock is released
        let _running = RunningGuard(&self.shared);
        self.shared.interrupt.store(false, Ordering::Release);

        info!("Event loop started (input: {})", input.name());
        let result = self.run_loop(&mut **input);
        info!(
            "Event loop finished ({} events dispatched)",
            self.shared.events_dispatched()
        );
        result
    }

    fn run_loop(&self, input: &mut dyn MidiInput) -> Result<()> {
        while self.shared.keep_running() {
            let event = match input.read() {
                Ok(Some(event)) => event,
                Ok(None) => continue,
                Err(klavis_midi_io::Error::Interrupted) => {
                    info!("Input interrupted");
                    self.shared.stop();
                    break;
                }
                Err(e) => {
                    error!("MIDI input error: {}", e);
                    return Err(e.into());
                }
            };

            if !self.shared.keep_running() {
                debug!("Discarding event read after stop: {}", event);
                break;
            }

            debug!("Event: {}", event);
            self.dispatch(&event)?;
        }
        Ok(())
    }

    fn dispatch(&self, event: &MidiEvent) -> Result<()> {
        let callbacks = self.shared.callbacks.snapshot();

        match self.config.dispatch {
            DispatchPolicy::Propagate => {
                for (index, callback) in callbacks.iter().enumerate() {
                    if let Err(source) = callback.call(event) {
                        error!("Callback {} failed: {}", index, source);
                        return Err(Error::Callback { index, source });
                    }
                }
            }
            DispatchPolicy::Isolate => {
                for (index, callback) in callbacks.iter().enumerate() {
                    match panic::catch_unwind(AssertUnwindSafe(|| callback.call(event))) {
                        Ok(Ok(())) => {}
                        Ok(Err(e)) => warn!("Callback {} failed: {}", index, e),
                        Err(payload) => {
                            warn!("Callback {} panicked: {}", index, panic_message(&*payload))
                        }
                    }
                }
            }
        }

        self.shared.dispatched.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Ask the loop to exit after the current cycle. Idempotent.
    pub fn stop(&self) {
        self.shared.stop();
    }

    pub fn is_running(&self) -> bool {
        self.shared.is_running()
    }

    pub fn state(&self) -> ServerState {
        self.shared.state()
    }

    pub fn callback_count(&self) -> usize {
        self.shared.callback_count()
    }

    /// Events delivered to a full callback snapshot since construction.
    pub fn events_dispatched(&self) -> u64 {
        self.shared.events_dispatched()
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn handle(&self) -> ServerHandle {
        ServerHandle::new(Arc::clone(&self.shared))
    }
}

impl fmt::Debug for MidiServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MidiServer")
            .field("state", &self.state())
            .field("callbacks", &self.callback_count())
            .field("events_dispatched", &self.events_dispatched())
            .field("config", &self.config)
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic payload>"
    }
}

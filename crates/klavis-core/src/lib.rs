//! # Klavis core - MIDI event server
//!
//! Polls a [`MidiInput`] one event at a time and dispatches each event,
//! synchronously and in registration order, to every registered callback.
//!
//! ## Quick Start
//!
//! ```ignore
//! use klavis_core::MidiServer;
//! use klavis_midi_io::SimulatedInput;
//!
//! let server = MidiServer::new(SimulatedInput::new());
//! server.register_callback(|event| println!("{event}"));
//!
//! // Stop from anywhere: another thread, a signal handler, a callback
//! let handle = server.handle();
//! std::thread::spawn(move || {
//!     std::thread::sleep(std::time::Duration::from_secs(5));
//!     handle.stop();
//! });
//!
//! server.start()?;
//! ```
//!
//! ## Concurrency
//!
//! - One poll-dispatch cycle at a time; `read` is the only suspension point
//! - Callbacks run inline on the loop's thread, so slow callbacks throttle polling
//! - Registration is copy-on-write: each cycle dispatches to a snapshot taken
//!   when the cycle began
//! - `stop()` is cooperative and takes effect after the in-flight read

pub mod error;
pub use error::{Error, Result};

pub mod callback;
pub use callback::{Callback, CallbackError, CallbackRegistry, CallbackResult};

mod config;
pub use config::{DispatchPolicy, ServerConfig};

mod server;
pub use server::{MidiServer, MidiServerBuilder, ServerHandle, ServerState};

pub use klavis_midi::{EventKind, MidiEvent};
pub use klavis_midi_io::MidiInput;

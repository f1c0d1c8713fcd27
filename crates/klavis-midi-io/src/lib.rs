//! MIDI input sources for Klavis.
//!
//! Everything the server polls implements [`MidiInput`]. Three sources ship
//! with the crate:
//!
//! - [`SimulatedInput`]: random note-on events at a fixed interval, no hardware
//! - [`ScriptedInput`]: replays a fixed list of events, then interrupts
//! - `HardwareInput`: a real device via midir (feature: `midi-io`)
//!
//! [`open_input`] picks one from an [`InputConfig`] at startup.
//!
//! # Example
//!
//! ```ignore
//! use klavis_midi_io::{open_input, InputBackend, InputConfig};
//!
//! let mut input = open_input(&InputConfig {
//!     backend: InputBackend::Auto { port: Some("Keyboard".into()) },
//!     ..Default::default()
//! })?;
//! while let Some(event) = input.read()? {
//!     println!("{event}");
//! }
//! ```

pub mod error;
pub use error::{Error, Result};

mod config;
pub use config::{open_input, InputBackend, InputConfig};

pub(crate) mod input;
pub use input::{MidiInput, ScriptedInput, SimulatedInput};

pub mod port;
pub use port::{select_port, MidiInputDevice, PortSelection};

#[cfg(feature = "midi-io")]
pub(crate) mod io;

#[cfg(feature = "midi-io")]
pub use io::{list_input_ports, HardwareInput};

pub use klavis_midi::{EventKind, MidiEvent};

/// Whether the hardware backend was compiled in.
pub const HARDWARE_AVAILABLE: bool = cfg!(feature = "midi-io");

//! # Klavis - MIDI event server
//!
//! Reads note events from a MIDI keyboard (or a simulated one) and hands
//! each event, in order, to every registered callback.
//!
//! ## Architecture
//!
//! Klavis is an umbrella crate over:
//! - **klavis-midi** - The event record, raw decoding, note naming
//! - **klavis-midi-io** - Input sources (simulated, scripted, hardware via midir)
//! - **klavis-core** - The poll-dispatch server, callback registry, lifecycle
//!
//! ## Quick Start
//!
//! ```ignore
//! use klavis::prelude::*;
//!
//! let server = MidiServer::builder()
//!     .open_input(&InputConfig::default())?
//!     .build()?;
//!
//! server.register_callback(|event| println!("{event}"));
//! server.start()?;
//! ```
//!
//! ## Feature Flags
//!
//! - `default` - Hardware input enabled
//! - `midi-io` - Hardware MIDI input via midir; without it `InputBackend::Auto`
//!   falls back to the simulated input

/// Re-export of klavis-core for direct access
pub use klavis_core as core;

/// Re-export of klavis-midi-io for direct access
pub use klavis_midi_io as io;

/// Re-export of klavis-midi for direct access
pub use klavis_midi as midi;

// Events
pub use klavis_midi::{note_name, EventKind, MidiEvent};

// Inputs
pub use klavis_midi_io::{
    open_input, select_port, InputBackend, InputConfig, MidiInput, MidiInputDevice, ScriptedInput,
    SimulatedInput, HARDWARE_AVAILABLE,
};

#[cfg(feature = "midi-io")]
pub use klavis_midi_io::{list_input_ports, HardwareInput};

// Server
pub use klavis_core::{
    Callback, CallbackError, CallbackResult, DispatchPolicy, MidiServer, MidiServerBuilder,
    ServerConfig, ServerHandle, ServerState,
};

mod error;
pub use error::{Error, Result};

/// Convenience prelude for common imports
pub mod prelude {
    pub use crate::{MidiServer, MidiServerBuilder, ServerHandle};

    pub use crate::{DispatchPolicy, EventKind, MidiEvent};

    pub use crate::{open_input, InputBackend, InputConfig, MidiInput, SimulatedInput};

    pub use crate::{Error, Result};
}

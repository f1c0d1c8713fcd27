//! Hardware MIDI input.
//!
//! Device enumeration and connection via midir.
//! Requires the `midi-io` feature.

mod input;

pub use input::{list_input_ports, HardwareInput};

//! The input capability polled by the server.

mod scripted;
mod simulated;

pub use scripted::ScriptedInput;
pub use simulated::SimulatedInput;

use crate::error::Result;
use klavis_midi::MidiEvent;

/// A source of MIDI events.
///
/// `read` blocks the caller until an event is available or the
/// implementation's own poll interval elapses. Implementations should bound
/// that wait so a cooperative stop is observed promptly.
///
/// - `Ok(Some(event))`: the next event
/// - `Ok(None)`: nothing this poll; the caller simply reads again
/// - `Err(Error::Interrupted)`: cancellation requested through the input
/// - any other `Err`: the input failed
///
/// Inputs own their state; the only thing they hand to the server is the
/// returned event.
pub trait MidiInput: Send {
    fn read(&mut self) -> Result<Option<MidiEvent>>;

    /// Short label for logs.
    fn name(&self) -> &str {
        "midi-input"
    }
}

impl<T: MidiInput + ?Sized> MidiInput for Box<T> {
    fn read(&mut self) -> Result<Option<MidiEvent>> {
        (**self).read()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

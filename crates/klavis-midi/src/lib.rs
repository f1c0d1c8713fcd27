//! MIDI event types for Klavis.
//!
//! Pure data: the [`MidiEvent`] record produced by inputs and consumed by the
//! server and its callbacks, raw byte decoding, and note naming helpers.
//!
//! # Example
//!
//! ```
//! use klavis_midi::{EventKind, MidiEvent};
//!
//! let event = MidiEvent::from_bytes(&[0x90, 60, 100], 0.0).unwrap();
//! assert_eq!(event.kind, EventKind::NoteOn);
//! assert!(event.to_string().contains("C4"));
//! ```

pub mod event;
pub mod note;
mod utils;

pub use event::{EventKind, MidiEvent};
pub use note::{note_name, octave, pitch_class, PITCH_CLASSES};
pub use utils::now_seconds;

//! MIDI event record.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::note::note_name;

const STATUS_NOTE_OFF: u8 = 0x80;
const STATUS_NOTE_ON: u8 = 0x90;

/// Kind of MIDI occurrence carried by a [`MidiEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum EventKind {
    NoteOn,
    NoteOff,
    /// Anything that is not a note message (CC, pitch bend, sysex, short messages).
    Unknown,
}

impl EventKind {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::NoteOn => "note_on",
            EventKind::NoteOff => "note_off",
            EventKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One MIDI occurrence, as read from an input.
///
/// Events are plain values: the server and callbacks only ever see them by
/// reference and nothing mutates them after construction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MidiEvent {
    pub kind: EventKind,
    /// Pitch number (0-127, 60 = middle C).
    pub note: u8,
    /// Intensity (0-127).
    pub velocity: u8,
    /// Zero-based channel (0-15).
    pub channel: u8,
    /// Seconds since the Unix epoch.
    pub timestamp: f64,
}

impl MidiEvent {
    #[inline]
    pub fn new(kind: EventKind, note: u8, velocity: u8, channel: u8, timestamp: f64) -> Self {
        Self {
            kind,
            note,
            velocity,
            channel,
            timestamp,
        }
    }

    #[inline]
    pub fn note_on(channel: u8, note: u8, velocity: u8, timestamp: f64) -> Self {
        Self::new(EventKind::NoteOn, note, velocity, channel, timestamp)
    }

    #[inline]
    pub fn note_off(channel: u8, note: u8, velocity: u8, timestamp: f64) -> Self {
        Self::new(EventKind::NoteOff, note, velocity, channel, timestamp)
    }

    #[inline]
    pub fn unknown(channel: u8, note: u8, velocity: u8, timestamp: f64) -> Self {
        Self::new(EventKind::Unknown, note, velocity, channel, timestamp)
    }

    #[inline]
    pub fn is_note_on(&self) -> bool {
        self.kind == EventKind::NoteOn
    }

    #[inline]
    pub fn is_note_off(&self) -> bool {
        self.kind == EventKind::NoteOff
    }

    /// Decode a raw channel message.
    ///
    /// Returns `None` for an empty message. Malformed or non-note messages
    /// never fail: they decode to [`EventKind::Unknown`] with whatever note
    /// and velocity bytes are present (0 otherwise).
    pub fn from_bytes(bytes: &[u8], timestamp: f64) -> Option<Self> {
        let (&status_byte, data) = bytes.split_first()?;
        let status = status_byte & 0xF0;
        let channel = status_byte & 0x0F;

        if let &[note, velocity, ..] = data {
            match status {
                STATUS_NOTE_ON if velocity > 0 => {
                    return Some(Self::note_on(channel, note, velocity, timestamp));
                }
                STATUS_NOTE_ON | STATUS_NOTE_OFF => {
                    return Some(Self::note_off(channel, note, velocity, timestamp));
                }
                _ => {}
            }
        }

        let note = data.first().copied().unwrap_or(0);
        let velocity = data.get(1).copied().unwrap_or(0);
        Some(Self::unknown(channel, note, velocity, timestamp))
    }
}

impl fmt::Display for MidiEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<MidiEvent {} {} vel={} ch={} @ {:.3}>",
            self.kind,
            note_name(self.note),
            self.velocity,
            u16::from(self.channel) + 1,
            self.timestamp
        )
    }
}

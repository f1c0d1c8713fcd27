//! Scripted input: a fixed event list followed by an interrupt.

use std::collections::VecDeque;
use std::time::Duration;

use super::MidiInput;
use crate::error::{Error, Result};
use klavis_midi::MidiEvent;

/// Replays queued events in order. Once drained, every read returns
/// [`Error::Interrupted`], which the server treats as a stop request.
///
/// `None` entries (see [`ScriptedInput::with_gaps`]) model polls that
/// produced nothing.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    queue: VecDeque<Option<MidiEvent>>,
    delay: Duration,
}

impl ScriptedInput {
    pub fn new(events: impl IntoIterator<Item = MidiEvent>) -> Self {
        Self {
            queue: events.into_iter().map(Some).collect(),
            delay: Duration::ZERO,
        }
    }

    pub fn with_gaps(polls: impl IntoIterator<Item = Option<MidiEvent>>) -> Self {
        Self {
            queue: polls.into_iter().collect(),
            delay: Duration::ZERO,
        }
    }

    /// Sleep before every read, like a slow device.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl MidiInput for ScriptedInput {
    fn read(&mut self) -> Result<Option<MidiEvent>> {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        self.queue.pop_front().ok_or(Error::Interrupted)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replays_then_interrupts() {
        let mut input = ScriptedInput::new([
            MidiEvent::note_on(0, 60, 100, 0.0),
            MidiEvent::note_off(0, 60, 0, 1.0),
        ]);
        assert_eq!(input.remaining(), 2);
        assert!(input.read().unwrap().unwrap().is_note_on());
        assert!(input.read().unwrap().unwrap().is_note_off());
        assert!(matches!(input.read(), Err(Error::Interrupted)));
        assert!(matches!(input.read(), Err(Error::Interrupted)));
    }

    #[test]
    fn test_gaps_yield_none() {
        let mut input = ScriptedInput::with_gaps([None, Some(MidiEvent::note_on(0, 64, 90, 0.0))]);
        assert!(input.read().unwrap().is_none());
        assert_eq!(input.read().unwrap().unwrap().note, 64);
    }
}

//! Simulated input: random note-on events on a fixed clock.

use std::thread;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::MidiInput;
use crate::error::Result;
use klavis_midi::{now_seconds, MidiEvent};

/// Generates a note-on event every `interval`, standing in for a keyboard.
///
/// Notes fall in C4..=C5 (60..=72), velocities in 80..=127, always on
/// channel 0. Never fails and never runs dry.
pub struct SimulatedInput {
    interval: Duration,
    rng: StdRng,
}

impl SimulatedInput {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(500);
    pub const NOTE_RANGE: std::ops::RangeInclusive<u8> = 60..=72;
    pub const VELOCITY_RANGE: std::ops::RangeInclusive<u8> = 80..=127;

    pub fn new() -> Self {
        Self::with_interval(Self::DEFAULT_INTERVAL)
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible note/velocity sequence.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for SimulatedInput {
    fn default() -> Self {
        Self::new()
    }
}

impl MidiInput for SimulatedInput {
    fn read(&mut self) -> Result<Option<MidiEvent>> {
        thread::sleep(self.interval);
        let note = self.rng.gen_range(Self::NOTE_RANGE);
        let velocity = self.rng.gen_range(Self::VELOCITY_RANGE);
        Ok(Some(MidiEvent::note_on(0, note, velocity, now_seconds())))
    }

    fn name(&self) -> &str {
        "simulated"
    }
}

impl std::fmt::Debug for SimulatedInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedInput")
            .field("interval", &self.interval)
            .finish()
    }
}

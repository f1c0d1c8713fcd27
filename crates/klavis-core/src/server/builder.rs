//! Builder for configuring and constructing a `MidiServer`.

use super::MidiServer;
use crate::config::{DispatchPolicy, ServerConfig};
use crate::error::{Error, Result};
use klavis_midi_io::{InputConfig, MidiInput};

/// An input is required; everything else has a default.
///
/// # Example
///
/// ```ignore
/// use klavis_core::{DispatchPolicy, MidiServer};
/// use klavis_midi_io::InputConfig;
///
/// let server = MidiServer::builder()
///     .open_input(&InputConfig::simulated())?
///     .dispatch_policy(DispatchPolicy::Isolate)
///     .build()?;
/// ```
#[derive(Default)]
pub struct MidiServerBuilder {
    input: Option<Box<dyn MidiInput>>,
    config: ServerConfig,
}

impl MidiServerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input<I: MidiInput + 'static>(self, input: I) -> Self {
        self.boxed_input(Box::new(input))
    }

    pub fn boxed_input(mut self, input: Box<dyn MidiInput>) -> Self {
        self.input = Some(input);
        self
    }

    /// Open an input through [`klavis_midi_io::open_input`].
    pub fn open_input(self, config: &InputConfig) -> Result<Self> {
        let input = klavis_midi_io::open_input(config)?;
        Ok(self.boxed_input(input))
    }

    /// Default: [`DispatchPolicy::Propagate`]
    pub fn dispatch_policy(mut self, policy: DispatchPolicy) -> Self {
        self.config.dispatch = policy;
        self
    }

    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<MidiServer> {
        let input = self
            .input
            .ok_or_else(|| Error::InvalidConfig("no MIDI input configured".to_string()))?;
        Ok(MidiServer::from_parts(input, self.config))
    }
}

impl std::fmt::Debug for MidiServerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MidiServerBuilder")
            .field("input", &self.input.as_ref().map(|input| input.name()))
            .field("config", &self.config)
            .finish()
    }
}

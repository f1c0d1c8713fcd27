//! Input selection at startup.

use std::time::Duration;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::input::{MidiInput, SimulatedInput};

/// Which input variant to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputBackend {
    /// Random note-on events, no hardware.
    Simulated,
    /// A hardware port; fails if the backend is not compiled in.
    Hardware { port: Option<String> },
    /// Hardware when compiled in, otherwise simulated.
    Auto { port: Option<String> },
}

impl Default for InputBackend {
    fn default() -> Self {
        InputBackend::Auto { port: None }
    }
}

/// Configuration for [`open_input`].
#[derive(Debug, Clone)]
pub struct InputConfig {
    pub backend: InputBackend,
    /// Delay between simulated events.
    pub interval: Duration,
    /// Longest a hardware read waits before reporting "no event".
    pub poll_timeout: Duration,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            backend: InputBackend::default(),
            interval: SimulatedInput::DEFAULT_INTERVAL,
            poll_timeout: Duration::from_millis(100),
        }
    }
}

impl InputConfig {
    pub fn simulated() -> Self {
        Self {
            backend: InputBackend::Simulated,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.interval.is_zero() {
            return Err(Error::InvalidConfig(
                "simulated interval must be greater than zero".to_string(),
            ));
        }
        if self.poll_timeout.is_zero() {
            return Err(Error::InvalidConfig(
                "poll_timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Open the input described by `config`.
///
/// Hardware construction errors (no ports, no match, ambiguous name) are
/// returned as-is; `Auto` only falls back to the simulated input when the
/// hardware backend was not compiled in.
pub fn open_input(config: &InputConfig) -> Result<Box<dyn MidiInput>> {
    config.validate()?;

    match &config.backend {
        InputBackend::Simulated => {
            info!("Using simulated MIDI input");
            Ok(Box::new(SimulatedInput::with_interval(config.interval)))
        }
        InputBackend::Hardware { port } => open_hardware(port.as_deref(), config),
        InputBackend::Auto { port } => {
            if crate::HARDWARE_AVAILABLE {
                open_hardware(port.as_deref(), config)
            } else {
                warn!("Hardware MIDI input not available, using simulated input");
                Ok(Box::new(SimulatedInput::with_interval(config.interval)))
            }
        }
    }
}

#[cfg(feature = "midi-io")]
fn open_hardware(port: Option<&str>, config: &InputConfig) -> Result<Box<dyn MidiInput>> {
    let input = crate::io::HardwareInput::open_with_timeout(port, config.poll_timeout)?;
    info!("Using hardware MIDI input");
    Ok(Box::new(input))
}

#[cfg(not(feature = "midi-io"))]
fn open_hardware(_port: Option<&str>, _config: &InputConfig) -> Result<Box<dyn MidiInput>> {
    Err(Error::BackendUnavailable(
        "klavis-midi-io was built without the `midi-io` feature".to_string(),
    ))
}

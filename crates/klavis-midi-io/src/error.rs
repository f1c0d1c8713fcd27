//! Error types for MIDI inputs.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("No MIDI input ports found")]
    NoPorts,

    #[error("No MIDI port matching '{query}' found (available: {})", format_ports(.available))]
    NoMatchingPort {
        query: String,
        available: Vec<(usize, String)>,
    },

    #[error("Ambiguous port name '{query}' matches {}. Be more specific", format_ports(.matches))]
    AmbiguousPort {
        query: String,
        matches: Vec<(usize, String)>,
    },

    #[error("MIDI device error: {0}")]
    MidiDevice(String),

    #[error("MIDI port error: {0}")]
    MidiPort(String),

    #[error("Input backend not available: {0}")]
    BackendUnavailable(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("MIDI input disconnected")]
    Disconnected,

    /// Cancellation request surfaced through an input read.
    #[error("Interrupted")]
    Interrupted,
}

impl Error {
    /// Errors raised while choosing or opening a device, before any event is read.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Error::NoPorts
                | Error::NoMatchingPort { .. }
                | Error::AmbiguousPort { .. }
                | Error::BackendUnavailable(_)
                | Error::InvalidConfig(_)
        )
    }
}

fn format_ports(ports: &[(usize, String)]) -> String {
    if ports.is_empty() {
        return "none".to_string();
    }
    ports
        .iter()
        .map(|(index, name)| format!("[{index}] {name}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(feature = "midi-io")]
impl From<midir::InitError> for Error {
    fn from(e: midir::InitError) -> Self {
        Error::MidiDevice(e.to_string())
    }
}

#[cfg(feature = "midi-io")]
impl From<midir::PortInfoError> for Error {
    fn from(e: midir::PortInfoError) -> Self {
        Error::MidiPort(e.to_string())
    }
}

#[cfg(feature = "midi-io")]
impl From<midir::ConnectError<midir::MidiInput>> for Error {
    fn from(e: midir::ConnectError<midir::MidiInput>) -> Self {
        Error::MidiPort(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

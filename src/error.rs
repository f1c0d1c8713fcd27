//! Centralized error type for the klavis umbrella crate.
//!
//! Wraps the subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] klavis_core::Error),

    #[error("MIDI: {0}")]
    Midi(#[from] klavis_midi_io::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for errors raised while choosing or opening the input.
    pub fn is_config_error(&self) -> bool {
        match self {
            Error::Midi(e) | Error::Core(klavis_core::Error::Input(e)) => e.is_config_error(),
            Error::Core(klavis_core::Error::InvalidConfig(_)) => true,
            _ => false,
        }
    }

    /// True when the error is the input reporting a user interrupt.
    pub fn is_interrupted(&self) -> bool {
        matches!(
            self,
            Error::Midi(klavis_midi_io::Error::Interrupted)
                | Error::Core(klavis_core::Error::Input(klavis_midi_io::Error::Interrupted))
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

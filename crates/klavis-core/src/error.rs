//! Error types for klavis-core.

use thiserror::Error;

use crate::callback::CallbackError;

/// Error type for server operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Event loop is already running")]
    AlreadyRunning,

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Callback {index} failed: {source}")]
    Callback {
        index: usize,
        source: CallbackError,
    },

    #[error("MIDI input: {0}")]
    Input(#[from] klavis_midi_io::Error),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;

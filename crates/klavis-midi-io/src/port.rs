//! Input port selection.
//!
//! Pure functions over a list of port names, so selection rules are testable
//! without a device attached.

use crate::error::{Error, Result};

/// Information about an available MIDI input device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidiInputDevice {
    /// Device index (for connection)
    pub index: usize,
    /// Device name
    pub name: String,
}

/// Outcome of [`select_port`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSelection {
    pub index: usize,
    pub name: String,
    /// True when no name was requested and the first port was taken.
    pub is_default: bool,
}

/// Pick an input port by case-insensitive substring match.
///
/// With no query the first port is used. Fails when there are no ports, when
/// nothing matches, or when more than one port matches.
pub fn select_port<S: AsRef<str>>(ports: &[S], query: Option<&str>) -> Result<PortSelection> {
    let first = ports.first().ok_or(Error::NoPorts)?;

    let Some(query) = query else {
        return Ok(PortSelection {
            index: 0,
            name: first.as_ref().to_string(),
            is_default: true,
        });
    };

    let needle = query.to_lowercase();
    let mut matches: Vec<(usize, String)> = ports
        .iter()
        .enumerate()
        .filter(|(_, name)| name.as_ref().to_lowercase().contains(&needle))
        .map(|(index, name)| (index, name.as_ref().to_string()))
        .collect();

    match matches.len() {
        0 => Err(Error::NoMatchingPort {
            query: query.to_string(),
            available: enumerate(ports),
        }),
        1 => {
            let (index, name) = matches.remove(0);
            Ok(PortSelection {
                index,
                name,
                is_default: false,
            })
        }
        _ => Err(Error::AmbiguousPort {
            query: query.to_string(),
            matches,
        }),
    }
}

fn enumerate<S: AsRef<str>>(ports: &[S]) -> Vec<(usize, String)> {
    ports
        .iter()
        .enumerate()
        .map(|(index, name)| (index, name.as_ref().to_string()))
        .collect()
}

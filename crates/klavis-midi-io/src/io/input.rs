//! Hardware MIDI input.
//!
//! The midir connection lives on a dedicated thread for platform
//! thread-safety; its callback forwards raw messages over a bounded channel
//! that [`HardwareInput::read`] drains.

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use midir::{Ignore, MidiInput as MidirInput, MidiInputConnection};
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::input::MidiInput;
use crate::port::{select_port, MidiInputDevice, PortSelection};
use klavis_midi::{now_seconds, MidiEvent};

const CLIENT_NAME: &str = "klavis-midi-input";

/// Raw messages buffered between the device callback and `read`.
const EVENT_QUEUE_CAPACITY: usize = 1024;

type RawMessage = (Vec<u8>, f64);

enum DeviceCommand {
    Shutdown,
}

/// A connected hardware input port.
pub struct HardwareInput {
    events: Receiver<RawMessage>,
    command_sender: Sender<DeviceCommand>,
    port: PortSelection,
    poll_timeout: Duration,
}

impl HardwareInput {
    pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_millis(100);

    /// Open the port whose name contains `port_name` (case-insensitive), or
    /// the first port when `port_name` is `None`.
    pub fn open(port_name: Option<&str>) -> Result<Self> {
        Self::open_with_timeout(port_name, Self::DEFAULT_POLL_TIMEOUT)
    }

    /// Like [`open`](Self::open); `read` returns `Ok(None)` after waiting
    /// `poll_timeout` without a message.
    pub fn open_with_timeout(port_name: Option<&str>, poll_timeout: Duration) -> Result<Self> {
        let (event_sender, events) = bounded(EVENT_QUEUE_CAPACITY);
        let (command_sender, command_receiver) = bounded(4);
        let (ready_sender, ready_receiver) = bounded(1);
        let query = port_name.map(str::to_owned);

        thread::Builder::new()
            .name("midi-input-thread".to_string())
            .spawn(move || {
                Self::device_thread(query, event_sender, command_receiver, ready_sender);
            })
            .map_err(|e| Error::MidiDevice(format!("Failed to spawn MIDI input thread: {e}")))?;

        let port = ready_receiver
            .recv()
            .map_err(|_| Error::MidiDevice("MIDI input thread exited during setup".to_string()))??;

        Ok(Self {
            events,
            command_sender,
            port,
            poll_timeout,
        })
    }

    fn device_thread(
        query: Option<String>,
        event_sender: Sender<RawMessage>,
        command_receiver: Receiver<DeviceCommand>,
        ready_sender: Sender<Result<PortSelection>>,
    ) {
        let connection = match Self::connect(query.as_deref(), event_sender) {
            Ok((connection, selection)) => {
                let _ = ready_sender.send(Ok(selection));
                connection
            }
            Err(e) => {
                let _ = ready_sender.send(Err(e));
                return;
            }
        };

        // Hold the connection until shutdown or until the reader is dropped
        if let Ok(DeviceCommand::Shutdown) = command_receiver.recv() {
            debug!("MIDI input shutdown requested");
        }
        drop(connection);
        debug!("MIDI input thread exiting");
    }

    fn connect(
        query: Option<&str>,
        event_sender: Sender<RawMessage>,
    ) -> Result<(MidiInputConnection<()>, PortSelection)> {
        let mut midi_input = MidirInput::new(CLIENT_NAME)?;
        // Keep sysex, timing and active sensing; they decode as unknown events
        midi_input.ignore(Ignore::None);

        let ports = midi_input.ports();
        let names: Vec<String> = ports
            .iter()
            .enumerate()
            .map(|(index, port)| {
                midi_input
                    .port_name(port)
                    .unwrap_or_else(|_| format!("Unknown Device {}", index))
            })
            .collect();

        let selection = match select_port(&names, query) {
            Ok(selection) => selection,
            Err(e) => {
                if matches!(e, Error::NoMatchingPort { .. }) {
                    log_port_list(&names);
                }
                return Err(e);
            }
        };

        if selection.is_default {
            log_port_list(&names);
            info!("No port name specified, using default port: {}", selection.name);
        } else {
            info!("Using MIDI port: {}", selection.name);
        }

        let port = ports
            .get(selection.index)
            .ok_or_else(|| Error::MidiPort(format!("MIDI port {} vanished", selection.index)))?;

        let connection = midi_input.connect(
            port,
            "klavis-input",
            move |_stamp, message, _| {
                if event_sender.try_send((message.to_vec(), now_seconds())).is_err() {
                    debug!("MIDI input queue full, dropping message");
                }
            },
            (),
        )?;

        Ok((connection, selection))
    }

    pub fn port_index(&self) -> usize {
        self.port.index
    }

    pub fn port_name(&self) -> &str {
        &self.port.name
    }
}

impl MidiInput for HardwareInput {
    fn read(&mut self) -> Result<Option<MidiEvent>> {
        match self.events.recv_timeout(self.poll_timeout) {
            Ok((bytes, timestamp)) => Ok(MidiEvent::from_bytes(&bytes, timestamp)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(Error::Disconnected),
        }
    }

    fn name(&self) -> &str {
        &self.port.name
    }
}

impl Drop for HardwareInput {
    fn drop(&mut self) {
        let _ = self.command_sender.send(DeviceCommand::Shutdown);
    }
}

impl std::fmt::Debug for HardwareInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HardwareInput")
            .field("port_index", &self.port.index)
            .field("port_name", &self.port.name)
            .field("poll_timeout", &self.poll_timeout)
            .finish()
    }
}

/// List available MIDI input devices. Empty when the backend cannot start.
pub fn list_input_ports() -> Vec<MidiInputDevice> {
    let mut devices = Vec::new();
    if let Ok(midi_input) = MidirInput::new("klavis-device-list") {
        for (index, port) in midi_input.ports().iter().enumerate() {
            let name = midi_input
                .port_name(port)
                .unwrap_or_else(|_| format!("Unknown Device {}", index));
            devices.push(MidiInputDevice { index, name });
        }
    }
    devices
}

fn log_port_list(names: &[String]) {
    info!("Available MIDI input ports:");
    for (index, name) in names.iter().enumerate() {
        info!("  [{}] {}", index, name);
    }
}

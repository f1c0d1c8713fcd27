//! Integration tests for klavis-midi-io.
//!
//! These tests exercise the input sources through the public API without
//! hardware MIDI devices.

use std::time::{Duration, Instant};
use klavis_midi_io::{
    open_input, select_port, Error, EventKind, InputBackend, InputConfig, MidiEvent, MidiInput,
    ScriptedInput, SimulatedInput,
};

// ---------------------------------------------------------------------------
// 1. Inputs behind the trait object
// ---------------------------------------------------------------------------

/// Drain any input until it interrupts, collecting kinds.
fn drain(input: &mut dyn MidiInput) -> Vec<EventKind> {
    let mut kinds = Vec::new();
    loop {
        match input.read() {
            Ok(Some(event)) => kinds.push(event.kind),
            Ok(None) => continue,
            Err(Error::Interrupted) => return kinds,
            Err(e) => panic!("unexpected input error: {e}"),
        }
    }
}

#[test]
fn test_scripted_input_as_trait_object() {
    let mut input: Box<dyn MidiInput> = Box::new(ScriptedInput::with_gaps([
        Some(MidiEvent::note_on(0, 60, 100, 0.0)),
        None,
        Some(MidiEvent::note_off(0, 60, 0, 0.5)),
        Some(MidiEvent::unknown(0, 7, 127, 0.6)),
    ]));
    assert_eq!(
        drain(&mut input),
        vec![EventKind::NoteOn, EventKind::NoteOff, EventKind::Unknown]
    );
}

/// Raw bytes decoded the way the hardware backend decodes them.
#[test]
fn test_decoded_bytes_through_scripted_input() {
    let raw: [&[u8]; 4] = [&[0x90, 60, 100], &[0x90, 60, 0], &[0x80, 62, 40], &[0xE0, 0, 64]];
    let events = raw
        .iter()
        .filter_map(|bytes| MidiEvent::from_bytes(bytes, 0.0));
    let mut input = ScriptedInput::new(events);
    assert_eq!(
        drain(&mut input),
        vec![
            EventKind::NoteOn,
            EventKind::NoteOff,
            EventKind::NoteOff,
            EventKind::Unknown
        ]
    );
}

// ---------------------------------------------------------------------------
// 2. Simulated input contract
// ---------------------------------------------------------------------------

#[test]
fn test_simulated_contract_via_factory() {
    let interval = Duration::from_millis(10);
    let mut input = open_input(&InputConfig {
        backend: InputBackend::Simulated,
        interval,
        ..Default::default()
    })
    .unwrap();

    let start = Instant::now();
    let mut last_timestamp = 0.0;
    for _ in 0..5 {
        let event = input.read().unwrap().expect("simulated input always yields");
        assert_eq!(event.kind, EventKind::NoteOn);
        assert!(SimulatedInput::NOTE_RANGE.contains(&event.note));
        assert!(SimulatedInput::VELOCITY_RANGE.contains(&event.velocity));
        assert_eq!(event.channel, 0);
        assert!(event.timestamp >= last_timestamp);
        last_timestamp = event.timestamp;
    }
    assert!(start.elapsed() >= interval * 5);
}

// ---------------------------------------------------------------------------
// 3. Port selection against a fake port list
// ---------------------------------------------------------------------------

#[test]
fn test_ambiguous_port_scenario() {
    let ports = ["USB MIDI 1", "USB MIDI 2"];
    let err = select_port(&ports, Some("USB")).unwrap_err();
    assert!(err.is_config_error());
    let msg = err.to_string();
    assert!(msg.contains("[0] USB MIDI 1"), "{msg}");
    assert!(msg.contains("[1] USB MIDI 2"), "{msg}");
}

#[test]
fn test_specific_name_resolves_ambiguity() {
    let ports = ["USB MIDI 1", "USB MIDI 2"];
    let selection = select_port(&ports, Some("midi 2")).unwrap();
    assert_eq!(selection.index, 1);
}

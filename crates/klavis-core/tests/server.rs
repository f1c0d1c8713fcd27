//! Integration tests for the event server.
//!
//! Scripted inputs make the loop deterministic; simulated inputs with a
//! short interval exercise cross-thread control.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use klavis_core::{DispatchPolicy, Error, EventKind, MidiEvent, MidiServer, ServerState};
use klavis_midi_io::{InputConfig, ScriptedInput, SimulatedInput};

fn three_note_ons() -> ScriptedInput {
    ScriptedInput::new([
        MidiEvent::note_on(0, 60, 100, 0.0),
        MidiEvent::note_on(0, 64, 100, 0.1),
        MidiEvent::note_on(0, 67, 100, 0.2),
    ])
}

fn wait_for_dispatch(server: &MidiServer) {
    while server.events_dispatched() == 0 {
        thread::sleep(Duration::from_millis(1));
    }
}

// ---------------------------------------------------------------------------
// 1. End to end
// ---------------------------------------------------------------------------

#[test]
fn test_scripted_events_reach_callback() {
    let server = MidiServer::new(three_note_ons());
    let kinds = Arc::new(Mutex::new(Vec::new()));
    let k = Arc::clone(&kinds);
    server.register_callback(move |event| k.lock().push(event.kind.as_str().to_string()));

    server.start().unwrap();

    assert_eq!(*kinds.lock(), vec!["note_on", "note_on", "note_on"]);
    assert_eq!(server.state(), ServerState::Stopped);
}

#[test]
fn test_every_callback_sees_the_same_event() {
    let server = MidiServer::new(three_note_ons());
    let first = Arc::new(Mutex::new(Vec::new()));
    let second = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::clone(&first);
    let s = Arc::clone(&second);
    server.register_callback(move |event| f.lock().push(*event));
    server.register_callback(move |event| s.lock().push(*event));

    server.start().unwrap();

    assert_eq!(first.lock().len(), 3);
    assert_eq!(*first.lock(), *second.lock());
}

#[test]
fn test_no_callbacks_still_drains_input() {
    let server = MidiServer::new(three_note_ons());
    server.start().unwrap();
    assert_eq!(server.events_dispatched(), 3);
}

#[test]
fn test_simulated_events_through_server() {
    let input = SimulatedInput::with_interval(Duration::from_millis(1)).with_seed(7);
    let server = MidiServer::new(input);
    let handle = server.handle();
    let events = Arc::new(Mutex::new(Vec::new()));
    let e = Arc::clone(&events);
    server.register_callback(move |event| {
        let mut events = e.lock();
        events.push(*event);
        if events.len() == 20 {
            handle.stop();
        }
    });

    server.start().unwrap();

    let events = events.lock();
    assert_eq!(events.len(), 20);
    for event in events.iter() {
        assert_eq!(event.kind, EventKind::NoteOn);
        assert!((60..=72).contains(&event.note));
        assert!((80..=127).contains(&event.velocity));
        assert_eq!(event.channel, 0);
    }
}

// ---------------------------------------------------------------------------
// 2. Lifecycle
// ---------------------------------------------------------------------------

#[test]
fn test_second_start_rejected_while_running() {
    let server = MidiServer::new(SimulatedInput::with_interval(Duration::from_millis(2)));

    thread::scope(|s| {
        s.spawn(|| server.start().unwrap());
        wait_for_dispatch(&server);

        assert!(matches!(server.start(), Err(Error::AlreadyRunning)));
        assert!(server.is_running());
        server.stop();
    });

    assert_eq!(server.state(), ServerState::Stopped);
}

#[test]
fn test_restart_refused_until_stopped_loop_returns() {
    let input = ScriptedInput::new((0..5).map(|i| MidiEvent::note_on(0, 60 + i, 100, 0.0)))
        .with_delay(Duration::from_millis(100));
    let server = MidiServer::new(input);

    thread::scope(|s| {
        let first = s.spawn(|| server.start());
        wait_for_dispatch(&server);

        // The first loop is inside its next read; stop() cannot interrupt it
        server.stop();
        assert!(matches!(server.start(), Err(Error::AlreadyRunning)));
        assert!(!server.is_running());

        first.join().unwrap().unwrap();
    });

    // The event read after stop() was dropped, not dispatched
    assert_eq!(server.events_dispatched(), 1);
    assert_eq!(server.state(), ServerState::Stopped);

    // Once the first run has returned, a new one owns the input end to end
    server.start().unwrap();
    assert_eq!(server.events_dispatched(), 4);
    assert!(!server.is_running());
}

#[test]
fn test_event_read_after_stop_is_discarded() {
    let input = ScriptedInput::new([MidiEvent::note_on(0, 60, 100, 0.0)])
        .with_delay(Duration::from_millis(50));
    let server = MidiServer::new(input);
    let count = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&count);
    server.register_callback(move |_| {
        c.fetch_add(1, Ordering::SeqCst);
    });

    thread::scope(|s| {
        s.spawn(|| server.start().unwrap());
        while !server.is_running() {
            thread::yield_now();
        }
        thread::sleep(Duration::from_millis(10));
        server.stop();
    });

    assert_eq!(count.load(Ordering::SeqCst), 0);
    assert_eq!(server.events_dispatched(), 0);
}

#[test]
fn test_read_error_stops_and_returns() {
    struct Failing;
    impl klavis_midi_io::MidiInput for Failing {
        fn read(&mut self) -> klavis_midi_io::Result<Option<MidiEvent>> {
            Err(klavis_midi_io::Error::Disconnected)
        }
    }

    let server = MidiServer::new(Failing);
    let err = server.start().unwrap_err();
    assert!(matches!(
        err,
        Error::Input(klavis_midi_io::Error::Disconnected)
    ));
    assert!(!server.is_running());
}

// ---------------------------------------------------------------------------
// 3. Registration while running
// ---------------------------------------------------------------------------

#[test]
fn test_register_while_running() {
    let server = MidiServer::new(SimulatedInput::with_interval(Duration::from_millis(1)));
    let handle = server.handle();
    let early = Arc::new(AtomicUsize::new(0));
    let late = Arc::new(AtomicUsize::new(0));

    let e = Arc::clone(&early);
    server.register_callback(move |_| {
        e.fetch_add(1, Ordering::SeqCst);
    });

    thread::scope(|s| {
        s.spawn(|| server.start().unwrap());
        wait_for_dispatch(&server);

        let registrars: Vec<_> = (0..4)
            .map(|_| {
                let handle = handle.clone();
                let late = Arc::clone(&late);
                s.spawn(move || {
                    handle.register_callback(move |_| {
                        late.fetch_add(1, Ordering::SeqCst);
                    });
                })
            })
            .collect();
        for registrar in registrars {
            registrar.join().unwrap();
        }

        while late.load(Ordering::SeqCst) < 8 {
            thread::sleep(Duration::from_millis(1));
        }
        handle.stop();
    });

    assert_eq!(server.callback_count(), 5);
    // Late callbacks never see events from before they were registered
    assert!(early.load(Ordering::SeqCst) * 4 >= late.load(Ordering::SeqCst));
}

// ---------------------------------------------------------------------------
// 4. Failure policy
// ---------------------------------------------------------------------------

#[test]
fn test_propagate_returns_failing_index() {
    let server = MidiServer::new(three_note_ons());
    server.register_callback(|_| {});
    server.register_fallible_callback(|event| {
        if event.note == 64 {
            Err(format!("rejected note {}", event.note).into())
        } else {
            Ok(())
        }
    });

    match server.start() {
        Err(Error::Callback { index, source }) => {
            assert_eq!(index, 1);
            assert_eq!(source.to_string(), "rejected note 64");
        }
        other => panic!("Expected callback error, got {other:?}"),
    }
    assert_eq!(server.events_dispatched(), 1);
}

#[test]
fn test_isolate_survives_failures() {
    let server = MidiServer::builder()
        .input(three_note_ons())
        .dispatch_policy(DispatchPolicy::Isolate)
        .build()
        .unwrap();
    let count = Arc::new(AtomicUsize::new(0));
    server.register_fallible_callback(|_| Err("always".into()));
    let c = Arc::clone(&count);
    server.register_callback(move |_| {
        c.fetch_add(1, Ordering::SeqCst);
    });

    server.start().unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 3);
}

#[test]
fn test_builder_from_input_config() {
    let config = InputConfig {
        interval: Duration::from_millis(1),
        ..InputConfig::simulated()
    };
    let server = MidiServer::builder().open_input(&config).unwrap().build().unwrap();
    let handle = server.handle();
    server.register_callback(move |_| handle.stop());

    server.start().unwrap();
    assert_eq!(server.events_dispatched(), 1);
}

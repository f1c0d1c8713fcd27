//! Ordered, append-only callback registry.
//!
//! Registration publishes a new vector through `ArcSwap`; the dispatch loop
//! takes one snapshot per cycle and iterates it without holding any lock.
//! A callback registered mid-cycle is therefore never seen half-way through
//! a dispatch and receives events from the next cycle on.

use arc_swap::ArcSwap;
use std::fmt;
use std::sync::Arc;

use klavis_midi::MidiEvent;

/// Error a fallible callback may return.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type CallbackResult = std::result::Result<(), CallbackError>;

type CallbackFn = dyn Fn(&MidiEvent) -> CallbackResult + Send + Sync;

/// A registered event handler. Clone is cheap (Arc internally).
#[derive(Clone)]
pub struct Callback(Arc<CallbackFn>);

impl Callback {
    /// Wrap a handler that cannot fail.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&MidiEvent) + Send + Sync + 'static,
    {
        Self(Arc::new(move |event: &MidiEvent| {
            f(event);
            Ok(())
        }))
    }

    pub fn fallible<F>(f: F) -> Self
    where
        F: Fn(&MidiEvent) -> CallbackResult + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    #[inline]
    pub fn call(&self, event: &MidiEvent) -> CallbackResult {
        (self.0)(event)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Callback").finish_non_exhaustive()
    }
}

pub struct CallbackRegistry {
    callbacks: ArcSwap<Vec<Callback>>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self {
            callbacks: ArcSwap::from_pointee(Vec::new()),
        }
    }

    /// Append a callback. Returns its position, which is also its dispatch order.
    pub fn register(&self, callback: Callback) -> usize {
        let mut index = 0;
        self.callbacks.rcu(|current| {
            let mut next = Vec::with_capacity(current.len() + 1);
            next.extend(current.iter().cloned());
            index = next.len();
            next.push(callback.clone());
            next
        });
        tracing::debug!("Registered callback {}", index);
        index
    }

    /// The callbacks as of now. Later registrations do not affect the
    /// returned snapshot.
    pub fn snapshot(&self) -> Arc<Vec<Callback>> {
        self.callbacks.load_full()
    }

    pub fn len(&self) -> usize {
        self.callbacks.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("num_callbacks", &self.len())
            .finish()
    }
}

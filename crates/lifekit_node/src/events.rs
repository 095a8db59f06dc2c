//! Transition events and their delivery.
//!
//! Two delivery paths, by design:
//! - local observers: synchronous, in subscription order, from the thread that
//!   completed the transition ("transition completed" and "event delivered"
//!   are observably ordered for the caller)
//! - remote watchers: a tokio broadcast stream, so transitions never block on
//!   a slow consumer and lagging receivers drop old events

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::SystemTime;

use lifekit_core::lifecycle::{State, Transition};
use tokio::sync::broadcast;

/// Emitted once per transition attempt that reached its callback.
///
/// For a failed attempt, `goal_state` is the state the component settled in
/// (the pre-transition stable state, or Finalized for shutdown).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionEvent {
    pub transition: Transition,
    pub start_state: State,
    pub goal_state: State,
    pub timestamp: SystemTime,
}

/// A local observer of transition events. Observers never mutate the event.
pub trait TransitionObserver: Send {
    fn on_transition_event(&mut self, event: &TransitionEvent);
}

impl<F> TransitionObserver for F
where
    F: FnMut(&TransitionEvent) + Send,
{
    fn on_transition_event(&mut self, event: &TransitionEvent) {
        self(event)
    }
}

/// Opaque handle identifying one local subscription.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SubscriptionHandle(u64);

/// Fans transition events out to local observers and remote watchers.
pub struct TransitionNotifier {
    observers: Vec<(SubscriptionHandle, Box<dyn TransitionObserver>)>,
    next_id: u64,
    remote: broadcast::Sender<TransitionEvent>,
}

impl TransitionNotifier {
    /// `capacity` bounds the remote broadcast buffer; lagging watchers lose
    /// the oldest events rather than stalling transitions.
    pub fn with_capacity(capacity: usize) -> Self {
        let (remote, _rx) = broadcast::channel(capacity);
        Self {
            observers: Vec::new(),
            next_id: 0,
            remote,
        }
    }

    pub fn new() -> Self {
        Self::with_capacity(32)
    }

    /// Register a local observer. Delivery order follows subscription order.
    pub fn subscribe(&mut self, observer: Box<dyn TransitionObserver>) -> SubscriptionHandle {
        let handle = SubscriptionHandle(self.next_id);
        self.next_id += 1;
        self.observers.push((handle, observer));
        handle
    }

    /// Remove a local observer. Idempotent; returns whether it was present.
    ///
    /// Once this returns, the observer receives no further events.
    pub fn unsubscribe(&mut self, handle: SubscriptionHandle) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(id, _)| *id != handle);
        self.observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Obtain a receiver for the remote event stream.
    pub fn watch(&self) -> broadcast::Receiver<TransitionEvent> {
        self.remote.subscribe()
    }

    /// Deliver `event` to every local observer, then to the remote stream.
    ///
    /// An observer panic is caught and logged; it never prevents delivery to
    /// later observers and never propagates to the transition that published.
    pub fn publish(&mut self, event: TransitionEvent) {
        for (handle, observer) in &mut self.observers {
            let delivery = catch_unwind(AssertUnwindSafe(|| {
                observer.on_transition_event(&event);
            }));
            if delivery.is_err() {
                tracing::warn!(
                    subscription = handle.0,
                    transition = event.transition.label(),
                    "transition observer panicked; continuing delivery"
                );
            }
        }

        // No receivers is not an error.
        let _ = self.remote.send(event);
    }
}

impl Default for TransitionNotifier {
    fn default() -> Self {
        Self::new()
    }
}

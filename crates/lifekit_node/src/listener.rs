//! Observing another component's transition stream.
//!
//! A listener component subscribes to a peer node's broadcast stream (see
//! `LifecycleNode::watch_transition_events`) and reacts to each state change.
//! Lagging is tolerated: the stream drops old events rather than stalling the
//! peer's transitions.

use tokio::sync::broadcast;

use crate::events::TransitionEvent;

/// Run `handler` for every event on `rx` until the sending node goes away.
///
/// Returns the number of events that were dropped because this listener
/// lagged behind.
pub async fn watch_transitions<F>(
    mut rx: broadcast::Receiver<TransitionEvent>,
    mut handler: F,
) -> u64
where
    F: FnMut(TransitionEvent) + Send,
{
    let mut dropped = 0;
    loop {
        match rx.recv().await {
            Ok(event) => handler(event),
            Err(broadcast::error::RecvError::Lagged(n)) => dropped += n,
            Err(broadcast::error::RecvError::Closed) => return dropped,
        }
    }
}

/// Log every transition of a peer node until its stream closes.
pub async fn log_transitions(peer: &str, rx: broadcast::Receiver<TransitionEvent>) {
    let dropped = watch_transitions(rx, |event| {
        tracing::info!(
            peer,
            transition = event.transition.label(),
            "peer transition from {} to {}",
            event.start_state,
            event.goal_state,
        );
    })
    .await;

    if dropped > 0 {
        tracing::warn!(peer, dropped, "listener lagged behind peer transitions");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::SystemTime;

    use lifekit_core::lifecycle::{State, Transition};

    #[tokio::test]
    async fn watcher_sees_events_until_stream_closes() {
        let (tx, rx) = broadcast::channel(8);

        let seen: Arc<Mutex<Vec<(State, State)>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let watcher = tokio::spawn(watch_transitions(rx, move |event| {
            sink.lock()
                .unwrap()
                .push((event.start_state, event.goal_state));
        }));

        for (transition, start, goal) in [
            (Transition::Configure, State::Unconfigured, State::Inactive),
            (Transition::Activate, State::Inactive, State::Active),
        ] {
            tx.send(TransitionEvent {
                transition,
                start_state: start,
                goal_state: goal,
                timestamp: SystemTime::now(),
            })
            .unwrap();
        }
        drop(tx);

        let dropped = watcher.await.unwrap();
        assert_eq!(dropped, 0);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                (State::Unconfigured, State::Inactive),
                (State::Inactive, State::Active),
            ]
        );
    }
}

use std::sync::Arc;

use lifekit_core::lifecycle::ActivationGate;
use tokio::sync::mpsc;

/// A lifecycle-gated inbound message handler.
///
/// Wraps a channel receiver fed by whatever transport delivers domain
/// messages. Messages that arrive while the component is not Active are
/// drained and dropped, matching the "subscription exists but does nothing
/// until activation" pattern.
pub struct ManagedSubscription<T> {
    gate: Arc<ActivationGate>,
    rx: mpsc::Receiver<T>,
}

impl<T: Send> ManagedSubscription<T> {
    pub fn new(gate: Arc<ActivationGate>, rx: mpsc::Receiver<T>) -> Self {
        Self { gate, rx }
    }

    /// Dispatch inbound messages until the channel closes.
    ///
    /// `handler` runs only for messages received while the gate is active.
    pub async fn run<F>(mut self, mut handler: F)
    where
        F: FnMut(T) + Send,
    {
        while let Some(msg) = self.rx.recv().await {
            if self.gate.is_active() {
                handler(msg);
            } else {
                tracing::trace!("inbound message dropped while inactive");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[tokio::test]
    async fn messages_are_dropped_while_inactive() {
        let gate = Arc::new(ActivationGate::new());
        let (tx, rx) = mpsc::channel(8);
        let sub = ManagedSubscription::new(gate.clone(), rx);

        let handled: Arc<Mutex<Vec<u32>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = handled.clone();
        let runner = tokio::spawn(sub.run(move |msg| {
            sink.lock().unwrap().push(msg);
        }));

        tx.send(1).await.unwrap();
        tokio::task::yield_now().await;

        gate.activate();
        tx.send(2).await.unwrap();
        tx.send(3).await.unwrap();

        drop(tx);
        runner.await.unwrap();

        assert_eq!(*handled.lock().unwrap(), vec![2, 3]);
    }
}

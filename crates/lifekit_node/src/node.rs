use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use lifekit_core::error::{CoreError, Domain, ErrorKind, Result};
use lifekit_core::lifecycle::{
    available_transitions, begin, finish, finish_with_error_handling, ActivationGate,
    CallbackResult, State, Transition,
};
use tokio::sync::broadcast;

use crate::events::{SubscriptionHandle, TransitionEvent, TransitionNotifier, TransitionObserver};
use crate::registry::{CallbackRegistry, Hook};
use crate::timer::TimerHandle;

/// A managed lifecycle component.
///
/// Responsibilities:
/// - Hold the current lifecycle state and drive transitions through it
/// - Hold the per-transition callback registry
/// - Provide an activation gate for managed resources (timers/subscriptions)
/// - Own created timers and cancel them on every teardown path
/// - Publish one transition event per attempt that reached its callback
///
/// Not internally thread-safe by contract: all mutating operations take
/// `&mut self`, so the caller serializes transitions (directly, or behind a
/// mutex/actor boundary).
pub struct LifecycleNode {
    name: String,
    state: State,
    gate: Arc<ActivationGate>,
    registry: CallbackRegistry,
    notifier: TransitionNotifier,
    timers: Vec<TimerHandle>,
}

impl LifecycleNode {
    /// Create a node in `Unconfigured` with an inactive gate and no handlers.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(CoreError::error()
                .domain(Domain::Lifecycle)
                .kind(ErrorKind::InvalidArgument)
                .msg("node name must not be empty")
                .build());
        }

        Ok(Self {
            name,
            state: State::Unconfigured,
            gate: Arc::new(ActivationGate::new()),
            registry: CallbackRegistry::new(),
            notifier: TransitionNotifier::new(),
            timers: Vec::new(),
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Node name (for logging/introspection).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared activation gate for node-managed resources.
    pub fn activation_gate(&self) -> Arc<ActivationGate> {
        Arc::clone(&self.gate)
    }

    /// Transitions invocable from the current state.
    pub fn available_transitions(&self) -> &'static [Transition] {
        available_transitions(self.state)
    }

    // ---------------- Callback registration ----------------

    /// Install `handler` for `hook`, replacing any existing handler.
    ///
    /// Unregistered transition hooks behave as no-op Success. The
    /// error-processing hook is the exception: when it is absent, a handler
    /// `Error` finalizes the node.
    pub fn register_callback<F>(&mut self, hook: Hook, handler: F)
    where
        F: FnMut() -> CallbackResult + Send + 'static,
    {
        self.registry.register(hook, Box::new(handler));
    }

    /// Remove the handler for `hook`. Returns whether one was installed.
    pub fn unregister_callback(&mut self, hook: Hook) -> bool {
        self.registry.unregister(hook)
    }

    // ---------------- Transition events ----------------

    /// Register a local observer; events are delivered synchronously, in
    /// subscription order, from the call that completes each transition.
    pub fn subscribe<O>(&mut self, observer: O) -> SubscriptionHandle
    where
        O: TransitionObserver + 'static,
    {
        self.notifier.subscribe(Box::new(observer))
    }

    /// Remove a local observer; it receives no events published after this
    /// returns. Idempotent.
    pub fn unsubscribe(&mut self, handle: SubscriptionHandle) -> bool {
        self.notifier.unsubscribe(handle)
    }

    /// Obtain a receiver on the remote transition-event stream, e.g. for a
    /// listener component or a transport adapter.
    pub fn watch_transition_events(&self) -> broadcast::Receiver<TransitionEvent> {
        self.notifier.watch()
    }

    // ---------------- Timers ----------------

    /// Create a periodic timer whose callback runs on every tick.
    ///
    /// The node keeps a handle and cancels it on Cleanup success, Shutdown,
    /// and error-recovery reset. Must be called within a tokio runtime.
    pub fn create_timer<F>(&mut self, period: Duration, callback: F) -> TimerHandle
    where
        F: FnMut() + Send + 'static,
    {
        let handle = TimerHandle::spawn(period, callback);
        self.timers.push(handle.clone());
        handle
    }

    /// Create a periodic timer gated on this node being Active.
    pub fn create_gated_timer<F>(&mut self, period: Duration, callback: F) -> TimerHandle
    where
        F: FnMut() + Send + 'static,
    {
        let gate = Arc::clone(&self.gate);
        self.create_gated_timer_with(period, callback, move || gate.is_active())
    }

    /// Create a periodic timer gated on an arbitrary predicate.
    pub fn create_gated_timer_with<F, P>(
        &mut self,
        period: Duration,
        callback: F,
        active: P,
    ) -> TimerHandle
    where
        F: FnMut() + Send + 'static,
        P: Fn() -> bool + Send + 'static,
    {
        let handle = TimerHandle::spawn_gated(period, callback, active);
        self.timers.push(handle.clone());
        handle
    }

    fn cancel_all_timers(&mut self) {
        for timer in self.timers.drain(..) {
            timer.cancel();
        }
    }

    // ---------------- Transitions ----------------

    /// Execute a lifecycle transition. The only state-mutating entry point.
    ///
    /// Sequencing:
    /// 1. reject if Finalized, mid-transition, or `via` is invalid here
    /// 2. enter the intermediate state, then invoke the registered handler
    /// 3. resolve the outcome (Success/Failure/Error, with error processing)
    /// 4. apply gate policy and teardown, update state
    /// 5. publish one transition event
    ///
    /// Handler outcomes map to the returned result:
    /// - Success: `Ok(final_state)`
    /// - Failure: `Err(CallbackFailure)`, state already reverted
    /// - Error: `Err(CallbackError)`, state is Unconfigured (recovered) or
    ///   Finalized (unrecoverable)
    pub fn execute_transition(&mut self, via: Transition) -> Result<State> {
        if self.state.is_terminal() {
            return Err(CoreError::already_finalized(self.state.id(), via.id()));
        }
        if self.state.is_transitioning() {
            return Err(CoreError::transition_in_progress(self.state.id(), via.id()));
        }

        let start = self.state;
        let intermediate = begin(start, via)?;

        // Observers of state() and logs see the in-flight state while the
        // handler runs.
        self.state = intermediate;
        tracing::debug!(
            node = %self.name,
            from = start.label(),
            via = via.label(),
            "lifecycle transition started"
        );

        // A panicking handler counts as an unexpected fault: route it through
        // error processing instead of leaving the node mid-transition.
        let registry = &mut self.registry;
        let result = catch_unwind(AssertUnwindSafe(|| registry.invoke(Hook::from(via))))
            .unwrap_or_else(|_| {
                tracing::warn!(node = %self.name, via = via.label(), "transition handler panicked");
                CallbackResult::Error
            });
        let resolved = finish(intermediate, via, result)?;

        // On ErrorProcessing, invoke the error hook; the recovery table
        // itself lives in finish_with_error_handling.
        let recovery = if resolved == State::ErrorProcessing {
            self.state = State::ErrorProcessing;
            tracing::warn!(node = %self.name, via = via.label(), "transition entered error processing");
            let registry = &mut self.registry;
            Some(
                catch_unwind(AssertUnwindSafe(|| {
                    registry.invoke_or(Hook::ErrorProcessing, CallbackResult::Failure)
                }))
                .unwrap_or(CallbackResult::Failure),
            )
        } else {
            None
        };
        let final_state = finish_with_error_handling(intermediate, via, result, recovery)?;

        // Gate policy: entering Active turns the gate on, leaving it turns it off.
        if final_state == State::Active {
            self.gate.activate();
        } else if start == State::Active {
            self.gate.deactivate();
        }

        self.state = final_state;

        // Teardown paths: terminal state, successful cleanup, or the full
        // reset performed by error recovery. A plain Failure changes nothing.
        let teardown = final_state.is_terminal()
            || (via == Transition::Cleanup && result == CallbackResult::Success)
            || (result == CallbackResult::Error && final_state == State::Unconfigured);
        if teardown {
            self.cancel_all_timers();
        }

        tracing::debug!(
            node = %self.name,
            from = start.label(),
            to = final_state.label(),
            via = via.label(),
            "lifecycle transition finished"
        );

        self.notifier.publish(TransitionEvent {
            transition: via,
            start_state: start,
            goal_state: final_state,
            timestamp: SystemTime::now(),
        });

        match result {
            CallbackResult::Success => Ok(final_state),
            CallbackResult::Failure => Err(CoreError::callback_failure(start.id(), via.id())),
            CallbackResult::Error => Err(CoreError::callback_error(start.id(), via.id())),
        }
    }
}

impl Drop for LifecycleNode {
    fn drop(&mut self) {
        // Process-teardown path: timers must not outlive their component.
        self.cancel_all_timers();
    }
}

/// Unit tests for LifecycleNode.
#[cfg(test)]
mod tests {
    use super::*;
    use lifekit_core::error::ErrorKind;

    #[test]
    fn rejects_empty_name() {
        let err = LifecycleNode::new("").map(|_| ()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
    }

    #[test]
    fn configure_then_activate_sets_gate() {
        let mut node = LifecycleNode::new("test_node").unwrap();

        let s1 = node.execute_transition(Transition::Configure).unwrap();
        assert_eq!(s1, State::Inactive);
        assert!(!node.activation_gate().is_active());

        let s2 = node.execute_transition(Transition::Activate).unwrap();
        assert_eq!(s2, State::Active);
        assert!(node.activation_gate().is_active());

        let s3 = node.execute_transition(Transition::Deactivate).unwrap();
        assert_eq!(s3, State::Inactive);
        assert!(!node.activation_gate().is_active());
    }

    #[test]
    fn published_event_records_stable_endpoints() {
        let mut node = LifecycleNode::new("test_node").unwrap();
        let mut watched = node.watch_transition_events();

        node.register_callback(Hook::Configure, || CallbackResult::Success);
        node.execute_transition(Transition::Configure).unwrap();

        let ev = watched.try_recv().unwrap();
        assert_eq!(ev.start_state, State::Unconfigured);
        assert_eq!(ev.goal_state, State::Inactive);
    }

    #[test]
    fn failure_reverts_and_reports_callback_failure() {
        let mut node = LifecycleNode::new("test_node").unwrap();
        node.register_callback(Hook::Configure, || CallbackResult::Failure);

        let err = node.execute_transition(Transition::Configure).unwrap_err();
        assert_eq!(err.kind, ErrorKind::CallbackFailure);
        assert_eq!(node.state(), State::Unconfigured);
    }

    #[test]
    fn error_without_hook_finalizes() {
        let mut node = LifecycleNode::new("test_node").unwrap();
        node.register_callback(Hook::Configure, || CallbackResult::Error);

        let err = node.execute_transition(Transition::Configure).unwrap_err();
        assert_eq!(err.kind, ErrorKind::CallbackError);
        assert_eq!(node.state(), State::Finalized);
    }

    #[test]
    fn error_with_successful_hook_resets_to_unconfigured() {
        let mut node = LifecycleNode::new("test_node").unwrap();
        node.execute_transition(Transition::Configure).unwrap();

        node.register_callback(Hook::Activate, || CallbackResult::Error);
        node.register_callback(Hook::ErrorProcessing, || CallbackResult::Success);

        let err = node.execute_transition(Transition::Activate).unwrap_err();
        assert_eq!(err.kind, ErrorKind::CallbackError);
        assert_eq!(node.state(), State::Unconfigured);
        assert!(!node.activation_gate().is_active());
    }

    #[test]
    fn finalized_rejects_everything_forever() {
        let mut node = LifecycleNode::new("test_node").unwrap();
        node.execute_transition(Transition::Shutdown).unwrap();
        assert_eq!(node.state(), State::Finalized);

        for _ in 0..3 {
            for via in [
                Transition::Configure,
                Transition::Cleanup,
                Transition::Activate,
                Transition::Deactivate,
                Transition::Shutdown,
            ] {
                let err = node.execute_transition(via).unwrap_err();
                assert_eq!(err.kind, ErrorKind::AlreadyFinalized);
                assert_eq!(node.state(), State::Finalized);
            }
        }
    }

    #[test]
    fn invalid_transition_leaves_state_untouched() {
        let mut node = LifecycleNode::new("test_node").unwrap();

        let err = node.execute_transition(Transition::Activate).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidTransition);
        assert_eq!(node.state(), State::Unconfigured);
        assert_eq!(node.available_transitions().len(), 2);
    }

    #[test]
    fn panicking_handler_is_treated_as_error() {
        let mut node = LifecycleNode::new("test_node").unwrap();
        node.register_callback(Hook::Configure, || panic!("handler fault"));

        let err = node.execute_transition(Transition::Configure).unwrap_err();
        assert_eq!(err.kind, ErrorKind::CallbackError);
        assert_eq!(node.state(), State::Finalized);
    }

    #[test]
    fn panicking_handler_can_still_recover_through_error_hook() {
        let mut node = LifecycleNode::new("test_node").unwrap();
        node.register_callback(Hook::Configure, || panic!("handler fault"));
        node.register_callback(Hook::ErrorProcessing, || CallbackResult::Success);

        node.execute_transition(Transition::Configure).unwrap_err();
        assert_eq!(node.state(), State::Unconfigured);
    }

    #[test]
    fn shutdown_failure_still_finalizes() {
        let mut node = LifecycleNode::new("test_node").unwrap();
        node.register_callback(Hook::Shutdown, || CallbackResult::Failure);

        let err = node.execute_transition(Transition::Shutdown).unwrap_err();
        assert_eq!(err.kind, ErrorKind::CallbackFailure);
        assert_eq!(node.state(), State::Finalized);
    }
}

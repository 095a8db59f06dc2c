use lifekit_core::lifecycle::{CallbackResult, Transition};

/// Callback slot identifier: one per user-invocable transition, plus the
/// implicit error-processing hook entered when a handler reports `Error`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Hook {
    Configure,
    Cleanup,
    Activate,
    Deactivate,
    Shutdown,
    ErrorProcessing,
}

impl Hook {
    pub(crate) const COUNT: usize = 6;

    const fn index(self) -> usize {
        match self {
            Hook::Configure => 0,
            Hook::Cleanup => 1,
            Hook::Activate => 2,
            Hook::Deactivate => 3,
            Hook::Shutdown => 4,
            Hook::ErrorProcessing => 5,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Hook::Configure => "on_configure",
            Hook::Cleanup => "on_cleanup",
            Hook::Activate => "on_activate",
            Hook::Deactivate => "on_deactivate",
            Hook::Shutdown => "on_shutdown",
            Hook::ErrorProcessing => "on_error",
        }
    }
}

impl From<Transition> for Hook {
    fn from(via: Transition) -> Self {
        match via {
            Transition::Configure => Hook::Configure,
            Transition::Cleanup => Hook::Cleanup,
            Transition::Activate => Hook::Activate,
            Transition::Deactivate => Hook::Deactivate,
            Transition::Shutdown => Hook::Shutdown,
        }
    }
}

/// A transition handler. Handlers own their resources and decide what
/// Success/Failure/Error means for their component.
pub type TransitionHandler = Box<dyn FnMut() -> CallbackResult + Send>;

/// Per-transition callback storage.
///
/// Replaces the one-overridable-method-per-transition pattern with a uniform
/// handler slot per `Hook`. Registration is last-write-wins; an empty slot
/// behaves as a no-op handler returning `Success`.
///
/// The registry does not validate handler side effects; resource
/// acquisition/release inside a handler is the handler author's concern.
#[derive(Default)]
pub struct CallbackRegistry {
    handlers: [Option<TransitionHandler>; Hook::COUNT],
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self {
            handlers: std::array::from_fn(|_| None),
        }
    }

    /// Install `handler` for `hook`, replacing any existing handler.
    pub fn register(&mut self, hook: Hook, handler: TransitionHandler) {
        self.handlers[hook.index()] = Some(handler);
    }

    /// Remove the handler for `hook`. Returns whether one was installed.
    pub fn unregister(&mut self, hook: Hook) -> bool {
        self.handlers[hook.index()].take().is_some()
    }

    pub fn is_registered(&self, hook: Hook) -> bool {
        self.handlers[hook.index()].is_some()
    }

    /// Invoke the handler for `hook`; absent handlers succeed.
    pub fn invoke(&mut self, hook: Hook) -> CallbackResult {
        self.invoke_or(hook, CallbackResult::Success)
    }

    /// Invoke the handler for `hook`, returning `default` when none is
    /// installed. The error-processing path uses `Failure` as its default so
    /// that an unhandled error finalizes the component.
    pub fn invoke_or(&mut self, hook: Hook, default: CallbackResult) -> CallbackResult {
        match &mut self.handlers[hook.index()] {
            Some(handler) => handler(),
            None => default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_handler_defaults_to_success() {
        let mut registry = CallbackRegistry::new();
        assert_eq!(registry.invoke(Hook::Configure), CallbackResult::Success);
        assert_eq!(
            registry.invoke_or(Hook::ErrorProcessing, CallbackResult::Failure),
            CallbackResult::Failure
        );
    }

    #[test]
    fn last_registration_wins() {
        let mut registry = CallbackRegistry::new();
        registry.register(Hook::Activate, Box::new(|| CallbackResult::Failure));
        registry.register(Hook::Activate, Box::new(|| CallbackResult::Error));

        assert_eq!(registry.invoke(Hook::Activate), CallbackResult::Error);
    }

    #[test]
    fn unregister_restores_default() {
        let mut registry = CallbackRegistry::new();
        registry.register(Hook::Cleanup, Box::new(|| CallbackResult::Failure));
        assert!(registry.is_registered(Hook::Cleanup));

        assert!(registry.unregister(Hook::Cleanup));
        assert!(!registry.unregister(Hook::Cleanup));
        assert_eq!(registry.invoke(Hook::Cleanup), CallbackResult::Success);
    }

    #[test]
    fn handlers_may_mutate_captured_state() {
        let mut registry = CallbackRegistry::new();
        let mut calls = 0u32;
        // Count invocations through a move closure; stateful handlers are the
        // normal case (they own component resources).
        registry.register(
            Hook::Configure,
            Box::new(move || {
                calls += 1;
                if calls > 1 {
                    CallbackResult::Failure
                } else {
                    CallbackResult::Success
                }
            }),
        );

        assert_eq!(registry.invoke(Hook::Configure), CallbackResult::Success);
        assert_eq!(registry.invoke(Hook::Configure), CallbackResult::Failure);
    }
}

use lifekit_core::lifecycle::ActivationGate;

/// Execute a closure only when the lifecycle gate is active.
///
/// Intended for timer/subscription wrappers:
/// - return `true` if executed
/// - return `false` if suppressed
pub fn run_if_active<F>(gate: &ActivationGate, f: F) -> bool
where
    F: FnOnce(),
{
    if gate.is_active() {
        f();
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suppressed_until_activated() {
        let gate = ActivationGate::new();
        let mut ran = false;

        assert!(!run_if_active(&gate, || ran = true));
        assert!(!ran);

        gate.activate();
        assert!(run_if_active(&gate, || ran = true));
        assert!(ran);
    }
}

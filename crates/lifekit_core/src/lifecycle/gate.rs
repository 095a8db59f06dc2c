use std::sync::atomic::{AtomicBool, Ordering};

/// Activation gate for managed resources.
///
/// Intended use (node layer):
/// - `activate()` when state becomes Active
/// - `deactivate()` when leaving Active
/// - timer/subscription wrappers check `is_active()` to allow or skip work
///
/// Reads are best-effort: a tick may observe a stale value just after a
/// transition, which is acceptable for gating.
#[derive(Debug)]
pub struct ActivationGate {
    active: AtomicBool,
}

impl ActivationGate {
    pub const fn new() -> Self {
        Self {
            active: AtomicBool::new(false),
        }
    }

    pub fn activate(&self) {
        self.active.store(true, Ordering::Release);
    }

    pub fn deactivate(&self) {
        self.active.store(false, Ordering::Release);
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

impl Default for ActivationGate {
    fn default() -> Self {
        Self::new()
    }
}

use std::fmt;

/// User-invocable lifecycle transitions.
///
/// The implicit success/failure/error resolutions are modeled by
/// `finish(intermediate, via, CallbackResult)`, not as separate variants.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Transition {
    Configure,
    Cleanup,
    Activate,
    Deactivate,
    Shutdown,
}

/// Compact IDs used for error payloads and introspection.
impl Transition {
    pub const fn id(self) -> u8 {
        match self {
            Transition::Configure => 1,
            Transition::Cleanup => 2,
            Transition::Activate => 3,
            Transition::Deactivate => 4,
            Transition::Shutdown => 5,
        }
    }

    /// Stable, human-readable label for logs and event consumers.
    pub const fn label(self) -> &'static str {
        match self {
            Transition::Configure => "configure",
            Transition::Cleanup => "cleanup",
            Transition::Activate => "activate",
            Transition::Deactivate => "deactivate",
            Transition::Shutdown => "shutdown",
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

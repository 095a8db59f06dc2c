use std::fmt;

/// Lifecycle states: primary (stable) plus transition (intermediate).
///
/// Primary states are the only ones a component rests in between transitions:
/// - Unconfigured, Inactive, Active, Finalized
///
/// Transition states are occupied only while a transition callback runs:
/// - Configuring, CleaningUp, Activating, Deactivating, ShuttingDown, ErrorProcessing
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum State {
    // Primary
    Unconfigured,
    Inactive,
    Active,
    Finalized,

    // Transition (intermediate)
    Configuring,
    CleaningUp,
    Activating,
    Deactivating,
    ShuttingDown,
    ErrorProcessing,
}

/// Compact IDs used for error payloads and introspection.
///
/// These are lifekit-internal identifiers, stable across releases.
impl State {
    pub const fn id(self) -> u8 {
        match self {
            // Primary
            State::Unconfigured => 0,
            State::Inactive => 1,
            State::Active => 2,
            State::Finalized => 3,

            // Transition
            State::Configuring => 10,
            State::CleaningUp => 11,
            State::Activating => 12,
            State::Deactivating => 13,
            State::ShuttingDown => 14,
            State::ErrorProcessing => 15,
        }
    }

    /// True for stable (externally targetable) states.
    pub const fn is_primary(self) -> bool {
        matches!(
            self,
            State::Unconfigured | State::Inactive | State::Active | State::Finalized
        )
    }

    /// True for intermediate states entered while callbacks are running.
    pub const fn is_transitioning(self) -> bool {
        !self.is_primary()
    }

    /// True once no further transitions are possible.
    pub const fn is_terminal(self) -> bool {
        matches!(self, State::Finalized)
    }

    /// Stable, human-readable label for logs and event consumers.
    pub const fn label(self) -> &'static str {
        match self {
            State::Unconfigured => "Unconfigured",
            State::Inactive => "Inactive",
            State::Active => "Active",
            State::Finalized => "Finalized",
            State::Configuring => "Configuring",
            State::CleaningUp => "CleaningUp",
            State::Activating => "Activating",
            State::Deactivating => "Deactivating",
            State::ShuttingDown => "ShuttingDown",
            State::ErrorProcessing => "ErrorProcessing",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Canonical list of all lifecycle states (primary + transition).
pub const ALL_STATES: [State; 10] = [
    State::Unconfigured,
    State::Inactive,
    State::Active,
    State::Finalized,
    State::Configuring,
    State::CleaningUp,
    State::Activating,
    State::Deactivating,
    State::ShuttingDown,
    State::ErrorProcessing,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_and_transitioning_partition_all_states() {
        for state in ALL_STATES {
            assert_ne!(state.is_primary(), state.is_transitioning());
        }
        assert!(State::Finalized.is_terminal());
        assert!(!State::ShuttingDown.is_terminal());
    }

    #[test]
    fn ids_are_unique() {
        for a in ALL_STATES {
            for b in ALL_STATES {
                if a != b {
                    assert_ne!(a.id(), b.id());
                }
            }
        }
    }
}

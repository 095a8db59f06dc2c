use crate::error::{CoreError, Result};

use super::{State, Transition};

/// Result of executing a lifecycle transition callback.
///
/// - Success: proceed to the expected goal state
/// - Failure: remain in / revert to the previous stable state
/// - Error: enter `ErrorProcessing`
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CallbackResult {
    Success,
    Failure,
    Error,
}

/// Begin a lifecycle transition by moving from a **stable** state into the
/// correct **intermediate** state.
///
/// This enforces:
/// - which transitions are allowed from which states
/// - that you cannot start a new transition while already transitioning
pub fn begin(current: State, via: Transition) -> Result<State> {
    use State::*;
    use Transition::*;

    let next = match (current, via) {
        (Unconfigured, Configure) => Configuring,
        (Inactive, Cleanup) => CleaningUp,
        (Inactive, Activate) => Activating,
        (Active, Deactivate) => Deactivating,

        // Shutdown can start from any stable non-final state
        (Unconfigured | Inactive | Active, Shutdown) => ShuttingDown,

        _ => {
            return Err(CoreError::invalid_transition_lifecycle(
                current.id(),
                via.id(),
            ));
        }
    };

    Ok(next)
}

/// Finish a lifecycle transition by exiting an **intermediate** state to a
/// **stable** state (or `ErrorProcessing`), based on callback outcome.
///
/// Failure always resolves to the pre-transition stable state, except for
/// shutdown: shutdown terminates regardless of callback outcome.
pub fn finish(intermediate: State, via: Transition, result: CallbackResult) -> Result<State> {
    use CallbackResult::*;
    use State::*;
    use Transition::*;

    let next = match (intermediate, via, result) {
        // Configure: Unconfigured -> Configuring -> (Inactive | Unconfigured | ErrorProcessing)
        (Configuring, Configure, Success) => Inactive,
        (Configuring, Configure, Failure) => Unconfigured,
        (Configuring, Configure, Error) => ErrorProcessing,

        // Cleanup: Inactive -> CleaningUp -> (Unconfigured | Inactive | ErrorProcessing)
        (CleaningUp, Cleanup, Success) => Unconfigured,
        (CleaningUp, Cleanup, Failure) => Inactive,
        (CleaningUp, Cleanup, Error) => ErrorProcessing,

        // Activate: Inactive -> Activating -> (Active | Inactive | ErrorProcessing)
        (Activating, Activate, Success) => Active,
        (Activating, Activate, Failure) => Inactive,
        (Activating, Activate, Error) => ErrorProcessing,

        // Deactivate: Active -> Deactivating -> (Inactive | Active | ErrorProcessing)
        (Deactivating, Deactivate, Success) => Inactive,
        (Deactivating, Deactivate, Failure) => Active,
        (Deactivating, Deactivate, Error) => ErrorProcessing,

        // Shutdown: * -> ShuttingDown -> Finalized, whatever the callback said.
        (ShuttingDown, Shutdown, _) => Finalized,

        _ => {
            return Err(CoreError::invalid_transition_lifecycle(
                intermediate.id(),
                via.id(),
            ));
        }
    };

    Ok(next)
}

/// Finish a transition, resolving `ErrorProcessing` with the error-hook outcome.
///
/// `on_error` is the result of the error-processing hook, or `None` when no
/// hook is registered. Recovery rules:
/// - Success -> Unconfigured (full reset)
/// - Failure / Error / no hook -> Finalized
pub fn finish_with_error_handling(
    intermediate: State,
    via: Transition,
    result: CallbackResult,
    on_error: Option<CallbackResult>,
) -> Result<State> {
    let resolved = finish(intermediate, via, result)?;

    if resolved != State::ErrorProcessing {
        return Ok(resolved);
    }

    Ok(match on_error {
        Some(CallbackResult::Success) => State::Unconfigured,
        Some(CallbackResult::Failure) | Some(CallbackResult::Error) | None => State::Finalized,
    })
}

/// Get the expected goal state when a transition succeeds.
pub fn goal_state_for_transition(start: State, transition: Transition) -> Result<State> {
    let intermediate = begin(start, transition)?;
    finish(intermediate, transition, CallbackResult::Success)
}

/// Get the list of transitions invocable from a given state.
///
/// Supports lifecycle-manager introspection.
///
/// Design:
/// - For transition states (busy) and Finalized, returns empty: external
///   transition requests are rejected there.
pub fn available_transitions(state: State) -> &'static [Transition] {
    use State::*;
    use Transition::*;

    match state {
        Unconfigured => &[Configure, Shutdown],
        Inactive => &[Activate, Cleanup, Shutdown],
        Active => &[Deactivate, Shutdown],
        Finalized => &[],
        // Transition states: no external transitions while busy
        Configuring | CleaningUp | Activating | Deactivating | ShuttingDown | ErrorProcessing => {
            &[]
        }
    }
}

//
// Tests
//

//! lifekit_core::lifecycle
//!
//! Pure managed-lifecycle semantics. This module intentionally contains **no**
//! runtime or transport code.
//!
//! Key ideas:
//! - Stable states + transition (intermediate) states
//! - Explicit transition pipeline: `begin()` -> callback -> `finish()`
//! - Error path enters `ErrorProcessing`, then the error hook decides recovery
//! - The node layer owns callbacks, gating policy, and event publication

mod engine;
mod gate;
mod graph;
mod state;
mod transition;

pub use engine::{
    available_transitions, begin, finish, finish_with_error_handling,
    goal_state_for_transition, CallbackResult,
};
pub use gate::ActivationGate;
pub use graph::{transition_graph, TransitionEdge, TransitionGraph};
pub use state::{State, ALL_STATES};
pub use transition::Transition;

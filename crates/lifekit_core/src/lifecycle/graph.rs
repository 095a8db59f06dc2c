use crate::error::Result;

use super::{available_transitions, goal_state_for_transition, State, Transition, ALL_STATES};

/// Introspectable view of the lifecycle: every state, plus one edge per
/// externally invocable (state, transition) pair and its success target.
///
/// Derived from the engine tables at call time, so graph and engine cannot
/// drift apart.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TransitionGraph {
    pub states: Vec<State>,
    pub edges: Vec<TransitionEdge>,
}

/// One directed edge: invoking `via` from `start` succeeds into `goal`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TransitionEdge {
    pub start: State,
    pub via: Transition,
    pub goal: State,
}

impl TransitionGraph {
    /// Edges leaving `state`. Empty for transient states and Finalized.
    pub fn edges_from(&self, state: State) -> impl Iterator<Item = &TransitionEdge> {
        self.edges.iter().filter(move |edge| edge.start == state)
    }
}

/// Build the lifecycle graph from the engine's availability and goal tables.
pub fn transition_graph() -> Result<TransitionGraph> {
    let mut edges = Vec::new();
    for start in ALL_STATES {
        for &via in available_transitions(start) {
            edges.push(TransitionEdge {
                start,
                via,
                goal: goal_state_for_transition(start, via)?,
            });
        }
    }

    Ok(TransitionGraph {
        states: ALL_STATES.to_vec(),
        edges,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_set_is_exactly_the_transition_table() {
        let graph = transition_graph().unwrap();
        assert_eq!(graph.states, ALL_STATES.to_vec());

        let expected = [
            TransitionEdge {
                start: State::Unconfigured,
                via: Transition::Configure,
                goal: State::Inactive,
            },
            TransitionEdge {
                start: State::Unconfigured,
                via: Transition::Shutdown,
                goal: State::Finalized,
            },
            TransitionEdge {
                start: State::Inactive,
                via: Transition::Activate,
                goal: State::Active,
            },
            TransitionEdge {
                start: State::Inactive,
                via: Transition::Cleanup,
                goal: State::Unconfigured,
            },
            TransitionEdge {
                start: State::Inactive,
                via: Transition::Shutdown,
                goal: State::Finalized,
            },
            TransitionEdge {
                start: State::Active,
                via: Transition::Deactivate,
                goal: State::Inactive,
            },
            TransitionEdge {
                start: State::Active,
                via: Transition::Shutdown,
                goal: State::Finalized,
            },
        ];

        assert_eq!(graph.edges, expected.to_vec());
    }

    #[test]
    fn transient_states_and_finalized_have_no_outgoing_edges() {
        let graph = transition_graph().unwrap();

        for state in ALL_STATES {
            if state.is_transitioning() || state.is_terminal() {
                assert_eq!(graph.edges_from(state).count(), 0, "unexpected edge from {state}");
            } else {
                assert!(graph.edges_from(state).count() > 0);
            }
        }
    }
}

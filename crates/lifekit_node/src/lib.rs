//! lifekit_node
//!
//! Component layer on top of `lifekit_core`: lifecycle nodes with per-transition
//! callback registration, transition-event notification, and state-gated
//! resources (timers, subscriptions).
//!
//! Transport and process bootstrap stay outside this crate; the transition
//! event stream is the seam a transport adapter consumes.

pub mod error;

// Per-transition callback storage.
mod registry;
pub use registry::{CallbackRegistry, Hook, TransitionHandler};

// Transition events + local/remote notification.
mod events;
pub use events::{SubscriptionHandle, TransitionEvent, TransitionNotifier, TransitionObserver};

// Periodic timers on the tokio runtime, optionally gated.
mod timer;
pub use timer::TimerHandle;

// Inbound message handling gated on activation.
mod subscription;
pub use subscription::ManagedSubscription;

// Observing another component's transition stream.
mod listener;
pub use listener::{log_transitions, watch_transitions};

// Utility functions for gated execution.
mod util;
pub use util::run_if_active;

// The lifecycle node itself.
mod node;
pub use node::LifecycleNode;

// Re-export core types that node users will commonly need.
pub use lifekit_core::error::{CoreError, ErrorKind, Result};
pub use lifekit_core::lifecycle::{ActivationGate, CallbackResult, State, Transition};

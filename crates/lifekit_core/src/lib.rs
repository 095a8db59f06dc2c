//! lifekit_core: transport-agnostic core of the managed component lifecycle.
//!
//! Design goals:
//! - Pure, testable logic (no runtime or transport deps).
//! - Explicit types; no macro wizardry.
//! - Small, stable public API surface.

pub mod error;

/// Lifecycle state machine, transition pipeline, activation gate.
pub mod lifecycle;

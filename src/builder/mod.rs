//! Builder API for machine construction.
//!
//! Builders are the only way to assemble a machine. Each registration call
//! validates immediately and returns a [`BuildError`] on misuse, so a finished
//! machine is always structurally valid and frozen.

pub mod error;
pub mod finite;
pub mod hierarchical;

pub use error::BuildError;
pub use finite::FiniteStateMachineBuilder;
pub use hierarchical::HierarchicalStateMachineBuilder;

//! Errors raised while assembling machines and executors.
//!
//! These all indicate a programming error in how a machine or executor was
//! put together. Runtime transition failures are never reported here; they
//! surface as a `false` return instead.

use thiserror::Error;

/// Errors that can occur when building machines or registering transitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Already has a state with id '{id}'")]
    DuplicateState { id: String },

    #[error("State '{parent}' must be registered before assigning a child to it")]
    UnknownParent { parent: String },

    #[error("The child node already has a parent")]
    NodeAlreadyHasParent,

    #[error("Attaching the node would create a cycle")]
    CircularDependency,

    #[error("Already contains the transition from '{from}' to '{to}'")]
    DuplicateTransition { from: String, to: String },

    #[error("Trigger '{trigger}' already has a transition from state '{from}'")]
    DuplicateTrigger { trigger: String, from: String },
}

impl BuildError {
    pub(crate) fn duplicate_state(id: &impl std::fmt::Debug) -> Self {
        BuildError::DuplicateState {
            id: format!("{id:?}"),
        }
    }

    pub(crate) fn unknown_parent(parent: &impl std::fmt::Debug) -> Self {
        BuildError::UnknownParent {
            parent: format!("{parent:?}"),
        }
    }

    pub(crate) fn duplicate_transition(
        from: &impl std::fmt::Debug,
        to: &impl std::fmt::Debug,
    ) -> Self {
        BuildError::DuplicateTransition {
            from: format!("{from:?}"),
            to: format!("{to:?}"),
        }
    }

    pub(crate) fn duplicate_trigger(
        trigger: &impl std::fmt::Debug,
        from: &impl std::fmt::Debug,
    ) -> Self {
        BuildError::DuplicateTrigger {
            trigger: format!("{trigger:?}"),
            from: format!("{from:?}"),
        }
    }
}

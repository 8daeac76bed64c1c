//! Builder for flat state machines.

use crate::builder::error::BuildError;
use crate::core::State;
use crate::finite::FiniteStateMachine;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Builder for constructing flat state machines with a fluent API.
pub struct FiniteStateMachineBuilder<Id, S> {
    ids: Vec<Id>,
    states: Vec<S>,
    index: HashMap<Id, usize>,
}

impl<Id, S> FiniteStateMachineBuilder<Id, S>
where
    Id: Eq + Hash + Clone + Debug,
    S: State,
{
    pub fn new() -> Self {
        Self {
            ids: Vec::new(),
            states: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a state. Returns an error if `id` is already taken.
    pub fn add_state(mut self, id: Id, state: S) -> Result<Self, BuildError> {
        if self.index.contains_key(&id) {
            return Err(BuildError::duplicate_state(&id));
        }

        self.index.insert(id.clone(), self.states.len());
        self.ids.push(id);
        self.states.push(state);
        Ok(self)
    }

    pub fn has_state(&self, id: &Id) -> bool {
        self.index.contains_key(id)
    }

    pub fn build(self) -> FiniteStateMachine<Id, S> {
        FiniteStateMachine::from_parts(self.ids, self.states, self.index)
    }
}

impl<Id, S> Default for FiniteStateMachineBuilder<Id, S>
where
    Id: Eq + Hash + Clone + Debug,
    S: State,
{
    fn default() -> Self {
        Self::new()
    }
}

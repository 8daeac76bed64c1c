//! Flat finite state machine.
//!
//! Exactly one state is active at a time. Changing state exits the current
//! state, if any, and enters the new one.
//!
//! # Example
//!
//! ```rust
//! use statecore::core::FnState;
//! use statecore::finite::FiniteStateMachine;
//!
//! # fn main() -> Result<(), statecore::builder::BuildError> {
//! let mut machine = FiniteStateMachine::builder()
//!     .add_state("idle", FnState::noop())?
//!     .add_state("run", FnState::noop())?
//!     .build();
//!
//! assert!(machine.change_state(&"idle"));
//! assert!(machine.change_state(&"run"));
//! assert_eq!(machine.previous_state_id(), Some(&"idle"));
//! assert_eq!(machine.active_state_id(), Some(&"run"));
//! # Ok(())
//! # }
//! ```

use crate::builder::FiniteStateMachineBuilder;
use crate::core::{
    Listener, ListenerId, Listeners, ReadOnlyStateMachine, State, StateChange, StateMachine,
    StateSwitcher,
};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use tracing::{debug, trace};

/// Map of id to state with a single active slot.
pub struct FiniteStateMachine<Id, S> {
    ids: Vec<Id>,
    states: Vec<S>,
    index: HashMap<Id, usize>,
    // Slot whose `enter` has returned and whose `exit` has not started.
    active: Option<usize>,
    previous_id: Option<Id>,
    listeners: Listeners<Id>,
}

impl<Id, S> FiniteStateMachine<Id, S>
where
    Id: Eq + Hash + Clone + Debug,
    S: State,
{
    /// Start building an empty machine.
    pub fn builder() -> FiniteStateMachineBuilder<Id, S> {
        FiniteStateMachineBuilder::new()
    }

    pub(crate) fn from_parts(ids: Vec<Id>, states: Vec<S>, index: HashMap<Id, usize>) -> Self {
        Self {
            ids,
            states,
            index,
            active: None,
            previous_id: None,
            listeners: Listeners::new(),
        }
    }

    /// State active before the last completed change.
    pub fn previous_state_id(&self) -> Option<&Id> {
        self.previous_id.as_ref()
    }

    /// Active state, `None` before the first change.
    pub fn active_state_id(&self) -> Option<&Id> {
        self.active.map(|slot| &self.ids[slot])
    }

    /// Every registered id in registration order.
    pub fn all_ids(&self) -> &[Id] {
        &self.ids
    }

    /// Number of registered states.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether no state was registered.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Whether `id` was registered.
    pub fn has_state(&self, id: &Id) -> bool {
        self.index.contains_key(id)
    }

    /// State registered under `id`.
    pub fn get_state(&self, id: &Id) -> Option<&S> {
        self.index.get(id).map(|&slot| &self.states[slot])
    }

    /// Mutable access to the state under `id`. Hooks are not run.
    pub fn get_state_mut(&mut self, id: &Id) -> Option<&mut S> {
        let slot = *self.index.get(id)?;
        Some(&mut self.states[slot])
    }

    /// State behind [`active_state_id`](Self::active_state_id).
    pub fn active_state(&self) -> Option<&S> {
        self.active.map(|slot| &self.states[slot])
    }

    /// Whether `id` is the active state.
    pub fn is_in_state(&self, id: &Id) -> bool {
        self.active.is_some() && self.active == self.index.get(id).copied()
    }

    /// Same as [`is_in_state`](Self::is_in_state); flat machines have no
    /// ancestors.
    pub fn is_active_state(&self, id: &Id) -> bool {
        self.is_in_state(id)
    }

    /// Exit the active state and enter `to`.
    ///
    /// Returns `false` without side effects if `to` is unknown or already
    /// active.
    ///
    /// # Panics
    ///
    /// A panicking hook propagates. A state whose `exit` started is no longer
    /// active, and a state only becomes active once its `enter` returns.
    pub fn change_state(&mut self, to: &Id) -> bool {
        let Some(&next) = self.index.get(to) else {
            trace!(state = ?to, "ignoring change to unknown state");
            return false;
        };

        if self.is_in_state(to) {
            trace!(state = ?to, "ignoring change to the active state");
            return false;
        }

        let from = FiniteStateMachine::active_state_id(self).cloned();
        if let Some(current) = self.active.take() {
            self.states[current].exit();
        }
        self.states[next].enter();

        self.active = Some(next);
        self.previous_id = from;
        debug!(from = ?self.previous_id, to = ?to, "state changed");

        self.listeners.notify(self.previous_id.as_ref(), to);
        true
    }

    /// Register a listener called after every successful change.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&StateChange<'_, Id>) + 'static,
    {
        self.listeners.subscribe(listener)
    }

    /// Remove a listener. Returns `false` if it was already removed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }
}

impl<Id, S> ReadOnlyStateMachine<Id> for FiniteStateMachine<Id, S>
where
    Id: Eq + Hash + Clone + Debug,
    S: State,
{
    fn previous_state_id(&self) -> Option<Id> {
        self.previous_id.clone()
    }

    fn active_state_id(&self) -> Option<Id> {
        FiniteStateMachine::active_state_id(self).cloned()
    }

    fn all_ids(&self) -> Vec<Id> {
        self.ids.clone()
    }

    fn has_state(&self, id: &Id) -> bool {
        FiniteStateMachine::has_state(self, id)
    }

    fn is_in_state(&self, id: &Id) -> bool {
        FiniteStateMachine::is_in_state(self, id)
    }

    fn is_active_state(&self, id: &Id) -> bool {
        FiniteStateMachine::is_active_state(self, id)
    }
}

impl<Id, S> StateSwitcher<Id> for FiniteStateMachine<Id, S>
where
    Id: Eq + Hash + Clone + Debug,
    S: State,
{
    fn change_state(&mut self, to: &Id) -> bool {
        FiniteStateMachine::change_state(self, to)
    }

    fn subscribe(&mut self, listener: Listener<Id>) -> ListenerId {
        self.listeners.subscribe_boxed(listener)
    }

    fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }
}

impl<Id, S> StateMachine<Id, S> for FiniteStateMachine<Id, S>
where
    Id: Eq + Hash + Clone + Debug,
    S: State,
{
    fn get_state(&self, id: &Id) -> Option<&S> {
        FiniteStateMachine::get_state(self, id)
    }

    fn get_state_mut(&mut self, id: &Id) -> Option<&mut S> {
        FiniteStateMachine::get_state_mut(self, id)
    }
}

impl<Id: Debug, S> Debug for FiniteStateMachine<Id, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FiniteStateMachine")
            .field("ids", &self.ids)
            .field("previous", &self.previous_id)
            .field("active", &self.active.map(|slot| &self.ids[slot]))
            .finish_non_exhaustive()
    }
}

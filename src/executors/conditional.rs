//! Polling executor for condition-guarded transitions.

use crate::builder::BuildError;
use crate::core::{Condition, StateSwitcher, Transition};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use tracing::{debug, trace};

struct ConditionalTransition<Id> {
    transition: Transition<Id>,
    condition: Condition,
}

struct TransitionList<Id> {
    source: Id,
    entries: Vec<ConditionalTransition<Id>>,
}

/// Fires the first transition whose condition holds for the active state.
///
/// Call [`tick`](Self::tick) once per scheduling step. Transitions are grouped
/// by source state. The list for the active state is cached between ticks and
/// refreshed only when the registrations change or the active state moves.
///
/// # Example
///
/// ```rust
/// use statecore::core::{FnState, Transition};
/// use statecore::executors::ConditionalTransitionExecutor;
/// use statecore::finite::FiniteStateMachine;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// # fn main() -> Result<(), statecore::builder::BuildError> {
/// let mut machine = FiniteStateMachine::builder()
///     .add_state("idle", FnState::noop())?
///     .add_state("run", FnState::noop())?
///     .build();
/// machine.change_state(&"idle");
///
/// let speed = Rc::new(Cell::new(0.0));
/// let observed = Rc::clone(&speed);
/// let mut executor = ConditionalTransitionExecutor::new(&mut machine);
/// executor.add(Transition::new("idle", "run"), move || observed.get() > 0.5)?;
///
/// assert!(!executor.tick());
/// speed.set(1.0);
/// assert!(executor.tick());
/// assert_eq!(machine.active_state_id(), Some(&"run"));
/// # Ok(())
/// # }
/// ```
pub struct ConditionalTransitionExecutor<Id, W> {
    switcher: W,
    lists: Vec<TransitionList<Id>>,
    sources: HashMap<Id, usize>,
    cached_state: Option<Id>,
    cached_slot: Option<usize>,
    dirty: bool,
}

impl<Id, W> ConditionalTransitionExecutor<Id, W>
where
    Id: Eq + Hash + Clone + Debug,
    W: StateSwitcher<Id>,
{
    /// Wrap a switcher. The executor drives it but does not own the states.
    pub fn new(switcher: W) -> Self {
        Self {
            switcher,
            lists: Vec::new(),
            sources: HashMap::new(),
            cached_state: None,
            cached_slot: None,
            dirty: true,
        }
    }

    /// Register `transition`, guarded by `condition`, after every transition
    /// already registered for the same source state.
    /// Returns an error if the same transition is already registered.
    pub fn add<F>(
        &mut self,
        transition: Transition<Id>,
        condition: F,
    ) -> Result<&mut Self, BuildError>
    where
        F: Fn() -> bool + 'static,
    {
        self.add_condition(transition, Condition::new(condition))
    }

    /// Same as [`add`](Self::add) with a prebuilt [`Condition`].
    pub fn add_condition(
        &mut self,
        transition: Transition<Id>,
        condition: Condition,
    ) -> Result<&mut Self, BuildError> {
        let entry = ConditionalTransition {
            transition,
            condition,
        };

        match self.sources.get(entry.transition.from()) {
            Some(&slot) => {
                let list = &mut self.lists[slot];
                if list.entries.iter().any(|e| e.transition == entry.transition) {
                    return Err(BuildError::duplicate_transition(
                        entry.transition.from(),
                        entry.transition.to(),
                    ));
                }
                list.entries.push(entry);
            }
            None => {
                let source = entry.transition.from().clone();
                self.sources.insert(source.clone(), self.lists.len());
                self.lists.push(TransitionList {
                    source,
                    entries: vec![entry],
                });
            }
        }

        self.dirty = true;
        Ok(self)
    }

    /// Unregister `transition`. Returns `false` if it was not registered.
    pub fn remove(&mut self, transition: &Transition<Id>) -> bool {
        self.dirty = true;

        let Some(&slot) = self.sources.get(transition.from()) else {
            return false;
        };

        let entries = &mut self.lists[slot].entries;
        let Some(position) = entries.iter().position(|e| &e.transition == transition) else {
            return false;
        };
        entries.remove(position);

        if entries.is_empty() {
            self.sources.remove(transition.from());
            self.lists.remove(slot);
            for later in self.sources.values_mut().filter(|later| **later > slot) {
                *later -= 1;
            }
        }

        true
    }

    /// Whether `transition` is registered, whatever its condition.
    pub fn has_transition(&self, transition: &Transition<Id>) -> bool {
        self.sources.get(transition.from()).is_some_and(|&slot| {
            self.lists[slot]
                .entries
                .iter()
                .any(|e| &e.transition == transition)
        })
    }

    /// Every registered transition, grouped by source state.
    pub fn get_transitions(&self) -> Vec<&Transition<Id>> {
        self.lists
            .iter()
            .flat_map(|list| list.entries.iter().map(|e| &e.transition))
            .collect()
    }

    /// Transitions leaving `from`, in registration order.
    pub fn get_transitions_from(&self, from: &Id) -> Vec<&Transition<Id>> {
        match self.sources.get(from) {
            Some(&slot) => self.lists[slot]
                .entries
                .iter()
                .map(|e| &e.transition)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Number of registered transitions.
    pub fn len(&self) -> usize {
        self.lists.iter().map(|list| list.entries.len()).sum()
    }

    /// Whether no transition is registered.
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Evaluate the conditions of the active state's transitions in
    /// registration order and fire the first that holds.
    ///
    /// At most one transition fires per tick. Returns whether the switcher
    /// changed state.
    pub fn tick(&mut self) -> bool {
        let stale = match &self.cached_state {
            Some(id) => !self.switcher.is_active_state(id),
            None => true,
        };

        if stale || self.dirty {
            self.cached_state = self.switcher.active_state_id();
            self.cached_slot = self
                .cached_state
                .as_ref()
                .and_then(|id| self.sources.get(id).copied());
            self.dirty = false;
        }

        let Some(slot) = self.cached_slot else {
            return false;
        };

        let Some(entry) = self.lists[slot].entries.iter().find(|e| e.condition.check()) else {
            trace!(state = ?self.cached_state, "no condition holds");
            return false;
        };

        debug!(
            from = ?entry.transition.from(),
            to = ?entry.transition.to(),
            "condition met"
        );
        self.switcher.change_state(entry.transition.to())
    }

    /// The driven switcher.
    pub fn switcher(&self) -> &W {
        &self.switcher
    }

    /// Mutable access to the switcher. Changing state through it is noticed
    /// on the next tick.
    pub fn switcher_mut(&mut self) -> &mut W {
        &mut self.switcher
    }

    /// Drop the registrations and hand the switcher back.
    pub fn into_inner(self) -> W {
        self.switcher
    }
}

impl<Id: Debug, W> Debug for ConditionalTransitionExecutor<Id, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConditionalTransitionExecutor")
            .field("sources", &self.lists.iter().map(|l| &l.source).collect::<Vec<_>>())
            .field("cached_state", &self.cached_state)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

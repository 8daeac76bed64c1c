//! Event-driven executor keyed by trigger values.

use crate::builder::BuildError;
use crate::core::{StateSwitcher, Transition};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use tracing::{debug, trace};

/// Fires transitions in response to discrete triggers.
///
/// Each trigger owns an ordered list of transitions with at most one
/// transition per source state, so [`execute`](Self::execute) is
/// deterministic.
///
/// # Example
///
/// ```rust
/// use statecore::core::{FnState, Transition};
/// use statecore::executors::TriggerTransitionExecutor;
/// use statecore::finite::FiniteStateMachine;
///
/// #[derive(Debug, PartialEq, Eq, Hash)]
/// enum Input {
///     Jump,
///     Land,
/// }
///
/// # fn main() -> Result<(), statecore::builder::BuildError> {
/// let mut machine = FiniteStateMachine::builder()
///     .add_state("ground", FnState::noop())?
///     .add_state("air", FnState::noop())?
///     .build();
/// machine.change_state(&"ground");
///
/// let mut executor = TriggerTransitionExecutor::new(&mut machine);
/// executor
///     .add(Transition::new("ground", "air"), Input::Jump)?
///     .add(Transition::new("air", "ground"), Input::Land)?;
///
/// assert!(!executor.execute(&Input::Land));
/// assert!(executor.execute(&Input::Jump));
/// assert_eq!(machine.active_state_id(), Some(&"air"));
/// # Ok(())
/// # }
/// ```
pub struct TriggerTransitionExecutor<T, Id, W> {
    switcher: W,
    transitions: HashMap<T, Vec<Transition<Id>>>,
}

impl<T, Id, W> TriggerTransitionExecutor<T, Id, W>
where
    T: Eq + Hash + Debug,
    Id: Eq + Hash + Clone + Debug,
    W: StateSwitcher<Id>,
{
    /// Wrap a switcher with no triggers registered.
    pub fn new(switcher: W) -> Self {
        Self {
            switcher,
            transitions: HashMap::new(),
        }
    }

    /// Every trigger with at least one registered transition.
    pub fn triggers(&self) -> impl Iterator<Item = &T> {
        self.transitions.keys()
    }

    /// Register `transition` under `trigger`.
    /// Returns an error if `trigger` already has a transition from the same
    /// source state.
    pub fn add(
        &mut self,
        transition: Transition<Id>,
        trigger: T,
    ) -> Result<&mut Self, BuildError> {
        if let Some(transitions) = self.transitions.get(&trigger) {
            if transitions.iter().any(|t| t.from() == transition.from()) {
                return Err(BuildError::duplicate_trigger(&trigger, transition.from()));
            }
        }

        self.transitions.entry(trigger).or_default().push(transition);
        Ok(self)
    }

    /// Unregister `transition` from `trigger`. Returns `false` if it was not
    /// registered there.
    pub fn remove(&mut self, transition: &Transition<Id>, trigger: &T) -> bool {
        let Some(transitions) = self.transitions.get_mut(trigger) else {
            return false;
        };

        let Some(position) = transitions.iter().position(|t| t == transition) else {
            return false;
        };
        transitions.remove(position);

        if transitions.is_empty() {
            self.transitions.remove(trigger);
        }
        true
    }

    /// Drop every transition registered under `trigger`.
    pub fn remove_trigger(&mut self, trigger: &T) -> bool {
        self.transitions.remove(trigger).is_some()
    }

    /// Transitions registered under `trigger`, in registration order.
    pub fn get_transitions(&self, trigger: &T) -> &[Transition<Id>] {
        self.transitions
            .get(trigger)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether `transition` is registered under any trigger.
    pub fn has_transition(&self, transition: &Transition<Id>) -> bool {
        self.transitions
            .values()
            .any(|transitions| transitions.contains(transition))
    }

    /// Fire the transition registered under `trigger` whose source is the
    /// active state. Returns whether the switcher changed state.
    pub fn execute(&mut self, trigger: &T) -> bool {
        let Some(transitions) = self.transitions.get(trigger) else {
            trace!(trigger = ?trigger, "unknown trigger");
            return false;
        };

        let Some(transition) = transitions
            .iter()
            .find(|t| self.switcher.is_active_state(t.from()))
        else {
            trace!(trigger = ?trigger, "no transition from the active state");
            return false;
        };

        debug!(
            trigger = ?trigger,
            from = ?transition.from(),
            to = ?transition.to(),
            "trigger fired"
        );
        self.switcher.change_state(transition.to())
    }

    /// The driven switcher.
    pub fn switcher(&self) -> &W {
        &self.switcher
    }

    /// Mutable access to the driven switcher.
    pub fn switcher_mut(&mut self) -> &mut W {
        &mut self.switcher
    }

    /// Drop the registrations and hand the switcher back.
    pub fn into_inner(self) -> W {
        self.switcher
    }
}

impl<T: Debug, Id: Debug, W> Debug for TriggerTransitionExecutor<T, Id, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriggerTransitionExecutor")
            .field("transitions", &self.transitions)
            .finish_non_exhaustive()
    }
}

//! Core State trait for state machine states.
//!
//! A state is a unit of behavior with two lifecycle hooks. Machines call
//! `enter` when the state becomes active and `exit` when it stops being
//! active. The state carries no identity of its own; ids are assigned when
//! the state is registered into a machine.

/// Trait for state machine states.
///
/// Hooks are infallible and run synchronously inside `change_state`. A hook
/// that panics unwinds out of the machine call. The machine then treats a
/// state as active only if its `enter` returned and its `exit` never started,
/// so no state is exited twice.
///
/// # Example
///
/// ```rust
/// use statecore::core::State;
///
/// struct Door {
///     open: bool,
/// }
///
/// impl State for Door {
///     fn enter(&mut self) {
///         self.open = true;
///     }
///
///     fn exit(&mut self) {
///         self.open = false;
///     }
/// }
///
/// let mut door = Door { open: false };
/// door.enter();
/// assert!(door.open);
/// door.exit();
/// assert!(!door.open);
/// ```
pub trait State {
    /// Called when the state becomes part of the active path.
    fn enter(&mut self);

    /// Called when the state leaves the active path.
    fn exit(&mut self);
}

impl<T: State + ?Sized> State for Box<T> {
    fn enter(&mut self) {
        (**self).enter();
    }

    fn exit(&mut self) {
        (**self).exit();
    }
}

/// State built from a pair of closures.
///
/// Useful when the host already has its behaviors as callables and does not
/// want a dedicated type per state.
///
/// ```rust
/// use statecore::core::{FnState, State};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let entered = Rc::new(Cell::new(0));
/// let counter = Rc::clone(&entered);
/// let mut state = FnState::new(move || counter.set(counter.get() + 1), || {});
///
/// state.enter();
/// assert_eq!(entered.get(), 1);
/// ```
pub struct FnState {
    on_enter: Box<dyn FnMut()>,
    on_exit: Box<dyn FnMut()>,
}

impl FnState {
    pub fn new<E, X>(on_enter: E, on_exit: X) -> Self
    where
        E: FnMut() + 'static,
        X: FnMut() + 'static,
    {
        Self {
            on_enter: Box::new(on_enter),
            on_exit: Box::new(on_exit),
        }
    }

    /// A state whose hooks do nothing.
    pub fn noop() -> Self {
        Self::new(|| {}, || {})
    }
}

impl State for FnState {
    fn enter(&mut self) {
        (self.on_enter)();
    }

    fn exit(&mut self) {
        (self.on_exit)();
    }
}

impl std::fmt::Debug for FnState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnState").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct CountingState {
        enters: usize,
        exits: usize,
    }

    impl State for CountingState {
        fn enter(&mut self) {
            self.enters += 1;
        }

        fn exit(&mut self) {
            self.exits += 1;
        }
    }

    #[test]
    fn hooks_mutate_state() {
        let mut state = CountingState::default();
        state.enter();
        state.enter();
        state.exit();

        assert_eq!(state.enters, 2);
        assert_eq!(state.exits, 1);
    }

    #[test]
    fn boxed_state_forwards_hooks() {
        let mut boxed: Box<CountingState> = Box::default();
        State::enter(&mut boxed);
        State::exit(&mut boxed);

        assert_eq!(boxed.enters, 1);
        assert_eq!(boxed.exits, 1);
    }

    #[test]
    fn fn_state_runs_closures_in_call_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let enter_log = Rc::clone(&log);
        let exit_log = Rc::clone(&log);
        let mut state = FnState::new(
            move || enter_log.borrow_mut().push("enter"),
            move || exit_log.borrow_mut().push("exit"),
        );

        state.enter();
        state.exit();
        state.enter();

        assert_eq!(*log.borrow(), vec!["enter", "exit", "enter"]);
    }

    #[test]
    fn dyn_states_can_be_mixed() {
        let mut states: Vec<Box<dyn State>> =
            vec![Box::new(CountingState::default()), Box::new(FnState::noop())];

        for state in states.iter_mut() {
            state.enter();
            state.exit();
        }
    }
}

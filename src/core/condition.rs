//! Predicates guarding conditional transitions.
//!
//! A condition is polled by the conditional executor each tick while its
//! source state is active. It captures whatever external data it needs.

/// Boolean predicate that decides whether a transition fires this tick.
///
/// # Example
///
/// ```rust
/// use statecore::core::Condition;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let stamina = Rc::new(Cell::new(10));
/// let observed = Rc::clone(&stamina);
/// let exhausted = Condition::new(move || observed.get() == 0);
///
/// assert!(!exhausted.check());
/// stamina.set(0);
/// assert!(exhausted.check());
/// ```
pub struct Condition {
    predicate: Box<dyn Fn() -> bool>,
}

impl Condition {
    /// Create a condition from a predicate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn() -> bool + 'static,
    {
        Condition {
            predicate: Box::new(predicate),
        }
    }

    /// Condition that holds on every tick.
    pub fn always() -> Self {
        Self::new(|| true)
    }

    /// Evaluate the predicate.
    pub fn check(&self) -> bool {
        (self.predicate)()
    }
}

impl std::fmt::Debug for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Condition").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn condition_reads_captured_state() {
        let flag = Rc::new(Cell::new(false));
        let observed = Rc::clone(&flag);
        let condition = Condition::new(move || observed.get());

        assert!(!condition.check());
        flag.set(true);
        assert!(condition.check());
    }

    #[test]
    fn always_holds() {
        assert!(Condition::always().check());
    }

    #[test]
    fn condition_is_evaluated_on_every_check() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let condition = Condition::new(move || {
            counter.set(counter.get() + 1);
            true
        });

        condition.check();
        condition.check();

        assert_eq!(calls.get(), 2);
    }
}

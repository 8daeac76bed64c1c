//! Transition executors.
//!
//! Executors decide *which* transition to take and hand the target to a
//! [`StateSwitcher`](crate::core::StateSwitcher). They work with either
//! machine kind:
//!
//! - [`ConditionalTransitionExecutor`] polls predicates once per `tick`
//! - [`TriggerTransitionExecutor`] reacts to discrete trigger values
//!
//! An executor holds whatever switcher handle it is given. Pass `&mut machine`
//! for a single executor, or clones of an `Rc<RefCell<machine>>` to let
//! several executors drive the same machine.

mod conditional;
mod trigger;

pub use conditional::ConditionalTransitionExecutor;
pub use trigger::TriggerTransitionExecutor;

//! Statecore: flat and hierarchical state machines
//!
//! Statecore models "exactly one active behavior at a time" with a
//! [`FiniteStateMachine`] and "nested behaviors along an active path" with a
//! [`HierarchicalStateMachine`]. Two executors sit on top of either machine
//! and decide when to change state.
//!
//! # Core Concepts
//!
//! - **State**: host behavior with `enter`/`exit` hooks via the `State` trait
//! - **Switcher**: the `StateSwitcher` contract both machines implement
//! - **Transition**: an immutable `(from, to)` pair of ids
//! - **Executors**: condition polling (`tick`) or trigger dispatch (`execute`)
//!
//! Everything runs synchronously on the caller's thread. Hooks and listeners
//! finish before `change_state`, `tick` or `execute` return.
//!
//! # Example
//!
//! ```rust
//! use statecore::{FnState, HierarchicalStateMachine, Transition, TriggerTransitionExecutor};
//!
//! #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
//! enum Pose {
//!     Root,
//!     Grounded,
//!     Walking,
//!     Crouching,
//!     Airborne,
//! }
//!
//! #[derive(Debug, PartialEq, Eq, Hash)]
//! enum Input {
//!     Jump,
//!     Crouch,
//! }
//!
//! # fn main() -> Result<(), statecore::BuildError> {
//! let mut machine = HierarchicalStateMachine::builder(Pose::Root, FnState::noop())
//!     .add_state(Pose::Root, Pose::Grounded, FnState::noop())?
//!     .add_state(Pose::Grounded, Pose::Walking, FnState::noop())?
//!     .add_state(Pose::Grounded, Pose::Crouching, FnState::noop())?
//!     .add_state(Pose::Root, Pose::Airborne, FnState::noop())?
//!     .build();
//! machine.change_state(&Pose::Walking);
//!
//! let mut input = TriggerTransitionExecutor::new(&mut machine);
//! input
//!     .add(Transition::new(Pose::Walking, Pose::Airborne), Input::Jump)?
//!     .add(Transition::new(Pose::Walking, Pose::Crouching), Input::Crouch)?;
//!
//! assert!(input.execute(&Input::Crouch));
//! assert!(!input.execute(&Input::Jump));
//!
//! assert!(machine.is_in_state(&Pose::Grounded));
//! assert!(machine.is_active_state(&Pose::Crouching));
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod core;
pub mod executors;
pub mod finite;
pub mod hierarchical;

// Re-export commonly used types
pub use builder::BuildError;
pub use crate::core::{
    Condition, FnState, ReadOnlyStateMachine, State, StateChange, StateMachine, StateSwitcher,
    Transition,
};
pub use executors::{ConditionalTransitionExecutor, TriggerTransitionExecutor};
pub use finite::FiniteStateMachine;
pub use hierarchical::HierarchicalStateMachine;

//! Core state machine types and contracts.
//!
//! This module contains the pieces every machine and executor share:
//! - The `State` trait with its `enter`/`exit` hooks
//! - `Transition` values and the `Condition` predicates that guard them
//! - The switcher contract (`ReadOnlyStateMachine`, `StateSwitcher`,
//!   `StateMachine`) that executors drive
//! - State-change notification

mod condition;
mod event;
mod state;
mod switcher;
mod transition;

pub use condition::Condition;
pub use event::{Listener, ListenerId, Listeners, StateChange};
pub use state::{FnState, State};
pub use switcher::{ReadOnlyStateMachine, StateMachine, StateSwitcher};
pub use transition::Transition;

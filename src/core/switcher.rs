//! The contract shared by every machine kind.
//!
//! Executors depend on [`StateSwitcher`], never on a concrete machine. Both
//! [`FiniteStateMachine`](crate::finite::FiniteStateMachine) and
//! [`HierarchicalStateMachine`](crate::hierarchical::HierarchicalStateMachine)
//! implement it, and so do `&mut M` and `Rc<RefCell<M>>` for any machine `M`,
//! which lets an executor borrow a machine or share it with other executors.

use super::event::{Listener, ListenerId};
use super::state::State;
use std::cell::RefCell;
use std::rc::Rc;

/// Read access to a machine's ids and activity.
///
/// Before the first successful `change_state`, `active_state_id` and
/// `previous_state_id` are `None` and every `is_in_state`/`is_active_state`
/// query returns `false`.
pub trait ReadOnlyStateMachine<Id> {
    /// Id that was active before the most recent change.
    fn previous_state_id(&self) -> Option<Id>;

    /// Id of the most specific active state.
    fn active_state_id(&self) -> Option<Id>;

    /// Every registered id, in registration order.
    fn all_ids(&self) -> Vec<Id>;

    fn has_state(&self, id: &Id) -> bool;

    /// Whether `id` is on the active path. For flat machines this is the
    /// same as [`is_active_state`](Self::is_active_state).
    fn is_in_state(&self, id: &Id) -> bool;

    /// Whether `id` is the most specific active state.
    fn is_active_state(&self, id: &Id) -> bool;
}

/// A machine that can be told to change state.
pub trait StateSwitcher<Id>: ReadOnlyStateMachine<Id> {
    /// Move to `to`. Returns `false`, with no hooks run and no listeners
    /// notified, if `to` is unknown or already the active state.
    fn change_state(&mut self, to: &Id) -> bool;

    /// Register a state-change listener.
    fn subscribe(&mut self, listener: Listener<Id>) -> ListenerId;

    /// Remove a listener. Returns `false` if it was not registered.
    fn unsubscribe(&mut self, id: ListenerId) -> bool;
}

/// A switcher that also exposes its states.
pub trait StateMachine<Id, S: State>: StateSwitcher<Id> {
    fn get_state(&self, id: &Id) -> Option<&S>;

    fn get_state_mut(&mut self, id: &Id) -> Option<&mut S>;
}

impl<Id, T> ReadOnlyStateMachine<Id> for &mut T
where
    T: ReadOnlyStateMachine<Id> + ?Sized,
{
    fn previous_state_id(&self) -> Option<Id> {
        (**self).previous_state_id()
    }

    fn active_state_id(&self) -> Option<Id> {
        (**self).active_state_id()
    }

    fn all_ids(&self) -> Vec<Id> {
        (**self).all_ids()
    }

    fn has_state(&self, id: &Id) -> bool {
        (**self).has_state(id)
    }

    fn is_in_state(&self, id: &Id) -> bool {
        (**self).is_in_state(id)
    }

    fn is_active_state(&self, id: &Id) -> bool {
        (**self).is_active_state(id)
    }
}

impl<Id, T> StateSwitcher<Id> for &mut T
where
    T: StateSwitcher<Id> + ?Sized,
{
    fn change_state(&mut self, to: &Id) -> bool {
        (**self).change_state(to)
    }

    fn subscribe(&mut self, listener: Listener<Id>) -> ListenerId {
        (**self).subscribe(listener)
    }

    fn unsubscribe(&mut self, id: ListenerId) -> bool {
        (**self).unsubscribe(id)
    }
}

// A shared handle borrows the machine for the duration of each call. Calling
// back into the same handle from a hook or listener panics on the RefCell.
impl<Id, T> ReadOnlyStateMachine<Id> for Rc<RefCell<T>>
where
    T: ReadOnlyStateMachine<Id> + ?Sized,
{
    fn previous_state_id(&self) -> Option<Id> {
        self.borrow().previous_state_id()
    }

    fn active_state_id(&self) -> Option<Id> {
        self.borrow().active_state_id()
    }

    fn all_ids(&self) -> Vec<Id> {
        self.borrow().all_ids()
    }

    fn has_state(&self, id: &Id) -> bool {
        self.borrow().has_state(id)
    }

    fn is_in_state(&self, id: &Id) -> bool {
        self.borrow().is_in_state(id)
    }

    fn is_active_state(&self, id: &Id) -> bool {
        self.borrow().is_active_state(id)
    }
}

impl<Id, T> StateSwitcher<Id> for Rc<RefCell<T>>
where
    T: StateSwitcher<Id> + ?Sized,
{
    fn change_state(&mut self, to: &Id) -> bool {
        self.borrow_mut().change_state(to)
    }

    fn subscribe(&mut self, listener: Listener<Id>) -> ListenerId {
        self.borrow_mut().subscribe(listener)
    }

    fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.borrow_mut().unsubscribe(id)
    }
}

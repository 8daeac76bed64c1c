//! Hierarchical state machine.
//!
//! States form a tree. The machine tracks the lowest active node; that node
//! and all of its ancestors make up the active path. Changing state exits the
//! old path up to the lowest common ancestor of the old and new nodes, then
//! enters the new path back down to the target. The common ancestor and
//! everything above it are left untouched.
//!
//! # Example
//!
//! ```rust
//! use statecore::core::FnState;
//! use statecore::hierarchical::HierarchicalStateMachine;
//!
//! # fn main() -> Result<(), statecore::builder::BuildError> {
//! let mut machine = HierarchicalStateMachine::builder("root", FnState::noop())
//!     .add_state("root", "grounded", FnState::noop())?
//!     .add_state("grounded", "walking", FnState::noop())?
//!     .add_state("root", "airborne", FnState::noop())?
//!     .build();
//!
//! assert!(machine.change_state(&"walking"));
//! assert!(machine.is_in_state(&"grounded"));
//! assert!(!machine.is_active_state(&"grounded"));
//! assert_eq!(machine.active_path(), vec![&"root", &"grounded", &"walking"]);
//! # Ok(())
//! # }
//! ```

mod tree;

pub use tree::{Ancestors, NodeId, StateNode, StateTree};

use crate::builder::HierarchicalStateMachineBuilder;
use crate::core::{
    Listener, ListenerId, Listeners, ReadOnlyStateMachine, State, StateChange, StateMachine,
    StateSwitcher,
};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use tracing::{debug, trace};

/// Tree of states with a single active path.
///
/// `Id` must be `Eq + Hash + Clone + Debug`; `Debug` is used for error
/// messages and log events.
pub struct HierarchicalStateMachine<Id, S> {
    tree: StateTree<S>,
    nodes: HashMap<Id, NodeId>,
    // Indexed by `NodeId`.
    ids: Vec<Id>,
    root: NodeId,
    // Deepest node whose `enter` has returned and whose `exit` has not started.
    lowest_active: Option<NodeId>,
    previous: Option<Id>,
    listeners: Listeners<Id>,
}

impl<Id, S> HierarchicalStateMachine<Id, S>
where
    Id: Eq + Hash + Clone + Debug,
    S: State,
{
    /// Start building a machine whose root is `root_state`.
    pub fn builder(root_id: Id, root_state: S) -> HierarchicalStateMachineBuilder<Id, S> {
        HierarchicalStateMachineBuilder::new(root_id, root_state)
    }

    pub(crate) fn from_parts(
        tree: StateTree<S>,
        nodes: HashMap<Id, NodeId>,
        ids: Vec<Id>,
        root: NodeId,
    ) -> Self {
        Self {
            tree,
            nodes,
            ids,
            root,
            lowest_active: None,
            previous: None,
            listeners: Listeners::new(),
        }
    }

    /// Lowest active state before the last completed change.
    pub fn previous_state_id(&self) -> Option<&Id> {
        self.previous.as_ref()
    }

    /// Lowest active state, `None` before the first change.
    pub fn active_state_id(&self) -> Option<&Id> {
        self.lowest_active.map(|node| self.id_of(node))
    }

    /// Every registered id, root first, in registration order.
    pub fn all_ids(&self) -> &[Id] {
        &self.ids
    }

    /// Id of the root state.
    pub fn root_id(&self) -> &Id {
        &self.ids[self.root.index()]
    }

    /// Number of states, root included. Never zero.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// The underlying arena, for structural queries by [`NodeId`].
    pub fn tree(&self) -> &StateTree<S> {
        &self.tree
    }

    /// Arena index of `id`.
    pub fn node_id(&self, id: &Id) -> Option<NodeId> {
        self.nodes.get(id).copied()
    }

    /// Whether `id` was registered.
    pub fn has_state(&self, id: &Id) -> bool {
        self.nodes.contains_key(id)
    }

    /// State registered under `id`.
    pub fn get_state(&self, id: &Id) -> Option<&S> {
        let node = self.node_id(id)?;
        Some(self.tree.node(node).state())
    }

    /// Mutable access to the state under `id`. Hooks are not run.
    pub fn get_state_mut(&mut self, id: &Id) -> Option<&mut S> {
        let node = self.node_id(id)?;
        Some(self.tree.node_mut(node).state_mut())
    }

    /// Parent of `id`, `None` for the root or an unknown id.
    pub fn parent_id(&self, id: &Id) -> Option<&Id> {
        let parent = self.tree.parent(self.node_id(id)?)?;
        Some(self.id_of(parent))
    }

    /// Children of `id` in registration order.
    pub fn children_ids(&self, id: &Id) -> Vec<&Id> {
        match self.node_id(id) {
            Some(node) => self
                .tree
                .node(node)
                .children()
                .iter()
                .map(|&child| self.id_of(child))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Number of ancestors of `id`; 0 for the root.
    pub fn depth_of(&self, id: &Id) -> Option<usize> {
        Some(self.tree.depth(self.node_id(id)?))
    }

    /// Deepest state that is an ancestor of, or equal to, both `a` and `b`.
    pub fn lowest_common_ancestor(&self, a: &Id, b: &Id) -> Option<&Id> {
        let ancestor = self
            .tree
            .lowest_common_ancestor(self.node_id(a)?, self.node_id(b)?)?;
        Some(self.id_of(ancestor))
    }

    /// Ids on the active path, root first. Empty before the first change.
    pub fn active_path(&self) -> Vec<&Id> {
        let Some(lowest) = self.lowest_active else {
            return Vec::new();
        };

        let mut path: Vec<&Id> = self
            .tree
            .ancestors(lowest)
            .map(|node| self.id_of(node))
            .collect();
        path.reverse();
        path
    }

    /// Whether `id` is the lowest active state or one of its ancestors.
    pub fn is_in_state(&self, id: &Id) -> bool {
        let (Some(lowest), Some(node)) = (self.lowest_active, self.node_id(id)) else {
            return false;
        };

        self.tree.is_ancestor_of(node, lowest)
    }

    /// Whether `id` is the lowest active state.
    pub fn is_active_state(&self, id: &Id) -> bool {
        self.lowest_active.is_some() && self.lowest_active == self.node_id(id)
    }

    /// Move the lowest active state to `to`.
    ///
    /// Exits every state from the current lowest active state up to, but not
    /// including, the lowest common ancestor, deepest first. Then enters every
    /// state below that ancestor down to `to`, shallowest first. Listeners run
    /// once the ids are updated.
    ///
    /// Returns `false` without side effects if `to` is unknown or is already
    /// the lowest active state.
    ///
    /// # Panics
    ///
    /// A panicking hook propagates. The active state is then the deepest
    /// state whose `enter` returned and whose `exit` never started, so a
    /// later change neither exits a state twice nor exits one that was never
    /// entered. The previous id and listeners are only updated by a change
    /// that completes.
    pub fn change_state(&mut self, to: &Id) -> bool {
        let Some(next) = self.node_id(to) else {
            trace!(state = ?to, "ignoring change to unknown state");
            return false;
        };

        if self.lowest_active == Some(next) {
            trace!(state = ?to, "ignoring change to the active state");
            return false;
        }

        let ancestor = self
            .lowest_active
            .and_then(|current| self.tree.lowest_common_ancestor(current, next));

        let from = HierarchicalStateMachine::active_state_id(self).cloned();
        self.exit_up(ancestor);
        self.enter_down(ancestor, next);

        self.previous = from;
        debug!(
            from = ?self.previous,
            to = ?to,
            ancestor = ?ancestor.map(|node| self.id_of(node)),
            "hierarchical state changed"
        );

        self.listeners.notify(self.previous.as_ref(), to);
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

    fn id_of(&self, node: NodeId) -> &Id {
        &self.ids[node.index()]
    }

    fn exit_up(&mut self, ancestor: Option<NodeId>) {
        while let Some(node) = self.lowest_active {
            if Some(node) == ancestor {
                break;
            }

            self.lowest_active = self.tree.parent(node);
            trace!(state = ?self.ids[node.index()], "exit");
            self.tree.node_mut(node).state_mut().exit();
        }
    }

    fn enter_down(&mut self, ancestor: Option<NodeId>, to: NodeId) {
        let path: Vec<NodeId> = self
            .tree
            .ancestors(to)
            .take_while(|&node| Some(node) != ancestor)
            .collect();

        for node in path.into_iter().rev() {
            trace!(state = ?self.ids[node.index()], "enter");
            self.tree.node_mut(node).state_mut().enter();
            self.lowest_active = Some(node);
        }
    }
}

impl<Id, S> ReadOnlyStateMachine<Id> for HierarchicalStateMachine<Id, S>
where
    Id: Eq + Hash + Clone + Debug,
    S: State,
{
    fn previous_state_id(&self) -> Option<Id> {
        self.previous.clone()
    }

    fn active_state_id(&self) -> Option<Id> {
        HierarchicalStateMachine::active_state_id(self).cloned()
    }

    fn all_ids(&self) -> Vec<Id> {
        self.ids.clone()
    }

    fn has_state(&self, id: &Id) -> bool {
        HierarchicalStateMachine::has_state(self, id)
    }

    fn is_in_state(&self, id: &Id) -> bool {
        HierarchicalStateMachine::is_in_state(self, id)
    }

    fn is_active_state(&self, id: &Id) -> bool {
        HierarchicalStateMachine::is_active_state(self, id)
    }
}

impl<Id, S> StateSwitcher<Id> for HierarchicalStateMachine<Id, S>
where
    Id: Eq + Hash + Clone + Debug,
    S: State,
{
    fn change_state(&mut self, to: &Id) -> bool {
        HierarchicalStateMachine::change_state(self, to)
    }

    fn subscribe(&mut self, listener: Listener<Id>) -> ListenerId {
        self.listeners.subscribe_boxed(listener)
    }

    fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }
}

impl<Id, S> StateMachine<Id, S> for HierarchicalStateMachine<Id, S>
where
    Id: Eq + Hash + Clone + Debug,
    S: State,
{
    fn get_state(&self, id: &Id) -> Option<&S> {
        HierarchicalStateMachine::get_state(self, id)
    }

    fn get_state_mut(&mut self, id: &Id) -> Option<&mut S> {
        HierarchicalStateMachine::get_state_mut(self, id)
    }
}

impl<Id: Debug, S> Debug for HierarchicalStateMachine<Id, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HierarchicalStateMachine")
            .field("ids", &self.ids)
            .field("previous", &self.previous)
            .field("lowest_active", &self.lowest_active)
            .finish_non_exhaustive()
    }
}

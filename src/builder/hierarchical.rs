//! Builder for hierarchical state machines.

use crate::builder::error::BuildError;
use crate::core::State;
use crate::hierarchical::{HierarchicalStateMachine, NodeId, StateTree};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Assembles a state tree top-down, parent before child.
///
/// Because every new state must name an already registered parent, the tree
/// is acyclic by construction. The finished machine cannot be restructured.
pub struct HierarchicalStateMachineBuilder<Id, S> {
    tree: StateTree<S>,
    nodes: HashMap<Id, NodeId>,
    ids: Vec<Id>,
    root: NodeId,
}

impl<Id, S> HierarchicalStateMachineBuilder<Id, S>
where
    Id: Eq + Hash + Clone + Debug,
    S: State,
{
    /// Create a builder seeded with the root state.
    pub fn new(root_id: Id, root_state: S) -> Self {
        let mut tree = StateTree::new();
        let root = tree.insert(root_state);
        let mut nodes = HashMap::new();
        nodes.insert(root_id.clone(), root);

        Self {
            tree,
            nodes,
            ids: vec![root_id],
            root,
        }
    }

    /// Register `state` as a child of `parent`.
    /// Returns an error if `id` is taken or `parent` is not registered yet.
    pub fn add_state(mut self, parent: Id, id: Id, state: S) -> Result<Self, BuildError> {
        if self.nodes.contains_key(&id) {
            return Err(BuildError::duplicate_state(&id));
        }

        let Some(&parent_node) = self.nodes.get(&parent) else {
            return Err(BuildError::unknown_parent(&parent));
        };

        let node = self.tree.insert(state);
        self.tree.add_child(parent_node, node)?;
        self.nodes.insert(id.clone(), node);
        self.ids.push(id);
        Ok(self)
    }

    pub fn has_state(&self, id: &Id) -> bool {
        self.nodes.contains_key(id)
    }

    /// Build the machine. Nothing is active until the first `change_state`.
    pub fn build(self) -> HierarchicalStateMachine<Id, S> {
        HierarchicalStateMachine::from_parts(self.tree, self.nodes, self.ids, self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FnState;

    #[test]
    fn builder_rejects_duplicate_ids() {
        let result = HierarchicalStateMachineBuilder::new("root", FnState::noop())
            .add_state("root", "a", FnState::noop())
            .and_then(|b| b.add_state("root", "a", FnState::noop()));

        assert!(matches!(result, Err(BuildError::DuplicateState { .. })));
    }

    #[test]
    fn builder_rejects_root_id_reuse() {
        let result = HierarchicalStateMachineBuilder::new("root", FnState::noop())
            .add_state("root", "root", FnState::noop());

        assert!(matches!(result, Err(BuildError::DuplicateState { .. })));
    }

    #[test]
    fn builder_requires_parent_first() {
        let result = HierarchicalStateMachineBuilder::new("root", FnState::noop())
            .add_state("a", "a1", FnState::noop());

        assert_eq!(
            result.err(),
            Some(BuildError::UnknownParent {
                parent: "\"a\"".to_string()
            })
        );
    }

    #[test]
    fn fluent_api_builds_machine() {
        let machine = HierarchicalStateMachineBuilder::new(0u8, FnState::noop())
            .add_state(0, 1, FnState::noop())
            .and_then(|b| b.add_state(1, 2, FnState::noop()))
            .and_then(|b| b.add_state(0, 3, FnState::noop()))
            .unwrap()
            .build();

        assert_eq!(machine.all_ids(), &[0, 1, 2, 3]);
        assert_eq!(machine.depth_of(&2), Some(2));
        assert_eq!(machine.active_state_id(), None);
    }
}

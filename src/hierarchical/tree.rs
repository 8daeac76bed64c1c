//! Arena-backed state tree.
//!
//! Nodes live in a `Vec` and refer to each other by [`NodeId`]. A child's
//! parent link is a plain index, so the parent/child back reference carries no
//! ownership.

use crate::builder::BuildError;

/// Stable index of a node inside a [`StateTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A state together with its position in the tree.
#[derive(Debug)]
pub struct StateNode<S> {
    state: S,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    depth: usize,
}

impl<S> StateNode<S> {
    fn new(state: S) -> Self {
        Self {
            state,
            parent: None,
            children: Vec::new(),
            depth: 0,
        }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in attachment order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Number of ancestors; 0 for a root or detached node.
    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// Owns every node of one or more state trees.
///
/// Attaching a node fixes its depth and refreshes the cached depth of its
/// whole subtree, so trees can be assembled in any order.
#[derive(Debug)]
pub struct StateTree<S> {
    nodes: Vec<StateNode<S>>,
}

impl<S> StateTree<S> {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Add a detached node.
    pub fn insert(&mut self, state: S) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(StateNode::new(state));
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// # Panics
    ///
    /// Panics if `id` was not created by this tree.
    pub fn node(&self, id: NodeId) -> &StateNode<S> {
        &self.nodes[id.0]
    }

    /// # Panics
    ///
    /// Panics if `id` was not created by this tree.
    pub fn node_mut(&mut self, id: NodeId) -> &mut StateNode<S> {
        &mut self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&StateNode<S>> {
        self.nodes.get(id.0)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn depth(&self, id: NodeId) -> usize {
        self.node(id).depth
    }

    /// Attach `child` under `parent`.
    ///
    /// Fails if `child` already has a parent, or if `child` is `parent` or
    /// one of its ancestors.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), BuildError> {
        if self.node(child).parent.is_some() {
            return Err(BuildError::NodeAlreadyHasParent);
        }

        if self.is_ancestor_of(child, parent) {
            return Err(BuildError::CircularDependency);
        }

        let depth = self.node(parent).depth + 1;
        self.node_mut(parent).children.push(child);
        self.node_mut(child).parent = Some(parent);
        self.set_subtree_depth(child, depth);
        Ok(())
    }

    /// Detach `child` from `parent`. Returns `false` if it was not a child.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let children = &mut self.node_mut(parent).children;
        let Some(position) = children.iter().position(|&c| c == child) else {
            return false;
        };

        children.remove(position);
        self.node_mut(child).parent = None;
        self.set_subtree_depth(child, 0);
        true
    }

    /// Whether `ancestor` is `node` or lies on `node`'s parent chain.
    pub fn is_ancestor_of(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors(node).any(|current| current == ancestor)
    }

    /// Deepest node that is an ancestor of, or equal to, both `a` and `b`.
    /// `None` when they sit in different trees.
    pub fn lowest_common_ancestor(&self, a: NodeId, b: NodeId) -> Option<NodeId> {
        let mut a = Some(a);
        let mut b = Some(b);

        while let (Some(x), Some(y)) = (a, b) {
            let (dx, dy) = (self.depth(x), self.depth(y));
            if dx > dy {
                a = self.parent(x);
            } else if dy > dx {
                b = self.parent(y);
            } else if x != y {
                a = self.parent(x);
                b = self.parent(y);
            } else {
                return Some(x);
            }
        }

        None
    }

    /// `node` followed by each of its ancestors up to the root.
    pub fn ancestors(&self, node: NodeId) -> Ancestors<'_, S> {
        Ancestors {
            tree: self,
            next: Some(node),
        }
    }

    fn set_subtree_depth(&mut self, node: NodeId, depth: usize) {
        let mut pending = vec![(node, depth)];
        while let Some((current, depth)) = pending.pop() {
            let entry = self.node_mut(current);
            entry.depth = depth;
            pending.extend(entry.children.iter().map(|&child| (child, depth + 1)));
        }
    }
}

impl<S> Default for StateTree<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over a node and its ancestors, deepest first.
pub struct Ancestors<'a, S> {
    tree: &'a StateTree<S>,
    next: Option<NodeId>,
}

impl<S> Iterator for Ancestors<'_, S> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// root -> (a -> a1, b)
    fn sample() -> (StateTree<&'static str>, [NodeId; 4]) {
        let mut tree = StateTree::new();
        let root = tree.insert("root");
        let a = tree.insert("a");
        let b = tree.insert("b");
        let a1 = tree.insert("a1");
        tree.add_child(root, a).unwrap();
        tree.add_child(root, b).unwrap();
        tree.add_child(a, a1).unwrap();
        (tree, [root, a, b, a1])
    }

    #[test]
    fn add_child_sets_parent_and_depth() {
        let (tree, [root, a, b, a1]) = sample();

        assert_eq!(tree.parent(root), None);
        assert_eq!(tree.parent(a), Some(root));
        assert_eq!(tree.parent(a1), Some(a));
        assert_eq!(tree.depth(root), 0);
        assert_eq!(tree.depth(b), 1);
        assert_eq!(tree.depth(a1), 2);
        assert_eq!(tree.node(root).children(), &[a, b]);
    }

    #[test]
    fn reparenting_is_rejected() {
        let (mut tree, [_, a, b, a1]) = sample();

        assert_eq!(tree.add_child(b, a1), Err(BuildError::NodeAlreadyHasParent));
        assert_eq!(tree.parent(a1), Some(a));
    }

    #[test]
    fn cycles_are_rejected() {
        let (mut tree, [root, _, _, a1]) = sample();

        assert_eq!(tree.add_child(a1, root), Err(BuildError::CircularDependency));
        assert_eq!(tree.add_child(root, root), Err(BuildError::CircularDependency));
        assert!(tree.node(a1).children().is_empty());
    }

    #[test]
    fn bottom_up_attachment_keeps_depths_consistent() {
        let mut tree = StateTree::new();
        let root = tree.insert(());
        let mid = tree.insert(());
        let leaf = tree.insert(());

        tree.add_child(mid, leaf).unwrap();
        tree.add_child(root, mid).unwrap();

        assert_eq!(tree.depth(mid), 1);
        assert_eq!(tree.depth(leaf), 2);
    }

    #[test]
    fn remove_child_detaches_and_resets_subtree_depths() {
        let (mut tree, [root, a, _, a1]) = sample();

        assert!(tree.remove_child(root, a));
        assert!(!tree.remove_child(root, a));
        assert_eq!(tree.parent(a), None);
        assert_eq!(tree.depth(a), 0);
        assert_eq!(tree.depth(a1), 1);
        assert_eq!(tree.lowest_common_ancestor(a1, root), None);
    }

    #[test]
    fn is_ancestor_of_includes_self() {
        let (tree, [root, a, b, a1]) = sample();

        assert!(tree.is_ancestor_of(root, a1));
        assert!(tree.is_ancestor_of(a, a1));
        assert!(tree.is_ancestor_of(a1, a1));
        assert!(!tree.is_ancestor_of(a1, a));
        assert!(!tree.is_ancestor_of(b, a1));
    }

    #[test]
    fn lowest_common_ancestor_finds_shared_parent() {
        let (tree, [root, a, b, a1]) = sample();

        assert_eq!(tree.lowest_common_ancestor(a1, b), Some(root));
        assert_eq!(tree.lowest_common_ancestor(b, a1), Some(root));
        assert_eq!(tree.lowest_common_ancestor(a1, a), Some(a));
        assert_eq!(tree.lowest_common_ancestor(a1, a1), Some(a1));
    }

    #[test]
    fn ancestors_walk_to_root() {
        let (tree, [root, a, _, a1]) = sample();

        assert_eq!(tree.ancestors(a1).collect::<Vec<_>>(), vec![a1, a, root]);
    }
}

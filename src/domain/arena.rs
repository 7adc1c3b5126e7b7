use std::ops::ControlFlow;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::node::Node;

/// Tree node in the arena-based game tree.
#[derive(Debug)]
pub struct GameNode {
    /// Parsed SGF node
    pub node: Node,
    /// Index of parent node in the arena, None for top-level nodes
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena; more than one means variations
    pub children: Vec<Index>,
}

/// Pre-order traversal callbacks for [`GameTree::walk`].
///
/// Returning `ControlFlow::Break(())` from either method stops the walk.
pub trait TreeVisitor {
    fn enter(&mut self, _tree: &GameTree, _idx: Index) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn leave(&mut self, _tree: &GameTree, _idx: Index) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

/// Arena-based container for an SGF collection.
///
/// Uses generational arena for memory-safe node references and O(1) lookups.
/// Top-level nodes hang under a notional root; a single game has one of them,
/// a collection several.
#[derive(Debug)]
pub struct GameTree {
    /// Arena storage for all tree nodes
    arena: Arena<GameNode>,
    /// Children of the notional root, in document order
    roots: Vec<Index>,
}

impl Default for GameTree {
    fn default() -> Self {
        Self::new()
    }
}

impl GameTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            roots: Vec::new(),
        }
    }

    /// Append `node` as last child of `parent` (or of the notional root).
    #[instrument(level = "trace", skip(self, node))]
    pub fn insert_node(&mut self, node: Node, parent: Option<Index>) -> Index {
        let parent = parent.filter(|&p| self.arena.contains(p));
        let node_idx = self.arena.insert(GameNode {
            node,
            parent,
            children: Vec::new(),
        });

        match parent.and_then(|p| self.arena.get_mut(p)) {
            Some(parent) => parent.children.push(node_idx),
            None => self.roots.push(node_idx),
        }

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&GameNode> {
        self.arena.get(idx)
    }

    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut GameNode> {
        self.arena.get_mut(idx)
    }

    /// Top-level nodes, one per game in the collection.
    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    /// First top-level node.
    pub fn root(&self) -> Option<Index> {
        self.roots.first().copied()
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn children(&self, idx: Index) -> &[Index] {
        self.get_node(idx)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
    }

    fn siblings(&self, idx: Index) -> &[Index] {
        match self.get_node(idx).and_then(|n| n.parent) {
            Some(parent) => self.children(parent),
            None => &self.roots,
        }
    }

    /// True iff the node starts one of several alternative branches.
    pub fn has_sibling(&self, idx: Index) -> bool {
        self.get_node(idx).is_some() && self.siblings(idx).len() > 1
    }

    /// Pre-order walk over all games.
    pub fn walk<V: TreeVisitor>(&self, visitor: &mut V) -> ControlFlow<()> {
        for &root in &self.roots {
            self.walk_from(root, visitor)?;
        }
        ControlFlow::Continue(())
    }

    /// Pre-order walk over the subtree at `start`.
    ///
    /// Uses an explicit stack, so deep game records cannot overflow the call
    /// stack.
    pub fn walk_from<V: TreeVisitor>(&self, start: Index, visitor: &mut V) -> ControlFlow<()> {
        let mut stack = vec![(start, false)];
        while let Some((current_idx, visited)) = stack.pop() {
            let Some(node) = self.get_node(current_idx) else {
                continue;
            };
            if visited {
                visitor.leave(self, current_idx)?;
            } else {
                visitor.enter(self, current_idx)?;
                stack.push((current_idx, true));
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    stack.push((child, false));
                }
            }
        }
        ControlFlow::Continue(())
    }

    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    /// Length of the longest root-to-leaf path.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(Index, usize)> = self.roots.iter().map(|&r| (r, 1)).collect();
        while let Some((idx, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            stack.extend(self.children(idx).iter().map(|&c| (c, depth + 1)));
        }
        max_depth
    }

    /// Number of leaves, i.e. of complete variations.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_count(&self) -> usize {
        self.iter().filter(|(_, n)| n.children.is_empty()).count()
    }

    /// First-child chain of the first game.
    pub fn main_line(&self) -> Vec<Index> {
        let mut line = Vec::new();
        let mut current = self.root();
        while let Some(idx) = current {
            line.push(idx);
            current = self.children(idx).first().copied();
        }
        line
    }
}

/// Pre-order iterator over all nodes of all games.
pub struct TreeIterator<'a> {
    tree: &'a GameTree,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a GameTree) -> Self {
        Self {
            tree,
            stack: tree.roots.iter().rev().copied().collect(),
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a GameNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                self.stack.extend(node.children.iter().rev());
                return Some((current_idx, node));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node() -> Node {
        Node::default()
    }

    #[test]
    fn test_insert_under_notional_root_creates_collection() {
        let mut tree = GameTree::new();
        let a = tree.insert_node(node(), None);
        let b = tree.insert_node(node(), None);
        assert_eq!(tree.roots(), &[a, b]);
        assert!(tree.has_sibling(a));
    }

    #[test]
    fn test_has_sibling_only_for_branch_starts() {
        let mut tree = GameTree::new();
        let root = tree.insert_node(node(), None);
        let a = tree.insert_node(node(), Some(root));
        let a2 = tree.insert_node(node(), Some(a));
        let b = tree.insert_node(node(), Some(root));
        assert!(!tree.has_sibling(root));
        assert!(tree.has_sibling(a));
        assert!(tree.has_sibling(b));
        assert!(!tree.has_sibling(a2));
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(tree.main_line(), vec![root, a, a2]);
    }

    struct Counter {
        entered: usize,
        stop_at: usize,
    }

    impl TreeVisitor for Counter {
        fn enter(&mut self, _tree: &GameTree, _idx: Index) -> ControlFlow<()> {
            self.entered += 1;
            if self.entered == self.stop_at {
                return ControlFlow::Break(());
            }
            ControlFlow::Continue(())
        }
    }

    #[test]
    fn test_walk_visits_all_games_and_stops_on_break() {
        let mut tree = GameTree::new();
        let a = tree.insert_node(node(), None);
        tree.insert_node(node(), Some(a));
        tree.insert_node(node(), None);

        let mut all = Counter { entered: 0, stop_at: usize::MAX };
        assert_eq!(tree.walk(&mut all), ControlFlow::Continue(()));
        assert_eq!(all.entered, 3);

        let mut early = Counter { entered: 0, stop_at: 2 };
        assert_eq!(tree.walk(&mut early), ControlFlow::Break(()));
        assert_eq!(early.entered, 2);
    }

    #[test]
    fn test_get_node_mut_edits_in_place() {
        let mut tree = GameTree::new();
        let root = tree.insert_node(node(), None);
        if let Some(n) = tree.get_node_mut(root) {
            n.node = Node::parse(";C[edited]");
        }
        assert_eq!(tree.get_node(root).unwrap().node.to_sgf(), ";C[edited]");
    }
}

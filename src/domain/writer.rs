//! Serializer: game tree back to SGF text.

use std::ops::ControlFlow;

use generational_arena::Index;
use tracing::instrument;

use crate::domain::arena::{GameTree, TreeVisitor};

struct SgfWriter {
    buf: String,
}

impl SgfWriter {
    /// Top-level nodes are bracketed by [`to_sgf`] itself.
    fn opens_branch(tree: &GameTree, idx: Index) -> bool {
        tree.get_node(idx).is_some_and(|n| n.parent.is_some()) && tree.has_sibling(idx)
    }
}

impl TreeVisitor for SgfWriter {
    fn enter(&mut self, tree: &GameTree, idx: Index) -> ControlFlow<()> {
        if Self::opens_branch(tree, idx) {
            self.buf.push('(');
        }
        if let Some(n) = tree.get_node(idx) {
            self.buf.push_str(&n.node.to_sgf());
        }
        ControlFlow::Continue(())
    }

    fn leave(&mut self, tree: &GameTree, idx: Index) -> ControlFlow<()> {
        if Self::opens_branch(tree, idx) {
            self.buf.push(')');
        }
        ControlFlow::Continue(())
    }
}

/// Serialize a game tree.
///
/// Every game of the collection gets one outer `(...)`; every node that
/// starts one of several variations gets its own. An empty tree gives `"()"`.
#[instrument(level = "debug", skip(tree), fields(nodes = tree.len()))]
pub fn to_sgf(tree: &GameTree) -> String {
    if tree.roots().is_empty() {
        return "()".to_string();
    }
    let mut writer = SgfWriter { buf: String::new() };
    for &root in tree.roots() {
        writer.buf.push('(');
        // SgfWriter never breaks
        let _ = tree.walk_from(root, &mut writer);
        writer.buf.push(')');
    }
    writer.buf
}

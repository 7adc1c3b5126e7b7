/*
Rendering of game trees with termtree.

One termtree node per variation segment: a run of SGF nodes without branch
points, printed as its SGF text. Children of the segment are the variations
that start where it ends.
 */
use generational_arena::Index;
use termtree::Tree;

use crate::domain::GameTree;

const MAX_LABEL: usize = 72;

pub trait TreeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

/// Follow single-child links from `start`; returns the label of the run and
/// the branch points after it.
fn segment(tree: &GameTree, start: Index) -> (String, Vec<Index>) {
    let mut label = String::new();
    let mut current = start;
    loop {
        if let Some(node) = tree.get_node(current) {
            label.push_str(&node.node.to_sgf());
        }
        match tree.children(current) {
            [only] => current = *only,
            children => return (truncate(label), children.to_vec()),
        }
    }
}

fn truncate(label: String) -> String {
    if label.chars().count() <= MAX_LABEL {
        return label;
    }
    let mut short: String = label.chars().take(MAX_LABEL - 3).collect();
    short.push_str("...");
    short
}

fn build_tree(tree: &GameTree, start: Index) -> Tree<String> {
    let (label, branches) = segment(tree, start);
    Tree::new(label).with_leaves(branches.into_iter().map(|b| build_tree(tree, b)))
}

impl TreeConvert for GameTree {
    fn to_tree_string(&self) -> Tree<String> {
        match self.roots() {
            [] => Tree::new("Empty tree".to_string()),
            [root] => build_tree(self, *root),
            roots => Tree::new(format!("Collection of {} games", roots.len()))
                .with_leaves(roots.iter().map(|&r| build_tree(self, r))),
        }
    }
}

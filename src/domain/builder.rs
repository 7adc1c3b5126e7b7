//! Tree builder: turns the flat token stream into a game tree.

use generational_arena::Index;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::arena::GameTree;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::node::Node;
use crate::domain::scanner::{Scanner, Token};

/// How malformed input is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Skip junk, ignore stray `)`, drop unclosed branches.
    #[default]
    Lenient,
    /// Fail on the first syntax problem.
    Strict,
}

/// Constructs a [`GameTree`] from SGF tokens.
///
/// State is an explicit stack of branch points plus the cursor the next
/// node is appended to; no recursion, so nesting depth is only bounded by
/// memory.
#[derive(Debug)]
pub struct TreeBuilder {
    mode: ParseMode,
    tree: GameTree,
    stack: Vec<Option<Index>>,
    cursor: Option<Index>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new(ParseMode::default())
    }
}

impl TreeBuilder {
    pub fn new(mode: ParseMode) -> Self {
        Self {
            mode,
            tree: GameTree::new(),
            stack: Vec::new(),
            cursor: None,
        }
    }

    /// `(` and `)`: enter a variation at the cursor, or return to where the
    /// enclosing one branched off.
    pub fn on_tree(&mut self, begin: bool, offset: usize) -> DomainResult<()> {
        if begin {
            self.stack.push(self.cursor);
            return Ok(());
        }
        match self.stack.pop() {
            Some(cursor) => self.cursor = cursor,
            None if self.mode == ParseMode::Strict => {
                return Err(DomainError::UnbalancedClose { offset });
            }
            None => debug!(offset, "ignoring unbalanced ')'"),
        }
        Ok(())
    }

    /// Node text: parse it and append it below the cursor.
    pub fn on_node(&mut self, text: &str, offset: usize) -> DomainResult<()> {
        if self.stack.is_empty() && self.mode == ParseMode::Strict {
            return Err(DomainError::NodeOutsideTree { offset });
        }
        let node = Node::parse(text);
        self.cursor = Some(self.tree.insert_node(node, self.cursor));
        Ok(())
    }

    pub fn finish(self) -> DomainResult<GameTree> {
        if !self.stack.is_empty() {
            if self.mode == ParseMode::Strict {
                return Err(DomainError::UnclosedBranch {
                    depth: self.stack.len(),
                });
            }
            debug!(depth = self.stack.len(), "discarding unclosed branches");
        }
        Ok(self.tree)
    }

    /// Feed a whole document and return the finished tree.
    #[instrument(level = "debug", skip(self, text), fields(len = text.len()))]
    pub fn build(mut self, text: &str) -> DomainResult<GameTree> {
        for item in Scanner::new(text) {
            let spanned = match item {
                Ok(spanned) => spanned,
                Err(e) if self.mode == ParseMode::Strict => return Err(e),
                Err(e) => {
                    debug!("skipping: {}", e);
                    continue;
                }
            };
            match spanned.token {
                Token::OpenBranch => self.on_tree(true, spanned.offset)?,
                Token::CloseBranch => self.on_tree(false, spanned.offset)?,
                Token::Node(text) => self.on_node(text, spanned.offset)?,
            }
        }
        self.finish()
    }
}

/// Parse leniently; never fails.
pub fn parse(text: &str) -> GameTree {
    // lenient mode has no error paths
    TreeBuilder::new(ParseMode::Lenient)
        .build(text)
        .unwrap_or_default()
}

/// Parse with an explicit [`ParseMode`].
pub fn parse_with(text: &str, mode: ParseMode) -> DomainResult<GameTree> {
    TreeBuilder::new(mode).build(text)
}

//! SGF (Smart Game Format) game trees: parse, inspect, serialize.
//!
//! ```
//! let sgf = "(;FF[4]C[root](;B[pd])(;B[dd]))";
//! let tree = sgftree::parse(sgf);
//! assert_eq!(tree.leaf_count(), 2);
//! assert_eq!(sgftree::to_sgf(&tree), sgf);
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;

pub use domain::{parse, parse_with, to_sgf, DomainError, GameTree, Node, ParseMode, Property};

//! Domain layer: SGF grammar, node model and game tree
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod error;
pub mod node;
pub mod scanner;
pub mod text;
pub mod value;
pub mod writer;

pub use arena::{GameNode, GameTree, TreeIterator, TreeVisitor};
pub use builder::{parse, parse_with, ParseMode, TreeBuilder};
pub use error::{DomainError, DomainResult};
pub use node::{Node, Property};
pub use scanner::{scan, Scanner, Spanned, Token};
pub use text::{escape, unescape};
pub use value::{decode_value, encode_value, try_decode_value, Color, PropValue, ValueType};
pub use writer::to_sgf;

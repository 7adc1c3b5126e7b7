//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors: SGF syntax violations and value decode failures.
///
/// Only reported in strict mode or by the `try_*` codec functions;
/// the lenient paths tolerate all of these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("unexpected input at offset {offset}: {fragment:?}")]
    UnexpectedInput { offset: usize, fragment: String },

    #[error("unterminated property value starting at offset {offset}")]
    UnterminatedValue { offset: usize },

    #[error("unbalanced ')' at offset {offset}")]
    UnbalancedClose { offset: usize },

    #[error("node outside of any game tree at offset {offset}")]
    NodeOutsideTree { offset: usize },

    #[error("{depth} game tree(s) left unclosed at end of input")]
    UnclosedBranch { depth: usize },

    #[error("invalid number: {0:?}")]
    InvalidNumber(String),

    #[error("invalid real: {0:?}")]
    InvalidReal(String),

    #[error("invalid point: {0:?}")]
    InvalidPoint(String),

    #[error("invalid color: {0:?}")]
    InvalidColor(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

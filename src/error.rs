//! Error types for name extraction.
//!
//! Only position-based extraction can fail. An unresolvable name or two
//! imports sharing an alias are ordinary outcomes, not errors.

use thiserror::Error;

use crate::syntax::TokenKind;

/// A precondition violation while extracting a name from a token stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("position {position} is out of bounds for a stream of {len} tokens")]
    PositionOutOfBounds { position: usize, len: usize },

    #[error("token at position {position} is {kind:?}, not a name segment")]
    NotAName { position: usize, kind: TokenKind },

    #[error("malformed name: consecutive namespace separators before position {position}")]
    MalformedName { position: usize },
}

pub type Result<T> = std::result::Result<T, ResolveError>;

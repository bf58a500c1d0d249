//! Foundation types for the resolver.
//!
//! - [`Fingerprint`] - Content hash of a token stream
//! - [`TextRange`], [`TextSize`] - Source positions of tokens
//!
//! This module has NO dependencies on other crate modules.

mod fingerprint;

pub use fingerprint::Fingerprint;

// Re-export text-size types for convenience
pub use text_size;
pub use text_size::{TextRange, TextSize};

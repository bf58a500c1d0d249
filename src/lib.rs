//! # fqn-resolver
//!
//! Resolves short or aliased class names found in a PHP token stream to
//! their fully-qualified form, using the file's own `use` declarations.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! hir     → Name extraction, import tables, cache, resolver
//!   ↓
//! syntax  → Token model + minimal lexer
//!   ↓
//! base    → Primitives (Fingerprint, TextRange)
//! ```
//!
//! ## Usage
//!
//! ```
//! use fqn::syntax::lex;
//!
//! let stream = lex("<?php use App\\Model\\User as U; new U();");
//! assert_eq!(fqn::resolve_for_name(&stream, "U"), "App\\Model\\User");
//! ```

/// Foundation types: Fingerprint, TextRange
pub mod base;

/// Resolution errors
pub mod error;

/// Name extraction and resolution
pub mod hir;

/// Tokens, token streams and the minimal lexer
pub mod syntax;

pub use base::{Fingerprint, TextRange, TextSize};
pub use error::{ResolveError, Result};
pub use hir::{
    ImportCache, ImportDecl, ImportKind, ImportTable, NameRef, Resolver, resolve_data_from_end,
    resolve_for_name, resolve_for_name_position,
};
pub use syntax::{Token, TokenKind, TokenStream};

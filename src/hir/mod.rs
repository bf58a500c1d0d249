//! Name resolution layer.
//!
//! ```text
//! resolve   → public entry points, Resolver
//!   ↓
//! cache     → fingerprint → ImportTable memoization
//!   ↓
//! imports   → `use` statement parsing
//! name_ref  → backward name extraction
//! policy    → class-name heuristics
//! ```

mod cache;
mod imports;
mod name_ref;
mod policy;
mod resolve;

pub use cache::ImportCache;
pub use imports::{ImportDecl, ImportKind, ImportTable, import_use_indexes};
pub use name_ref::{NAMESPACE_SEPARATOR, NameRef, name_ref_from_end, strict_name_at};
pub use policy::{AnyName, ClassNamePolicy, LowercaseIsNotClass};
pub use resolve::{Resolver, resolve_data_from_end, resolve_for_name, resolve_for_name_position};

//! Namespace and `use` import extraction.
//!
//! A [`NamespaceIndex`] maps the lines of a PHP file to the namespace and
//! class imports in effect there. [`ImportsCache`] shares those indexes
//! between resolvers.

mod cache;
mod index;

pub use cache::{CacheStats, ImportsCache};
pub use index::{AliasMap, NamespaceBlock, NamespaceIndex};

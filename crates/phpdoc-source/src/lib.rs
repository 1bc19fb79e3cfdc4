//! PHP source scanning
//!
//! Reads PHP files far enough to answer two questions without running them:
//! which namespace and class imports are active at a given line
//! ([`NamespaceIndex`]), and where classes, members and functions are
//! declared, with their doc comments ([`ProgramIndex`]).
//!
//! # Example
//!
//! ```ignore
//! use phpdoc_source::NamespaceIndex;
//!
//! let index = NamespaceIndex::parse("<?php\nnamespace App;\nuse Lib\\Collection;\n");
//! assert_eq!(index.namespace_at(Some(3)), "App");
//! assert_eq!(index.qualify(Some(3), "Collection"), "Lib\\Collection");
//! ```

pub mod error;
pub mod imports;
pub mod lexer;
pub mod program;

pub use error::SourceError;
pub use imports::{AliasMap, CacheStats, ImportsCache, NamespaceBlock, NamespaceIndex};
pub use lexer::{tokenize, PhpToken};
pub use program::{ClassKind, ClassLike, FunctionDecl, Member, ProgramIndex};

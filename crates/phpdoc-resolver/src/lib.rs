//! PHP docblock type resolution
//!
//! Resolves the types written in docblocks against the scope they appear
//! in: class names are fully qualified through the file's namespace and
//! imports, `self`/`static`/`parent` are replaced by the classes they stand
//! for, and template parameters and type aliases are replaced by what they
//! are bound to.
//!
//! # Example
//!
//! ```ignore
//! use phpdoc_resolver::{Declaration, DocBlockFactory, TagValue};
//!
//! let factory = DocBlockFactory::for_sources([("src/Repo.php", source)]);
//! let block = factory.create_from_declaration(&Declaration::method("App\\Repo", "all"))?;
//! if let TagValue::Return(ret) = block.tag("@return")? {
//!     println!("{}", ret.ty);
//! }
//! ```

#![warn(missing_docs)]

pub mod block;
pub mod config;
pub mod declaration;
pub mod diagnostic;
pub mod error;
pub mod factory;
pub mod generics;
pub mod introspect;
pub mod resolver;
pub mod scope;

pub use block::Block;
pub use config::ResolverConfig;
pub use declaration::{locate, Declaration, Located};
pub use diagnostic::{Diagnostic, ErrorCode};
pub use error::{ConfigError, ResolveError, TagError};
pub use factory::DocBlockFactory;
pub use generics::{ConcretenessFlag, GenericsCache, GenericsExtractor, GenericsResolver, TypeMap};
pub use introspect::Introspector;
pub use resolver::TypeResolver;
pub use scope::Scope;

pub use phpdoc_source::{ImportsCache, ProgramIndex};
pub use phpdoc_syntax::{PhpDocNode, TagValue, TypeNode};

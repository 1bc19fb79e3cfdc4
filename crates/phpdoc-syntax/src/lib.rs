//! PHP docblock syntax
//!
//! Lexer, type-tree AST and parser for docblock annotations.
//!
//! # Example
//!
//! ```ignore
//! use phpdoc_syntax::{parse_docblock, TagValue};
//!
//! let doc = parse_docblock("/**\n * @return list<int> The ids\n */");
//! for tag in doc.tags() {
//!     if let TagValue::Return(ret) = &tag.value {
//!         println!("{} returns {}", tag.name, ret.ty);
//!     }
//! }
//! ```

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::*;
pub use lexer::Lexer;
pub use parser::tags::base_tag_name;
pub use parser::{parse_docblock, parse_tag_value, parse_type, parse_type_lossy, ParseError, ParseErrorKind};
pub use token::{Span, Token};

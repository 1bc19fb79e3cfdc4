//! Position and context a docblock is resolved in.

use crate::generics::GenericsResolver;
use phpdoc_source::ClassLike;
use std::path::{Path, PathBuf};

/// Where a docblock appears and what it may refer to.
///
/// `declaring_type` is only required once the docblock uses `self`,
/// `static`, `$this`, `parent` or local type aliases, so scopes of free
/// functions can be built without one.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    /// File the docblock appears in; drives namespace and import lookups
    pub file: Option<PathBuf>,
    /// Approximate 1-based line of the docblock
    pub line: Option<u32>,
    /// Fully qualified class-like the docblock belongs to
    pub declaring_type: Option<String>,
    /// Raw docblock text
    pub comment: String,
    /// Generics inherited from the enclosing declaration
    pub generics: GenericsResolver,
}

impl Scope {
    /// Scope of a free-standing docblock: no file, line or class.
    pub fn new(comment: impl Into<String>) -> Self {
        Self {
            comment: comment.into(),
            ..Self::default()
        }
    }

    /// Scope of a class-like's own docblock.
    pub fn for_class(class: &ClassLike) -> Self {
        Self {
            file: Some(class.file.clone()),
            line: Some(class.line),
            declaring_type: Some(class.name.clone()),
            comment: class.doc_comment.clone().unwrap_or_default(),
            generics: GenericsResolver::new(),
        }
    }

    /// File the docblock is in.
    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Line the docblock ends on, 1-indexed.
    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    /// Class-like `self` and `static` stand for.
    pub fn with_declaring_type(mut self, declaring_type: impl Into<String>) -> Self {
        self.declaring_type = Some(declaring_type.into());
        self
    }

    /// Generics inherited from the enclosing declaration.
    pub fn with_generics(mut self, generics: GenericsResolver) -> Self {
        self.generics = generics;
        self
    }

    /// File the docblock is in, if known.
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }
}

//! Access to the declarations of the analysed program.

use phpdoc_source::{ClassLike, FunctionDecl, ProgramIndex};

/// Read access to class-likes and functions of a program.
///
/// [`ProgramIndex`] implements it from scanned sources; hosts embedding the
/// resolver can implement it over their own symbol tables.
pub trait Introspector: Send + Sync {
    /// Class-like by fully qualified name, case-insensitively. A leading
    /// `\` must be accepted.
    fn class_like(&self, name: &str) -> Option<&ClassLike>;

    /// Top-level function by fully qualified name.
    fn function(&self, name: &str) -> Option<&FunctionDecl>;

    /// Whether a class-like named `name` is known.
    fn class_exists(&self, name: &str) -> bool {
        self.class_like(name).is_some()
    }

    /// Parent class of `name`, if it is a known class that extends one.
    fn parent_of(&self, name: &str) -> Option<String> {
        self.class_like(name)?.parent.clone()
    }
}

impl Introspector for ProgramIndex {
    fn class_like(&self, name: &str) -> Option<&ClassLike> {
        ProgramIndex::class_like(self, name)
    }

    fn function(&self, name: &str) -> Option<&FunctionDecl> {
        ProgramIndex::function(self, name)
    }
}

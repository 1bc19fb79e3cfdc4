//! Declaration index of a set of PHP files.
//!
//! Records class-likes, their members and top-level functions, with the
//! file, line and doc comment of each. Names are fully qualified through
//! the file's own [`NamespaceIndex`].

mod scanner;

use crate::error::SourceError;
use crate::imports::NamespaceIndex;
use crate::lexer::tokenize;
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Kind of a class-like declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
    Trait,
    Enum,
}

impl ClassKind {
    pub fn keyword(self) -> &'static str {
        match self {
            ClassKind::Class => "class",
            ClassKind::Interface => "interface",
            ClassKind::Trait => "trait",
            ClassKind::Enum => "enum",
        }
    }
}

/// A method, property or class constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Name as declared; properties keep no `$`
    pub name: String,
    pub line: u32,
    pub doc_comment: Option<String>,
}

/// A class, interface, trait or enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassLike {
    /// Fully qualified name without leading `\`
    pub name: String,
    pub kind: ClassKind,
    pub file: PathBuf,
    pub line: u32,
    pub end_line: u32,
    /// Fully qualified parent class, for classes that extend one
    pub parent: Option<String>,
    /// Implemented interfaces; extended interfaces for interfaces
    pub interfaces: Vec<String>,
    pub doc_comment: Option<String>,
    pub methods: Vec<Member>,
    pub properties: Vec<Member>,
    pub constants: Vec<Member>,
}

impl ClassLike {
    pub fn new(name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            kind,
            file: PathBuf::new(),
            line: 0,
            end_line: 0,
            parent: None,
            interfaces: Vec::new(),
            doc_comment: None,
            methods: Vec::new(),
            properties: Vec::new(),
            constants: Vec::new(),
        }
    }

    /// Unqualified name.
    pub fn short_name(&self) -> &str {
        self.name.rsplit('\\').next().unwrap_or(&self.name)
    }

    /// Method names are case-insensitive in PHP.
    pub fn method(&self, name: &str) -> Option<&Member> {
        self.methods
            .iter()
            .find(|member| member.name.eq_ignore_ascii_case(name))
    }

    /// Property by name, with or without the `$` sigil.
    pub fn property(&self, name: &str) -> Option<&Member> {
        let name = name.trim_start_matches('$');
        self.properties.iter().find(|member| member.name == name)
    }

    pub fn constant(&self, name: &str) -> Option<&Member> {
        self.constants.iter().find(|member| member.name == name)
    }
}

/// A top-level function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDecl {
    /// Fully qualified name without leading `\`
    pub name: String,
    pub file: PathBuf,
    pub line: u32,
    pub doc_comment: Option<String>,
}

/// Declarations of a set of PHP files.
#[derive(Debug, Clone, Default)]
pub struct ProgramIndex {
    /// Keyed by lower-cased qualified name
    classes: FxHashMap<String, ClassLike>,
    functions: FxHashMap<String, FunctionDecl>,
    files: FxHashMap<PathBuf, Arc<NamespaceIndex>>,
}

impl ProgramIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan `source` as the contents of `path`.
    pub fn add_source(&mut self, path: impl Into<PathBuf>, source: &str) {
        let path = path.into();
        let tokens = tokenize(source);
        let namespaces = Arc::new(NamespaceIndex::from_tokens(&tokens));

        let scanned = scanner::scan(&tokens, &namespaces, &path);
        tracing::debug!(
            path = %path.display(),
            classes = scanned.classes.len(),
            functions = scanned.functions.len(),
            "scanned source"
        );

        for class in scanned.classes {
            self.insert_class(class);
        }
        for function in scanned.functions {
            self.insert_function(function);
        }
        self.files.insert(path, namespaces);
    }

    /// Read and scan the file at `path`.
    pub fn add_file(&mut self, path: impl AsRef<Path>) -> Result<(), SourceError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.add_source(path, &String::from_utf8_lossy(&bytes));
        Ok(())
    }

    /// Register a class-like, replacing a previous one of the same name.
    pub fn insert_class(&mut self, class: ClassLike) {
        self.classes.insert(class.name.to_lowercase(), class);
    }

    pub fn insert_function(&mut self, function: FunctionDecl) {
        self.functions.insert(function.name.to_lowercase(), function);
    }

    /// Class-like by qualified name; a leading `\` is accepted.
    pub fn class_like(&self, name: &str) -> Option<&ClassLike> {
        self.classes.get(&normalize(name))
    }

    pub fn function(&self, name: &str) -> Option<&FunctionDecl> {
        self.functions.get(&normalize(name))
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassLike> {
        self.classes.values()
    }

    pub fn functions(&self) -> impl Iterator<Item = &FunctionDecl> {
        self.functions.values()
    }

    /// Namespace index built for a scanned file.
    pub fn namespace_index(&self, path: &Path) -> Option<&Arc<NamespaceIndex>> {
        self.files.get(path)
    }

    /// Scanned files with their namespace indexes.
    pub fn files(&self) -> impl Iterator<Item = (&PathBuf, &Arc<NamespaceIndex>)> {
        self.files.iter()
    }
}

fn normalize(name: &str) -> String {
    name.trim_start_matches('\\').to_lowercase()
}

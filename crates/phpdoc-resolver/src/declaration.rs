//! Handles for the declarations a docblock can be attached to.

use crate::error::ResolveError;
use crate::introspect::Introspector;
use phpdoc_source::ClassLike;
use std::fmt;
use std::path::PathBuf;

/// A documented declaration.
///
/// Names are fully qualified; a leading `\` is accepted. Member names are
/// looked up on the class-like named by `class`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Declaration {
    /// Class, interface, trait or enum
    Class(String),
    /// Method of a class-like
    Method {
        /// Declaring class-like
        class: String,
        /// Method name, any case
        name: String,
    },
    /// Property of a class-like
    Property {
        /// Declaring class-like
        class: String,
        /// Property name, with or without `$`
        name: String,
    },
    /// Constant of a class-like
    ClassConstant {
        /// Declaring class-like
        class: String,
        /// Constant name
        name: String,
    },
    /// Top-level function
    Function(String),
    /// A closure or arrow function; closures are not indexed, so their
    /// location and docblock are given directly.
    Closure {
        /// File the closure is written in
        file: Option<PathBuf>,
        /// Line of the closure
        line: Option<u32>,
        /// Class the closure is bound to, if any
        scope_class: Option<String>,
        /// Its docblock
        doc_comment: Option<String>,
    },
}

impl Declaration {
    /// A class, interface, trait or enum.
    pub fn class(name: impl Into<String>) -> Self {
        Declaration::Class(name.into())
    }

    /// A method of `class`.
    pub fn method(class: impl Into<String>, name: impl Into<String>) -> Self {
        Declaration::Method {
            class: class.into(),
            name: name.into(),
        }
    }

    /// `name` may be written with or without its `$`.
    pub fn property(class: impl Into<String>, name: impl Into<String>) -> Self {
        Declaration::Property {
            class: class.into(),
            name: name.into(),
        }
    }

    /// A constant of `class`.
    pub fn class_constant(class: impl Into<String>, name: impl Into<String>) -> Self {
        Declaration::ClassConstant {
            class: class.into(),
            name: name.into(),
        }
    }

    /// A top-level function.
    pub fn function(name: impl Into<String>) -> Self {
        Declaration::Function(name.into())
    }

    /// Class-like this declaration belongs to, as written.
    pub fn class_name(&self) -> Option<&str> {
        match self {
            Declaration::Class(class)
            | Declaration::Method { class, .. }
            | Declaration::Property { class, .. }
            | Declaration::ClassConstant { class, .. } => Some(class),
            Declaration::Closure { scope_class, .. } => scope_class.as_deref(),
            Declaration::Function(_) => None,
        }
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Declaration::Class(class) => write!(f, "class `{}`", class),
            Declaration::Method { class, name } => write!(f, "method `{}::{}()`", class, name),
            Declaration::Property { class, name } => {
                write!(f, "property `{}::${}`", class, name.trim_start_matches('$'))
            }
            Declaration::ClassConstant { class, name } => write!(f, "constant `{}::{}`", class, name),
            Declaration::Function(name) => write!(f, "function `{}()`", name),
            Declaration::Closure { file, line, .. } => match (file, line) {
                (Some(file), Some(line)) => write!(f, "closure at {}:{}", file.display(), line),
                _ => write!(f, "closure"),
            },
        }
    }
}

/// Where a declaration's docblock lives, as found through an introspector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located<'a> {
    /// Source file
    pub file: Option<PathBuf>,
    /// Line of the declaration, or of its class-like for members without one
    pub line: Option<u32>,
    /// Class-like `self` refers to
    pub declaring_type: Option<String>,
    /// Raw docblock, empty when there is none
    pub comment: String,
    /// Class-like whose generics the docblock inherits
    pub owner: Option<&'a ClassLike>,
    /// Key the declaration's generics are cached under; closures have none
    pub cache_key: Option<String>,
}

/// Find the docblock of `declaration` and the context it is written in.
///
/// Methods use their own line; properties and constants use their class's
/// file and line. Member lookups go through the declaring class-like only.
pub fn locate<'a>(introspector: &'a dyn Introspector, declaration: &Declaration) -> Result<Located<'a>, ResolveError> {
    let unknown = || ResolveError::UnknownDeclaration {
        declaration: declaration.to_string(),
    };

    let located = match declaration {
        Declaration::Class(name) => {
            let class = introspector.class_like(name).ok_or_else(unknown)?;
            Located {
                file: Some(class.file.clone()),
                line: Some(class.line),
                declaring_type: Some(class.name.clone()),
                comment: class.doc_comment.clone().unwrap_or_default(),
                owner: None,
                cache_key: Some(class.name.clone()),
            }
        }
        Declaration::Method { class, name } => {
            let class = introspector.class_like(class).ok_or_else(unknown)?;
            let method = class.method(name).ok_or_else(unknown)?;
            Located {
                file: Some(class.file.clone()),
                line: Some(method.line),
                declaring_type: Some(class.name.clone()),
                comment: method.doc_comment.clone().unwrap_or_default(),
                owner: Some(class),
                cache_key: Some(format!("{}->{}()", class.name, method.name)),
            }
        }
        Declaration::Property { class, name } => {
            let class = introspector.class_like(class).ok_or_else(unknown)?;
            let property = class.property(name).ok_or_else(unknown)?;
            Located {
                file: Some(class.file.clone()),
                line: Some(class.line),
                declaring_type: Some(class.name.clone()),
                comment: property.doc_comment.clone().unwrap_or_default(),
                owner: Some(class),
                cache_key: Some(format!("{}::${}", class.name, property.name)),
            }
        }
        Declaration::ClassConstant { class, name } => {
            let class = introspector.class_like(class).ok_or_else(unknown)?;
            let constant = class.constant(name).ok_or_else(unknown)?;
            Located {
                file: Some(class.file.clone()),
                line: Some(class.line),
                declaring_type: Some(class.name.clone()),
                comment: constant.doc_comment.clone().unwrap_or_default(),
                owner: Some(class),
                cache_key: Some(format!("{}::{}", class.name, constant.name)),
            }
        }
        Declaration::Function(name) => {
            let function = introspector.function(name).ok_or_else(unknown)?;
            Located {
                file: Some(function.file.clone()),
                line: Some(function.line),
                declaring_type: None,
                comment: function.doc_comment.clone().unwrap_or_default(),
                owner: None,
                cache_key: Some(format!("{}()", function.name)),
            }
        }
        Declaration::Closure {
            file,
            line,
            scope_class,
            doc_comment,
        } => Located {
            file: file.clone(),
            line: *line,
            declaring_type: scope_class.as_ref().map(|class| class.trim_start_matches('\\').to_string()),
            comment: doc_comment.clone().unwrap_or_default(),
            owner: None,
            cache_key: None,
        },
    };

    Ok(located)
}

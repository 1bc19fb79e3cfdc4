//! Error types for type resolution

use thiserror::Error;

/// Errors raised while resolving a type against a scope.
///
/// None of these are recoverable: the whole resolution request fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Node shape that cannot appear where it was found
    #[error("Cannot resolve related types, {kind} is unsupported as {context}")]
    UnsupportedNode {
        /// Kind of the offending node
        kind: &'static str,
        /// Position the node was found in
        context: &'static str,
    },

    /// `self`, `static` or `$this` outside of a class-like
    #[error("Cannot resolve `{symbol}`, no class was defined in the current scope")]
    UnresolvableRelativeType {
        /// The relative marker
        symbol: String,
    },

    /// `parent` in a class-like without a parent
    #[error("Class/type `{class}` doesn't have a parent")]
    NoParentType {
        /// Declaring class-like
        class: String,
    },

    /// Imported alias not declared on its source class-like
    #[error("A type alias `{alias}` was expected on class `{class}`, but none was found")]
    MissingAliasTarget {
        /// Name of the imported alias
        alias: String,
        /// Class-like the alias was imported from
        class: String,
    },

    /// Alias imported from a symbol that is not a known class-like
    #[error("Types can only be imported from a class-like structure; symbol `{symbol}` could not be found")]
    UnknownAliasSource {
        /// Resolved name of the source symbol
        symbol: String,
    },

    /// Alias imported from something that is not a class name
    #[error("Type import source should be a class name, got {kind} instead")]
    InvalidImportSource {
        /// Kind of the resolved source node
        kind: &'static str,
    },

    /// Local alias declared outside of a class-like
    #[error("Local type `{alias}` requires a class")]
    AliasRequiresDeclaringType {
        /// Name of the alias
        alias: String,
    },

    /// Fixed-arity pseudo-generic with the wrong number of arguments
    #[error("`{head}` expects {expected} type argument(s), got {actual}")]
    GenericArityMismatch {
        /// Generic head keyword
        head: String,
        /// Accepted argument counts, human-readable
        expected: String,
        /// Number of arguments given
        actual: usize,
    },

    /// Imported aliases that import each other
    #[error("Cyclic type alias import: {}", chain.join(" -> "))]
    CyclicTypeAlias {
        /// Class-likes visited, ending with the repeated one
        chain: Vec<String>,
    },

    /// Declaration missing from the introspector
    #[error("Cannot find {declaration}")]
    UnknownDeclaration {
        /// Human-readable declaration handle
        declaration: String,
    },
}

/// Errors raised by the tag helpers of a docblock.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    /// No tag with the requested name
    #[error("The `{name}` tag was not defined")]
    TagNotFound {
        /// Requested tag name
        name: String,
    },

    /// More than one tag with a name expected to be unique
    #[error("More than one `{name}` tags have been defined")]
    MultipleTagsFound {
        /// Requested tag name
        name: String,
    },

    /// The tag's types could not be resolved
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Errors raised while loading a resolver configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

//! Reserved type keywords.

/// Types that never resolve against imports or namespaces.
const BUILTIN_TYPES: &[&str] = &[
    "int",
    "integer",
    "string",
    "array-key",
    "bool",
    "boolean",
    "true",
    "false",
    "null",
    "float",
    "double",
    "scalar",
    "numeric",
    "array",
    "non-empty-array",
    "list",
    "non-empty-list",
    "iterable",
    "callable",
    "pure-callable",
    "pure-Closure",
    "resource",
    "closed-resource",
    "open-resource",
    "object",
    "mixed",
    "positive-int",
    "negative-int",
    "non-positive-int",
    "non-negative-int",
    "non-zero-int",
    "class-string",
    "interface-string",
    "trait-string",
    "enum-string",
    "callable-string",
    "numeric-string",
    "non-empty-string",
    "non-falsy-string",
    "truthy-string",
    "literal-string",
    "lowercase-string",
    "non-empty-lowercase-string",
    "void",
    "never",
    "never-return",
    "never-returns",
    "no-return",
    "int-mask",
    "int-mask-of",
    "key-of",
    "value-of",
];

/// Matched exactly: `Integer` or `Scalar` may be imported class names.
pub(crate) fn is_builtin(name: &str) -> bool {
    BUILTIN_TYPES.contains(&name)
}

/// Relative class markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Relative {
    /// `self`, `static` and `$this`
    Declaring,
    Parent,
}

pub(crate) fn relative(name: &str) -> Option<Relative> {
    if name.eq_ignore_ascii_case("self") || name.eq_ignore_ascii_case("static") || name == "$this" {
        Some(Relative::Declaring)
    } else if name.eq_ignore_ascii_case("parent") {
        Some(Relative::Parent)
    } else {
        None
    }
}

/// Parameter lists accepted by a builtin generic head.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PseudoGeneric {
    Fixed(&'static [&'static [&'static str]]),
    Variadic,
}

impl PseudoGeneric {
    /// Parameter names for `count` arguments, or a description of the
    /// accepted counts when none match.
    pub(crate) fn parameters(self, count: usize) -> Result<Vec<String>, String> {
        let PseudoGeneric::Fixed(accepted) = self else {
            return Ok(Vec::new());
        };
        match accepted.iter().find(|names| names.len() == count) {
            Some(names) => Ok(names.iter().map(|name| name.to_string()).collect()),
            None => {
                let counts: Vec<String> = accepted.iter().map(|names| names.len().to_string()).collect();
                Err(counts.join(" or "))
            }
        }
    }
}

const SINGLE: &[&[&str]] = &[&["T"]];
const VALUE: &[&[&str]] = &[&["TValue"]];
const KEY_VALUE: &[&[&str]] = &[&["TValue"], &["TKey", "TValue"]];
const RANGE: &[&[&str]] = &[&["TMin", "TMax"]];
const CLASS: &[&[&str]] = &[&["TClass"]];

pub(crate) fn pseudo_generic(head: &str) -> Option<PseudoGeneric> {
    let generic = match head {
        "key-of" | "value-of" => PseudoGeneric::Fixed(SINGLE),
        "int" => PseudoGeneric::Fixed(RANGE),
        "array" | "non-empty-array" => PseudoGeneric::Fixed(KEY_VALUE),
        "list" | "non-empty-list" | "iterable" => PseudoGeneric::Fixed(VALUE),
        "new" => PseudoGeneric::Fixed(CLASS),
        "class-string" | "interface-string" | "trait-string" | "enum-string" => PseudoGeneric::Fixed(SINGLE),
        "int-mask" | "int-mask-of" => PseudoGeneric::Variadic,
        _ => return None,
    };
    Some(generic)
}

/// Heads kept verbatim: `new` is an operator, not a class name.
pub(crate) fn is_verbatim_head(head: &str) -> bool {
    head == "new"
}

/// `int<min, max>` takes `min` and `max` as open bounds.
pub(crate) fn is_range_head(head: &str) -> bool {
    head == "int"
}

pub(crate) fn is_range_bound(name: &str) -> bool {
    matches!(name, "min" | "max")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_match_exactly() {
        assert!(is_builtin("int"));
        assert!(is_builtin("non-empty-string"));
        assert!(is_builtin("pure-Closure"));
        assert!(!is_builtin("Integer"));
        assert!(!is_builtin("Scalar"));
        assert!(!is_builtin("Foo"));
        assert!(!is_builtin("self"));
    }

    #[test]
    fn test_relative_markers() {
        assert_eq!(relative("Static"), Some(Relative::Declaring));
        assert_eq!(relative("$this"), Some(Relative::Declaring));
        assert_eq!(relative("PARENT"), Some(Relative::Parent));
        assert_eq!(relative("$This"), None);
        assert_eq!(relative("Parents"), None);
    }

    #[test]
    fn test_pseudo_generic_arity() {
        let array = pseudo_generic("array").unwrap();
        assert_eq!(array.parameters(1), Ok(vec!["TValue".to_string()]));
        assert_eq!(array.parameters(2), Ok(vec!["TKey".to_string(), "TValue".to_string()]));
        assert_eq!(array.parameters(3), Err("1 or 2".to_string()));

        let range = pseudo_generic("int").unwrap();
        assert_eq!(range.parameters(1), Err("2".to_string()));

        let mask = pseudo_generic("int-mask").unwrap();
        assert_eq!(mask.parameters(5), Ok(Vec::new()));

        assert_eq!(pseudo_generic("Collection"), None);
        assert_eq!(pseudo_generic("List"), None);
    }
}

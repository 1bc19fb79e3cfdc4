//! Docblock and tag nodes

use super::types::{TemplateDeclaration, TypeNode};
use serde::{Deserialize, Serialize};

/// A parsed docblock.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PhpDocNode {
    pub children: Vec<PhpDocChild>,
}

/// One line of free text, or one tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PhpDocChild {
    Text(String),
    Tag(PhpDocTag),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhpDocTag {
    /// Including the leading `@`
    pub name: String,
    pub value: TagValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamTag {
    pub ty: TypeNode,
    pub is_reference: bool,
    pub is_variadic: bool,
    /// Including the leading `$`
    pub parameter_name: String,
    pub description: String,
}

/// `@return`, `@throws` and `@mixin` share this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedTag {
    pub ty: TypeNode,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarTag {
    pub ty: TypeNode,
    pub variable_name: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyTag {
    pub ty: TypeNode,
    pub property_name: String,
    pub description: String,
}

/// `@phpstan-type Name = Type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeAliasTag {
    pub alias: String,
    pub ty: TypeNode,
}

/// `@phpstan-import-type Name from Class as Local`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeAliasImportTag {
    pub imported_alias: String,
    /// Identifier of the class-like the alias is declared on
    pub imported_from: TypeNode,
    pub imported_as: Option<String>,
}

impl TypeAliasImportTag {
    /// Name the alias is visible under in the importing scope.
    pub fn local_name(&self) -> &str {
        self.imported_as.as_deref().unwrap_or(&self.imported_alias)
    }
}

/// Parsed value of a tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TagValue {
    Param(ParamTag),
    Return(TypedTag),
    Throws(TypedTag),
    Mixin(TypedTag),
    Var(VarTag),
    Property(PropertyTag),
    Template(TemplateDeclaration),
    TypeAlias(TypeAliasTag),
    TypeAliasImport(TypeAliasImportTag),
    Extends(TypedTag),
    Implements(TypedTag),
    Uses(TypedTag),
    /// Any tag without a dedicated value shape
    Generic { value: String },
    /// Tag whose body did not parse
    Invalid { value: String, error: String },
}

impl TagValue {
    /// Rebuild this value with every type field replaced by `f(field)`.
    pub fn try_map_types<E, F>(self, f: &mut F) -> Result<TagValue, E>
    where
        F: FnMut(TypeNode) -> Result<TypeNode, E>,
    {
        Ok(match self {
            TagValue::Param(tag) => TagValue::Param(ParamTag { ty: f(tag.ty)?, ..tag }),
            TagValue::Return(tag) => TagValue::Return(map_typed(tag, f)?),
            TagValue::Throws(tag) => TagValue::Throws(map_typed(tag, f)?),
            TagValue::Mixin(tag) => TagValue::Mixin(map_typed(tag, f)?),
            TagValue::Extends(tag) => TagValue::Extends(map_typed(tag, f)?),
            TagValue::Implements(tag) => TagValue::Implements(map_typed(tag, f)?),
            TagValue::Uses(tag) => TagValue::Uses(map_typed(tag, f)?),
            TagValue::Var(tag) => TagValue::Var(VarTag { ty: f(tag.ty)?, ..tag }),
            TagValue::Property(tag) => TagValue::Property(PropertyTag { ty: f(tag.ty)?, ..tag }),
            TagValue::Template(tag) => {
                let bound = match tag.bound {
                    Some(bound) => Some(Box::new(f(*bound)?)),
                    None => None,
                };
                let default = match tag.default {
                    Some(default) => Some(Box::new(f(*default)?)),
                    None => None,
                };
                TagValue::Template(TemplateDeclaration { bound, default, ..tag })
            }
            TagValue::TypeAlias(tag) => TagValue::TypeAlias(TypeAliasTag { ty: f(tag.ty)?, ..tag }),
            TagValue::TypeAliasImport(tag) => TagValue::TypeAliasImport(TypeAliasImportTag {
                imported_from: f(tag.imported_from)?,
                ..tag
            }),
            other @ (TagValue::Generic { .. } | TagValue::Invalid { .. }) => other,
        })
    }

    /// The main type of the tag, if it has one.
    pub fn ty(&self) -> Option<&TypeNode> {
        match self {
            TagValue::Param(tag) => Some(&tag.ty),
            TagValue::Return(tag)
            | TagValue::Throws(tag)
            | TagValue::Mixin(tag)
            | TagValue::Extends(tag)
            | TagValue::Implements(tag)
            | TagValue::Uses(tag) => Some(&tag.ty),
            TagValue::Var(tag) => Some(&tag.ty),
            TagValue::Property(tag) => Some(&tag.ty),
            TagValue::TypeAlias(tag) => Some(&tag.ty),
            TagValue::Template(tag) => tag.bound.as_deref(),
            TagValue::TypeAliasImport(_) | TagValue::Generic { .. } | TagValue::Invalid { .. } => None,
        }
    }
}

fn map_typed<E, F>(tag: TypedTag, f: &mut F) -> Result<TypedTag, E>
where
    F: FnMut(TypeNode) -> Result<TypeNode, E>,
{
    Ok(TypedTag {
        ty: f(tag.ty)?,
        description: tag.description,
    })
}

impl PhpDocNode {
    /// All tags, in source order.
    pub fn tags(&self) -> impl Iterator<Item = &PhpDocTag> {
        self.children.iter().filter_map(|child| match child {
            PhpDocChild::Tag(tag) => Some(tag),
            PhpDocChild::Text(_) => None,
        })
    }

    /// Tags with exactly this name (`@param`).
    pub fn tags_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a PhpDocTag> + 'a {
        self.tags().filter(move |tag| tag.name == name)
    }

    /// Tags whose name is any of `names`.
    pub fn tags_in<'a>(&'a self, names: &'a [String]) -> impl Iterator<Item = &'a PhpDocTag> + 'a {
        self.tags().filter(move |tag| names.iter().any(|name| *name == tag.name))
    }
}

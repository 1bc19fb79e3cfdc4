//! Type tree nodes
//!
//! The closed set of shapes a docblock type expression can take, plus the
//! output-only nodes produced by resolution:
//! - [`TypeNode::TypeAlias`] for a locally declared or imported alias
//! - [`TypeNode::Template`] for a template parameter entry
//! - [`TypeNode::ConcreteGeneric`] / [`TypeNode::TemplateGeneric`] wrapping a
//!   resolved generic

use serde::{Deserialize, Serialize};

/// A docblock type expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeNode {
    /// Bare or qualified name: `int`, `Foo`, `\App\Foo`, `$this`
    Identifier(IdentifierType),

    /// `?T`
    Nullable(NullableType),

    /// `A|B`
    Union(UnionType),

    /// `A&B`
    Intersection(IntersectionType),

    /// `T[]`
    Array(ArrayType),

    /// `Foo<A, covariant B>`
    Generic(GenericType),

    /// `array{a: int, b?: string}`, `list{int, string}`
    ArrayShape(ArrayShape),

    /// `object{a: int}`
    ObjectShape(ObjectShape),

    /// `callable(int, string...): void`
    Callable(CallableType),

    /// `(T is int ? A : B)` or `($param is int ? A : B)`
    Conditional(ConditionalType),

    /// `T[K]`
    OffsetAccess(OffsetAccessType),

    /// Literal or class constant: `1`, `'foo'`, `Foo::BAR`
    Const(ConstType),

    /// Text that could not be parsed, passed through untouched
    Invalid(InvalidType),

    /// Named alias standing for its underlying type
    TypeAlias(TypeAlias),

    /// Template parameter entry, with its bound if declared
    Template(TemplateType),

    /// Generic whose arguments contain no unresolved template
    ConcreteGeneric(ResolvedGeneric),

    /// Generic still referencing at least one unresolved template
    TemplateGeneric(ResolvedGeneric),
}

/// A name reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierType {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NullableType {
    pub ty: Box<TypeNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnionType {
    pub types: Vec<TypeNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntersectionType {
    pub types: Vec<TypeNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayType {
    pub ty: Box<TypeNode>,
}

/// Variance of a generic argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Variance {
    #[default]
    Invariant,
    Covariant,
    Contravariant,
    /// `*` wildcard argument
    Bivariant,
}

/// Generic reference: head identifier plus arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericType {
    pub head: String,
    pub args: Vec<TypeNode>,
    /// One entry per argument
    pub variances: Vec<Variance>,
}

/// Which container keyword an array shape was written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArrayShapeKind {
    Array,
    NonEmptyArray,
    List,
    NonEmptyList,
}

impl ArrayShapeKind {
    /// Map a container keyword to its shape kind.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "array" => Some(ArrayShapeKind::Array),
            "non-empty-array" => Some(ArrayShapeKind::NonEmptyArray),
            "list" => Some(ArrayShapeKind::List),
            "non-empty-list" => Some(ArrayShapeKind::NonEmptyList),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            ArrayShapeKind::Array => "array",
            ArrayShapeKind::NonEmptyArray => "non-empty-array",
            ArrayShapeKind::List => "list",
            ArrayShapeKind::NonEmptyList => "non-empty-list",
        }
    }
}

/// Key of an array or object shape entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ShapeKey {
    Identifier(String),
    Integer(String),
    String(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeItem {
    /// Absent for positional entries (`list{int, string}`)
    pub key: Option<ShapeKey>,
    pub optional: bool,
    pub value: TypeNode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayShape {
    pub items: Vec<ShapeItem>,
    /// False when the shape ends with `...`
    pub sealed: bool,
    pub kind: ArrayShapeKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectShape {
    pub items: Vec<ShapeItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallableParameter {
    pub ty: TypeNode,
    pub is_reference: bool,
    pub is_variadic: bool,
    /// Including the leading `$`
    pub name: Option<String>,
    pub is_optional: bool,
}

/// Template parameter declaration, on a callable or in a `@template` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateDeclaration {
    pub name: String,
    pub bound: Option<Box<TypeNode>>,
    pub default: Option<Box<TypeNode>>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallableType {
    /// `callable`, `Closure`, `pure-callable`, ...
    pub identifier: String,
    pub parameters: Vec<CallableParameter>,
    pub return_type: Box<TypeNode>,
    pub templates: Vec<TemplateDeclaration>,
}

/// Left-hand side of a conditional type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ConditionalSubject {
    Type(Box<TypeNode>),
    /// Parameter name, including the leading `$`
    Parameter(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalType {
    pub subject: ConditionalSubject,
    pub target: Box<TypeNode>,
    pub if_type: Box<TypeNode>,
    pub else_type: Box<TypeNode>,
    pub negated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffsetAccessType {
    pub container: Box<TypeNode>,
    pub offset: Box<TypeNode>,
}

/// Constant expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConstExpr {
    True,
    False,
    Null,
    Integer { value: String },
    Float { value: String },
    String { value: String },
    /// `Foo::BAR`, `Foo::BAR_*`; an empty class name is a global constant
    Fetch { class_name: String, name: String },
    Array { items: Vec<ConstArrayItem> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstArrayItem {
    pub key: Option<ConstExpr>,
    pub value: ConstExpr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstType {
    pub expr: ConstExpr,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidType {
    /// The offending source text
    pub source: String,
    pub error: String,
}

/// A type alias after resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeAlias {
    pub name: String,
    pub ty: Box<TypeNode>,
    /// Class-like the alias was declared on
    pub declaring_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateType {
    pub name: String,
    pub bound: Option<Box<TypeNode>>,
}

/// A resolved generic together with the parameter names of the generic it
/// instantiates (`T`, `TKey`, ...), as declared on its head.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedGeneric {
    pub generic: GenericType,
    pub template_names: Vec<String>,
}

impl TypeNode {
    pub fn identifier(name: impl Into<String>) -> Self {
        TypeNode::Identifier(IdentifierType { name: name.into() })
    }

    pub fn nullable(ty: TypeNode) -> Self {
        TypeNode::Nullable(NullableType { ty: Box::new(ty) })
    }

    pub fn union(types: Vec<TypeNode>) -> Self {
        TypeNode::Union(UnionType { types })
    }

    pub fn intersection(types: Vec<TypeNode>) -> Self {
        TypeNode::Intersection(IntersectionType { types })
    }

    pub fn array_of(ty: TypeNode) -> Self {
        TypeNode::Array(ArrayType { ty: Box::new(ty) })
    }

    /// Generic with all-invariant arguments.
    pub fn generic(head: impl Into<String>, args: Vec<TypeNode>) -> Self {
        let variances = vec![Variance::Invariant; args.len()];
        TypeNode::Generic(GenericType {
            head: head.into(),
            args,
            variances,
        })
    }

    pub fn constant(expr: ConstExpr) -> Self {
        TypeNode::Const(ConstType { expr })
    }

    pub fn template(name: impl Into<String>, bound: Option<TypeNode>) -> Self {
        TypeNode::Template(TemplateType {
            name: name.into(),
            bound: bound.map(Box::new),
        })
    }

    pub fn type_alias(name: impl Into<String>, ty: TypeNode, declaring_type: impl Into<String>) -> Self {
        TypeNode::TypeAlias(TypeAlias {
            name: name.into(),
            ty: Box::new(ty),
            declaring_type: declaring_type.into(),
        })
    }

    /// The name, if this is a plain identifier.
    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            TypeNode::Identifier(id) => Some(&id.name),
            _ => None,
        }
    }

    /// The wrapped generic, for both resolved and unresolved generics.
    pub fn as_generic(&self) -> Option<&GenericType> {
        match self {
            TypeNode::Generic(generic) => Some(generic),
            TypeNode::ConcreteGeneric(resolved) | TypeNode::TemplateGeneric(resolved) => {
                Some(&resolved.generic)
            }
            _ => None,
        }
    }

    /// Variant name, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            TypeNode::Identifier(_) => "identifier",
            TypeNode::Nullable(_) => "nullable",
            TypeNode::Union(_) => "union",
            TypeNode::Intersection(_) => "intersection",
            TypeNode::Array(_) => "array",
            TypeNode::Generic(_) => "generic",
            TypeNode::ArrayShape(_) => "array shape",
            TypeNode::ObjectShape(_) => "object shape",
            TypeNode::Callable(_) => "callable",
            TypeNode::Conditional(_) => "conditional",
            TypeNode::OffsetAccess(_) => "offset access",
            TypeNode::Const(_) => "constant",
            TypeNode::Invalid(_) => "invalid",
            TypeNode::TypeAlias(_) => "type alias",
            TypeNode::Template(_) => "template",
            TypeNode::ConcreteGeneric(_) => "concrete generic",
            TypeNode::TemplateGeneric(_) => "template generic",
        }
    }
}

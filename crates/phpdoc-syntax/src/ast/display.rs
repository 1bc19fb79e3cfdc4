//! Docblock notation for type trees.

use super::types::*;
use std::fmt::{self, Display, Formatter, Write};

fn join<T: Display>(f: &mut Formatter<'_>, items: &[T], separator: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

/// Types that need parentheses when followed by `[]` or `[K]`.
fn needs_parens_as_element(ty: &TypeNode) -> bool {
    matches!(
        ty,
        TypeNode::Callable(_) | TypeNode::Const(_) | TypeNode::Nullable(_)
    )
}

fn write_element(f: &mut Formatter<'_>, ty: &TypeNode) -> fmt::Result {
    if needs_parens_as_element(ty) {
        write!(f, "({})", ty)
    } else {
        write!(f, "{}", ty)
    }
}

impl Display for TypeNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TypeNode::Identifier(id) => f.write_str(&id.name),
            TypeNode::Nullable(nullable) => write!(f, "?{}", nullable.ty),
            TypeNode::Union(union) => {
                f.write_char('(')?;
                join(f, &union.types, " | ")?;
                f.write_char(')')
            }
            TypeNode::Intersection(intersection) => {
                f.write_char('(')?;
                join(f, &intersection.types, " & ")?;
                f.write_char(')')
            }
            TypeNode::Array(array) => {
                write_element(f, &array.ty)?;
                f.write_str("[]")
            }
            TypeNode::Generic(generic) => write!(f, "{}", generic),
            TypeNode::ArrayShape(shape) => write!(f, "{}", shape),
            TypeNode::ObjectShape(shape) => {
                f.write_str("object{")?;
                join(f, &shape.items, ", ")?;
                f.write_char('}')
            }
            TypeNode::Callable(callable) => write!(f, "{}", callable),
            TypeNode::Conditional(conditional) => write!(f, "{}", conditional),
            TypeNode::OffsetAccess(access) => {
                write_element(f, &access.container)?;
                write!(f, "[{}]", access.offset)
            }
            TypeNode::Const(constant) => write!(f, "{}", constant.expr),
            TypeNode::Invalid(invalid) => f.write_str(&invalid.source),
            TypeNode::TypeAlias(alias) => write!(f, "{}", alias.ty),
            TypeNode::Template(template) => match &template.bound {
                Some(bound) => write!(f, "{} of {}", template.name, bound),
                None => f.write_str(&template.name),
            },
            TypeNode::ConcreteGeneric(resolved) | TypeNode::TemplateGeneric(resolved) => {
                write!(f, "{}", resolved.generic)
            }
        }
    }
}

impl Display for GenericType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}<", self.head)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match self.variances.get(i).copied().unwrap_or_default() {
                Variance::Invariant => write!(f, "{}", arg)?,
                Variance::Covariant => write!(f, "covariant {}", arg)?,
                Variance::Contravariant => write!(f, "contravariant {}", arg)?,
                Variance::Bivariant => f.write_char('*')?,
            }
        }
        f.write_char('>')
    }
}

impl Display for ShapeKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ShapeKey::Identifier(name) | ShapeKey::Integer(name) => f.write_str(name),
            ShapeKey::String(value) => write!(f, "'{}'", value.replace('\'', "\\'")),
        }
    }
}

impl Display for ShapeItem {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.key {
            Some(key) if self.optional => write!(f, "{}?: {}", key, self.value),
            Some(key) => write!(f, "{}: {}", key, self.value),
            None => write!(f, "{}", self.value),
        }
    }
}

impl Display for ArrayShape {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{", self.kind.keyword())?;
        join(f, &self.items, ", ")?;
        if !self.sealed {
            if !self.items.is_empty() {
                f.write_str(", ")?;
            }
            f.write_str("...")?;
        }
        f.write_char('}')
    }
}

impl Display for CallableParameter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ty)?;
        if self.is_reference || self.is_variadic || self.name.is_some() {
            f.write_char(' ')?;
        }
        if self.is_reference {
            f.write_char('&')?;
        }
        if self.is_variadic {
            f.write_str("...")?;
        }
        if let Some(name) = &self.name {
            f.write_str(name)?;
        }
        if self.is_optional {
            f.write_char('=')?;
        }
        Ok(())
    }
}

impl Display for TemplateDeclaration {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(bound) = &self.bound {
            write!(f, " of {}", bound)?;
        }
        if let Some(default) = &self.default {
            write!(f, " = {}", default)?;
        }
        Ok(())
    }
}

impl Display for CallableType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identifier)?;
        if !self.templates.is_empty() {
            f.write_char('<')?;
            join(f, &self.templates, ", ")?;
            f.write_char('>')?;
        }
        f.write_char('(')?;
        join(f, &self.parameters, ", ")?;
        write!(f, "): {}", self.return_type)
    }
}

impl Display for ConditionalType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_char('(')?;
        match &self.subject {
            ConditionalSubject::Type(ty) => write!(f, "{}", ty)?,
            ConditionalSubject::Parameter(name) => f.write_str(name)?,
        }
        f.write_str(if self.negated { " is not " } else { " is " })?;
        write!(f, "{} ? {} : {})", self.target, self.if_type, self.else_type)
    }
}

impl Display for ConstExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ConstExpr::True => f.write_str("true"),
            ConstExpr::False => f.write_str("false"),
            ConstExpr::Null => f.write_str("null"),
            ConstExpr::Integer { value } | ConstExpr::Float { value } => f.write_str(value),
            ConstExpr::String { value } => write!(f, "'{}'", value.replace('\'', "\\'")),
            ConstExpr::Fetch { class_name, name } if class_name.is_empty() => f.write_str(name),
            ConstExpr::Fetch { class_name, name } => write!(f, "{}::{}", class_name, name),
            ConstExpr::Array { items } => {
                f.write_char('[')?;
                join(f, items, ", ")?;
                f.write_char(']')
            }
        }
    }
}

impl Display for ConstArrayItem {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.key {
            Some(key) => write!(f, "{} => {}", key, self.value),
            None => write!(f, "{}", self.value),
        }
    }
}

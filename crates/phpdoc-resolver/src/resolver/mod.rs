//! Scope-aware type resolution.
//!
//! [`TypeResolver`] rewrites a parsed type tree so that every class
//! reference is fully qualified and every template or alias reference is
//! replaced by what the scope binds it to. Names go through these steps,
//! first match wins:
//!
//! 1. template parameters and type aliases of the generics resolver
//! 2. relative markers: `self`, `static`, `$this`, `parent`
//! 3. fully qualified names (leading `\`)
//! 4. builtin keywords (`int`, `list`, `non-empty-string`, ...)
//! 5. imports active at the scope's line
//! 6. the scope's namespace
//!
//! A name no step claims is kept as written.

mod keywords;

use crate::config::ResolverConfig;
use crate::error::ResolveError;
use crate::generics::{declared_template_names, GenericsResolver};
use crate::introspect::Introspector;
use crate::scope::Scope;
use keywords::Relative;
use phpdoc_source::{ImportsCache, NamespaceIndex};
use phpdoc_syntax::{
    ArrayShape, CallableParameter, CallableType, ConditionalSubject, ConditionalType, ConstArrayItem, ConstExpr,
    GenericType, ObjectShape, OffsetAccessType, ResolvedGeneric, ShapeItem, TemplateDeclaration, TemplateType,
    TypeNode,
};
use std::sync::Arc;
use tracing::trace;

/// Resolves type trees against a [`Scope`].
///
/// Holds no state of its own: the per-pass state (template bindings and
/// the concreteness flag) lives in the [`GenericsResolver`] handed to
/// [`TypeResolver::resolve`].
#[derive(Clone, Copy)]
pub struct TypeResolver<'a> {
    introspector: &'a dyn Introspector,
    imports: &'a ImportsCache,
    config: &'a ResolverConfig,
}

impl<'a> TypeResolver<'a> {
    /// Engine over `introspector`, reading file indexes from `imports`.
    pub fn new(introspector: &'a dyn Introspector, imports: &'a ImportsCache, config: &'a ResolverConfig) -> Self {
        Self {
            introspector,
            imports,
            config,
        }
    }

    /// Program the engine looks class-likes up in.
    pub fn introspector(&self) -> &'a dyn Introspector {
        self.introspector
    }

    /// Configuration the engine was built with.
    pub fn config(&self) -> &'a ResolverConfig {
        self.config
    }

    /// Resolve `ty` in `scope`.
    ///
    /// Class-like generics bind their arguments positionally into
    /// `generics`, and looking up an unbound template clears its flag, so
    /// callers wanting an isolated pass hand in a fork.
    pub fn resolve(
        &self,
        scope: &Scope,
        ty: TypeNode,
        generics: &mut GenericsResolver,
    ) -> Result<TypeNode, ResolveError> {
        match ty {
            TypeNode::Identifier(id) => self.resolve_identifier(scope, &id.name, generics),
            TypeNode::Nullable(nullable) => Ok(TypeNode::nullable(self.resolve(scope, *nullable.ty, generics)?)),
            TypeNode::Union(union) => Ok(TypeNode::union(self.resolve_all(scope, union.types, generics)?)),
            TypeNode::Intersection(intersection) => Ok(TypeNode::intersection(self.resolve_all(
                scope,
                intersection.types,
                generics,
            )?)),
            TypeNode::Array(array) => Ok(TypeNode::array_of(self.resolve(scope, *array.ty, generics)?)),
            TypeNode::Generic(generic) => self.resolve_generic(scope, generic, generics),
            TypeNode::ConcreteGeneric(resolved) | TypeNode::TemplateGeneric(resolved) => {
                self.resolve_generic(scope, resolved.generic, generics)
            }
            TypeNode::ArrayShape(shape) => Ok(TypeNode::ArrayShape(ArrayShape {
                items: self.resolve_shape_items(scope, shape.items, generics)?,
                ..shape
            })),
            TypeNode::ObjectShape(shape) => Ok(TypeNode::ObjectShape(ObjectShape {
                items: self.resolve_shape_items(scope, shape.items, generics)?,
            })),
            TypeNode::Callable(callable) => self.resolve_callable(scope, callable, generics),
            TypeNode::Conditional(conditional) => {
                let subject = match conditional.subject {
                    ConditionalSubject::Type(subject) => {
                        ConditionalSubject::Type(Box::new(self.resolve(scope, *subject, generics)?))
                    }
                    parameter @ ConditionalSubject::Parameter(_) => parameter,
                };
                Ok(TypeNode::Conditional(ConditionalType {
                    subject,
                    target: Box::new(self.resolve(scope, *conditional.target, generics)?),
                    if_type: Box::new(self.resolve(scope, *conditional.if_type, generics)?),
                    else_type: Box::new(self.resolve(scope, *conditional.else_type, generics)?),
                    negated: conditional.negated,
                }))
            }
            TypeNode::OffsetAccess(access) => Ok(TypeNode::OffsetAccess(OffsetAccessType {
                container: Box::new(self.resolve(scope, *access.container, generics)?),
                offset: Box::new(self.resolve(scope, *access.offset, generics)?),
            })),
            TypeNode::Const(constant) => Ok(TypeNode::constant(self.resolve_const(scope, constant.expr)?)),
            TypeNode::Template(template) => {
                let bound = match template.bound {
                    Some(bound) => Some(Box::new(self.resolve(scope, *bound, generics)?)),
                    None => None,
                };
                Ok(TypeNode::Template(TemplateType {
                    name: template.name,
                    bound,
                }))
            }
            // Aliases were resolved where they were declared.
            other @ (TypeNode::TypeAlias(_) | TypeNode::Invalid(_)) => Ok(other),
        }
    }

    /// Resolve a class name through the relative, fully qualified, builtin,
    /// import and namespace steps. Generics are not consulted.
    pub fn resolve_name(&self, scope: &Scope, symbol: &str) -> Result<String, ResolveError> {
        if let Some(relative) = keywords::relative(symbol) {
            let resolved = self.resolve_relative(scope, symbol, relative)?;
            trace!(symbol, resolved = %resolved, "resolved relative type");
            return Ok(resolved);
        }

        if let Some(absolute) = symbol.strip_prefix('\\') {
            return Ok(absolute.to_string());
        }

        if keywords::is_builtin(symbol) {
            return Ok(symbol.to_string());
        }

        let index = self.namespace_index(scope);
        if let Some(imported) = imported_name(&index, scope.line, symbol) {
            trace!(symbol, resolved = %imported, "resolved through imports");
            return Ok(imported);
        }

        if let Some(namespaced) = self.namespaced_name(&index, scope.line, symbol) {
            trace!(symbol, resolved = %namespaced, "resolved in namespace");
            return Ok(namespaced);
        }

        Ok(symbol.to_string())
    }

    fn resolve_identifier(
        &self,
        scope: &Scope,
        name: &str,
        generics: &mut GenericsResolver,
    ) -> Result<TypeNode, ResolveError> {
        if let Some(mapped) = generics.map(name) {
            trace!(symbol = name, "resolved through generics");
            return Ok(match mapped {
                TypeNode::Template(template) => match template.bound {
                    Some(bound) => *bound,
                    None => TypeNode::identifier(template.name),
                },
                other => other,
            });
        }
        Ok(TypeNode::identifier(self.resolve_name(scope, name)?))
    }

    fn resolve_relative(&self, scope: &Scope, symbol: &str, relative: Relative) -> Result<String, ResolveError> {
        let declaring = scope
            .declaring_type
            .as_deref()
            .ok_or_else(|| ResolveError::UnresolvableRelativeType {
                symbol: symbol.to_string(),
            })?;

        match relative {
            Relative::Declaring => Ok(declaring.to_string()),
            Relative::Parent => self
                .introspector
                .parent_of(declaring)
                .ok_or_else(|| ResolveError::NoParentType {
                    class: declaring.to_string(),
                }),
        }
    }

    fn namespaced_name(&self, index: &NamespaceIndex, line: Option<u32>, symbol: &str) -> Option<String> {
        let namespace = index.namespace_at(line);
        if namespace.is_empty() {
            return None;
        }
        let candidate = format!("{}\\{}", namespace, symbol);
        if self.config.require_existing_namespaced_symbols && !self.introspector.class_exists(&candidate) {
            return None;
        }
        Some(candidate)
    }

    fn namespace_index(&self, scope: &Scope) -> Arc<NamespaceIndex> {
        match scope.file() {
            Some(file) => self.imports.index_for(file),
            None => Arc::new(NamespaceIndex::empty()),
        }
    }

    fn resolve_all(
        &self,
        scope: &Scope,
        types: Vec<TypeNode>,
        generics: &mut GenericsResolver,
    ) -> Result<Vec<TypeNode>, ResolveError> {
        types.into_iter().map(|ty| self.resolve(scope, ty, generics)).collect()
    }

    /// Values are resolved; keys are names, not types.
    fn resolve_shape_items(
        &self,
        scope: &Scope,
        items: Vec<ShapeItem>,
        generics: &mut GenericsResolver,
    ) -> Result<Vec<ShapeItem>, ResolveError> {
        items
            .into_iter()
            .map(|item| {
                Ok(ShapeItem {
                    value: self.resolve(scope, item.value, generics)?,
                    ..item
                })
            })
            .collect()
    }

    fn resolve_generic(
        &self,
        scope: &Scope,
        generic: GenericType,
        generics: &mut GenericsResolver,
    ) -> Result<TypeNode, ResolveError> {
        let GenericType { head, args, variances } = generic;

        let Some(pseudo) = keywords::pseudo_generic(&head) else {
            let head = self.resolve_head(scope, &head, generics)?;
            let args = self.resolve_all(scope, args, generics)?;
            for (index, arg) in args.iter().enumerate() {
                generics.set_template_type_at(index, arg.clone());
            }
            let template_names = declared_template_names(self.introspector, self.config, &head);
            return Ok(wrap_generic(generics, GenericType { head, args, variances }, template_names));
        };

        let template_names =
            pseudo
                .parameters(args.len())
                .map_err(|expected| ResolveError::GenericArityMismatch {
                    head: head.clone(),
                    expected,
                    actual: args.len(),
                })?;

        let range = keywords::is_range_head(&head);
        let head = if keywords::is_verbatim_head(&head) {
            head
        } else {
            self.resolve_head(scope, &head, generics)?
        };

        let args = args
            .into_iter()
            .map(|arg| {
                if range && arg.as_identifier().is_some_and(keywords::is_range_bound) {
                    Ok(arg)
                } else {
                    self.resolve(scope, arg, generics)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(wrap_generic(generics, GenericType { head, args, variances }, template_names))
    }

    /// The head of a generic must stay a name.
    fn resolve_head(&self, scope: &Scope, head: &str, generics: &mut GenericsResolver) -> Result<String, ResolveError> {
        match self.resolve_identifier(scope, head, generics)? {
            TypeNode::Identifier(id) => Ok(id.name),
            other => Err(ResolveError::UnsupportedNode {
                kind: other.kind_name(),
                context: "a generic head",
            }),
        }
    }

    fn resolve_callable(
        &self,
        scope: &Scope,
        callable: CallableType,
        generics: &mut GenericsResolver,
    ) -> Result<TypeNode, ResolveError> {
        // Callable templates shadow outer bindings and stay unresolved, but
        // only inside the callable. The clone shares the concreteness flag.
        let mut inner = generics.clone();
        for template in &callable.templates {
            inner.set_template_type(template.name.clone(), TypeNode::identifier(&template.name));
        }

        let parameters = callable
            .parameters
            .into_iter()
            .map(|parameter| {
                Ok(CallableParameter {
                    ty: self.resolve(scope, parameter.ty, &mut inner)?,
                    ..parameter
                })
            })
            .collect::<Result<Vec<_>, ResolveError>>()?;

        let templates = callable
            .templates
            .into_iter()
            .map(|template| self.resolve_template_declaration(scope, template, &mut inner))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TypeNode::Callable(CallableType {
            identifier: self.resolve_name(scope, &callable.identifier)?,
            parameters,
            return_type: Box::new(self.resolve(scope, *callable.return_type, &mut inner)?),
            templates,
        }))
    }

    fn resolve_template_declaration(
        &self,
        scope: &Scope,
        template: TemplateDeclaration,
        generics: &mut GenericsResolver,
    ) -> Result<TemplateDeclaration, ResolveError> {
        let bound = match template.bound {
            Some(bound) => Some(Box::new(self.resolve(scope, *bound, generics)?)),
            None => None,
        };
        let default = match template.default {
            Some(default) => Some(Box::new(self.resolve(scope, *default, generics)?)),
            None => None,
        };
        Ok(TemplateDeclaration {
            bound,
            default,
            ..template
        })
    }

    /// Class constant fetches get their class resolved; literals stay.
    fn resolve_const(&self, scope: &Scope, expr: ConstExpr) -> Result<ConstExpr, ResolveError> {
        match expr {
            ConstExpr::Fetch { class_name, name } if !class_name.is_empty() => Ok(ConstExpr::Fetch {
                class_name: self.resolve_name(scope, &class_name)?,
                name,
            }),
            ConstExpr::Array { items } => {
                let items = items
                    .into_iter()
                    .map(|item| {
                        Ok(ConstArrayItem {
                            key: item.key.map(|key| self.resolve_const(scope, key)).transpose()?,
                            value: self.resolve_const(scope, item.value)?,
                        })
                    })
                    .collect::<Result<Vec<_>, ResolveError>>()?;
                Ok(ConstExpr::Array { items })
            }
            other => Ok(other),
        }
    }
}

/// Target of the import matching the first segment of `symbol`, with the
/// remaining segments appended.
fn imported_name(index: &NamespaceIndex, line: Option<u32>, symbol: &str) -> Option<String> {
    let (top, rest) = match symbol.split_once('\\') {
        Some((top, rest)) => (top, rest),
        None => (symbol, ""),
    };
    let target = index.alias_target(line, top)?;
    if rest.is_empty() {
        Some(target.to_string())
    } else {
        Some(format!("{}\\{}", target.trim_end_matches('\\'), rest))
    }
}

fn wrap_generic(generics: &GenericsResolver, generic: GenericType, template_names: Vec<String>) -> TypeNode {
    let resolved = ResolvedGeneric {
        generic,
        template_names,
    };
    if generics.is_concrete() {
        TypeNode::ConcreteGeneric(resolved)
    } else {
        TypeNode::TemplateGeneric(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phpdoc_source::ProgramIndex;
    use phpdoc_syntax::parse_type;

    fn resolve_in(scope: &Scope, source: &str) -> Result<TypeNode, ResolveError> {
        let program = ProgramIndex::new();
        let imports = ImportsCache::new();
        let config = ResolverConfig::default();
        let resolver = TypeResolver::new(&program, &imports, &config);
        let mut generics = GenericsResolver::new();
        resolver.resolve(scope, parse_type(source).unwrap(), &mut generics)
    }

    #[test]
    fn test_fully_qualified_name_loses_backslash() {
        let ty = resolve_in(&Scope::default(), "\\Foo\\Bar").unwrap();
        assert_eq!(ty, TypeNode::identifier("Foo\\Bar"));
    }

    #[test]
    fn test_builtin_is_kept() {
        let ty = resolve_in(&Scope::default(), "non-empty-string").unwrap();
        assert_eq!(ty, TypeNode::identifier("non-empty-string"));
    }

    #[test]
    fn test_self_without_class() {
        let err = resolve_in(&Scope::default(), "self").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot resolve `self`, no class was defined in the current scope"
        );
    }

    #[test]
    fn test_parent_of_unknown_class() {
        let scope = Scope::default().with_declaring_type("App\\Child");
        let err = resolve_in(&scope, "parent").unwrap_err();
        assert_eq!(
            err,
            ResolveError::NoParentType {
                class: "App\\Child".to_string()
            }
        );
    }

    #[test]
    fn test_arity_mismatch() {
        let err = resolve_in(&Scope::default(), "list<int, string, bool>").unwrap_err();
        assert!(matches!(err, ResolveError::GenericArityMismatch { actual: 3, .. }));
    }

    #[test]
    fn test_imported_name_appends_segments() {
        let index = NamespaceIndex::parse("<?php\nnamespace App;\nuse Lib\\Models;\n");
        assert_eq!(
            imported_name(&index, Some(3), "Models\\User").as_deref(),
            Some("Lib\\Models\\User")
        );
        assert_eq!(imported_name(&index, Some(3), "models").as_deref(), Some("Lib\\Models"));
        assert_eq!(imported_name(&index, Some(3), "User"), None);
    }
}

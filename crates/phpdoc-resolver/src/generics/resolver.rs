//! Template, alias and import bindings visible to a scope.

use super::state::ConcretenessFlag;
use indexmap::IndexMap;
use phpdoc_syntax::TypeNode;

/// Ordered symbol -> type map.
pub type TypeMap = IndexMap<String, TypeNode>;

/// Symbols a scope binds to types: template parameters, local type aliases
/// and imported type aliases, plus a concreteness flag.
///
/// Looking up a template that is only bound to itself marks the flag as
/// not concrete. The flag is never reset by lookups.
#[derive(Debug, Clone, Default)]
pub struct GenericsResolver {
    template_types: TypeMap,
    defined_types: TypeMap,
    imported_types: TypeMap,
    flag: ConcretenessFlag,
}

impl GenericsResolver {
    /// Resolver binding nothing, with a concrete flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver over prebuilt maps, with a fresh concrete flag.
    pub fn from_maps(template_types: TypeMap, defined_types: TypeMap, imported_types: TypeMap) -> Self {
        Self {
            template_types,
            defined_types,
            imported_types,
            flag: ConcretenessFlag::default(),
        }
    }

    /// Bind (or rebind) a template parameter by name.
    pub fn set_template_type(&mut self, name: impl Into<String>, ty: TypeNode) {
        self.template_types.insert(name.into(), ty);
    }

    /// Bind a local type alias.
    pub fn set_defined_type(&mut self, name: impl Into<String>, ty: TypeNode) {
        self.defined_types.insert(name.into(), ty);
    }

    /// Bind an imported type alias.
    pub fn set_imported_type(&mut self, name: impl Into<String>, ty: TypeNode) {
        self.imported_types.insert(name.into(), ty);
    }

    /// Rebind the template parameter declared at `index`.
    ///
    /// Returns false, binding nothing, when fewer templates are declared.
    pub fn set_template_type_at(&mut self, index: usize, ty: TypeNode) -> bool {
        match self.template_types.get_index_mut(index) {
            Some((_, slot)) => {
                *slot = ty;
                true
            }
            None => false,
        }
    }

    /// Type bound to `name`, looking at templates, then local aliases, then
    /// imported aliases.
    pub fn map(&self, name: &str) -> Option<TypeNode> {
        let found = self
            .template_types
            .get(name)
            .or_else(|| self.defined_types.get(name))
            .or_else(|| self.imported_types.get(name))?;

        if is_self_reference(name, found) {
            tracing::trace!(template = name, "template is not bound to a concrete type");
            self.flag.set_concrete(false);
        }
        Some(found.clone())
    }

    /// Whether a lookup met an unbound template.
    pub fn has_mapped_template_type(&self) -> bool {
        !self.flag.is_concrete()
    }

    /// Whether every template met so far was bound.
    pub fn is_concrete(&self) -> bool {
        self.flag.is_concrete()
    }

    /// Set the flag, and through groups every flag it shares leaves with.
    pub fn set_concrete(&self, concrete: bool) {
        self.flag.set_concrete(concrete);
    }

    /// The concreteness flag.
    pub fn flag(&self) -> &ConcretenessFlag {
        &self.flag
    }

    /// Union of both resolvers; entries of `second` win. The result's flag
    /// groups both input flags.
    pub fn merged(first: &GenericsResolver, second: &GenericsResolver) -> Self {
        let merge = |a: &TypeMap, b: &TypeMap| -> TypeMap {
            let mut merged = a.clone();
            merged.extend(b.iter().map(|(name, ty)| (name.clone(), ty.clone())));
            merged
        };

        Self {
            template_types: merge(&first.template_types, &second.template_types),
            defined_types: merge(&first.defined_types, &second.defined_types),
            imported_types: merge(&first.imported_types, &second.imported_types),
            flag: ConcretenessFlag::group(vec![first.flag.clone(), second.flag.clone()]),
        }
    }

    /// Copy with the same bindings and an independent flag.
    pub fn fork(&self) -> Self {
        Self {
            template_types: self.template_types.clone(),
            defined_types: self.defined_types.clone(),
            imported_types: self.imported_types.clone(),
            flag: self.flag.detached(),
        }
    }

    /// Declared template parameter names, in declaration order.
    pub fn template_names(&self) -> Vec<String> {
        self.template_types.keys().cloned().collect()
    }

    /// Template parameters and what they are bound to.
    pub fn template_types(&self) -> &TypeMap {
        &self.template_types
    }

    /// Local type alias named `name`.
    pub fn defined_type(&self, name: &str) -> Option<&TypeNode> {
        self.defined_types.get(name)
    }

    /// Imported type alias named `name`.
    pub fn imported_type(&self, name: &str) -> Option<&TypeNode> {
        self.imported_types.get(name)
    }

    /// Whether no symbol is bound.
    pub fn is_empty(&self) -> bool {
        self.template_types.is_empty() && self.defined_types.is_empty() && self.imported_types.is_empty()
    }
}

/// A template standing for itself: declared without bound, or bound to its
/// own name.
fn is_self_reference(name: &str, ty: &TypeNode) -> bool {
    match ty {
        TypeNode::Identifier(id) => id.name == name,
        TypeNode::Template(template) => template.name == name && template.bound.is_none(),
        _ => false,
    }
}

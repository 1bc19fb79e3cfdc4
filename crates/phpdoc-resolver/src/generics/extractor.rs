//! Collects the templates and type aliases a docblock declares.

use super::cache::GenericsCache;
use super::resolver::{GenericsResolver, TypeMap};
use crate::config::ResolverConfig;
use crate::error::ResolveError;
use crate::introspect::Introspector;
use crate::resolver::TypeResolver;
use crate::scope::Scope;
use phpdoc_syntax::{parse_docblock, PhpDocNode, TagValue, TypeNode};
use tracing::debug;

/// Builds the generics a docblock declares.
///
/// Template tags come first, then local type aliases, then imported
/// aliases; each declaration can use the ones before it. Imported aliases
/// are read from the docblock of their source class-like, whose own
/// imports are followed in turn.
pub struct GenericsExtractor<'a> {
    resolver: TypeResolver<'a>,
    cache: Option<&'a GenericsCache>,
}

impl<'a> GenericsExtractor<'a> {
    /// Extractor without a cache: every class is extracted afresh.
    pub fn new(resolver: TypeResolver<'a>) -> Self {
        Self { resolver, cache: None }
    }

    /// Reuse and record class-like generics in `cache`.
    pub fn with_cache(mut self, cache: &'a GenericsCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Generics declared by `doc`, which appears in `scope`.
    ///
    /// The result holds only what `doc` declares; combine it with
    /// `scope.generics` through [`GenericsResolver::merged`].
    pub fn extract(&self, scope: &Scope, doc: &PhpDocNode) -> Result<GenericsResolver, ResolveError> {
        let mut trail = Vec::new();
        self.extract_with_trail(scope, doc, &mut trail)
    }

    /// Complete generics of a class-like's own docblock.
    pub fn class_generics(&self, class: &str) -> Result<GenericsResolver, ResolveError> {
        let mut trail = Vec::new();
        self.class_generics_with_trail(class, &mut trail)
    }

    fn extract_with_trail(
        &self,
        scope: &Scope,
        doc: &PhpDocNode,
        trail: &mut Vec<String>,
    ) -> Result<GenericsResolver, ResolveError> {
        let config = self.resolver.config();
        // Inherited bindings plus everything declared so far.
        let mut working = scope.generics.fork();

        let mut templates = TypeMap::new();
        for tag in doc.tags_in(&config.template_tags) {
            let TagValue::Template(declaration) = &tag.value else {
                continue;
            };
            let bound = match &declaration.bound {
                Some(bound) => Some(self.resolver.resolve(scope, (**bound).clone(), &mut working)?),
                None => None,
            };
            let template = TypeNode::template(&declaration.name, bound);
            working.set_template_type(declaration.name.clone(), template.clone());
            templates.insert(declaration.name.clone(), template);
        }

        let mut defined = TypeMap::new();
        for tag in doc.tags_in(&config.type_alias_tags) {
            let TagValue::TypeAlias(alias) = &tag.value else {
                continue;
            };
            let declaring = scope
                .declaring_type
                .as_deref()
                .ok_or_else(|| ResolveError::AliasRequiresDeclaringType {
                    alias: alias.alias.clone(),
                })?;
            let ty = self.resolver.resolve(scope, alias.ty.clone(), &mut working)?;
            let entry = TypeNode::type_alias(&alias.alias, ty, declaring);
            working.set_defined_type(alias.alias.clone(), entry.clone());
            defined.insert(alias.alias.clone(), entry);
        }

        let mut imported = TypeMap::new();
        for tag in doc.tags_in(&config.import_type_tags) {
            let TagValue::TypeAliasImport(import) = &tag.value else {
                continue;
            };
            let class = match self.resolver.resolve(scope, import.imported_from.clone(), &mut working)? {
                TypeNode::Identifier(id) => id.name,
                other => {
                    return Err(ResolveError::InvalidImportSource {
                        kind: other.kind_name(),
                    })
                }
            };
            if !self.resolver.introspector().class_exists(&class) {
                return Err(ResolveError::UnknownAliasSource { symbol: class });
            }

            let ty = self.alias_from_class(&class, &import.imported_alias, trail)?;
            let entry = TypeNode::type_alias(import.local_name(), ty, &class);
            working.set_imported_type(import.local_name(), entry.clone());
            imported.insert(import.local_name().to_string(), entry);
        }

        debug!(
            declaring_type = scope.declaring_type.as_deref().unwrap_or(""),
            templates = templates.len(),
            aliases = defined.len(),
            imports = imported.len(),
            "extracted generics"
        );
        Ok(GenericsResolver::from_maps(templates, defined, imported))
    }

    /// Type of the local alias `alias` declared on `class`.
    fn alias_from_class(&self, class: &str, alias: &str, trail: &mut Vec<String>) -> Result<TypeNode, ResolveError> {
        if let Some(position) = trail.iter().position(|seen| seen.eq_ignore_ascii_case(class)) {
            let mut chain = trail[position..].to_vec();
            chain.push(class.to_string());
            return Err(ResolveError::CyclicTypeAlias { chain });
        }

        trail.push(class.to_string());
        let generics = self.class_generics_with_trail(class, trail);
        trail.pop();

        match generics?.defined_type(alias) {
            Some(TypeNode::TypeAlias(found)) => Ok((*found.ty).clone()),
            Some(other) => Ok(other.clone()),
            None => Err(ResolveError::MissingAliasTarget {
                alias: alias.to_string(),
                class: class.to_string(),
            }),
        }
    }

    fn class_generics_with_trail(&self, class: &str, trail: &mut Vec<String>) -> Result<GenericsResolver, ResolveError> {
        let class_like = self
            .resolver
            .introspector()
            .class_like(class)
            .ok_or_else(|| ResolveError::UnknownAliasSource {
                symbol: class.to_string(),
            })?;

        if let Some(cached) = self.cache.and_then(|cache| cache.get(&class_like.name)) {
            return Ok(cached);
        }

        let scope = Scope::for_class(class_like);
        let doc = parse_docblock(&scope.comment);
        let local = self.extract_with_trail(&scope, &doc, trail)?;
        let generics = GenericsResolver::merged(&scope.generics, &local);

        if let Some(cache) = self.cache {
            cache.insert(class_like.name.clone(), generics.fork());
        }
        Ok(generics)
    }
}

/// Template parameter names declared on a class-like's docblock, in order.
///
/// Bounds are not resolved. Unknown class-likes declare none.
pub fn declared_template_names(introspector: &dyn Introspector, config: &ResolverConfig, class: &str) -> Vec<String> {
    let Some(comment) = introspector
        .class_like(class)
        .and_then(|class_like| class_like.doc_comment.as_deref())
    else {
        return Vec::new();
    };

    parse_docblock(comment)
        .tags_in(&config.template_tags)
        .filter_map(|tag| match &tag.value {
            TagValue::Template(declaration) => Some(declaration.name.clone()),
            _ => None,
        })
        .collect()
}

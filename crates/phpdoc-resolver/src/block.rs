//! A docblock bound to its scope, with resolved tag access.

use crate::error::{ResolveError, TagError};
use crate::factory::DocBlockFactory;
use crate::generics::GenericsResolver;
use crate::scope::Scope;
use phpdoc_syntax::{parse_docblock, PhpDocChild, PhpDocNode, TagValue, TypeNode};
use std::cell::OnceCell;

/// Parsed docblock plus the scope its types resolve in.
///
/// The generics the docblock declares are extracted on first use. Every tag
/// is resolved against its own fork of them, so binding arguments or
/// meeting unbound templates in one tag leaves the others untouched.
pub struct Block<'f> {
    factory: &'f DocBlockFactory,
    scope: Scope,
    doc: PhpDocNode,
    generics: OnceCell<GenericsResolver>,
}

impl<'f> Block<'f> {
    pub(crate) fn new(factory: &'f DocBlockFactory, scope: Scope) -> Self {
        let doc = parse_docblock(&scope.comment);
        Self {
            factory,
            scope,
            doc,
            generics: OnceCell::new(),
        }
    }

    /// Use already extracted generics instead of extracting them again.
    pub(crate) fn with_generics(mut self, generics: GenericsResolver) -> Self {
        self.generics = OnceCell::from(generics);
        self
    }

    /// Scope the docblock is resolved in.
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// The unresolved parse tree.
    pub fn doc(&self) -> &PhpDocNode {
        &self.doc
    }

    /// First non-empty text line before any tag.
    pub fn summary(&self) -> String {
        self.leading_text()
            .find(|line| !line.is_empty())
            .unwrap_or_default()
            .to_string()
    }

    /// Text between the summary and the first tag.
    pub fn description(&self) -> String {
        let lines: Vec<&str> = self.leading_text().skip_while(|line| line.is_empty()).skip(1).collect();
        lines.join("\n").trim().to_string()
    }

    fn leading_text(&self) -> impl Iterator<Item = &str> {
        self.doc.children.iter().map_while(|child| match child {
            PhpDocChild::Text(text) => Some(text.trim()),
            PhpDocChild::Tag(_) => None,
        })
    }

    /// Scope generics merged with the ones this docblock declares.
    pub fn generics_resolver(&self) -> Result<&GenericsResolver, ResolveError> {
        if let Some(generics) = self.generics.get() {
            return Ok(generics);
        }
        let local = self.factory.extractor().extract(&self.scope, &self.doc)?;
        let generics = GenericsResolver::merged(&self.scope.generics, &local);
        Ok(self.generics.get_or_init(|| generics))
    }

    /// Resolve a free-standing type in this docblock's scope.
    pub fn resolve_type(&self, ty: TypeNode) -> Result<TypeNode, ResolveError> {
        let mut generics = self.generics_resolver()?.fork();
        self.factory.type_resolver().resolve(&self.scope, ty, &mut generics)
    }

    /// Resolved values of all tags, or of the tags named `name`.
    pub fn tags(&self, name: Option<&str>) -> Result<Vec<TagValue>, ResolveError> {
        let name = name.map(normalize_tag_name);
        self.doc
            .tags()
            .filter(|tag| name.as_deref().map_or(true, |name| tag.name == name))
            .map(|tag| self.resolve_tag(tag.value.clone()))
            .collect()
    }

    /// The single tag named `name`, if any.
    pub fn find_tag(&self, name: &str) -> Result<Option<TagValue>, TagError> {
        let mut tags = self.tags(Some(name))?;
        if tags.len() > 1 {
            return Err(TagError::MultipleTagsFound {
                name: normalize_tag_name(name),
            });
        }
        Ok(tags.pop())
    }

    /// The single tag named `name`.
    pub fn tag(&self, name: &str) -> Result<TagValue, TagError> {
        self.find_tag(name)?.ok_or_else(|| TagError::TagNotFound {
            name: normalize_tag_name(name),
        })
    }

    /// Whether at least one tag is named `name`; the `@` is optional.
    pub fn has_tag(&self, name: &str) -> bool {
        let name = normalize_tag_name(name);
        self.doc.tags().any(|tag| tag.name == name)
    }

    fn resolve_tag(&self, value: TagValue) -> Result<TagValue, ResolveError> {
        let mut generics = self.generics_resolver()?.fork();
        let resolver = self.factory.type_resolver();
        value.try_map_types(&mut |ty| resolver.resolve(&self.scope, ty, &mut generics))
    }
}

/// Tag names are matched with their `@`; it may be omitted by callers.
fn normalize_tag_name(name: &str) -> String {
    if name.starts_with('@') {
        name.to_string()
    } else {
        format!("@{}", name)
    }
}

//! Entry point: builds resolved docblocks for declarations and scopes.

use crate::block::Block;
use crate::config::ResolverConfig;
use crate::declaration::{locate, Declaration, Located};
use crate::error::ResolveError;
use crate::generics::{GenericsCache, GenericsExtractor, GenericsResolver};
use crate::introspect::Introspector;
use crate::resolver::TypeResolver;
use crate::scope::Scope;
use phpdoc_source::{ImportsCache, ProgramIndex};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Creates [`Block`]s and owns the state they share: the program
/// introspector, the configuration and both caches.
///
/// Caches can be shared between factories through [`with_caches`]; they
/// must then be fed by the same program.
///
/// [`with_caches`]: DocBlockFactory::with_caches
pub struct DocBlockFactory {
    introspector: Arc<dyn Introspector>,
    config: ResolverConfig,
    imports: Arc<ImportsCache>,
    generics: Arc<GenericsCache>,
}

impl DocBlockFactory {
    /// Factory over `introspector` with the default config and empty caches.
    pub fn new(introspector: Arc<dyn Introspector>) -> Self {
        Self {
            introspector,
            config: ResolverConfig::default(),
            imports: Arc::new(ImportsCache::new()),
            generics: Arc::new(GenericsCache::new()),
        }
    }

    /// Index in-memory sources and prime the imports cache with them, so
    /// no file is read from disk.
    pub fn for_sources<I, P, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = (P, S)>,
        P: Into<PathBuf>,
        S: AsRef<str>,
    {
        let mut program = ProgramIndex::new();
        for (path, source) in sources {
            program.add_source(path, source.as_ref());
        }

        let imports = ImportsCache::new();
        for (path, index) in program.files() {
            imports.insert(path.clone(), Arc::clone(index));
        }
        debug!(files = imports.len(), "indexed sources");

        Self {
            introspector: Arc::new(program),
            config: ResolverConfig::default(),
            imports: Arc::new(imports),
            generics: Arc::new(GenericsCache::new()),
        }
    }

    /// Replace the configuration. Cached generics extracted under the
    /// previous one are dropped.
    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self.generics.clear();
        self
    }

    /// Share caches with other factories.
    pub fn with_caches(mut self, imports: Arc<ImportsCache>, generics: Arc<GenericsCache>) -> Self {
        self.imports = imports;
        self.generics = generics;
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Program the factory introspects.
    pub fn introspector(&self) -> &dyn Introspector {
        self.introspector.as_ref()
    }

    /// Per-file namespace/alias indexes.
    pub fn imports_cache(&self) -> &Arc<ImportsCache> {
        &self.imports
    }

    /// Generics resolvers keyed by declaration.
    pub fn generics_cache(&self) -> &Arc<GenericsCache> {
        &self.generics
    }

    /// Engine borrowing this factory's introspector, imports and config.
    pub fn type_resolver(&self) -> TypeResolver<'_> {
        TypeResolver::new(self.introspector.as_ref(), &self.imports, &self.config)
    }

    /// Extractor writing class generics through to the shared cache.
    pub fn extractor(&self) -> GenericsExtractor<'_> {
        GenericsExtractor::new(self.type_resolver()).with_cache(&self.generics)
    }

    /// Scope of `declaration`'s docblock. Members inherit the generics of
    /// their class-like.
    pub fn scope_for(&self, declaration: &Declaration) -> Result<Scope, ResolveError> {
        self.scope_from(locate(self.introspector.as_ref(), declaration)?)
    }

    fn scope_from(&self, located: Located<'_>) -> Result<Scope, ResolveError> {
        let generics = match located.owner {
            Some(owner) => self.extractor().class_generics(&owner.name)?,
            None => GenericsResolver::new(),
        };

        Ok(Scope {
            file: located.file,
            line: located.line,
            declaring_type: located.declaring_type,
            comment: located.comment,
            generics,
        })
    }

    /// Complete generics visible in `declaration`'s docblock.
    pub fn generics_for(&self, declaration: &Declaration) -> Result<GenericsResolver, ResolveError> {
        Ok(self.create_from_declaration(declaration)?.generics_resolver()?.fork())
    }

    /// Resolved docblock of `declaration`.
    ///
    /// Fails with [`ResolveError::UnknownDeclaration`] when the introspector
    /// does not know it, or with the first error of its generics extraction.
    pub fn create_from_declaration(&self, declaration: &Declaration) -> Result<Block<'_>, ResolveError> {
        let located = locate(self.introspector.as_ref(), declaration)?;
        let cache_key = located.cache_key.clone();
        let block = self.create_from_scope(self.scope_from(located)?);

        let Some(key) = cache_key else {
            return Ok(block);
        };
        if let Some(cached) = self.generics.get(&key) {
            return Ok(block.with_generics(cached));
        }

        let generics = block.generics_resolver()?.fork();
        self.generics.insert(key, generics.fork());
        Ok(block.with_generics(generics))
    }

    /// Docblock of an explicit scope; its generics are extracted on first use.
    pub fn create_from_scope(&self, scope: Scope) -> Block<'_> {
        Block::new(self, scope)
    }

    /// Docblock without file, line or declaring class-like: only fully
    /// qualified names, builtins and its own templates resolve.
    pub fn create_from_comment(&self, comment: &str) -> Block<'_> {
        self.create_from_scope(Scope::new(comment))
    }
}

//! Resolver configuration
//!
//! ```toml
//! template-tags = ["@template", "@psalm-template"]
//! type-alias-tags = ["@phpstan-type"]
//! import-type-tags = ["@phpstan-import-type"]
//! require-existing-namespaced-symbols = false
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which tags declare generics, and how strictly names are qualified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ResolverConfig {
    /// Tags read as template parameter declarations
    pub template_tags: Vec<String>,

    /// Tags read as local type alias declarations
    pub type_alias_tags: Vec<String>,

    /// Tags read as imported type alias declarations
    pub import_type_tags: Vec<String>,

    /// Only qualify a bare name with the current namespace when the
    /// qualified class-like exists
    pub require_existing_namespaced_symbols: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        let prefixed = |names: &[&str]| -> Vec<String> {
            let mut tags: Vec<String> = names.iter().map(|name| format!("@{}", name)).collect();
            for prefix in ["phpstan", "psalm"] {
                tags.extend(names.iter().map(|name| format!("@{}-{}", prefix, name)));
            }
            tags
        };

        Self {
            template_tags: prefixed(&["template", "template-covariant", "template-contravariant"]),
            type_alias_tags: prefixed(&["type"]),
            import_type_tags: prefixed(&["import-type"]),
            require_existing_namespaced_symbols: true,
        }
    }
}

impl ResolverConfig {
    /// Parse a configuration; missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Whether `name` declares a template parameter.
    pub fn is_template_tag(&self, name: &str) -> bool {
        self.template_tags.iter().any(|tag| tag == name)
    }
}

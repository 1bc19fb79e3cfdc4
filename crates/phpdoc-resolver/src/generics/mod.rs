//! Template parameters and type aliases.
//!
//! - [`GenericsResolver`]: bindings visible to one scope
//! - [`GenericsExtractor`]: reads the bindings a docblock declares
//! - [`GenericsCache`]: extracted bindings shared across requests

mod cache;
mod extractor;
mod resolver;
mod state;

pub use cache::GenericsCache;
pub use extractor::{declared_template_names, GenericsExtractor};
pub use resolver::{GenericsResolver, TypeMap};
pub use state::ConcretenessFlag;

//! Abstract syntax tree for docblocks and the type expressions inside them.

pub mod display;
pub mod tags;
pub mod types;

pub use tags::*;
pub use types::*;

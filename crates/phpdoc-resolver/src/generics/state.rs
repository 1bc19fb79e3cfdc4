//! Concreteness tracking shared between generics resolvers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Whether every template looked up so far was bound to a concrete type.
///
/// A flag is either a leaf or a group of flags. A group is concrete only if
/// all of its children are, and marking a group marks every child, so a
/// change made through a merged resolver is visible from the resolvers it
/// was merged from, and the other way around. Clones share their leaves.
#[derive(Debug, Clone)]
pub enum ConcretenessFlag {
    /// A single shared cell
    Leaf(Arc<AtomicBool>),
    /// Flags read and written together
    Group(Vec<ConcretenessFlag>),
}

impl Default for ConcretenessFlag {
    fn default() -> Self {
        Self::leaf(true)
    }
}

impl ConcretenessFlag {
    /// New independent flag.
    pub fn leaf(concrete: bool) -> Self {
        ConcretenessFlag::Leaf(Arc::new(AtomicBool::new(concrete)))
    }

    /// Flag over `children`, sharing their leaves.
    pub fn group(children: Vec<ConcretenessFlag>) -> Self {
        ConcretenessFlag::Group(children)
    }

    /// True when every leaf is.
    pub fn is_concrete(&self) -> bool {
        match self {
            ConcretenessFlag::Leaf(value) => value.load(Ordering::Acquire),
            ConcretenessFlag::Group(children) => children.iter().all(ConcretenessFlag::is_concrete),
        }
    }

    /// Set every leaf.
    pub fn set_concrete(&self, concrete: bool) {
        match self {
            ConcretenessFlag::Leaf(value) => value.store(concrete, Ordering::Release),
            ConcretenessFlag::Group(children) => {
                for child in children {
                    child.set_concrete(concrete);
                }
            }
        }
    }

    /// A new leaf holding the current value, sharing nothing with `self`.
    pub fn detached(&self) -> Self {
        Self::leaf(self.is_concrete())
    }
}

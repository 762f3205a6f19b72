// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::fmt::{Display, Formatter, Result};

/// Identifies one node of a [`crate::ScopeTree`]. Ids are never reused within a tree,
/// so the id of an unmounted node stays invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    #[must_use]
    pub fn as_usize(&self) -> usize { self.0 }
}

impl From<usize> for NodeId {
    fn from(id: usize) -> Self { Self(id) }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result { write!(f, "node#{}", self.0) }
}

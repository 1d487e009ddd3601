//! Node links - identifiers for re-attaching a group or dataset elsewhere.

use std::fmt;

/// Kind of node a [`NodeLink`] refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LinkKind {
    Group,
    Data,
}

/// Opaque reference to a group or dataset node.
///
/// Filled by the backend from the currently open node. Owned by the
/// caller; released when dropped.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeLink {
    kind: LinkKind,
    target: String,
}

impl NodeLink {
    pub fn new(kind: LinkKind, target: impl Into<String>) -> Self {
        Self { kind, target: target.into() }
    }

    #[inline]
    pub fn kind(&self) -> LinkKind {
        self.kind
    }

    /// Absolute path of the linked node.
    #[inline]
    pub fn target(&self) -> &str {
        &self.target
    }
}

impl fmt::Display for NodeLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            LinkKind::Group => "group",
            LinkKind::Data => "data",
        };
        write!(f, "<{} link {}>", kind, self.target)
    }
}

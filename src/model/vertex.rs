//! Vertex module for phylogenetic tree representation.

use crate::model::tree::VertexIndex;
use std::fmt;
use std::ops::Deref;

/// During construction, Internal and Leaf vertex might not have parent set yet.
const NO_PARENT_SET: VertexIndex = usize::MAX;

// =#========================================================================#=
// VERTEX
// =#========================================================================#=
/// Represents a vertex (node) in a phylogenetic tree.
///
/// A vertex can be either:
/// - **Root**: Has at least one child and no parent; may carry a label and
///   a (meaningless but preserved) branch length
/// - **Internal**: Has a parent and at least one child, may carry a label
///   (e.g. a support value) and a branch length
/// - **Leaf**: Has a parent, a name, and no children; might have a branch length
///
/// # Invariants
/// - `index` is the index of the vertex in the tree arena
/// - `branch_length` is non-negative and finite; might not be set
/// - `parent` is `NO_PARENT_SET = usize::MAX` only during construction
#[derive(PartialEq, Debug, Clone)]
pub enum Vertex {
    /// Root vertex of the tree
    Root {
        /// Index of this vertex in the tree arena
        index: VertexIndex,
        /// Indices of the child vertices, in input order
        children: Vec<VertexIndex>,
        /// Optional label written after the closing parenthesis
        label: Option<String>,
        /// Optional branch length above the root
        branch_length: Option<BranchLength>,
    },
    /// Internal vertex
    Internal {
        /// Index of this vertex in the tree arena
        index: VertexIndex,
        /// Index of the parent vertex
        parent: VertexIndex,
        /// Indices of the child vertices, in input order
        children: Vec<VertexIndex>,
        /// Optional label written after the closing parenthesis
        label: Option<String>,
        /// Distance to parent vertex
        branch_length: Option<BranchLength>,
    },
    /// Leaf vertex
    Leaf {
        /// Index of this vertex in the tree arena
        index: VertexIndex,
        /// Index of the parent vertex
        parent: VertexIndex,
        /// Leaf name, used as sequence identifier
        name: String,
        /// Distance to parent vertex
        branch_length: Option<BranchLength>,
    },
}

impl Vertex {
    /// Creates a new root vertex.
    pub fn new_root(
        index: VertexIndex,
        children: Vec<VertexIndex>,
        branch_length: Option<BranchLength>,
        label: Option<String>,
    ) -> Self {
        Vertex::Root { index, children, label, branch_length }
    }

    /// Creates a new internal (non-leaf, non-root) vertex.
    pub fn new_internal(
        index: VertexIndex,
        children: Vec<VertexIndex>,
        branch_length: Option<BranchLength>,
        label: Option<String>,
    ) -> Self {
        Vertex::Internal { index, parent: NO_PARENT_SET, children, label, branch_length }
    }

    /// Creates a new leaf vertex.
    pub fn new_leaf(index: VertexIndex, branch_length: Option<BranchLength>, name: String) -> Self {
        Vertex::Leaf { index, parent: NO_PARENT_SET, name, branch_length }
    }

    /// Returns the index of this vertex.
    pub fn index(&self) -> VertexIndex {
        match self {
            Vertex::Root { index, .. }
            | Vertex::Internal { index, .. }
            | Vertex::Leaf { index, .. } => *index,
        }
    }

    /// Returns the branch length, if set.
    pub fn branch_length(&self) -> Option<BranchLength> {
        match self {
            Vertex::Root { branch_length, .. }
            | Vertex::Internal { branch_length, .. }
            | Vertex::Leaf { branch_length, .. } => *branch_length,
        }
    }

    /// Returns whether this vertex has a [BranchLength].
    pub fn has_branch_length(&self) -> bool {
        self.branch_length().is_some()
    }

    /// Returns the leaf name if this is a leaf, else `None`.
    pub fn name(&self) -> Option<&str> {
        match self {
            Vertex::Leaf { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Returns the label of a root or internal vertex, if any.
    pub fn label(&self) -> Option<&str> {
        match self {
            Vertex::Root { label, .. } | Vertex::Internal { label, .. } => label.as_deref(),
            Vertex::Leaf { .. } => None,
        }
    }

    /// Renames a leaf, or relabels a root or internal vertex.
    pub fn set_name(&mut self, new_name: String) {
        match self {
            Vertex::Leaf { name, .. } => *name = new_name,
            Vertex::Root { label, .. } | Vertex::Internal { label, .. } => *label = Some(new_name),
        }
    }

    /// Returns the children (empty for leaves).
    pub fn children(&self) -> &[VertexIndex] {
        match self {
            Vertex::Root { children, .. } | Vertex::Internal { children, .. } => children,
            Vertex::Leaf { .. } => &[],
        }
    }

    /// Returns `true` if this vertex is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Vertex::Leaf { .. })
    }

    /// Returns `true` if this vertex is an internal vertex.
    pub fn is_internal(&self) -> bool {
        matches!(self, Vertex::Internal { .. })
    }

    /// Returns `true` if this vertex is a root.
    pub fn is_root(&self) -> bool {
        matches!(self, Vertex::Root { .. })
    }

    /// Sets new parent for non-root vertex.
    ///
    /// # Panics
    /// Panics if called on root.
    pub fn set_parent(&mut self, parent: VertexIndex) {
        match self {
            Vertex::Root { .. } => panic!("Cannot set parent on root vertex"),
            Vertex::Internal { parent: p, .. } | Vertex::Leaf { parent: p, .. } => *p = parent,
        }
    }

    /// Returns the index of parent if this a non-root vertex with parent set, else `None`.
    pub fn parent(&self) -> Option<VertexIndex> {
        match self {
            Vertex::Internal { parent, .. } | Vertex::Leaf { parent, .. } => {
                (*parent != NO_PARENT_SET).then_some(*parent)
            }
            Vertex::Root { .. } => None,
        }
    }
}

// =#========================================================================#=
// BRANCH LENGTH
// =#========================================================================#=
/// Branch length in a phylogenetic tree, enforced non-negative and finite.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct BranchLength(f64);

impl BranchLength {
    /// Creates a new branch length.
    ///
    /// # Panics
    /// Panics if `length` is negative or not finite.
    pub fn new(length: f64) -> Self {
        assert!(length >= 0.0, "Branch length must be non-negative, got {}", length);
        assert!(length.is_finite(), "Branch length must be finite, got {}", length);
        BranchLength(length)
    }

    /// Creates a new branch length, or `None` if `length` is negative or not finite.
    pub fn try_new(length: f64) -> Option<Self> {
        (length >= 0.0 && length.is_finite()).then_some(BranchLength(length))
    }
}

impl Deref for BranchLength {
    type Target = f64;
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl fmt::Display for BranchLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_new_rejects_negative() {
        assert!(BranchLength::try_new(-0.1).is_none());
        assert!(BranchLength::try_new(f64::NAN).is_none());
        assert_eq!(*BranchLength::try_new(0.5).unwrap(), 0.5);
    }

    #[test]
    #[should_panic]
    fn test_new_panics_on_negative() {
        BranchLength::new(-1.0);
    }

    #[test]
    fn test_set_name_on_leaf_and_internal() {
        let mut leaf = Vertex::new_leaf(0, None, "Kea".to_string());
        leaf.set_name("0_Kea".to_string());
        assert_eq!(leaf.name(), Some("0_Kea"));

        let mut internal = Vertex::new_internal(2, vec![0, 1], None, None);
        internal.set_name("2".to_string());
        assert_eq!(internal.label(), Some("2"));
        assert_eq!(internal.name(), None);
    }
}

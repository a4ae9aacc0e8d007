//! Provides the phylogenetic tree representation.
//!
//! * [PhyloTree] - tree structure using the arena pattern, with leaves
//!   carrying their names directly
//! * [VertexIndex] as type used to index vertices in tree

use crate::model::vertex::{BranchLength, Vertex};
use crate::newick::{self, NewickStyle};
use std::collections::BTreeSet;

/// Index of a vertex in a tree (arena).
pub type VertexIndex = usize;

/// *During construction only*, index for unset root.
const NO_ROOT_SET_INDEX: VertexIndex = usize::MAX;

// =$========================================================================$=
// TREE
// =$========================================================================$=
/// A rooted phylogenetic tree represented using the arena pattern on [Vertex].
///
/// Vertices are stored in a contiguous vector and referenced by
/// [VertexIndex]. Vertices may have any positive number of children.
///
/// # Structure
/// - All vertices (root, internal, and leaves) are stored in the arena.
/// - Index of root is maintained.
/// - No assumption on order of indices is maintained;
///   [`leaf_names()`](Self::leaf_names) follows pre-order (Newick) order.
/// - Branch lengths are optional, but if provided are non-negative.
///
/// # Construction
/// Add vertices bottom-up; children must exist before their parent.
/// Test validity with [`PhyloTree::is_valid()`].
#[derive(Debug, Clone)]
pub struct PhyloTree {
    /// Vertices of this tree (arena pattern)
    vertices: Vec<Vertex>,

    /// Index of the root of this tree
    root_index: VertexIndex,
}

// ============================================================================
// New, Getters / Accessors, etc. (pub)
// ============================================================================
impl PhyloTree {
    /// Creates a new, empty tree with capacity for a binary tree with `num_leaves` leaves.
    pub fn new(num_leaves: usize) -> Self {
        PhyloTree {
            root_index: NO_ROOT_SET_INDEX,
            vertices: Vec::with_capacity((2 * num_leaves).saturating_sub(1)),
        }
    }

    /// Adds a root to the tree, assigning a unique index, which gets returned.
    ///
    /// # Arguments
    /// * `children` - Indices of the children
    /// * `branch_length` - Optional length above the root
    /// * `label` - Optional label of the root
    pub fn add_root(
        &mut self,
        children: Vec<VertexIndex>,
        branch_length: Option<BranchLength>,
        label: Option<String>,
    ) -> VertexIndex {
        let index = self.vertices.len();
        for &child in &children {
            self[child].set_parent(index);
        }
        self.vertices
            .push(Vertex::new_root(index, children, branch_length, label));
        self.root_index = index;

        index
    }

    /// Adds an internal vertex to the tree, assigning a unique index, which gets returned.
    pub fn add_internal(
        &mut self,
        children: Vec<VertexIndex>,
        branch_length: Option<BranchLength>,
        label: Option<String>,
    ) -> VertexIndex {
        let index = self.vertices.len();
        for &child in &children {
            self[child].set_parent(index);
        }
        self.vertices
            .push(Vertex::new_internal(index, children, branch_length, label));

        index
    }

    /// Adds a leaf to the tree, assigning a unique index, which gets returned.
    pub fn add_leaf(&mut self, branch_length: Option<BranchLength>, name: impl Into<String>) -> VertexIndex {
        let index = self.vertices.len();
        self.vertices
            .push(Vertex::new_leaf(index, branch_length, name.into()));
        index
    }

    /// Returns whether root of tree has been set.
    pub fn is_root_set(&self) -> bool {
        self.root_index != NO_ROOT_SET_INDEX
    }

    /// Returns a reference to the root vertex.
    ///
    /// # Panics
    /// Panics if the root hasn't been set and thus tree hasn't been fully constructed yet.
    pub fn root(&self) -> &Vertex {
        &self[self.root_index]
    }

    /// Returns the index of the root.
    pub fn root_index(&self) -> VertexIndex {
        self.root_index
    }

    /// Returns a reference to the vertex at the given index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn vertex(&self, index: VertexIndex) -> &Vertex {
        &self[index]
    }

    /// Returns the number of leaves in this tree.
    pub fn num_leaves(&self) -> usize {
        self.vertices.iter().filter(|&v| v.is_leaf()).count()
    }

    /// Returns the number of internal vertices in this tree (root excluded).
    pub fn num_internal(&self) -> usize {
        self.vertices.iter().filter(|&v| v.is_internal()).count()
    }

    /// Returns the number of vertices in this tree.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the leaf names in pre-order, i.e. in the order they appear
    /// in the Newick string.
    pub fn leaf_names(&self) -> Vec<&str> {
        self.pre_order_iter().filter_map(|v| v.name()).collect()
    }

    /// Returns the set of leaf names, used to compare the leaves of trees
    /// independent of their order.
    pub fn leaf_name_set(&self) -> BTreeSet<&str> {
        self.vertices.iter().filter_map(|v| v.name()).collect()
    }

    /// Returns the first leaf name that occurs more than once, if any.
    pub fn duplicate_leaf_name(&self) -> Option<&str> {
        let mut seen = BTreeSet::new();
        self.leaf_names().into_iter().find(|name| !seen.insert(*name))
    }

    /// Checks if all non-root vertices have branch lengths set.
    pub fn vertices_have_branch_lengths(&self) -> bool {
        self.vertices
            .iter()
            .all(|v| v.is_root() || v.has_branch_length())
    }

    /// Renames every leaf to `<index>_<name>` and labels every root and
    /// internal vertex with its index.
    ///
    /// Used to write a tree from which vertex identities can be read off,
    /// e.g. to prepare per-branch model assignments.
    pub fn tag_vertex_ids(&mut self) {
        for vertex in self.vertices.iter_mut() {
            let index = vertex.index();
            let tag = match vertex.name() {
                Some(name) => format!("{index}_{name}"),
                None => index.to_string(),
            };
            vertex.set_name(tag);
        }
    }

    /// Converts this tree to a Newick string in the given style.
    pub fn to_newick(&self, style: NewickStyle) -> String {
        newick::to_newick(self, style)
    }

    /// Validates the tree structure and all index references.
    ///
    /// Checks:
    /// - Root index is valid and points to the only Root vertex
    /// - All vertex indices match their position in the arena
    /// - Child and parent references are mutually consistent
    /// - Root and internal vertices have at least one child
    /// - Leaves have non-empty names
    ///
    /// # Returns
    /// `true` if tree is valid, `false` otherwise
    pub fn is_valid(&self) -> bool {
        if self.root_index >= self.vertices.len() || !self.vertices[self.root_index].is_root() {
            return false;
        }

        for (index, vertex) in self.vertices.iter().enumerate() {
            if vertex.index() != index {
                return false;
            }

            if vertex.is_root() && index != self.root_index {
                return false;
            }

            if vertex.is_leaf() {
                if vertex.name().is_none_or(str::is_empty) {
                    return false;
                }
            } else if vertex.children().is_empty() {
                return false;
            }

            for &child in vertex.children() {
                if child >= self.vertices.len() || self.vertices[child].parent() != Some(index) {
                    return false;
                }
            }

            if !vertex.is_root() {
                match vertex.parent() {
                    Some(parent) if parent < self.vertices.len() => {
                        if !self.vertices[parent].children().contains(&index) {
                            return false;
                        }
                    }
                    _ => return false,
                }
            }
        }

        true
    }
}

impl std::ops::Index<VertexIndex> for PhyloTree {
    type Output = Vertex;

    fn index(&self, index: VertexIndex) -> &Self::Output {
        &self.vertices[index]
    }
}

impl std::ops::IndexMut<VertexIndex> for PhyloTree {
    fn index_mut(&mut self, index: VertexIndex) -> &mut Self::Output {
        &mut self.vertices[index]
    }
}

// =$========================================================================$=
// ITERATORS
// =$========================================================================$=
impl PhyloTree {
    /// Returns an iterator over the tree in pre-order (parents before children).
    ///
    /// Children are visited in input order, so leaves come out in the order
    /// they appear in the Newick string.
    pub fn pre_order_iter(&self) -> PreOrderIter<'_> {
        PreOrderIter::new(self)
    }
}

/// Iterator for pre-order traversal (parents before children).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
pub struct PreOrderIter<'a> {
    tree: &'a PhyloTree,
    stack: Vec<VertexIndex>,
}

impl<'a> PreOrderIter<'a> {
    fn new(tree: &'a PhyloTree) -> Self {
        let mut stack = Vec::new();
        if tree.is_root_set() {
            stack.push(tree.root_index);
        }
        PreOrderIter { tree, stack }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        let vertex = &self.tree[index];

        // Push children in reverse, so the first child is processed first
        self.stack.extend(vertex.children().iter().rev());

        Some(vertex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// ((A:1,B:1):0.5,C:1.5);
    fn small_tree() -> PhyloTree {
        let mut tree = PhyloTree::new(3);
        let a = tree.add_leaf(Some(BranchLength::new(1.0)), "A");
        let b = tree.add_leaf(Some(BranchLength::new(1.0)), "B");
        let ab = tree.add_internal(vec![a, b], Some(BranchLength::new(0.5)), None);
        let c = tree.add_leaf(Some(BranchLength::new(1.5)), "C");
        tree.add_root(vec![ab, c], None, None);
        tree
    }

    #[test]
    fn test_building_tree() {
        let tree = small_tree();
        assert_eq!(tree.num_leaves(), 3);
        assert_eq!(tree.num_internal(), 1);
        assert_eq!(tree.num_vertices(), 5);
        assert!(tree.is_valid());
        assert_eq!(tree.root().children(), &[2, 3]);
        assert_eq!(tree[0].parent(), Some(2));
    }

    #[test]
    fn test_leaf_names_in_newick_order() {
        let tree = small_tree();
        assert_eq!(tree.leaf_names(), vec!["A", "B", "C"]);
        assert_eq!(tree.leaf_name_set(), BTreeSet::from(["C", "B", "A"]));
        assert_eq!(tree.duplicate_leaf_name(), None);
    }

    #[test]
    fn test_branch_lengths_present() {
        let tree = small_tree();
        assert!(tree.vertices_have_branch_lengths());
    }

    #[test]
    fn test_duplicate_leaf_name() {
        let mut tree = PhyloTree::new(2);
        let a = tree.add_leaf(None, "Takahe");
        let b = tree.add_leaf(None, "Takahe");
        tree.add_root(vec![a, b], None, None);
        assert_eq!(tree.duplicate_leaf_name(), Some("Takahe"));
    }

    #[test]
    fn test_tag_vertex_ids() {
        let mut tree = small_tree();
        tree.tag_vertex_ids();
        assert_eq!(tree.leaf_names(), vec!["0_A", "1_B", "3_C"]);
        assert_eq!(tree[2].label(), Some("2"));
        assert_eq!(tree.root().label(), Some("4"));
    }

    #[test]
    fn test_unrooted_tree_is_invalid() {
        let mut tree = PhyloTree::new(2);
        tree.add_leaf(None, "A");
        assert!(!tree.is_valid());
    }
}

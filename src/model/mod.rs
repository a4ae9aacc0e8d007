//! Data model for rooted phylogenetic trees.
//!
//! Trees are represented by [PhyloTree], which uses the arena pattern to store
//! [Vertex] nodes. Each vertex is either a `Root`, `Internal`, or `Leaf`,
//! referenced by [VertexIndex]. Vertices may have any number of children,
//! since trees used for simulation are not necessarily binary.
//!
//! Leaves carry their names directly; the leaf names double as the sequence
//! identifiers of simulated alignments.

pub mod tree;
pub mod vertex;

pub use tree::PhyloTree;
pub use tree::VertexIndex;
pub use vertex::{BranchLength, Vertex};

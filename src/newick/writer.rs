//! Newick format writing for [PhyloTree]s.

use crate::model::{PhyloTree, VertexIndex};
use crate::parser::utils::escape_label;
use std::fs::File;
use std::io::{self, BufWriter, Write};

/// Rough number of characters per vertex, used to pre-allocate Newick strings
const CHARS_PER_VERTEX: usize = 16;

/// Style for serializing a tree to Newick format.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum NewickStyle {
    /// Labels, internal labels and branch lengths (where present)
    #[default]
    Full,
    /// Leaf names and internal labels only
    Topology,
}

/// Writes given list of trees to a file in Newick format, one tree per line.
///
/// # Errors
/// Returns an I/O error if writing fails.
pub fn write_newick_file(file: File, trees: &[PhyloTree], style: NewickStyle) -> io::Result<()> {
    let mut writer = BufWriter::new(file);
    for tree in trees {
        writer.write_all(to_newick(tree, style).as_bytes())?;
        writer.write_all(b"\n")?;
    }

    writer.flush()
}

/// Returns the Newick representation of this tree with closing semicolon.
///
/// # Example
/// ```
/// use segsim::model::{BranchLength, PhyloTree};
/// use segsim::newick::{NewickStyle, to_newick};
///
/// let mut tree = PhyloTree::new(2);
/// let a = tree.add_leaf(Some(BranchLength::new(1.0)), "A");
/// let b = tree.add_leaf(Some(BranchLength::new(2.0)), "Little Spotted Kiwi");
/// tree.add_root(vec![a, b], None, None);
///
/// assert_eq!(to_newick(&tree, NewickStyle::Full), "(A:1,Little_Spotted_Kiwi:2);");
/// ```
pub fn to_newick(tree: &PhyloTree, style: NewickStyle) -> String {
    // Recursive helper for building the Newick string
    fn build_newick(tree: &PhyloTree, newick: &mut String, index: VertexIndex, style: NewickStyle) {
        let vertex = &tree[index];

        if let Some(name) = vertex.name() {
            newick.push_str(&escape_label(name));
        } else {
            newick.push('(');
            for (i, &child) in vertex.children().iter().enumerate() {
                if i > 0 {
                    newick.push(',');
                }
                build_newick(tree, newick, child, style);
            }
            newick.push(')');

            if let Some(label) = vertex.label() {
                newick.push_str(&escape_label(label));
            }
        }

        if style == NewickStyle::Full {
            if let Some(branch_length) = vertex.branch_length() {
                newick.push(':');
                newick.push_str(&branch_length.to_string());
            }
        }
    }

    let mut newick = String::with_capacity(tree.num_vertices() * CHARS_PER_VERTEX);
    if tree.is_root_set() {
        build_newick(tree, &mut newick, tree.root_index(), style);
    }
    newick.push(';');

    newick
}

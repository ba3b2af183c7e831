//! Child assembler - flatten, filter and append child entries.

use super::types::Child;
use crate::error::ElementError;
use crate::scene::SceneNode;

/// Flatten nested lists and drop empty entries, keeping order.
pub fn flatten_children(children: Vec<Child>) -> Vec<SceneNode> {
    let mut nodes = Vec::with_capacity(children.len());
    collect(children, &mut nodes);
    nodes
}

fn collect(children: Vec<Child>, out: &mut Vec<SceneNode>) {
    for child in children {
        match child {
            Child::Node(node) => out.push(node),
            Child::Empty => {}
            Child::Many(nested) => collect(nested, out),
        }
    }
}

/// Validate every entry against `parent`, then append them in order.
///
/// All-or-nothing: if any entry is rejected, nothing is appended.
/// Returns the number of children appended.
pub fn append_children(parent: &SceneNode, children: Vec<Child>) -> Result<usize, ElementError> {
    let nodes = flatten_children(children);
    for node in &nodes {
        parent.can_add_child(node)?;
    }
    for node in &nodes {
        parent.add_child(node)?;
    }
    Ok(nodes.len())
}

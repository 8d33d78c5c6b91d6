//! Tree flattening.
//!
//! Projects a tree onto flat `{id, name, type, path}` facts. No
//! interpretation happens here; the diff interpreter reads these facts.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::fs::{Node, NodeType, SystemRoot};
use crate::path;

/// One node at one path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatFact {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub path: String,
}

/// Flatten every root in order.
///
/// Roots are the base paths and are not emitted themselves. Descendants come
/// out in pre-order, children in stored order. Fails with [`Error::Cycle`] if
/// a non-empty id shows up twice on the walk.
pub fn flatten(system: &SystemRoot) -> Result<Vec<FlatFact>> {
    let mut facts = Vec::new();
    let mut visited = HashSet::new();
    for root in &system.roots {
        walk(root, &root.name, &mut visited, &mut facts)?;
    }
    Ok(facts)
}

/// Flatten a single root.
pub fn flatten_root(root: &Node) -> Result<Vec<FlatFact>> {
    let mut facts = Vec::new();
    walk(root, &root.name, &mut HashSet::new(), &mut facts)?;
    Ok(facts)
}

fn walk<'a>(
    node: &'a Node,
    base: &str,
    visited: &mut HashSet<&'a str>,
    facts: &mut Vec<FlatFact>,
) -> Result<()> {
    if !node.id.is_empty() && !visited.insert(node.id.as_str()) {
        return Err(Error::Cycle {
            id: node.id.clone(),
        });
    }
    for child in &node.children {
        let child_path = path::join(base, &child.name);
        facts.push(FlatFact {
            id: child.id.clone(),
            name: child.name.clone(),
            node_type: child.node_type,
            path: child_path.clone(),
        });
        walk(child, &child_path, visited, facts)?;
    }
    Ok(())
}

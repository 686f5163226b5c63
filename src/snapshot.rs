//! Owned, point-in-time copy of the tree shape for external renderers.

use crate::node::{Link, Node};
use crate::Key;

/// Which child slot of the parent an edge leads to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Smaller keys.
    Left,
    /// Larger keys.
    Right,
}

/// One node as seen at capture time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInfo {
    /// Stored key.
    pub key: String,
    /// Occurrences of `key`.
    pub count: usize,
    /// Edges from the root.
    pub depth: usize,
}

/// A parent-child link, with the child's count for labelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    /// Key of the parent node.
    pub parent: String,
    /// Key of the child node.
    pub child: String,
    /// Which slot of the parent holds the child.
    pub side: Side,
    /// Occurrences of the child's key.
    pub child_count: usize,
}

/// Nodes and edges of the whole tree, copied out under a read lock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeSnapshot {
    /// Pre-order, root first.
    pub nodes: Vec<NodeInfo>,
    /// One per parent-child link, in the order the nodes were visited.
    pub edges: Vec<Edge>,
}

impl TreeSnapshot {
    pub(crate) fn capture(root: &Link<Key>) -> Self {
        let mut snapshot = TreeSnapshot::default();
        let mut stack: Vec<(&Node<Key>, usize)> = root.as_deref().map(|n| (n, 0)).into_iter().collect();
        while let Some((node, depth)) = stack.pop() {
            snapshot.nodes.push(NodeInfo {
                key: node.key.to_string(),
                count: node.count,
                depth,
            });
            // Right pushed first so the left subtree is visited first.
            for (child, side) in [(&node.right, Side::Right), (&node.left, Side::Left)] {
                if let Some(child) = child.as_deref() {
                    snapshot.edges.push(Edge {
                        parent: node.key.to_string(),
                        child: child.key.to_string(),
                        side,
                        child_count: child.count,
                    });
                    stack.push((child, depth + 1));
                }
            }
        }
        snapshot
    }

    /// The root node, `None` for an empty tree.
    pub fn root(&self) -> Option<&NodeInfo> {
        self.nodes.first()
    }
}

//! Node registry
//!
//! Stores the nodes of one diagram in creation order and hands out the
//! identifiers everything else refers to. Labels may repeat freely; the
//! identifier is what is unique.

use tracing::trace;

use crate::core::error::{DiagramError, Result};
use crate::core::types::{Category, NodeData, NodeId};

/// Node registry for a single diagram
///
/// Maintains insertion order so iteration (and therefore exported text) is
/// deterministic. The registry is tagged with its owning diagram; identifiers
/// minted by a different diagram fail to resolve here.
#[derive(Debug)]
pub struct NodeRegistry {
    tag: u32,
    nodes: Vec<NodeData>,
}

impl NodeRegistry {
    /// Create an empty registry tagged for one diagram
    pub(crate) fn new(tag: u32) -> Self {
        Self {
            tag,
            nodes: Vec::new(),
        }
    }

    /// Allocate a fresh identifier and store the node
    ///
    /// Never fails; duplicate labels are allowed by design.
    pub fn create(&mut self, label: impl Into<String>, category: Category) -> NodeId {
        let id = NodeId::new(self.tag, self.nodes.len() as u32);
        let node = NodeData::with_category(label, category);
        trace!(id = %id, label = %node.label, category = %category, "Created node");
        self.nodes.push(node);
        id
    }

    /// Look up a node by identifier
    ///
    /// Fails with `UnknownNode` if the identifier was never created here or
    /// belongs to a different diagram.
    pub fn resolve(&self, id: NodeId) -> Result<&NodeData> {
        if id.diagram != self.tag {
            return Err(DiagramError::unknown_node(id));
        }
        self.nodes
            .get(id.index as usize)
            .ok_or_else(|| DiagramError::unknown_node(id))
    }

    /// Returns true if the identifier resolves in this registry
    pub fn contains(&self, id: NodeId) -> bool {
        id.diagram == self.tag && (id.index as usize) < self.nodes.len()
    }

    /// Number of nodes created so far
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if no nodes were ever created
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all nodes in creation order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &NodeData)> {
        let tag = self.tag;
        self.nodes
            .iter()
            .enumerate()
            .map(move |(i, node)| (NodeId::new(tag, i as u32), node))
    }
}

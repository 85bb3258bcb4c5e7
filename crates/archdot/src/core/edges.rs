//! Edge set
//!
//! The diagram-level collection of directed edges. The diagram is a
//! multigraph: repeated edges between the same ordered pair stay distinct,
//! and cycles are expected (a projector may write back into the event log
//! that triggered it). Insertion order is preserved and is the order edges
//! appear in exported text.

use tracing::trace;

use crate::core::types::{EdgeData, EdgeId};

/// Ordered set of edges for a single diagram
///
/// Endpoint validation happens before an edge reaches this set, so every
/// stored edge refers to nodes that exist.
#[derive(Debug, Default)]
pub struct EdgeSet {
    edges: Vec<EdgeData>,
}

impl EdgeSet {
    /// Create an empty edge set
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an edge, returning its insertion-order id
    pub fn push(&mut self, edge: EdgeData) -> EdgeId {
        let id = EdgeId(self.edges.len());
        trace!(from = %edge.from, to = %edge.to, label = ?edge.label, "Connected edge");
        self.edges.push(edge);
        id
    }

    /// Number of edges
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns true if no edges were recorded
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Iterate over all edges in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &EdgeData> {
        self.edges.iter()
    }
}

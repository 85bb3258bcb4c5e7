//! Cluster tree
//!
//! A hierarchy of named groupings built with strict stack discipline: a
//! cluster opens under the current scope, collects members and sub-clusters,
//! and is finalized when its scope closes. The tree mirrors the lexical
//! nesting of open/close calls, which rules out cycles by construction.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::core::error::{DiagramError, Result};
use crate::core::types::{ClusterHandle, NodeId};

/// One cluster in the tree
#[derive(Debug, Clone)]
pub struct Cluster {
    /// Visual container title
    pub(crate) name: String,
    /// Parent cluster index, None for the root
    pub(crate) parent: Option<usize>,
    /// Member node ids in insertion order
    pub(crate) members: Vec<NodeId>,
    /// Child cluster indices in creation order
    pub(crate) children: Vec<usize>,
    /// True once the scope has been finalized
    pub(crate) closed: bool,
}

impl Cluster {
    fn new(name: String, parent: Option<usize>) -> Self {
        Self {
            name,
            parent,
            members: Vec::new(),
            children: Vec::new(),
            closed: false,
        }
    }

    /// Visual container title of this cluster
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Member node ids in insertion order
    pub fn members(&self) -> &[NodeId] {
        &self.members
    }

    /// Returns true once the scope has been finalized
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

/// Cluster tree for a single diagram
///
/// Index 0 is the implicit root cluster; it is always the outermost scope and
/// never closes. Every node belongs to exactly one cluster (the root counts),
/// tracked in a membership map so a second placement is rejected.
#[derive(Debug)]
pub struct ClusterTree {
    tag: u32,
    clusters: Vec<Cluster>,
    stack: Vec<usize>,
    membership: HashMap<NodeId, usize>,
}

impl ClusterTree {
    /// Create a tree holding only the open root scope
    pub(crate) fn new(tag: u32) -> Self {
        Self {
            tag,
            clusters: vec![Cluster::new(String::new(), None)],
            stack: vec![0],
            membership: HashMap::new(),
        }
    }

    fn current(&self) -> usize {
        // the stack always holds at least the root
        self.stack[self.stack.len() - 1]
    }

    fn check_tag(&self, handle: ClusterHandle) -> Result<()> {
        if handle.diagram != self.tag || handle.index >= self.clusters.len() {
            return Err(DiagramError::unbalanced_scope(
                "cluster handle does not belong to this diagram",
            ));
        }
        Ok(())
    }

    /// Open a new cluster scope under the current scope
    pub fn open(&mut self, name: impl Into<String>) -> ClusterHandle {
        let name = name.into();
        let parent = self.current();
        let index = self.clusters.len();
        trace!(cluster = %name, depth = self.stack.len(), "Opened cluster scope");
        self.clusters.push(Cluster::new(name, Some(parent)));
        self.clusters[parent].children.push(index);
        self.stack.push(index);
        ClusterHandle::new(self.tag, index)
    }

    /// Finalize a cluster scope
    ///
    /// The handle must name the innermost open scope; closing in any other
    /// order fails with `UnbalancedScope`, as does closing when only the root
    /// remains.
    pub fn close(&mut self, handle: ClusterHandle) -> Result<()> {
        self.check_tag(handle)?;
        if self.stack.len() == 1 {
            return Err(DiagramError::unbalanced_scope(
                "close called without a matching open",
            ));
        }
        let top = self.current();
        if top != handle.index {
            return Err(DiagramError::unbalanced_scope(format!(
                "cannot close \"{}\" while \"{}\" is still open",
                self.clusters[handle.index].name, self.clusters[top].name
            )));
        }
        self.clusters[top].closed = true;
        self.stack.pop();
        debug!(
            cluster = %self.clusters[top].name,
            members = self.clusters[top].members.len(),
            "Closed cluster scope"
        );
        Ok(())
    }

    /// Record a node as a member of the current scope
    ///
    /// Fails with `AlreadyMember` if the node already belongs to a cluster.
    pub fn add_member(&mut self, id: NodeId) -> Result<()> {
        let current = self.current();
        self.place(id, current)
    }

    /// Record a node as a member of an explicit cluster
    ///
    /// Fails with `ClosedScope` if that cluster has been finalized.
    pub fn add_member_to(&mut self, handle: ClusterHandle, id: NodeId) -> Result<()> {
        self.check_tag(handle)?;
        if self.clusters[handle.index].closed {
            return Err(DiagramError::closed_scope(
                self.clusters[handle.index].name.clone(),
            ));
        }
        self.place(id, handle.index)
    }

    fn place(&mut self, id: NodeId, cluster: usize) -> Result<()> {
        if let Some(&owner) = self.membership.get(&id) {
            return Err(DiagramError::already_member(
                id,
                self.clusters[owner].name.clone(),
            ));
        }
        self.membership.insert(id, cluster);
        self.clusters[cluster].members.push(id);
        Ok(())
    }

    /// Returns true if the node has been placed in some cluster
    pub fn is_member(&self, id: NodeId) -> bool {
        self.membership.contains_key(&id)
    }

    /// Returns true if the cluster behind the handle has been finalized
    pub fn is_closed(&self, handle: ClusterHandle) -> Result<bool> {
        self.check_tag(handle)?;
        Ok(self.clusters[handle.index].closed)
    }

    /// Visual title of the cluster behind the handle
    pub fn name_of(&self, handle: ClusterHandle) -> Result<&str> {
        self.check_tag(handle)?;
        Ok(self.clusters[handle.index].name.as_str())
    }

    /// Returns true when every opened scope has been closed again
    pub fn is_balanced(&self) -> bool {
        self.stack.len() == 1
    }

    /// Number of scopes currently open, not counting the root
    pub fn open_depth(&self) -> usize {
        self.stack.len() - 1
    }

    /// Number of clusters created, not counting the root
    pub fn cluster_count(&self) -> usize {
        self.clusters.len() - 1
    }

    /// Full path of a cluster, ancestor names joined with `/`
    pub fn path(&self, handle: ClusterHandle) -> Result<String> {
        self.check_tag(handle)?;
        let mut names = Vec::new();
        let mut cursor = Some(handle.index);
        while let Some(index) = cursor {
            let cluster = &self.clusters[index];
            if !cluster.name.is_empty() {
                names.push(cluster.name.as_str());
            }
            cursor = cluster.parent;
        }
        names.reverse();
        Ok(names.join("/"))
    }

    /// Name of the innermost open scope, empty for the root
    pub fn current_name(&self) -> &str {
        &self.clusters[self.current()].name
    }

    pub(crate) fn root(&self) -> &Cluster {
        &self.clusters[0]
    }

    pub(crate) fn cluster(&self, index: usize) -> &Cluster {
        &self.clusters[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::NodeId;

    fn node(index: u32) -> NodeId {
        NodeId::for_tests(7, index)
    }

    fn tree() -> ClusterTree {
        ClusterTree::new(7)
    }

    #[test]
    fn test_new_tree_is_balanced() {
        let tree = tree();
        assert!(tree.is_balanced());
        assert_eq!(tree.open_depth(), 0);
        assert_eq!(tree.cluster_count(), 0);
        assert_eq!(tree.current_name(), "");
    }

    #[test]
    fn test_open_close_round_trip() {
        let mut tree = tree();
        let handle = tree.open("API Layer");
        assert!(!tree.is_balanced());
        assert_eq!(tree.current_name(), "API Layer");
        tree.close(handle).unwrap();
        assert!(tree.is_balanced());
        assert_eq!(tree.cluster_count(), 1);
    }

    #[test]
    fn test_close_without_open_fails() {
        let mut tree = tree();
        let handle = tree.open("A");
        tree.close(handle).unwrap();
        let result = tree.close(handle);
        assert!(matches!(result, Err(DiagramError::UnbalancedScope { .. })));
    }

    #[test]
    fn test_close_out_of_order_fails() {
        let mut tree = tree();
        let outer = tree.open("outer");
        let _inner = tree.open("inner");
        let result = tree.close(outer);
        assert!(matches!(result, Err(DiagramError::UnbalancedScope { .. })));
    }

    #[test]
    fn test_nested_scopes_form_a_tree() {
        let mut tree = tree();
        let outer = tree.open("Command Side");
        let inner = tree.open("Event Store");
        tree.close(inner).unwrap();
        tree.close(outer).unwrap();

        assert_eq!(tree.path(outer).unwrap(), "Command Side");
        assert_eq!(tree.path(inner).unwrap(), "Command Side/Event Store");
        assert_eq!(tree.root().children, vec![1]);
        assert_eq!(tree.cluster(1).children, vec![2]);
    }

    #[test]
    fn test_members_go_to_current_scope() {
        let mut tree = tree();
        tree.add_member(node(0)).unwrap();
        let handle = tree.open("API Layer");
        tree.add_member(node(1)).unwrap();
        tree.close(handle).unwrap();

        assert_eq!(tree.root().members(), &[node(0)]);
        assert_eq!(tree.cluster(1).members(), &[node(1)]);
    }

    #[test]
    fn test_second_placement_fails() {
        let mut tree = tree();
        let handle = tree.open("A");
        tree.add_member(node(0)).unwrap();
        tree.close(handle).unwrap();

        let result = tree.add_member(node(0));
        match result {
            Err(DiagramError::AlreadyMember { cluster, .. }) => assert_eq!(cluster, "A"),
            other => panic!("expected AlreadyMember, got {:?}", other),
        }
    }

    #[test]
    fn test_add_member_to_closed_cluster_fails() {
        let mut tree = tree();
        let handle = tree.open("Read Models");
        tree.close(handle).unwrap();

        let result = tree.add_member_to(handle, node(0));
        match result {
            Err(DiagramError::ClosedScope { cluster }) => assert_eq!(cluster, "Read Models"),
            other => panic!("expected ClosedScope, got {:?}", other),
        }
    }

    #[test]
    fn test_add_member_to_open_cluster_by_handle() {
        let mut tree = tree();
        let handle = tree.open("Projectors");
        tree.add_member_to(handle, node(0)).unwrap();
        tree.close(handle).unwrap();
        assert_eq!(tree.cluster(1).members(), &[node(0)]);
        assert!(tree.cluster(1).is_closed());
    }

    #[test]
    fn test_foreign_handle_is_rejected() {
        let mut other = ClusterTree::new(99);
        let foreign = other.open("elsewhere");

        let mut tree = tree();
        assert!(matches!(
            tree.close(foreign),
            Err(DiagramError::UnbalancedScope { .. })
        ));
        assert!(matches!(
            tree.add_member_to(foreign, node(0)),
            Err(DiagramError::UnbalancedScope { .. })
        ));
    }
}

//! Diagram facade
//!
//! Ties one node registry, one cluster tree, and one edge set together under
//! a title, a layout direction, and global style defaults. A `Diagram` is the
//! unit of export: one diagram produces exactly one DOT description and, via
//! the renderer bridge, one image file.
//!
//! Distinct diagrams are fully independent and may be built in parallel by
//! separate callers; a single diagram must be built by one logical thread of
//! control, with export invoked only after construction completes.

use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};

use tracing::{debug, info, span, Level};

use crate::core::cluster::{Cluster, ClusterTree};
use crate::core::edges::EdgeSet;
use crate::core::error::{DiagramError, Result};
use crate::core::export;
use crate::core::registry::NodeRegistry;
use crate::core::render::{self, OutputFormat};
use crate::core::types::{
    Category, ClusterHandle, Direction, EdgeData, EdgeId, EdgeStyle, GraphStyle, NodeData, NodeId,
};

/// Process-wide sequence distinguishing diagram instances, so identifiers
/// from one diagram cannot resolve against another.
static DIAGRAM_SEQ: AtomicU32 = AtomicU32::new(0);

/// An in-memory diagram model
///
/// Build order follows the data flow: declare nodes and clusters, declare
/// edges between node identifiers, then export once.
#[derive(Debug)]
pub struct Diagram {
    title: String,
    direction: Direction,
    style: GraphStyle,
    registry: NodeRegistry,
    clusters: ClusterTree,
    edges: EdgeSet,
}

impl Diagram {
    /// Create an empty diagram with the default left-to-right layout
    pub fn new(title: impl Into<String>) -> Self {
        let tag = DIAGRAM_SEQ.fetch_add(1, Ordering::Relaxed);
        let title = title.into();
        debug!(title = %title, tag, "Created diagram");
        Self {
            title,
            direction: Direction::default(),
            style: GraphStyle::default(),
            registry: NodeRegistry::new(tag),
            clusters: ClusterTree::new(tag),
            edges: EdgeSet::new(),
        }
    }

    /// Set the layout direction, builder style
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Set the global style defaults, builder style
    pub fn with_style(mut self, style: GraphStyle) -> Self {
        self.style = style;
        self
    }

    /// Diagram title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Layout direction
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Global style defaults
    pub fn style(&self) -> &GraphStyle {
        &self.style
    }

    /// Mutable access to the global style defaults
    pub fn style_mut(&mut self) -> &mut GraphStyle {
        &mut self.style
    }

    /// Create a node in the current cluster scope
    ///
    /// Allocates a fresh identifier and records membership in whichever scope
    /// is innermost (the diagram root if none is open). Never fails; labels
    /// may repeat.
    pub fn node(&mut self, label: impl Into<String>, category: Category) -> NodeId {
        let id = self.registry.create(label, category);
        // a fresh id cannot already be a member anywhere
        self.clusters
            .add_member(id)
            .unwrap_or_else(|_| unreachable!("fresh node id was already placed"));
        id
    }

    /// Create a node directly in an explicit cluster
    ///
    /// Fails with `ClosedScope` if that cluster has already been finalized.
    pub fn node_in(
        &mut self,
        cluster: ClusterHandle,
        label: impl Into<String>,
        category: Category,
    ) -> Result<NodeId> {
        let label = label.into();
        // validate the target before minting an id, so a failed call leaves
        // the registry unchanged
        if self.clusters.is_closed(cluster)? {
            let name = self.clusters.name_of(cluster)?.to_string();
            return Err(DiagramError::closed_scope(name));
        }
        let id = self.registry.create(label, category);
        self.clusters.add_member_to(cluster, id)?;
        Ok(id)
    }

    /// Create a node without placing it in any cluster
    ///
    /// The node can be placed later with `place` or `place_in`; left unplaced
    /// it is exported at top level.
    pub fn detached_node(&mut self, label: impl Into<String>, category: Category) -> NodeId {
        self.registry.create(label, category)
    }

    /// Record membership of an existing node in the current scope
    ///
    /// Fails with `UnknownNode` for an invalid id and with `AlreadyMember` if
    /// the node already belongs to a cluster.
    pub fn place(&mut self, id: NodeId) -> Result<()> {
        self.registry.resolve(id)?;
        self.clusters.add_member(id)
    }

    /// Record membership of an existing node in an explicit cluster
    ///
    /// Fails with `ClosedScope` when the cluster has been finalized, in
    /// addition to the `place` failure modes.
    pub fn place_in(&mut self, cluster: ClusterHandle, id: NodeId) -> Result<()> {
        self.registry.resolve(id)?;
        self.clusters.add_member_to(cluster, id)
    }

    /// Open a new cluster scope under the current scope
    pub fn open_cluster(&mut self, name: impl Into<String>) -> ClusterHandle {
        self.clusters.open(name)
    }

    /// Finalize a cluster scope
    ///
    /// The handle must name the innermost open scope.
    pub fn close_cluster(&mut self, handle: ClusterHandle) -> Result<()> {
        self.clusters.close(handle)
    }

    /// Full path of a cluster, ancestor names joined with `/`
    pub fn cluster_path(&self, handle: ClusterHandle) -> Result<String> {
        self.clusters.path(handle)
    }

    /// Connect two nodes with a plain solid edge
    pub fn connect(&mut self, from: NodeId, to: NodeId) -> Result<EdgeId> {
        self.connect_with(from, to, None, EdgeStyle::Solid)
    }

    /// Connect two nodes with a labeled solid edge
    pub fn connect_labeled(
        &mut self,
        from: NodeId,
        to: NodeId,
        label: impl Into<String>,
    ) -> Result<EdgeId> {
        self.connect_with(from, to, Some(label.into()), EdgeStyle::Solid)
    }

    /// Connect two nodes with an optional label and an explicit style
    ///
    /// Both endpoints are validated first; a failed connect leaves the edge
    /// set unchanged.
    pub fn connect_with(
        &mut self,
        from: NodeId,
        to: NodeId,
        label: Option<String>,
        style: EdgeStyle,
    ) -> Result<EdgeId> {
        self.registry.resolve(from)?;
        self.registry.resolve(to)?;
        Ok(self.edges.push(EdgeData::with_style(from, to, label, style)))
    }

    /// Look up a node by identifier
    pub fn resolve(&self, id: NodeId) -> Result<&NodeData> {
        self.registry.resolve(id)
    }

    /// Number of nodes created
    pub fn node_count(&self) -> usize {
        self.registry.len()
    }

    /// Number of edges connected
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of clusters opened (the implicit root does not count)
    pub fn cluster_count(&self) -> usize {
        self.clusters.cluster_count()
    }

    /// Serialize the diagram to Graphviz DOT text
    ///
    /// Output is a pure function of the diagram's state: exporting twice with
    /// no intervening mutation yields byte-identical text. Fails with
    /// `UnbalancedScope` while any cluster scope is still open and with
    /// `EmptyDiagram` if no nodes were ever created.
    pub fn export(&self) -> Result<String> {
        let export_span = span!(Level::INFO, "export", title = %self.title);
        let _enter = export_span.enter();

        if !self.clusters.is_balanced() {
            return Err(DiagramError::unbalanced_scope(format!(
                "{} cluster scope(s) still open at export, innermost is \"{}\"",
                self.clusters.open_depth(),
                self.clusters.current_name()
            )));
        }
        if self.registry.is_empty() {
            return Err(DiagramError::EmptyDiagram);
        }

        let text = export::to_dot(self);
        info!(
            nodes = self.node_count(),
            edges = self.edge_count(),
            clusters = self.cluster_count(),
            bytes = text.len(),
            "Exported diagram"
        );
        Ok(text)
    }

    /// Export the diagram and render it to an image file
    ///
    /// Hands the DOT text to the external Graphviz layout engine, which
    /// computes node positions and writes the raster file.
    pub fn render_to(&self, path: impl AsRef<Path>, format: OutputFormat) -> Result<()> {
        let dot = self.export()?;
        render::render_dot(&dot, path.as_ref(), format)
    }

    pub(crate) fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    pub(crate) fn root_cluster(&self) -> &Cluster {
        self.clusters.root()
    }

    pub(crate) fn cluster_at(&self, index: usize) -> &Cluster {
        self.clusters.cluster(index)
    }

    pub(crate) fn edge_set(&self) -> &EdgeSet {
        &self.edges
    }

    pub(crate) fn is_placed(&self, id: NodeId) -> bool {
        self.clusters.is_member(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_ids_unique_across_labels() {
        let mut diagram = Diagram::new("t");
        let a = diagram.node("Lambda", Category::Function);
        let b = diagram.node("Lambda", Category::Function);
        assert_ne!(a, b);
        assert_eq!(diagram.node_count(), 2);
    }

    #[test]
    fn test_ids_do_not_cross_diagrams() {
        let mut first = Diagram::new("first");
        let mut second = Diagram::new("second");
        let id = first.node("A", Category::Service);
        // same index exists in the second diagram, but the tag differs
        second.node("B", Category::Service);
        assert!(matches!(
            second.resolve(id),
            Err(DiagramError::UnknownNode { .. })
        ));
    }

    #[test]
    fn test_connect_validates_both_endpoints() {
        let mut diagram = Diagram::new("t");
        let a = diagram.node("A", Category::Service);
        let mut other = Diagram::new("other");
        let foreign = other.node("X", Category::Service);

        assert!(diagram.connect(a, foreign).is_err());
        assert!(diagram.connect(foreign, a).is_err());
        assert_eq!(diagram.edge_count(), 0, "failed connect must not record an edge");

        assert!(diagram.connect(a, a).is_ok());
        assert_eq!(diagram.edge_count(), 1);
    }

    #[test]
    fn test_place_twice_fails_with_already_member() {
        let mut diagram = Diagram::new("t");
        let id = diagram.detached_node("A", Category::Service);
        let scope = diagram.open_cluster("first home");
        diagram.place(id).unwrap();
        diagram.close_cluster(scope).unwrap();

        let result = diagram.place(id);
        assert!(matches!(result, Err(DiagramError::AlreadyMember { .. })));
    }

    #[test]
    fn test_place_unknown_node_fails() {
        let mut other = Diagram::new("other");
        let foreign = other.node("X", Category::Service);

        let mut diagram = Diagram::new("t");
        assert!(matches!(
            diagram.place(foreign),
            Err(DiagramError::UnknownNode { .. })
        ));
    }

    #[test]
    fn test_place_in_closed_cluster_fails() {
        let mut diagram = Diagram::new("t");
        let scope = diagram.open_cluster("done");
        diagram.close_cluster(scope).unwrap();
        let id = diagram.detached_node("late", Category::Service);
        assert!(matches!(
            diagram.place_in(scope, id),
            Err(DiagramError::ClosedScope { .. })
        ));
    }

    #[test]
    fn test_export_with_open_scope_fails() {
        let mut diagram = Diagram::new("t");
        diagram.node("A", Category::Service);
        let _open = diagram.open_cluster("pending");
        let result = diagram.export();
        assert!(matches!(result, Err(DiagramError::UnbalancedScope { .. })));
    }

    #[test]
    fn test_export_after_close_succeeds() {
        let mut diagram = Diagram::new("t");
        let scope = diagram.open_cluster("API Layer");
        diagram.node("Gateway", Category::Gateway);
        diagram.close_cluster(scope).unwrap();
        assert!(diagram.export().is_ok());
    }

    #[test]
    fn test_export_empty_diagram_fails() {
        let diagram = Diagram::new("nothing here");
        assert!(matches!(diagram.export(), Err(DiagramError::EmptyDiagram)));
    }

    #[test]
    fn test_node_in_closed_cluster_fails_cleanly() {
        let mut diagram = Diagram::new("t");
        let scope = diagram.open_cluster("done");
        diagram.close_cluster(scope).unwrap();

        let before = diagram.node_count();
        let result = diagram.node_in(scope, "late", Category::Service);
        assert!(matches!(result, Err(DiagramError::ClosedScope { .. })));
        assert_eq!(diagram.node_count(), before, "no node may be minted on failure");
    }

    #[test]
    fn test_node_in_open_cluster_by_handle() {
        let mut diagram = Diagram::new("t");
        let scope = diagram.open_cluster("Projectors");
        let id = diagram.node_in(scope, "Views", Category::Function).unwrap();
        diagram.close_cluster(scope).unwrap();
        assert_eq!(diagram.resolve(id).unwrap().label, "Views");
    }

    #[test]
    fn test_cluster_path() {
        let mut diagram = Diagram::new("t");
        let outer = diagram.open_cluster("Query Side");
        let inner = diagram.open_cluster("Read Models");
        diagram.close_cluster(inner).unwrap();
        diagram.close_cluster(outer).unwrap();
        assert_eq!(diagram.cluster_path(inner).unwrap(), "Query Side/Read Models");
    }

    #[test]
    fn test_builder_style_configuration() {
        let mut style = GraphStyle::default();
        style.background = "transparent".to_string();
        let diagram = Diagram::new("t")
            .with_direction(Direction::TopBottom)
            .with_style(style);
        assert_eq!(diagram.direction(), Direction::TopBottom);
        assert_eq!(diagram.style().background, "transparent");
    }
}

//! Archdot - Architecture diagrams as code
//!
//! A library for building directed-graph architecture diagrams in memory and
//! exporting them as deterministic Graphviz DOT text. Layout and rasterization
//! are delegated entirely to the external `dot` engine; this crate owns the
//! model (typed nodes, nested clusters, labeled edges) and the serialization.
//!
//! # Quick Start
//!
//! ```rust
//! use archdot::{Category, Diagram};
//!
//! let mut diagram = Diagram::new("Hello");
//! let a = diagram.node("Client", Category::Client);
//! let b = diagram.node("Service", Category::Service);
//! diagram.connect_labeled(a, b, "request").unwrap();
//!
//! let dot = diagram.export().unwrap();
//! assert!(dot.contains("digraph \"Hello\""));
//! ```
//!
//! # Clusters
//!
//! Clusters are opened and closed with strict stack discipline; the tree
//! structure mirrors the nesting of the calls:
//!
//! ```rust
//! use archdot::{Category, Diagram};
//!
//! let mut diagram = Diagram::new("Grouped");
//! let api = diagram.open_cluster("API Layer");
//! let gateway = diagram.node("Gateway", Category::Gateway);
//! let handler = diagram.node("Handler", Category::Function);
//! diagram.close_cluster(api).unwrap();
//! diagram.connect(gateway, handler).unwrap();
//!
//! let dot = diagram.export().unwrap();
//! assert!(dot.contains("subgraph \"cluster_0\""));
//! ```
//!
//! Exporting while a scope is still open fails with `UnbalancedScope`, and
//! exporting a diagram with no nodes fails with `EmptyDiagram`: a regenerable
//! artifact must be correct by construction, not defensively tolerant.
//!
//! # Rendering
//!
//! With Graphviz installed, `Diagram::render_to` exports and renders in one
//! call:
//!
//! ```rust,no_run
//! use archdot::{Category, Diagram, OutputFormat};
//!
//! let mut diagram = Diagram::new("Rendered");
//! diagram.node("Only", Category::Generic);
//! diagram.render_to("diagram.png", OutputFormat::Png).unwrap();
//! ```

use std::path::Path;

pub mod core;

pub use core::*;

/// Export a diagram and render it straight to a PNG file
///
/// This is the simplest way to turn a finished diagram into an image.
/// Requires the Graphviz `dot` executable on the PATH.
pub fn render_png(diagram: &Diagram, path: impl AsRef<Path>) -> anyhow::Result<()> {
    diagram.render_to(path, OutputFormat::Png)?;
    Ok(())
}

/// Export a diagram and render it straight to an SVG file
pub fn render_svg(diagram: &Diagram, path: impl AsRef<Path>) -> anyhow::Result<()> {
    diagram.render_to(path, OutputFormat::Svg)?;
    Ok(())
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        Category, ClusterHandle, Diagram, DiagramError, Direction, EdgeId, EdgeStyle, GraphStyle,
        NodeData, NodeId, OutputFormat,
    };
}

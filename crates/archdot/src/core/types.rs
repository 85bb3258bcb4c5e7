//! Core type definitions for the diagram model
//!
//! This module contains the fundamental types used throughout archdot:
//! identifiers, node categories, edge styles, layout direction, and the
//! global style defaults carried by every diagram.

use std::fmt;

/// Identifier of a node within one diagram
///
/// Identifiers are assigned at creation time and are unique within a single
/// diagram even when labels repeat. The embedded diagram tag prevents an id
/// minted by one diagram from resolving against another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub(crate) diagram: u32,
    pub(crate) index: u32,
}

impl NodeId {
    pub(crate) fn new(diagram: u32, index: u32) -> Self {
        Self { diagram, index }
    }

    /// Stable identifier used for this node in exported DOT text
    pub fn dot_id(&self) -> String {
        format!("n{}", self.index)
    }

    #[cfg(test)]
    pub(crate) fn for_tests(diagram: u32, index: u32) -> Self {
        Self::new(diagram, index)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.index)
    }
}

/// Identifier of an edge within one diagram
///
/// Edges are identified by their insertion index; the index determines the
/// order in which edges appear in exported text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeId(pub(crate) usize);

impl EdgeId {
    /// Position of this edge in insertion order
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Handle to a cluster scope
///
/// Returned by `open_cluster` and consumed by `close_cluster`. The handle
/// stays valid after the scope closes and can still be used to look the
/// cluster up, but closed clusters reject new members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClusterHandle {
    pub(crate) diagram: u32,
    pub(crate) index: usize,
}

impl ClusterHandle {
    pub(crate) fn new(diagram: u32, index: usize) -> Self {
        Self { diagram, index }
    }
}

/// Semantic category of a node
///
/// Categories are opaque style hints: they select the shape and fill color a
/// node is drawn with and are never used for control flow. The taxonomy is
/// deliberately generic; mapping a concrete technology onto a category is the
/// caller's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Category {
    /// External actor or end user
    Client,
    /// Entry point routing requests (API gateway, load balancer)
    Gateway,
    /// Long-running service or application box
    #[default]
    Service,
    /// Short-lived function or handler
    Function,
    /// Transactional database or table
    Database,
    /// Object or file storage
    Storage,
    /// Point-to-point message queue
    Queue,
    /// Ordered event stream or bus
    Stream,
    /// Security or identity component
    Security,
    /// Anything that fits no other category
    Generic,
}

impl Category {
    /// Graphviz shape used for nodes of this category
    pub fn shape(&self) -> &'static str {
        match self {
            Category::Client => "oval",
            Category::Gateway => "hexagon",
            Category::Service => "box",
            Category::Function => "component",
            Category::Database => "cylinder",
            Category::Storage => "folder",
            Category::Queue => "cds",
            Category::Stream => "parallelogram",
            Category::Security => "diamond",
            Category::Generic => "box",
        }
    }

    /// Fill color used for nodes of this category
    pub fn fill(&self) -> &'static str {
        match self {
            Category::Client => "#f5f5f5",
            Category::Gateway => "#d5c6e8",
            Category::Service => "#cfe2f3",
            Category::Function => "#fce5cd",
            Category::Database => "#d9ead3",
            Category::Storage => "#d0e0e3",
            Category::Queue => "#fff2cc",
            Category::Stream => "#f4cccc",
            Category::Security => "#ead1dc",
            Category::Generic => "#ffffff",
        }
    }

    /// All categories in a stable listing order
    pub fn all() -> &'static [Category] {
        &[
            Category::Client,
            Category::Gateway,
            Category::Service,
            Category::Function,
            Category::Database,
            Category::Storage,
            Category::Queue,
            Category::Stream,
            Category::Security,
            Category::Generic,
        ]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Client => write!(f, "client"),
            Category::Gateway => write!(f, "gateway"),
            Category::Service => write!(f, "service"),
            Category::Function => write!(f, "function"),
            Category::Database => write!(f, "database"),
            Category::Storage => write!(f, "storage"),
            Category::Queue => write!(f, "queue"),
            Category::Stream => write!(f, "stream"),
            Category::Security => write!(f, "security"),
            Category::Generic => write!(f, "generic"),
        }
    }
}

/// Line style of an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum EdgeStyle {
    /// Solid line (default)
    #[default]
    Solid,
    /// Dashed line, conventionally a read or query path
    Dashed,
    /// Dotted line
    Dotted,
    /// Bold line
    Bold,
}

impl EdgeStyle {
    /// The Graphviz `style` attribute value, or None for the solid default
    pub fn dot_attr(&self) -> Option<&'static str> {
        match self {
            EdgeStyle::Solid => None,
            EdgeStyle::Dashed => Some("dashed"),
            EdgeStyle::Dotted => Some("dotted"),
            EdgeStyle::Bold => Some("bold"),
        }
    }
}

impl fmt::Display for EdgeStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeStyle::Solid => write!(f, "solid"),
            EdgeStyle::Dashed => write!(f, "dashed"),
            EdgeStyle::Dotted => write!(f, "dotted"),
            EdgeStyle::Bold => write!(f, "bold"),
        }
    }
}

/// Layout direction of the diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Direction {
    /// Left to right (LR)
    #[default]
    LeftRight,
    /// Top to bottom (TB)
    TopBottom,
    /// Right to left (RL)
    RightLeft,
    /// Bottom to top (BT)
    BottomTop,
}

impl Direction {
    /// Parse a direction from its rankdir spelling (LR, TB/TD, RL, BT)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "LR" => Some(Direction::LeftRight),
            "TB" | "TD" => Some(Direction::TopBottom),
            "RL" => Some(Direction::RightLeft),
            "BT" => Some(Direction::BottomTop),
            _ => None,
        }
    }

    /// The Graphviz `rankdir` attribute value
    pub fn rankdir(&self) -> &'static str {
        match self {
            Direction::LeftRight => "LR",
            Direction::TopBottom => "TB",
            Direction::RightLeft => "RL",
            Direction::BottomTop => "BT",
        }
    }

    /// Returns true if this is a horizontal layout (LR or RL)
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::LeftRight | Direction::RightLeft)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rankdir())
    }
}

/// Global style defaults applied to the whole graph
///
/// The defaults match a conventional architecture-diagram look: orthogonal
/// edge routing, white background, slightly larger graph title font.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphStyle {
    /// Font size for the graph title
    pub font_size: u32,
    /// Font size for node labels
    pub node_font_size: u32,
    /// Font size for edge labels
    pub edge_font_size: u32,
    /// Background color
    pub background: String,
    /// Padding around the drawing, in inches
    pub pad: f64,
    /// Graphviz spline mode for edge routing
    pub splines: String,
}

impl Default for GraphStyle {
    fn default() -> Self {
        Self {
            font_size: 14,
            node_font_size: 12,
            edge_font_size: 10,
            background: "white".to_string(),
            pad: 0.5,
            splines: "ortho".to_string(),
        }
    }
}

/// A node in the diagram with all its metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    /// Display label, may contain newlines
    pub label: String,
    /// Style category of the node
    pub category: Category,
}

impl NodeData {
    /// Create a new node with the default service category
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            category: Category::Service,
        }
    }

    /// Create a new node with a specific category
    pub fn with_category(label: impl Into<String>, category: Category) -> Self {
        Self {
            label: label.into(),
            category,
        }
    }
}

/// An edge connecting two nodes with metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeData {
    /// Source node id
    pub from: NodeId,
    /// Destination node id
    pub to: NodeId,
    /// Optional label on the edge
    pub label: Option<String>,
    /// Line style of the edge
    pub style: EdgeStyle,
}

impl EdgeData {
    /// Create a new solid, unlabeled edge
    pub fn new(from: NodeId, to: NodeId) -> Self {
        Self {
            from,
            to,
            label: None,
            style: EdgeStyle::Solid,
        }
    }

    /// Create a new solid edge with a label
    pub fn with_label(from: NodeId, to: NodeId, label: impl Into<String>) -> Self {
        Self {
            from,
            to,
            label: Some(label.into()),
            style: EdgeStyle::Solid,
        }
    }

    /// Create a new edge with an optional label and an explicit style
    pub fn with_style(
        from: NodeId,
        to: NodeId,
        label: Option<String>,
        style: EdgeStyle,
    ) -> Self {
        Self {
            from,
            to,
            label,
            style,
        }
    }
}

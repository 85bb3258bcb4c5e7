//! DOT exporter
//!
//! Serializes a diagram into a single self-contained Graphviz DOT
//! description: graph-level attributes first, then the cluster tree as
//! nested subgraphs in creation order (depth-first, pre-order), then every
//! edge in insertion order. The output is a pure function of the diagram
//! state, so repeated exports are byte-identical and the artifact diffs
//! cleanly under version control.
//!
//! Subgraph names carry the `cluster_` prefix Graphviz requires to draw a
//! boundary, numbered in traversal order; duplicate cluster titles therefore
//! never collide.

use tracing::trace;

use crate::core::cluster::Cluster;
use crate::core::diagram::Diagram;
use crate::core::types::NodeData;

const INDENT: &str = "    ";

/// Serialize the diagram to DOT text
///
/// Balance and non-emptiness are checked by `Diagram::export` before this
/// runs.
pub(crate) fn to_dot(diagram: &Diagram) -> String {
    let mut out = String::new();
    let title = escape(diagram.title());

    out.push_str(&format!("digraph \"{}\" {{\n", title));
    emit_graph_attrs(diagram, &mut out);

    // top level: root members in placement order, then any node that was
    // never placed in a cluster, in creation order
    let root = diagram.root_cluster();
    let mut top_level: Vec<_> = root.members().to_vec();
    top_level.extend(
        diagram
            .registry()
            .iter()
            .map(|(id, _)| id)
            .filter(|&id| !diagram.is_placed(id)),
    );
    if !top_level.is_empty() {
        out.push('\n');
        for &id in &top_level {
            if let Ok(node) = diagram.registry().resolve(id) {
                out.push_str(&format!("{}{}\n", INDENT, node_line(id.dot_id(), node)));
            }
        }
    }

    let mut next_cluster = 0usize;
    for &child_index in &root.children {
        emit_cluster(
            diagram,
            diagram.cluster_at(child_index),
            1,
            &mut next_cluster,
            &mut out,
        );
    }

    if diagram.edge_count() > 0 {
        out.push('\n');
        for edge in diagram.edge_set().iter() {
            let mut attrs = Vec::new();
            if let Some(label) = &edge.label {
                attrs.push(format!("label=\"{}\"", escape(label)));
            }
            if let Some(style) = edge.style.dot_attr() {
                attrs.push(format!("style=\"{}\"", style));
            }
            if attrs.is_empty() {
                out.push_str(&format!("{}\"{}\" -> \"{}\";\n", INDENT, edge.from, edge.to));
            } else {
                out.push_str(&format!(
                    "{}\"{}\" -> \"{}\" [{}];\n",
                    INDENT,
                    edge.from,
                    edge.to,
                    attrs.join(", ")
                ));
            }
        }
    }

    out.push_str("}\n");
    trace!(bytes = out.len(), "Serialized DOT text");
    out
}

fn emit_graph_attrs(diagram: &Diagram, out: &mut String) {
    let style = diagram.style();
    out.push_str(&format!("{}label=\"{}\";\n", INDENT, escape(diagram.title())));
    out.push_str(&format!("{}labelloc=\"t\";\n", INDENT));
    out.push_str(&format!("{}rankdir=\"{}\";\n", INDENT, diagram.direction().rankdir()));
    out.push_str(&format!("{}fontsize=\"{}\";\n", INDENT, style.font_size));
    out.push_str(&format!("{}bgcolor=\"{}\";\n", INDENT, escape(&style.background)));
    out.push_str(&format!("{}pad=\"{}\";\n", INDENT, style.pad));
    out.push_str(&format!("{}splines=\"{}\";\n", INDENT, escape(&style.splines)));
    out.push_str(&format!("{}node [fontsize=\"{}\"];\n", INDENT, style.node_font_size));
    out.push_str(&format!("{}edge [fontsize=\"{}\"];\n", INDENT, style.edge_font_size));
}

/// Emit one non-root cluster as a `subgraph` block: its label, its member
/// nodes, then its child clusters nested inside. Numbering follows the
/// depth-first pre-order traversal.
fn emit_cluster(
    diagram: &Diagram,
    cluster: &Cluster,
    depth: usize,
    next_cluster: &mut usize,
    out: &mut String,
) {
    let outer = INDENT.repeat(depth);
    let inner = INDENT.repeat(depth + 1);
    let number = *next_cluster;
    *next_cluster += 1;

    out.push('\n');
    out.push_str(&format!("{}subgraph \"cluster_{}\" {{\n", outer, number));
    out.push_str(&format!("{}label=\"{}\";\n", inner, escape(cluster.name())));

    for &id in cluster.members() {
        // members are placed through the registry, so they resolve
        if let Ok(node) = diagram.registry().resolve(id) {
            out.push_str(&format!("{}{}\n", inner, node_line(id.dot_id(), node)));
        }
    }

    for &child_index in &cluster.children {
        emit_cluster(
            diagram,
            diagram.cluster_at(child_index),
            depth + 1,
            next_cluster,
            out,
        );
    }

    out.push_str(&format!("{}}}\n", outer));
}

fn node_line(dot_id: String, node: &NodeData) -> String {
    format!(
        "\"{}\" [label=\"{}\", shape=\"{}\", style=\"filled\", fillcolor=\"{}\"];",
        dot_id,
        escape(&node.label),
        node.category.shape(),
        node.category.fill()
    )
}

/// Escape a string for use inside a double-quoted DOT attribute
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}

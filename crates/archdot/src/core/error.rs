//! Core error types for diagram construction and export
//!
//! This module defines the error taxonomy for the diagram model. Every error
//! is detected synchronously at the point of violation and aborts the current
//! diagram build; none are recoverable mid-construction.

use thiserror::Error;

use crate::core::types::NodeId;

/// Core error types for diagram construction and export
#[derive(Error, Debug)]
pub enum DiagramError {
    #[error("Unknown node: {id} was never created in this diagram")]
    UnknownNode { id: NodeId },

    #[error("Node {id} already belongs to cluster \"{cluster}\"")]
    AlreadyMember { id: NodeId, cluster: String },

    #[error("Cluster \"{cluster}\" is closed and cannot accept new members")]
    ClosedScope { cluster: String },

    #[error("Unbalanced cluster scope: {message}")]
    UnbalancedScope { message: String },

    #[error("Cannot export an empty diagram: no nodes were created")]
    EmptyDiagram,

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl DiagramError {
    /// Create a new unknown-node error
    pub fn unknown_node(id: NodeId) -> Self {
        Self::UnknownNode { id }
    }

    /// Create a new already-member error
    pub fn already_member(id: NodeId, cluster: impl Into<String>) -> Self {
        Self::AlreadyMember {
            id,
            cluster: cluster.into(),
        }
    }

    /// Create a new closed-scope error
    pub fn closed_scope(cluster: impl Into<String>) -> Self {
        Self::ClosedScope {
            cluster: cluster.into(),
        }
    }

    /// Create a new unbalanced-scope error
    pub fn unbalanced_scope(message: impl Into<String>) -> Self {
        Self::UnbalancedScope {
            message: message.into(),
        }
    }

    /// Create a new render error
    pub fn render_error(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }
}

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, DiagramError>;

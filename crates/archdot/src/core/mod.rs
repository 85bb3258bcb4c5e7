//! Core building blocks of the diagram model
//!
//! Dependency order, leaves first: the node registry, the cluster tree
//! (membership), the edge set (endpoint validity), and finally the exporter
//! and renderer bridge that consume all three through the `Diagram` facade.

mod cluster;
mod diagram;
mod edges;
mod error;
mod export;
pub mod logging;
mod registry;
mod render;
mod types;

pub use cluster::*;
pub use diagram::*;
pub use edges::*;
pub use error::*;
pub use logging::*;
pub use registry::*;
pub use render::*;
pub use types::*;

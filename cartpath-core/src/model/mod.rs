//! Data model for in-store navigation
//!
//! Contains the static section layout and the walkable graph derived from it.

pub mod section;
pub mod store_graph;
pub mod walk_node;

pub use section::{CrowdLevel, Section, SectionKind};
pub use store_graph::StoreGraph;
pub use walk_node::{WalkEdge, WalkNode, expand_walk_nodes};

//! This module is responsible for loading store layouts (embedded or JSON)
//! and building the walkable store graph.

mod builder;
mod config;
mod layout;

pub use builder::create_store_graph;
pub use config::{AdjacencyMode, StoreGraphConfig};
pub use layout::{default_sections, load_sections_from_json, load_sections_from_path};

use serde::Deserialize;

/// How authored `connections` turn into walkable edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjacencyMode {
    /// Every connection is walkable in both directions
    #[default]
    Symmetric,
    /// Only the authored direction is walkable
    Directed,
}

/// Options for building a [`crate::StoreGraph`]
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreGraphConfig {
    pub adjacency: AdjacencyMode,
    /// Section that receives categories no section serves
    pub fallback_section: String,
    /// Sections wider than this get interior walk nodes
    pub walk_node_min_width: f64,
    /// Sections taller than this get interior walk nodes
    pub walk_node_min_height: f64,
}

impl Default for StoreGraphConfig {
    fn default() -> Self {
        Self {
            adjacency: AdjacencyMode::Symmetric,
            fallback_section: "pantry".to_string(),
            walk_node_min_width: 15.0,
            walk_node_min_height: 10.0,
        }
    }
}

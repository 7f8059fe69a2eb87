use std::path::Path;

use crate::{Error, Section};

const SUPERCENTER_LAYOUT: &str = include_str!("../../data/supercenter_layout.json");

/// Sections of the embedded supercenter layout
///
/// # Panics
///
/// Never in practice: the embedded layout is covered by tests.
pub fn default_sections() -> Vec<Section> {
    load_sections_from_json(SUPERCENTER_LAYOUT).expect("embedded store layout is valid JSON")
}

/// Parses a JSON array of sections
///
/// # Errors
///
/// Returns an error if the input is not a valid section list
pub fn load_sections_from_json(json: &str) -> Result<Vec<Section>, Error> {
    Ok(serde_json::from_str(json)?)
}

/// Reads a JSON array of sections from disk
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed
pub fn load_sections_from_path(path: &Path) -> Result<Vec<Section>, Error> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("Failed to open layout '{}': {}", path.display(), e),
        )
    })?;
    load_sections_from_json(&contents)
}

impl crate::StoreGraph {
    /// Store graph of the embedded supercenter layout with default options
    ///
    /// # Panics
    ///
    /// Never in practice: the embedded layout is covered by tests.
    pub fn default_layout() -> Self {
        super::create_store_graph(default_sections(), &super::StoreGraphConfig::default())
            .expect("embedded store layout is consistent")
    }
}

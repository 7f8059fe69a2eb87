//! Walkable points derived from sections

use geo::{Coord, Point};

use super::Section;

/// Walkable point inside the store
///
/// Every section contributes a center node whose id equals the section id.
/// Large sections also get interior nodes `<section>-sub-<n>` that give the
/// search finer granularity. Walk nodes are regenerated from the sections on
/// demand and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkNode {
    pub id: String,
    /// Owning section
    pub section_id: String,
    pub geometry: Point<f64>,
    /// Static crowd factor inherited from the owning section
    pub crowd_factor: f64,
}

impl WalkNode {
    pub fn coord(&self) -> Coord<f64> {
        self.geometry.into()
    }

    pub fn is_center(&self) -> bool {
        self.id == self.section_id
    }
}

/// Walkable connection between two nodes
#[derive(Debug, Clone, Copy)]
pub struct WalkEdge {
    /// Euclidean length in layout units
    pub distance: f64,
}

/// Generates the walk nodes for `sections`
///
/// Sections wider than `min_width` or taller than `min_height` get four
/// interior points offset by a quarter of the footprint from the center.
pub fn expand_walk_nodes(sections: &[Section], min_width: f64, min_height: f64) -> Vec<WalkNode> {
    let mut nodes = Vec::with_capacity(sections.len() * 5);

    for section in sections {
        nodes.push(WalkNode {
            id: section.id.clone(),
            section_id: section.id.clone(),
            geometry: section.location(),
            crowd_factor: section.crowd_factor,
        });

        if section.width > min_width || section.height > min_height {
            let dx = section.width / 4.0;
            let dy = section.height / 4.0;
            let offsets = [(-dx, 0.0), (dx, 0.0), (0.0, -dy), (0.0, dy)];

            nodes.extend(offsets.iter().enumerate().map(|(n, (ox, oy))| WalkNode {
                id: format!("{}-sub-{n}", section.id),
                section_id: section.id.clone(),
                geometry: Point::new(section.x + ox, section.y + oy),
                crowd_factor: section.crowd_factor,
            }));
        }
    }

    nodes
}

//! Store sections as authored in the layout data

use geo::{Coord, Point};
use serde::{Deserialize, Serialize};

/// Role of a section in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Section,
    Entrance,
    Checkout,
    Aisle,
    /// Not walkable, never part of a route
    Obstacle,
}

/// Qualitative crowding shown to shoppers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrowdLevel {
    Low,
    Medium,
    High,
}

/// Named, geometrically placed region of the store
///
/// Coordinates live in a normalized 0..100 space. `connections` lists the
/// sections reachable from this one exactly as authored; whether the reverse
/// direction is walkable is decided when the graph is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(rename = "type")]
    pub kind: SectionKind,
    #[serde(default)]
    pub categories: Vec<String>,
    pub crowd_level: CrowdLevel,
    /// Traversal cost multiplier, 1.0 means no penalty
    pub crowd_factor: f64,
    /// Display hint for renderers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub connections: Vec<String>,
}

impl Section {
    pub fn center(&self) -> Coord<f64> {
        Coord {
            x: self.x,
            y: self.y,
        }
    }

    pub fn location(&self) -> Point<f64> {
        Point::new(self.x, self.y)
    }

    pub fn is_walkable(&self) -> bool {
        self.kind != SectionKind::Obstacle
    }
}

//! Immutable walkable graph of a store

use geo::Coord;
use hashbrown::HashMap;
use petgraph::graph::{DiGraph, NodeIndex};

use super::{Section, WalkEdge, WalkNode, expand_walk_nodes};
use crate::crowd::CrowdLevels;

/// Authoritative layout of one store
///
/// Built once by [`crate::create_store_graph`] and read-only afterwards, so a
/// single instance can be shared between any number of concurrent readers.
#[derive(Debug, Clone)]
pub struct StoreGraph {
    pub(crate) sections: Vec<Section>,
    pub(crate) graph: DiGraph<WalkNode, WalkEdge>,
    section_index: HashMap<String, usize>,
    node_index: HashMap<String, NodeIndex>,
    /// Lowercased category label -> index into `sections`
    category_index: HashMap<String, usize>,
    fallback_section: String,
    walk_node_min_size: (f64, f64),
}

impl StoreGraph {
    pub(crate) fn new(
        sections: Vec<Section>,
        graph: DiGraph<WalkNode, WalkEdge>,
        fallback_section: String,
        walk_node_min_size: (f64, f64),
    ) -> Self {
        let section_index = sections
            .iter()
            .enumerate()
            .map(|(idx, section)| (section.id.clone(), idx))
            .collect();

        let node_index = graph
            .node_indices()
            .map(|idx| (graph[idx].id.clone(), idx))
            .collect();

        let category_index = build_category_index(&sections);

        Self {
            sections,
            graph,
            section_index,
            node_index,
            category_index,
            fallback_section,
            walk_node_min_size,
        }
    }

    /// All sections in authored order
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Number of walk nodes (section centers plus interior points)
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn section_by_id(&self, id: &str) -> Option<&Section> {
        self.section_index.get(id).map(|&idx| &self.sections[idx])
    }

    /// Section id the given product category is shelved in
    ///
    /// Matching ignores case and surrounding whitespace. Categories no
    /// section serves resolve to the fallback section, so every cart item
    /// lands somewhere routable.
    pub fn category_to_section(&self, category: &str) -> &str {
        self.category_index
            .get(&category.trim().to_lowercase())
            .map_or(self.fallback_section.as_str(), |&idx| {
                self.sections[idx].id.as_str()
            })
    }

    pub fn fallback_section(&self) -> &str {
        &self.fallback_section
    }

    /// Regenerates the walk nodes from the section data
    pub fn expand_walk_nodes(&self) -> Vec<WalkNode> {
        let (min_width, min_height) = self.walk_node_min_size;
        expand_walk_nodes(&self.sections, min_width, min_height)
    }

    /// Crowd factor of a section, preferring the live map over the static value
    ///
    /// Live values below 1.0 are raised to 1.0. Unknown sections cost 1.0.
    pub fn crowd_factor(&self, section_id: &str, crowd_levels: &CrowdLevels) -> f64 {
        crowd_levels
            .get(section_id)
            .copied()
            .or_else(|| self.section_by_id(section_id).map(|s| s.crowd_factor))
            .map_or(1.0, |factor| factor.max(1.0))
    }

    pub(crate) fn node(&self, id: &str) -> Option<NodeIndex> {
        self.node_index.get(id).copied()
    }

    pub(crate) fn node_coord(&self, node: NodeIndex) -> Coord<f64> {
        self.graph[node].coord()
    }

    /// Ids of the nodes reachable in one step from `id`
    pub fn neighbors(&self, id: &str) -> Vec<&str> {
        self.node(id)
            .map(|node| {
                self.graph
                    .neighbors(node)
                    .map(|next| self.graph[next].id.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Category labels claimed by several sections go to the section whose id
/// or name equals the label, otherwise to the first claimant.
fn build_category_index(sections: &[Section]) -> HashMap<String, usize> {
    let mut index: HashMap<String, usize> = HashMap::new();

    for (idx, section) in sections.iter().enumerate() {
        for category in &section.categories {
            let key = category.trim().to_lowercase();
            let eponymous =
                section.id.to_lowercase() == key || section.name.to_lowercase() == key;

            match index.entry(key) {
                hashbrown::hash_map::Entry::Vacant(entry) => {
                    entry.insert(idx);
                }
                hashbrown::hash_map::Entry::Occupied(mut entry) => {
                    if eponymous {
                        entry.insert(idx);
                    }
                }
            }
        }
    }

    index
}

#[cfg(test)]
mod tests {
    use crate::StoreGraph;
    use crate::crowd::CrowdLevels;

    #[test]
    fn test_section_lookup() {
        let graph = StoreGraph::default_layout();

        let dairy = graph.section_by_id("dairy").expect("dairy exists");
        assert_eq!(dairy.name, "Dairy");
        assert!(graph.section_by_id("garden-center").is_none());
    }

    #[test]
    fn test_category_mapping_matches_store_table() {
        let graph = StoreGraph::default_layout();

        assert_eq!(graph.category_to_section("Fruits"), "produce");
        assert_eq!(graph.category_to_section("Yogurt"), "dairy");
        assert_eq!(graph.category_to_section("Poultry"), "meat");
        assert_eq!(graph.category_to_section("Ice Cream"), "frozen");
        assert_eq!(graph.category_to_section("Paper Products"), "household");
        // Claimed by both pantry and snacks; the eponymous section wins
        assert_eq!(graph.category_to_section("Snacks"), "snacks");
        assert_eq!(graph.category_to_section("  dairy "), "dairy");
    }

    #[test]
    fn test_unknown_category_falls_back() {
        let graph = StoreGraph::default_layout();

        assert_eq!(graph.category_to_section("Garden"), "pantry");
        assert_eq!(graph.category_to_section(""), "pantry");
    }

    #[test]
    fn test_crowd_factor_prefers_live_value() {
        let graph = StoreGraph::default_layout();
        let mut crowd = CrowdLevels::new();
        crowd.insert("dairy".to_string(), 2.5);
        crowd.insert("produce".to_string(), 0.4);

        assert!((graph.crowd_factor("dairy", &crowd) - 2.5).abs() < 1e-12);
        assert!((graph.crowd_factor("meat", &crowd) - 1.9).abs() < 1e-12);
        assert!((graph.crowd_factor("produce", &crowd) - 1.0).abs() < 1e-12);
        assert!((graph.crowd_factor("nowhere", &crowd) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_expand_walk_nodes_covers_every_section() {
        let graph = StoreGraph::default_layout();
        let nodes = graph.expand_walk_nodes();

        assert_eq!(nodes.len(), graph.node_count());
        for section in graph.sections() {
            assert!(nodes.iter().any(|n| n.id == section.id && n.is_center()));
        }
    }
}

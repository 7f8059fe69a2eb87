use geo::{Distance, Euclidean};
use hashbrown::{HashMap, HashSet};
use log::{debug, info};
use petgraph::graph::{DiGraph, NodeIndex};

use super::config::{AdjacencyMode, StoreGraphConfig};
use crate::{
    Error, Section, StoreGraph,
    model::{WalkEdge, WalkNode, expand_walk_nodes},
};

/// Creates a store graph from authored sections
///
/// # Errors
///
/// Returns an error if section ids are duplicated, a connection points to an
/// unknown section, a crowd factor is below 1.0 or the fallback section is
/// missing.
pub fn create_store_graph(
    sections: Vec<Section>,
    config: &StoreGraphConfig,
) -> Result<StoreGraph, Error> {
    validate_sections(&sections, config)?;

    let walk_nodes = expand_walk_nodes(
        &sections,
        config.walk_node_min_width,
        config.walk_node_min_height,
    );
    let graph = build_walk_graph(&sections, walk_nodes, config.adjacency);

    info!(
        "Store graph built: {} sections, {} walk nodes, {} edges ({:?} adjacency)",
        sections.len(),
        graph.node_count(),
        graph.edge_count(),
        config.adjacency
    );

    Ok(StoreGraph::new(
        sections,
        graph,
        config.fallback_section.clone(),
        (config.walk_node_min_width, config.walk_node_min_height),
    ))
}

fn validate_sections(sections: &[Section], config: &StoreGraphConfig) -> Result<(), Error> {
    let mut ids = HashSet::with_capacity(sections.len());
    for section in sections {
        if !ids.insert(section.id.as_str()) {
            return Err(Error::DuplicateSection(section.id.clone()));
        }
    }

    for section in sections {
        if section.crowd_factor.is_nan() || section.crowd_factor < 1.0 {
            return Err(Error::InvalidData(format!(
                "Section '{}' has crowd factor {} (must be at least 1.0)",
                section.id, section.crowd_factor
            )));
        }

        if let Some(target) = section
            .connections
            .iter()
            .find(|target| !ids.contains(target.as_str()))
        {
            return Err(Error::UnknownSection(format!(
                "{target} (connected from '{}')",
                section.id
            )));
        }
    }

    if !ids.contains(config.fallback_section.as_str()) {
        return Err(Error::UnknownSection(format!(
            "{} (configured as fallback section)",
            config.fallback_section
        )));
    }

    Ok(())
}

fn build_walk_graph(
    sections: &[Section],
    walk_nodes: Vec<WalkNode>,
    adjacency: AdjacencyMode,
) -> DiGraph<WalkNode, WalkEdge> {
    let mut graph = DiGraph::with_capacity(walk_nodes.len(), walk_nodes.len() * 4);
    let mut centers: HashMap<String, NodeIndex> = HashMap::with_capacity(sections.len());
    let mut interior: Vec<(NodeIndex, String)> = Vec::new();

    for node in walk_nodes {
        let center = node.is_center();
        let section_id = node.section_id.clone();
        let idx = graph.add_node(node);
        if center {
            centers.insert(section_id, idx);
        } else {
            interior.push((idx, section_id));
        }
    }

    // Interior points hang off their own section center in both directions
    for (idx, section_id) in interior {
        if let Some(&center) = centers.get(&section_id) {
            connect(&mut graph, center, idx);
            connect(&mut graph, idx, center);
        }
    }

    let walkable: HashSet<&str> = sections
        .iter()
        .filter(|s| s.is_walkable())
        .map(|s| s.id.as_str())
        .collect();

    for section in sections.iter().filter(|s| s.is_walkable()) {
        let from = centers[&section.id];
        for target in &section.connections {
            if target == &section.id || !walkable.contains(target.as_str()) {
                debug!("Ignoring connection {} -> {target}", section.id);
                continue;
            }
            let to = centers[target];
            connect(&mut graph, from, to);
            if adjacency == AdjacencyMode::Symmetric {
                connect(&mut graph, to, from);
            }
        }
    }

    graph
}

fn connect(graph: &mut DiGraph<WalkNode, WalkEdge>, from: NodeIndex, to: NodeIndex) {
    let distance = Euclidean.distance(graph[from].geometry, graph[to].geometry);
    graph.update_edge(from, to, WalkEdge { distance });
}

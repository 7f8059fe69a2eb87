//! A* search between two walk nodes with crowd-weighted edge costs
//!
//! The cost of stepping onto a node is the edge length times the crowd
//! factor of the node's owning section. The heuristic is the plain
//! Euclidean distance to the goal, which underestimates only while crowd
//! factors stay at 1.0; the search is therefore crowd-biased rather than
//! certified optimal.

use std::{cmp::Ordering, collections::BinaryHeap};

use fixedbitset::FixedBitSet;
use geo::{Coord, Distance, Euclidean, Point};
use itertools::Itertools;
use log::trace;
use petgraph::{graph::NodeIndex, visit::EdgeRef};

use crate::{StoreGraph, crowd::CrowdLevels};

#[derive(Copy, Clone, Debug)]
struct State {
    f: f64,
    /// Insertion order, keeps pops stable among equal `f`
    seq: usize,
    node: NodeIndex,
}

// Min-heap by f, then by insertion order
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for State {}

fn euclidean(a: Coord<f64>, b: Coord<f64>) -> f64 {
    Euclidean.distance(Point::from(a), Point::from(b))
}

/// Finds the walk nodes from `start_id` to `goal_id`, both inclusive
///
/// Returns `None` when either id is unknown or the goal is unreachable.
pub fn find_node_path(
    graph: &StoreGraph,
    start_id: &str,
    goal_id: &str,
    crowd_levels: &CrowdLevels,
) -> Option<Vec<NodeIndex>> {
    let start = graph.node(start_id)?;
    let goal = graph.node(goal_id)?;
    let goal_coord = graph.node_coord(goal);
    let heuristic = |node: NodeIndex| euclidean(graph.node_coord(node), goal_coord);

    let node_count = graph.node_count();
    let mut g_score = vec![f64::INFINITY; node_count];
    let mut parents: Vec<Option<NodeIndex>> = vec![None; node_count];
    let mut closed = FixedBitSet::with_capacity(node_count);
    let mut heap = BinaryHeap::with_capacity(node_count);
    let mut seq = 0;

    g_score[start.index()] = 0.0;
    heap.push(State {
        f: heuristic(start),
        seq,
        node: start,
    });

    while let Some(State { node, .. }) = heap.pop() {
        if node == goal {
            return Some(reconstruct(&parents, goal));
        }

        // Stale heap entry for an already expanded node
        if closed.put(node.index()) {
            continue;
        }

        for edge in graph.graph.edges(node) {
            let next = edge.target();
            if closed.contains(next.index()) {
                continue;
            }

            let owner = &graph.graph[next].section_id;
            let step = edge.weight().distance * graph.crowd_factor(owner, crowd_levels);
            let tentative = g_score[node.index()] + step;

            if tentative < g_score[next.index()] {
                g_score[next.index()] = tentative;
                parents[next.index()] = Some(node);
                seq += 1;
                heap.push(State {
                    f: tentative + heuristic(next),
                    seq,
                    node: next,
                });
            }
        }
    }

    trace!("No path from {start_id} to {goal_id}");
    None
}

fn reconstruct(parents: &[Option<NodeIndex>], goal: NodeIndex) -> Vec<NodeIndex> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(prev) = parents[current.index()] {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

/// Coordinates of the A* path from `start_id` to `goal_id`
///
/// An empty result is the only failure signal: unknown ids and unreachable
/// goals both produce it.
pub fn find_path(
    graph: &StoreGraph,
    start_id: &str,
    goal_id: &str,
    crowd_levels: &CrowdLevels,
) -> Vec<Coord<f64>> {
    find_node_path(graph, start_id, goal_id, crowd_levels)
        .map(|nodes| nodes.into_iter().map(|n| graph.node_coord(n)).collect())
        .unwrap_or_default()
}

/// Crowd-weighted cost of walking `nodes` in order
///
/// Each segment is charged the crowd factor of the section owning the node
/// it starts from.
pub fn weighted_path_cost(
    graph: &StoreGraph,
    nodes: &[NodeIndex],
    crowd_levels: &CrowdLevels,
) -> f64 {
    nodes
        .iter()
        .tuple_windows()
        .map(|(&a, &b)| {
            let owner = &graph.graph[a].section_id;
            euclidean(graph.node_coord(a), graph.node_coord(b))
                * graph.crowd_factor(owner, crowd_levels)
        })
        .sum()
}

/// Euclidean length of a polyline
pub fn polyline_length(points: &[Coord<f64>]) -> f64 {
    points
        .iter()
        .tuple_windows()
        .map(|(&a, &b)| euclidean(a, b))
        .sum()
}

impl StoreGraph {
    /// See [`find_path`]
    pub fn find_path(
        &self,
        start_id: &str,
        goal_id: &str,
        crowd_levels: &CrowdLevels,
    ) -> Vec<Coord<f64>> {
        find_path(self, start_id, goal_id, crowd_levels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        AdjacencyMode, CrowdLevel, Section, SectionKind, StoreGraphConfig, create_store_graph,
    };

    fn section(id: &str, x: f64, y: f64, connections: &[&str]) -> Section {
        Section {
            id: id.to_string(),
            name: id.to_string(),
            x,
            y,
            width: 4.0,
            height: 4.0,
            kind: SectionKind::Section,
            categories: Vec::new(),
            crowd_level: CrowdLevel::Low,
            crowd_factor: 1.0,
            color: None,
            connections: connections.iter().map(ToString::to_string).collect(),
        }
    }

    fn graph(sections: Vec<Section>, adjacency: AdjacencyMode) -> StoreGraph {
        let config = StoreGraphConfig {
            adjacency,
            fallback_section: sections[0].id.clone(),
            ..Default::default()
        };
        create_store_graph(sections, &config).unwrap()
    }

    /// Two routes from `a` to `d`: over `b` (short) or over `c` (long)
    fn diamond() -> StoreGraph {
        graph(
            vec![
                section("a", 0.0, 0.0, &["b", "c"]),
                section("b", 10.0, 0.0, &["d"]),
                section("c", -20.0, 15.0, &["d"]),
                section("d", 10.0, 30.0, &[]),
            ],
            AdjacencyMode::Symmetric,
        )
    }

    #[test]
    fn test_picks_shorter_route() {
        let graph = diamond();
        let path = find_path(&graph, "a", "d", &CrowdLevels::new());

        assert_eq!(
            path,
            vec![
                Coord { x: 0.0, y: 0.0 },
                Coord { x: 10.0, y: 0.0 },
                Coord { x: 10.0, y: 30.0 },
            ]
        );
    }

    #[test]
    fn test_crowd_pushes_route_around_busy_section() {
        let graph = diamond();
        let mut crowd = CrowdLevels::new();
        crowd.insert("b".to_string(), 5.0);

        // Over b: 10*5 + 30 = 80, over c: 25 + 33.5 = 58.5
        let path = find_path(&graph, "a", "d", &crowd);
        assert_eq!(path[1], Coord { x: -20.0, y: 15.0 });
    }

    #[test]
    fn test_start_equals_goal() {
        let graph = diamond();
        let path = find_path(&graph, "c", "c", &CrowdLevels::new());
        assert_eq!(path, vec![Coord { x: -20.0, y: 15.0 }]);
    }

    #[test]
    fn test_unknown_ids_give_empty_path() {
        let graph = diamond();
        assert!(find_path(&graph, "a", "zz", &CrowdLevels::new()).is_empty());
        assert!(find_path(&graph, "zz", "a", &CrowdLevels::new()).is_empty());
    }

    #[test]
    fn test_disconnected_goal_gives_empty_path() {
        let graph = graph(
            vec![
                section("a", 0.0, 0.0, &["b"]),
                section("b", 10.0, 0.0, &[]),
                section("island", 50.0, 50.0, &[]),
            ],
            AdjacencyMode::Symmetric,
        );
        assert!(find_path(&graph, "a", "island", &CrowdLevels::new()).is_empty());
    }

    #[test]
    fn test_directed_graph_blocks_reverse_travel() {
        let sections = vec![section("a", 0.0, 0.0, &["b"]), section("b", 10.0, 0.0, &[])];
        let directed = graph(sections.clone(), AdjacencyMode::Directed);
        let symmetric = graph(sections, AdjacencyMode::Symmetric);

        assert_eq!(find_path(&directed, "a", "b", &CrowdLevels::new()).len(), 2);
        assert!(find_path(&directed, "b", "a", &CrowdLevels::new()).is_empty());
        assert_eq!(find_path(&symmetric, "b", "a", &CrowdLevels::new()).len(), 2);
    }

    #[test]
    fn test_interior_nodes_are_reachable_goals() {
        let graph = StoreGraph::default_layout();
        let path = find_path(&graph, "entrance", "produce-sub-0", &CrowdLevels::new());

        assert_eq!(path.last(), Some(&Coord { x: 13.75, y: 70.0 }));
        assert_eq!(path[path.len() - 2], Coord { x: 20.0, y: 70.0 });
    }

    #[test]
    fn test_weighted_cost_charges_segment_start() {
        let graph = diamond();
        let crowd = CrowdLevels::from([("a".to_string(), 2.0), ("b".to_string(), 3.0)]);
        let nodes = find_node_path(&graph, "a", "d", &CrowdLevels::new()).unwrap();

        // a->b charged at a (2.0), b->d charged at b (3.0)
        let cost = weighted_path_cost(&graph, &nodes, &crowd);
        assert!((cost - (10.0 * 2.0 + 30.0 * 3.0)).abs() < 1e-9);
    }

    #[test]
    fn test_polyline_length() {
        let points = [
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 3.0, y: 4.0 },
            Coord { x: 3.0, y: 10.0 },
        ];
        assert!((polyline_length(&points) - 11.0).abs() < 1e-12);
        assert!(polyline_length(&points[..1]).abs() < f64::EPSILON);
        assert!(polyline_length(&[]).abs() < f64::EPSILON);
    }
}

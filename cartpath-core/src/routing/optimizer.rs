//! Multi-stop visit ordering

use log::debug;

use super::astar::{find_node_path, weighted_path_cost};
use crate::{SectionId, StoreGraph, crowd::CrowdLevels};

/// Orders destinations into a visit sequence
///
/// `cost` returns the cost of walking between two ids, or `None` when the
/// second is unreachable from the first. Implementations must return a
/// permutation of `destinations` and must not fail.
pub trait VisitOrderStrategy {
    fn order(
        &self,
        start: &str,
        destinations: &[SectionId],
        cost: &dyn Fn(&str, &str) -> Option<f64>,
    ) -> Vec<SectionId>;
}

/// Greedy open-path ordering: always walk to the cheapest remaining stop
///
/// Unreachable stops never win a round; when every remaining stop is
/// unreachable the first one in input order is taken.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestNeighbor;

impl VisitOrderStrategy for NearestNeighbor {
    fn order(
        &self,
        start: &str,
        destinations: &[SectionId],
        cost: &dyn Fn(&str, &str) -> Option<f64>,
    ) -> Vec<SectionId> {
        let mut unvisited = destinations.to_vec();
        let mut route = Vec::with_capacity(unvisited.len());
        let mut current = start.to_string();

        while !unvisited.is_empty() {
            let mut nearest = 0;
            let mut shortest = f64::INFINITY;

            for (idx, candidate) in unvisited.iter().enumerate() {
                if let Some(c) = cost(&current, candidate)
                    && c < shortest
                {
                    shortest = c;
                    nearest = idx;
                }
            }

            if shortest.is_infinite() {
                debug!("No reachable stop from {current}, taking {}", unvisited[0]);
            }

            current = unvisited.remove(nearest);
            route.push(current.clone());
        }

        route
    }
}

/// Orders stops using crowd-weighted A* costs
pub struct RouteOptimizer<'a, S = NearestNeighbor> {
    graph: &'a StoreGraph,
    strategy: S,
}

impl<'a> RouteOptimizer<'a, NearestNeighbor> {
    pub fn new(graph: &'a StoreGraph) -> Self {
        Self::with_strategy(graph, NearestNeighbor)
    }
}

impl<'a, S: VisitOrderStrategy> RouteOptimizer<'a, S> {
    pub fn with_strategy(graph: &'a StoreGraph, strategy: S) -> Self {
        Self { graph, strategy }
    }

    /// Crowd-weighted cost of the A* path between two ids
    pub fn leg_cost(&self, from: &str, to: &str, crowd_levels: &CrowdLevels) -> Option<f64> {
        find_node_path(self.graph, from, to, crowd_levels)
            .map(|nodes| weighted_path_cost(self.graph, &nodes, crowd_levels))
    }

    /// Visit order for `destinations` starting at `start_id`
    pub fn order_stops(
        &self,
        start_id: &str,
        destinations: &[SectionId],
        crowd_levels: &CrowdLevels,
    ) -> Vec<SectionId> {
        if destinations.len() < 2 {
            return destinations.to_vec();
        }

        let cost = |from: &str, to: &str| self.leg_cost(from, to, crowd_levels);
        self.strategy.order(start_id, destinations, &cost)
    }
}
